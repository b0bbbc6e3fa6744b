//! Line-driven front end for the catalog view.

use std::io::Write;

use anyhow::Result;
use client_core::{CatalogView, ViewEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
commands:
  list                  show the (filtered) catalog
  search <text>         filter by title or description
  select <id>           edit an existing movie
  title <text>          set the title of the bound movie
  description <text>    set the description of the bound movie
  rating <value>        set the rating (0-5)
  submit                add, or update when editing
  delete                delete the movie being edited
  reset                 leave the form and start a new movie
  help                  show this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Select(String),
    Title(String),
    Description(String),
    Rating(String),
    Submit,
    Delete,
    Reset,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "list" | "ls" => ShellCommand::List,
        "search" => ShellCommand::Search(rest.to_string()),
        "select" if !rest.is_empty() => ShellCommand::Select(rest.to_string()),
        "select" => return Err("usage: select <id>".into()),
        "title" => ShellCommand::Title(rest.to_string()),
        "description" | "desc" => ShellCommand::Description(rest.to_string()),
        "rating" => ShellCommand::Rating(rest.to_string()),
        "submit" | "save" => ShellCommand::Submit,
        "delete" => ShellCommand::Delete,
        "reset" | "new" => ShellCommand::Reset,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

pub fn render_list(view: &CatalogView, out: &mut impl Write) -> Result<()> {
    let catalog = view.catalog();
    if !catalog.search_text().is_empty() {
        writeln!(out, "search: {}", catalog.search_text())?;
    }
    if catalog.filtered_movies().is_empty() {
        writeln!(out, "(no movies)")?;
    }
    for movie in catalog.filtered_movies() {
        let id = movie.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
        writeln!(
            out,
            "{id}  {}  ({})  {}",
            movie.title,
            movie.rating_label(),
            movie.description
        )?;
    }
    Ok(())
}

fn render_form(view: &CatalogView, out: &mut impl Write) -> Result<()> {
    let catalog = view.catalog();
    let movie = catalog.selected_movie();
    let mode = if catalog.is_edit_mode() { "edit" } else { "add" };
    writeln!(
        out,
        "[{mode}] title={:?} description={:?} rating={}",
        movie.title,
        movie.description,
        view.form().rating()
    )?;
    if let Some(message) = view.form().error_message() {
        writeln!(out, "error: {message}")?;
    }
    Ok(())
}

/// Returns `false` once the user asked to quit.
pub async fn execute(
    view: &mut CatalogView,
    command: ShellCommand,
    out: &mut impl Write,
) -> Result<bool> {
    match command {
        ShellCommand::List => render_list(view, out)?,
        ShellCommand::Search(text) => {
            view.dispatch(ViewEvent::SearchTextChanged(text)).await;
            render_list(view, out)?;
        }
        ShellCommand::Select(id) => {
            let movie = view
                .catalog()
                .movies()
                .iter()
                .find(|movie| movie.id.as_ref().is_some_and(|m| m.as_str() == id))
                .cloned();
            match movie {
                Some(movie) => {
                    view.dispatch(ViewEvent::MovieSelected(movie)).await;
                    render_form(view, out)?;
                }
                None => writeln!(out, "no movie with id '{id}'")?,
            }
        }
        ShellCommand::Title(text) => {
            view.dispatch(ViewEvent::TitleChanged(text)).await;
            render_form(view, out)?;
        }
        ShellCommand::Description(text) => {
            view.dispatch(ViewEvent::DescriptionChanged(text)).await;
            render_form(view, out)?;
        }
        ShellCommand::Rating(raw) => {
            view.dispatch(ViewEvent::RatingInputChanged(raw)).await;
            render_form(view, out)?;
        }
        ShellCommand::Submit => {
            view.dispatch(ViewEvent::FormSubmit).await;
            after_write(view, out)?;
        }
        ShellCommand::Delete => {
            if view.catalog().is_edit_mode() {
                view.dispatch(ViewEvent::DeleteRequested).await;
                after_write(view, out)?;
            } else {
                writeln!(out, "select a movie before deleting")?;
            }
        }
        ShellCommand::Reset => {
            view.dispatch(ViewEvent::FormReset).await;
            render_form(view, out)?;
        }
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

fn after_write(view: &CatalogView, out: &mut impl Write) -> Result<()> {
    match view.form().error_message() {
        Some(message) => writeln!(out, "error: {message}")?,
        None => render_list(view, out)?,
    }
    Ok(())
}

pub async fn run_shell<R>(view: &mut CatalogView, input: R, out: &mut impl Write) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    render_list(view, out)?;
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(command)) => {
                if !execute(view, command, out).await? {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => writeln!(out, "{message}")?,
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
