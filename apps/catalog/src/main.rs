use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{CatalogService, CatalogView, ViewEvent};
use shared::domain::Movie;
use storage::{InMemoryRecordStore, RecordStore, Storage};
use tokio::io::BufReader;
use tracing::info;

mod config;
mod shell;

use config::{load_settings, normalize_database_url};

#[derive(Parser, Debug)]
#[command(name = "movie-catalog", about = "Browse and edit a movie catalog")]
struct Cli {
    /// Overrides the configured database url.
    #[arg(long)]
    database_url: Option<String>,
    /// Keep the catalog in memory for this run only.
    #[arg(long, conflicts_with = "database_url")]
    memory: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "0")]
        rating: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        rating: Option<String>,
    },
    Delete {
        id: String,
    },
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let store: Arc<dyn RecordStore> = if cli.memory {
        info!("using in-memory record store");
        Arc::new(InMemoryRecordStore::new())
    } else {
        let raw_url = cli.database_url.as_deref().unwrap_or(&settings.database_url);
        let database_url = normalize_database_url(raw_url);
        let storage = Storage::new(&database_url)
            .await
            .with_context(|| format!("failed to open catalog database '{database_url}'"))?;
        storage.health_check().await?;
        info!(database_url = %database_url, "opened catalog database");
        Arc::new(storage)
    };

    let mut view = CatalogView::new(CatalogService::new(store));
    view.initialize().await;

    let mut stdout = std::io::stdout();
    match cli.command {
        Command::List { search } => {
            if let Some(text) = search {
                view.dispatch(ViewEvent::SearchTextChanged(text)).await;
            }
            shell::render_list(&view, &mut stdout)?;
        }
        Command::Add {
            title,
            description,
            rating,
        } => {
            view.dispatch(ViewEvent::TitleChanged(title)).await;
            view.dispatch(ViewEvent::DescriptionChanged(description))
                .await;
            view.dispatch(ViewEvent::RatingInputChanged(rating)).await;
            view.dispatch(ViewEvent::FormSubmit).await;
            finish_write(&view, "add")?;
            shell::render_list(&view, &mut stdout)?;
        }
        Command::Update {
            id,
            title,
            description,
            rating,
        } => {
            let movie = find_movie(&view, &id)?;
            view.dispatch(ViewEvent::MovieSelected(movie)).await;
            if let Some(title) = title {
                view.dispatch(ViewEvent::TitleChanged(title)).await;
            }
            if let Some(description) = description {
                view.dispatch(ViewEvent::DescriptionChanged(description))
                    .await;
            }
            if let Some(rating) = rating {
                view.dispatch(ViewEvent::RatingInputChanged(rating)).await;
            }
            view.dispatch(ViewEvent::FormSubmit).await;
            finish_write(&view, "update")?;
            shell::render_list(&view, &mut stdout)?;
        }
        Command::Delete { id } => {
            let movie = find_movie(&view, &id)?;
            view.dispatch(ViewEvent::MovieSelected(movie)).await;
            view.dispatch(ViewEvent::DeleteRequested).await;
            finish_write(&view, "delete")?;
            shell::render_list(&view, &mut stdout)?;
        }
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            shell::run_shell(&mut view, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

fn find_movie(view: &CatalogView, id: &str) -> Result<Movie> {
    view.catalog()
        .movies()
        .iter()
        .find(|movie| movie.id.as_ref().is_some_and(|m| m.as_str() == id))
        .cloned()
        .with_context(|| format!("no movie with id '{id}'"))
}

fn finish_write(view: &CatalogView, action: &str) -> Result<()> {
    if let Some(message) = view.form().error_message() {
        bail!("{action} failed: {message}");
    }
    Ok(())
}
