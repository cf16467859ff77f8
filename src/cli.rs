use bookmarker::config::{Config, DATA_DIR_ENV, DEFAULT_DATA_DIR, FETCH_TIMEOUT_ENV};
use bookmarker::fetcher::{Fetcher, MetaSource};
use bookmarker::service::{AddOptions, BookmarkService, ServiceError};
use bookmarker::store::BookmarkStore;
use bookmarker::validate::{ValidationError, parse_id};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output;

/// Bookmarker - keep page metadata for the links you care about
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding index.json and the bookmark files
    #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: PathBuf,

    /// Give up on a metadata request after this many seconds
    #[arg(long, env = FETCH_TIMEOUT_ENV, global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the full error chain on failure
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add the given url to the bookmarks
    Add {
        url: String,

        /// Store the url without requesting metadata
        #[arg(short, long)]
        offline: bool,
    },

    /// List all bookmarks
    List {
        /// Output a compact table
        #[arg(short, long)]
        compact: bool,
    },

    /// Show everything stored for a bookmark
    Details {
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// Find bookmarks whose title matches a term
    Search { term: String },

    /// Delete a bookmark, or all of them
    Delete {
        #[arg(allow_negative_numbers = true, conflicts_with = "all")]
        id: Option<String>,

        /// Delete every bookmark
        #[arg(short, long)]
        all: bool,

        /// Print the deleted bookmark's details
        #[arg(short, long)]
        info: bool,
    },
}

pub async fn run(args: Args) -> Result<(), ServiceError> {
    let config = Config::with_data_dir(args.data_dir).fetch_timeout_secs(args.timeout);
    let fetcher = Fetcher::new(&config);
    let mut service = BookmarkService::new(BookmarkStore::open(&config.data_dir), fetcher);

    match args.command {
        Command::Add { url, offline } => {
            let record = service.add_bookmark(&url, AddOptions { offline }).await?;
            output::print_added(&record);
        }
        Command::List { compact } => {
            output::print_index(&service.get_index()?.items, compact);
        }
        Command::Details { id } => {
            let id = parse_id(&id)?;
            match service.read_bookmark(id)? {
                Some(record) => output::print_details(&record),
                None => output::print_not_found(id),
            }
        }
        Command::Search { term } => {
            let items = service.search(&term)?;
            output::print_index(&items, false);
        }
        Command::Delete { id, all, info } => delete(&mut service, id, all, info)?,
    }

    Ok(())
}

fn delete<F: MetaSource>(
    service: &mut BookmarkService<F>,
    id: Option<String>,
    all: bool,
    info: bool,
) -> Result<(), ServiceError> {
    if all {
        service.clear_bookmarks()?;
        output::print_cleared();
        return Ok(());
    }

    let raw = id.ok_or(ValidationError::MissingDeleteTarget)?;
    let id = parse_id(&raw)?;
    let record = if info { service.read_bookmark(id)? } else { None };

    if service.delete_bookmark(id)? {
        output::print_deleted(id);
        if let Some(record) = record {
            output::print_details(&record);
        }
    } else {
        output::print_not_found(id);
    }
    Ok(())
}
