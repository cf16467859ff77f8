use bookmarker::service::ServiceError;
use bookmarker::store::{IndexItem, Record};
use chrono::{DateTime, Local, Utc};
use std::error::Error;
use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Color, Panel, Style, object::FirstRow},
};

#[derive(Tabled)]
struct BookmarkRow<'a> {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "URL")]
    url: &'a str,
    #[tabled(rename = "TITLE")]
    title: &'a str,
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn message_table(message: &str) -> Table {
    let mut builder = Builder::default();
    builder.push_record([message.to_string()]);
    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

pub fn print_added(record: &Record) {
    println!();
    println!("✅ Bookmark added!");
    println!("Details:");
    println!("\tID:\t\t{}", record.id);
    if let Some(title) = record.meta.title.as_deref().filter(|t| !t.is_empty()) {
        println!("\tTitle:\t\t{title}");
    }
    println!("\tCreated At:\t{}", format_millis(record.created_at));
    println!();
    println!("For more details, run: bookmarker details {}", record.id);
}

pub fn print_index(items: &[IndexItem], compact: bool) {
    if items.is_empty() {
        println!("{}", message_table("Sorry, no bookmarks found 😢"));
        return;
    }

    let rows = items.iter().map(|item| BookmarkRow {
        id: item.id,
        url: &item.url,
        title: &item.title,
    });
    let mut table = Table::new(rows);
    if compact {
        table.with(Style::blank());
    } else {
        table.with(Style::rounded());
    }
    table.modify(FirstRow, Color::FG_YELLOW);

    println!("{table}");
    println!();
    println!("To see a bookmark's details, run: bookmarker details <id>");
}

fn details_table(title: &str, rows: Vec<[String; 2]>) -> Table {
    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Panel::header(title))
        .modify(FirstRow, Color::FG_MAGENTA);
    table
}

pub fn print_details(record: &Record) {
    let general = details_table(
        "General details",
        vec![
            ["ID".to_string(), record.id.to_string()],
            ["Filename".to_string(), record.filename.clone()],
            ["Created At".to_string(), format_millis(record.created_at)],
            ["Updated At".to_string(), format_millis(record.updated_at)],
        ],
    );
    let mut meta_rows: Vec<[String; 2]> = record
        .meta
        .entries()
        .into_iter()
        .map(|(key, value)| [key.to_string(), value.to_string()])
        .collect();
    if meta_rows.is_empty() {
        meta_rows.push(["(none)".to_string(), String::new()]);
    }
    let meta = details_table("Meta details", meta_rows);

    println!("{general}");
    println!("{meta}");
}

pub fn print_not_found(id: u64) {
    println!("No bookmark found with id {id}");
}

pub fn print_deleted(id: u64) {
    println!("🗑️  Deleted bookmark {id}");
}

pub fn print_cleared() {
    println!("🗑️  Deleted all bookmarks");
}

/// Friendly one-liner for each error kind. `debug` adds the full cause chain.
pub fn print_error(err: &ServiceError, debug: bool) {
    let summary = match err {
        ServiceError::Fetch(_) => {
            "Could not fetch the page. Check the url, or add it with --offline.".to_string()
        }
        ServiceError::Store(e) => format!("Bookmark storage failed: {e}"),
        ServiceError::Validation(e) => e.to_string(),
    };
    eprintln!("❌ {summary}");

    if debug {
        eprintln!("{err}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmarker::store::Meta;

    #[test]
    fn test_format_millis_epoch_is_not_raw() {
        assert_ne!(format_millis(0), "0");
    }

    #[test]
    fn test_format_millis_out_of_range_falls_back() {
        assert_eq!(format_millis(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn test_details_table_contains_meta() {
        let record = Record {
            id: 0,
            filename: "0.json".to_string(),
            meta: Meta::offline("http://example.com"),
            created_at: 0,
            updated_at: 0,
        };
        let rows = record
            .meta
            .entries()
            .into_iter()
            .map(|(key, value)| [key.to_string(), value.to_string()])
            .collect();

        let rendered = details_table("Meta details", rows).to_string();

        assert!(rendered.contains("Meta details"));
        assert!(rendered.contains("http://example.com"));
    }

    #[test]
    fn test_message_table_renders_message() {
        assert!(message_table("nothing here").to_string().contains("nothing here"));
    }
}
