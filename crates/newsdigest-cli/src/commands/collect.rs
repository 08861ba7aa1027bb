use anyhow::Result;

use newsdigest_core::{Collection, Collector, DigestConfig};

use crate::OutputFormat;

pub async fn run(config: &DigestConfig, hours: u32, format: OutputFormat) -> Result<()> {
    let collector = Collector::from_config(config)?;
    let collection = collector.collect(hours).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&collection.items)?);
        }
        OutputFormat::Text => print_text(&collection, hours),
    }

    Ok(())
}

fn print_text(collection: &Collection, hours: u32) {
    if collection.items.is_empty() {
        println!("No matching news in the last {} hours.", hours);
    } else {
        for (category, items) in collection.by_category() {
            println!("[{}] ({} items)\n", category, items.len());
            for item in items {
                println!("  {} - {}", item.title, item.source);
                println!("    {}  {}", item.published_at, item.link);
            }
            println!();
        }
    }

    let stats = &collection.stats;
    println!(
        "{} items from {} sources ({} failed); skipped: {} stale, {} duplicate, {} irrelevant, {} undated",
        collection.items.len(),
        stats.sources,
        stats.sources_failed,
        stats.skipped_stale,
        stats.skipped_duplicate,
        stats.skipped_irrelevant,
        stats.skipped_undated
    );

    for failure in &collection.failures {
        println!("  [ERROR] {} ({}): {}", failure.source, failure.url, failure.reason);
    }
}
