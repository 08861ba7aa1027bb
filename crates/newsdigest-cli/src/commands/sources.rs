use anyhow::Result;

use newsdigest_core::DigestConfig;

pub fn run(config: &DigestConfig) -> Result<()> {
    if config.feeds.is_empty() {
        println!("No feeds configured.");
        println!("\nAdd feeds to the [feeds] table of your config, for example:");
        println!("  tech = [{{ name = \"Example\", url = \"https://example.com/rss\" }}]");
        return Ok(());
    }

    for (category, feeds) in &config.feeds {
        println!("{} ({}):", category, feeds.len());
        for feed in feeds {
            println!("  {} - {}", feed.name, feed.url);
        }
        println!();
    }

    let keywords = &config.keywords;
    println!("Include keywords: {}", keywords.include().join(", "));
    println!("Exclude keywords: {}", keywords.exclude().join(", "));

    Ok(())
}
