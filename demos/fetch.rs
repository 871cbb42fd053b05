//! Mirror a handful of pages into a local directory
//!
//! ```text
//! cargo run --example fetch -- <output-dir> <url>...
//! ```
//!
//! Set `RUST_LOG` to change verbosity (default `info,web_fetch=debug`).

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web_fetch::{Config, Event, WebFetcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,web_fetch=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let output_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => {
            eprintln!("usage: fetch <output-dir> <url>...");
            std::process::exit(2);
        }
    };
    let urls: Vec<String> = args.collect();

    // The pipeline expects an existing directory
    if !output_dir.is_dir() {
        eprintln!("{} is not a directory", output_dir.display());
        std::process::exit(1);
    }

    let fetcher = WebFetcher::new(Config::default())?;

    // Print image failures as they happen
    let mut events = fetcher.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Event::AssetFailed { url, error, .. } = event {
                println!("[image] {url}: {error}");
            }
        }
    });

    let results = fetcher.fetch_urls(urls.iter().cloned(), &output_dir).await;

    println!(
        "\n{} of {} pages saved to {}",
        results.len(),
        urls.len(),
        output_dir.display()
    );
    for page in &results {
        println!(
            "  {} -> {} ({} links, {}/{} images)",
            page.url,
            page.page_path.display(),
            page.links.len(),
            page.saved_assets(),
            page.images.len()
        );
    }

    if std::env::var_os("FETCH_JSON").is_some() {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}
