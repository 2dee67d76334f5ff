use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use thumbcache::{scanner, CacheSettings, ThumbnailCache};

/// Preload thumbnails around a position in a directory and report what is resident.
#[derive(Parser, Debug)]
#[command(name = "thumbcache", author, version, about)]
struct Cli {
    /// Directory to list
    dir: PathBuf,

    /// Index of the focused entry in the listing
    #[arg(long, default_value_t = 0)]
    focus: usize,

    /// Cache capacity (overrides the settings file)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    capacity: Option<u64>,

    /// Settings file to read instead of the default location
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => CacheSettings::load_from(path)
            .with_context(|| format!("reading settings from {}", path.display()))?,
        None => CacheSettings::load_or_default(),
    };
    if let Some(capacity) = cli.capacity {
        settings.thumbnail_cache_size =
            usize::try_from(capacity).context("capacity does not fit in memory")?;
    }
    settings.validate()?;

    let entries = scanner::scan_directory(&cli.dir)
        .with_context(|| format!("listing {}", cli.dir.display()))?;
    let image_count = entries.iter().filter(|e| e.is_image()).count();
    println!(
        "{}: {} entries, {} images",
        cli.dir.display(),
        entries.len(),
        image_count
    );

    let cache = ThumbnailCache::with_file_loader(settings.thumbnail_cache_size);

    cache.ensure_current(&entries, cli.focus);
    if settings.preload_on_navigate {
        let outcome = cache.ensure_preloaded(&entries, cli.focus);
        println!(
            "preload: {} requested, {} loaded, {} failed",
            outcome.requested, outcome.loaded, outcome.failed
        );
    }

    println!("resident ({} / {}), least recent first:", cache.len(), cache.capacity());
    for (path, image) in cache.snapshot() {
        let (width, height) = image.dimensions();
        println!("  {}  {}x{}", path.display(), width, height);
    }

    let stats = cache.stats();
    println!(
        "hits {} misses {} evictions {} load failures {}",
        stats.hits, stats.misses, stats.evictions, stats.load_failures
    );

    Ok(())
}
