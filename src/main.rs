use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use hls_playlist::{ParserConfig, Playlist};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hls-inspect")]
#[command(version, about = "Parse an HLS playlist and print it as JSON")]
struct Args {
    /// Playlist file, or `-` for stdin
    #[arg(default_value = "-")]
    path: PathBuf,

    /// Base URI for relative references (defaults to the file's URL)
    #[arg(long, env = "HLS_BASE_URI")]
    base_uri: Option<String>,

    /// Pick a default alternate in every media group
    #[arg(long)]
    pick_defaults: bool,

    /// Select the item at this index
    #[arg(long)]
    select: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hls_playlist=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = ParserConfig::from_env();

    let (data, default_base) = read_input(&args.path)?;
    let base_uri = args.base_uri.unwrap_or(default_base);
    tracing::debug!("Parsing {} bytes against {}", data.len(), base_uri);

    let mut playlist = Playlist::parse_with_config(&base_uri, &data, &config)
        .with_context(|| format!("Failed to parse {}", args.path.display()))?;

    if args.pick_defaults {
        playlist.pick_random_media_items();
    }
    if let Some(index) = args.select {
        playlist.select_track(index, true)?;
    }

    tracing::info!(
        "Parsed {} playlist with {} items",
        if playlist.is_variant() { "variant" } else { "media" },
        playlist.len()
    );

    let report = serde_json::json!({
        "playlist": &playlist,
        "tracks": playlist.track_info(),
        "media_tracks": playlist.media_track_info(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Read the playlist bytes and derive a base URI from where they came from.
fn read_input(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    if path.as_os_str() == "-" {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .context("Failed to read stdin")?;
        return Ok((data, "file:///".to_string()));
    }

    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let base = url::Url::from_file_path(&absolute)
        .map_err(|_| anyhow::anyhow!("{} is not a valid file URL", absolute.display()))?;

    Ok((data, base.to_string()))
}
