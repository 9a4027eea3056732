use anyhow::Result;
use dotenvy::dotenv;

use reelcore::core::web_server::{start_web_server, WebState};
use reelcore::core::{config, init_logger, log_startup_configuration};
use reelcore::{InstagramScraper, MediaResolver, MetadataProvider, SnapsaveClient};

mod cli;

use cli::{Cli, Commands};

/// Main entry point for reelgrab
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
/// With no subcommand the HTTP server is started.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // .env must be loaded before any config static is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run { port }) => run_server(port).await,
        Some(Commands::Info { url, json }) => run_cli_info(url, json).await,
        Some(Commands::Download { url }) => run_cli_download(url).await,
        None => {
            log::info!("No command specified, running server");
            run_server(None).await
        }
    }
}

async fn run_server(port: Option<u16>) -> Result<()> {
    log_startup_configuration();

    let port = port.unwrap_or(*config::PORT);
    let state = WebState::from_config()?;

    start_web_server(port, state)
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))
}

async fn run_cli_info(url: String, json: bool) -> Result<()> {
    let scraper = InstagramScraper::new()?;
    let metadata = scraper.fetch_metadata(&url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    println!("Shortcode: {}", metadata.shortcode);
    println!("Author: {}", show(metadata.author.clone()));
    println!("Name: {}", show(metadata.author_name.clone()));
    println!("Uploaded: {}", show(metadata.upload_date.clone()));
    println!("Likes: {}", show(metadata.like_count.map(|n| n.to_string())));
    println!("Comments: {}", show(metadata.comment_count.map(|n| n.to_string())));
    println!("Views: {}", show(metadata.view_count.map(|n| n.to_string())));
    println!("Video: {}", show(metadata.video_url.clone()));
    println!("Caption: {}", show(metadata.caption.clone()));
    println!("Source: {:?}", metadata.source);

    Ok(())
}

async fn run_cli_download(url: String) -> Result<()> {
    let resolver = SnapsaveClient::new()?;
    let result = resolver.resolve(&url).await?;

    if !result.status {
        log::warn!("{} could not resolve {}: {}", resolver.name(), url, result.msg.as_deref().unwrap_or("unknown"));
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
