use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reelgrab")]
#[command(author, version, about = "Instagram reel metadata and media link resolver over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Run {
        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Scrape metadata for a reel and print it
    Info {
        /// Instagram post or reel URL
        url: String,

        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Resolve download links through snapsave and print them as JSON
    Download {
        /// Instagram, Facebook or TikTok URL
        url: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
