pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedwatch")]
#[command(about = "Watch RSS feeds and list new posts as they appear", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add feeds and keep polling them for new posts.
    ///
    /// Further addresses are read from stdin, one per line. A line of the
    /// form `open <item-id>` shows that post and marks it as seen.
    Watch {
        /// Feed addresses to add on startup
        urls: Vec<String>,

        /// Delay between polling cycles in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,
    },
    /// Fetch a feed once and print it
    Check {
        /// Address of the feed
        url: String,

        /// Print the resulting state as JSON instead
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from([
            "feedwatch",
            "watch",
            "https://a.example/rss",
            "https://b.example/rss",
            "--poll-interval-ms",
            "1000",
        ])
        .unwrap();

        match cli.command {
            Commands::Watch {
                urls,
                poll_interval_ms,
            } => {
                assert_eq!(urls.len(), 2);
                assert_eq!(poll_interval_ms, Some(1000));
            }
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn test_parse_check_with_config() {
        let cli = Cli::try_parse_from([
            "feedwatch",
            "check",
            "https://a.example/rss",
            "--json",
            "--config",
            "/tmp/feedwatch.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/feedwatch.toml")));
        assert!(matches!(cli.command, Commands::Check { json: true, .. }));
    }

    #[test]
    fn test_negative_interval_is_rejected() {
        assert!(Cli::try_parse_from(["feedwatch", "watch", "--poll-interval-ms", "-5"]).is_err());
    }
}
