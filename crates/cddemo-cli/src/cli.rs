use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "cddemo",
    about = "Demo REST server for clusters and their nodes",
    version,
)]
pub struct Cli {
    /// Server listen address, e.g. `:80` or `127.0.0.1:1234`
    #[arg(long)]
    pub listen: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(["cddemo"]).unwrap();
        assert!(cli.listen.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.log_level(), Level::INFO);
    }

    #[test]
    fn parse_listen() {
        let cli = Cli::try_parse_from(["cddemo", "--listen", "0.0.0.0:1234"]).unwrap();
        assert_eq!(cli.listen.as_deref(), Some("0.0.0.0:1234"));
    }

    #[test]
    fn parse_config_and_verbose() {
        let cli = Cli::try_parse_from(["cddemo", "--config", "demo.toml", "-v"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("demo.toml")));
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["cddemo", "--bogus"]).is_err());
    }
}
