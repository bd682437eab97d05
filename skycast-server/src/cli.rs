use clap::{Parser, Subcommand};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather tool server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the tool-call protocol over stdin/stdout.
    Stdio,

    /// Serve the HTTP query endpoint and the event-stream endpoint.
    Http {
        /// Bind host; overrides the configured value.
        #[arg(long)]
        host: Option<String>,

        /// Bind port; overrides the configured value.
        #[arg(long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stdio_subcommand() {
        let cli = Cli::try_parse_from(["skycast", "stdio"]).expect("should parse");
        assert!(matches!(cli.command, Command::Stdio));
    }

    #[test]
    fn parses_http_subcommand_with_port() {
        let cli = Cli::try_parse_from(["skycast", "http", "--port", "9000"]).expect("should parse");
        match cli.command {
            Command::Http { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            Command::Stdio => panic!("expected http subcommand"),
        }
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["skycast", "ftp"]).is_err());
    }
}
