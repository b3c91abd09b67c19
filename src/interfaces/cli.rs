use crate::domain::market::Timeframe;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cryptosim", version, about = "Simulated crypto trading desk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Commands accepted both on the command line and inside the shell
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List assets by market-cap rank
    Catalog,
    /// Synthetic price history for an asset
    Chart {
        asset: String,
        #[arg(short, long, default_value = "30d")]
        timeframe: Timeframe,
    },
    /// Create an account (mock, no server involved)
    Register {
        email: String,
        password: String,
        /// Display name; may contain spaces
        #[arg(num_args = 1.., required = true)]
        name: Vec<String>,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Buy at the current simulated price
    Buy { asset: String, amount: String },
    /// Sell at the current simulated price
    Sell { asset: String, amount: String },
    /// Holdings valued at current prices
    Portfolio {
        /// Keep re-rendering while prices tick
        #[arg(short, long)]
        watch: bool,
    },
    /// Trade log, newest first
    History {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Interactive session with live price ticks (default)
    Shell,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// One line typed into the shell
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "cryptosim", disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

impl ShellLine {
    pub fn parse_line(line: &str) -> Result<Command, clap::Error> {
        Self::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trade_line() {
        assert_eq!(
            ShellLine::parse_line("buy btc 0.1").unwrap(),
            Command::Buy {
                asset: "btc".to_string(),
                amount: "0.1".to_string()
            }
        );
    }

    #[test]
    fn test_chart_timeframe() {
        assert_eq!(
            ShellLine::parse_line("chart eth --timeframe 7d").unwrap(),
            Command::Chart {
                asset: "eth".to_string(),
                timeframe: Timeframe::OneWeek
            }
        );
        assert!(ShellLine::parse_line("chart eth -t 1y").is_err());
    }

    #[test]
    fn test_register_name_with_spaces() {
        let command = ShellLine::parse_line("register ada@b.io secret Ada Lovelace").unwrap();
        assert!(matches!(command, Command::Register { name, .. } if name.join(" ") == "Ada Lovelace"));
    }

    #[test]
    fn test_cli_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["cryptosim"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["cryptosim", "history", "--csv", "out.csv"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::History {
                csv: Some(PathBuf::from("out.csv"))
            })
        );
    }
}
