//! Command line definition

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spaces-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit JSON formatted logs
    #[arg(long)]
    pub json_logs: bool,

    /// Database URL, overriding `SPACES__DATABASE__URL`
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create every table and index if missing
    Provision,
    /// Drop every table if present
    Teardown {
        /// Required; teardown destroys all data
        #[arg(long)]
        yes: bool,
    },
    /// Hard-delete restraints that have already expired
    Compact,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Self::Provision => "provision",
            Self::Teardown { .. } => "teardown",
            Self::Compact => "compact",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["spaces-admin", "provision"]).unwrap();
        assert_eq!(cli.command, Command::Provision);
        assert!(!cli.json_logs);

        let cli = Cli::try_parse_from(["spaces-admin", "--json-logs", "-l", "debug", "compact"]).unwrap();
        assert_eq!(cli.command, Command::Compact);
        assert!(cli.json_logs);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));

        let cli = Cli::try_parse_from(["spaces-admin", "teardown", "--yes"]).unwrap();
        assert_eq!(cli.command, Command::Teardown { yes: true });
        assert_eq!(cli.command.name(), "teardown");
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["spaces-admin"]).is_err());
        assert!(Cli::try_parse_from(["spaces-admin", "migrate"]).is_err());
    }
}
