use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "swda-inspect")]
#[command(bin_name = "swda-inspect")]
#[command(about = "Inspect a Switchboard Dialog Act corpus", long_about = None)]
pub struct InspectCli {
    /// The corpus root, holding swda-metadata.csv and the sw*utt directories
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: InspectCommand,
}

#[derive(Debug, Subcommand)]
pub enum InspectCommand {
    /// Load every conversation and report totals
    Check {
        /// Log conversations that fail to load and keep going
        #[arg(long)]
        skip_errors: bool,
    },
    /// Print one conversation
    Show { conversation_no: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_subcommands() {
        let cli = InspectCli::parse_from(["swda-inspect", "swda", "check", "--skip-errors"]);
        assert_eq!(cli.root, PathBuf::from("swda"));
        assert!(matches!(cli.command, InspectCommand::Check { skip_errors: true }));

        let cli = InspectCli::parse_from(["swda-inspect", "swda", "show", "4325"]);
        assert!(matches!(cli.command, InspectCommand::Show { conversation_no: 4325 }));
    }

    #[test]
    fn it_rejects_non_numeric_conversations() {
        let result = InspectCli::try_parse_from(["swda-inspect", "swda", "show", "sw4325"]);
        assert!(result.is_err());
    }
}
