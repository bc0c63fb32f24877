//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::address::AddressForm;
use crate::config::CONFIG_FILE;

/// NNA asset registry: dual HFN/MFA addressing over the layer taxonomy
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build an address, allocating the next sequential if none is given
    #[command(visible_alias = "e")]
    Encode {
        #[command(flatten)]
        args: EncodeArgs,
    },

    /// Convert addresses between HFN and MFA
    #[command(visible_alias = "c")]
    Convert {
        /// Addresses in either form
        #[arg(value_name = "ADDRESS", required = true)]
        addresses: Vec<String>,

        /// Target form (default: the opposite of each input)
        #[arg(long, value_enum)]
        to: Option<TargetForm>,
    },

    /// Check that a taxonomy path exists
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        path: PathArgs,
    },

    /// List layers, categories of a layer, or subcategories of a category
    #[command(visible_alias = "ls")]
    List {
        /// Layer code (S, STR, 2 or Stars)
        layer: Option<String>,

        /// Category code, alphabetic or numeric
        category: Option<String>,
    },

    /// Audit the catalog for round-trip and uniqueness problems
    Check,

    /// Show or reset the sequence counter of a path
    Counter {
        #[command(flatten)]
        path: PathArgs,

        /// Clear the counter; numbering restarts at 001
        #[arg(long)]
        reset: bool,
    },
}

/// A taxonomy triple, each code in either form.
#[derive(clap::Args, Debug, Clone)]
pub struct PathArgs {
    /// Layer code (S, STR, 2 or Stars)
    pub layer: String,

    /// Category code, alphabetic or numeric
    pub category: String,

    /// Subcategory code, alphabetic or numeric
    pub subcategory: String,
}

/// Encode command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub path: PathArgs,

    /// Sequential number; allocated from the counter store when omitted
    pub sequential: Option<String>,

    /// File extension appended to both forms
    #[arg(short, long, conflicts_with = "components")]
    pub ext: Option<String>,

    /// Component address for composite assets (repeatable, order kept)
    #[arg(short = 'c', long = "component", value_name = "ADDRESS")]
    pub components: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetForm {
    Hfn,
    Mfa,
}

impl From<TargetForm> for AddressForm {
    fn from(value: TargetForm) -> Self {
        match value {
            TargetForm::Hfn => Self::Hfn,
            TargetForm::Mfa => Self::Mfa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encode() {
        let cli = Cli::parse_from(["nna", "encode", "S", "POP", "HPM", "3", "-e", "png"]);
        let Commands::Encode { args } = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.path.subcategory, "HPM");
        assert_eq!(args.sequential.as_deref(), Some("3"));
        assert_eq!(args.ext.as_deref(), Some("png"));
        assert_eq!(cli.config, PathBuf::from("registry.toml"));
    }

    #[test]
    fn test_ext_conflicts_with_components() {
        let result = Cli::try_parse_from([
            "nna", "encode", "C", "RMX", "BAS", "-e", "mp4", "-c", "2.001.007.003",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["nna", "convert", "S.POP.HPM.003", "--to", "mfa", "--json", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
        let Commands::Convert { to, addresses } = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(to, Some(TargetForm::Mfa));
        assert_eq!(addresses, ["S.POP.HPM.003"]);
    }
}
