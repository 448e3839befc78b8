use clap::{Args, Subcommand};

use cafe_core::enums::AnalysisMethod;

use crate::cli::subcommands::{BindingCommands, CharacteristicCommands, CoffeeTypeCommands};
use crate::commands::shared::parse::parse_enum;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Characteristic registry.
    Characteristic {
        #[command(subcommand)]
        action: CharacteristicCommands,
    },
    /// Coffee types.
    CoffeeType {
        #[command(subcommand)]
        action: CoffeeTypeCommands,
    },
    /// Coffee type to characteristic bindings.
    Binding {
        #[command(subcommand)]
        action: BindingCommands,
    },
    /// Report coffee types that block classification.
    Completeness,
    /// Show every coffee type with its bound characteristics.
    Kb,
    /// Classify a coffee sample with one of the engines.
    Analyze(AnalyzeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Engine: static (rule-based) or ml
    #[arg(long, value_parser = parse_method, default_value = "static")]
    pub method: AnalysisMethod,

    /// Sample value as `<key>=<raw>`; repeat per characteristic. The key is matched
    /// as an exact name first, then as an id, then as a legacy `numeric_<id>` key
    #[arg(long = "value", required = true)]
    pub values: Vec<String>,
}

fn parse_method(raw: &str) -> anyhow::Result<AnalysisMethod> {
    parse_enum(raw, "method")
}
