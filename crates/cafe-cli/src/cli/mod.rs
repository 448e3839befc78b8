use clap::Parser;

use cafe_config::CafeConfig;
use cafe_core::enums::Role;

use crate::commands::shared::parse::parse_enum;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cafe` binary.
#[derive(Debug, Parser)]
#[command(name = "cafe", version, about = "Coffee knowledge base - expert editing and specialist analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to general.format)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Acting role: expert or specialist (defaults to general.role)
    #[arg(short, long, global = true, value_parser = parse_role)]
    pub role: Option<Role>,

    /// Knowledge base file (defaults to database.path)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

fn parse_role(raw: &str) -> anyhow::Result<Role> {
    parse_enum(raw, "role")
}

impl Cli {
    /// Resolve global flags, falling back to configuration for anything not given.
    pub fn global_flags(&self, config: &CafeConfig) -> anyhow::Result<GlobalFlags> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_config(&config.general.format)?,
        };
        Ok(GlobalFlags {
            format,
            role: self.role.unwrap_or(config.general.role),
            quiet: self.quiet,
        })
    }
}
