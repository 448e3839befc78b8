use clap::ValueEnum;

use cafe_core::enums::Role;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Raw,
}

impl OutputFormat {
    /// Parse the `general.format` config value.
    pub fn from_config(raw: &str) -> anyhow::Result<Self> {
        <Self as ValueEnum>::from_str(raw, true).map_err(|_| anyhow::anyhow!("invalid general.format '{raw}'"))
    }
}

/// Global flags resolved against configuration, handed to every handler.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub role: Role,
    pub quiet: bool,
}
