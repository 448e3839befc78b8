use clap::{Args, Subcommand};

/// Numeric bounds, shared by characteristic and binding commands.
#[derive(Clone, Debug, Default, Args)]
pub struct RangeArgs {
    /// Lower bound (inclusive)
    #[arg(long, requires = "max", allow_negative_numbers = true)]
    pub min: Option<f64>,
    /// Upper bound (inclusive)
    #[arg(long, requires = "min", allow_negative_numbers = true)]
    pub max: Option<f64>,
}

/// Characteristic registry commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CharacteristicCommands {
    /// Create a numeric (`--min/--max`) or categorical (`--values`) characteristic.
    Create {
        name: String,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["min", "max"])]
        values: Vec<String>,
    },
    /// Replace the global range of a numeric characteristic.
    SetRange {
        id: i64,
        #[arg(long, allow_negative_numbers = true)]
        min: f64,
        #[arg(long, allow_negative_numbers = true)]
        max: f64,
    },
    /// Replace the value set of a categorical characteristic.
    SetValues {
        id: i64,
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<String>,
    },
    /// Delete a characteristic no coffee type uses.
    Delete { id: i64 },
    /// List characteristics grouped by kind.
    List,
    /// Get a characteristic by ID.
    Get { id: i64 },
}
