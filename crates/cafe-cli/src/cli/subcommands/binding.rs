use clap::Subcommand;

use super::RangeArgs;

/// Commands linking coffee types to characteristics.
#[derive(Clone, Debug, Subcommand)]
pub enum BindingCommands {
    /// Record that a coffee type uses a characteristic, without narrowing it yet.
    Attach {
        #[arg(long = "type")]
        coffee_type: i64,
        #[arg(long)]
        characteristic: i64,
    },
    /// Set a coffee type's sub-range (`--min/--max`) or sub-set (`--values`).
    Bind {
        #[arg(long = "type")]
        coffee_type: i64,
        #[arg(long)]
        characteristic: i64,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["min", "max"])]
        values: Vec<String>,
    },
    /// Remove a characteristic from a coffee type.
    Unbind {
        #[arg(long = "type")]
        coffee_type: i64,
        #[arg(long)]
        characteristic: i64,
    },
    /// Replace a coffee type's whole binding set from a JSON array, e.g.
    /// `[{"characteristic_id": 1, "type": "numeric", "min_value": 2, "max_value": 5}]`.
    /// Nothing changes if any entry is invalid.
    Replace {
        #[arg(long = "type")]
        coffee_type: i64,
        #[arg(long)]
        json: String,
    },
    /// List a coffee type's bindings grouped by kind.
    List {
        #[arg(long = "type")]
        coffee_type: i64,
    },
}
