use clap::Subcommand;

/// Coffee type commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CoffeeTypeCommands {
    /// Create a coffee type.
    Create { name: String },
    /// Delete a coffee type and its bindings.
    Delete { id: i64 },
    /// List coffee types.
    List,
    /// Get a coffee type with its bound characteristics.
    Get { id: i64 },
}
