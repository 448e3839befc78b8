use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CoffeeTypeCommands;
use crate::commands::shared::role::require_expert;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cafe coffee-type`.
pub async fn handle(
    action: &CoffeeTypeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CoffeeTypeCommands::Create { name } => {
            require_expert(flags.role, "coffee-type create")?;
            let coffee_type = ctx.service.create_coffee_type(name).await?;
            output(&coffee_type, flags.format)
        }
        CoffeeTypeCommands::Delete { id } => {
            require_expert(flags.role, "coffee-type delete")?;
            ctx.service.delete_coffee_type(*id).await?;
            output(&json!({ "id": id, "deleted": true }), flags.format)
        }
        CoffeeTypeCommands::List => {
            let coffee_types = ctx.service.list_coffee_types().await?;
            output(&coffee_types, flags.format)
        }
        CoffeeTypeCommands::Get { id } => {
            let profile = ctx.service.coffee_type_profile(*id).await?;
            output(&profile, flags.format)
        }
    }
}
