use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CharacteristicCommands;
use crate::commands::shared::parse::domain;
use crate::commands::shared::role::require_expert;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cafe characteristic`.
pub async fn handle(
    action: &CharacteristicCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CharacteristicCommands::Create {
            name,
            range,
            values,
        } => {
            require_expert(flags.role, "characteristic create")?;
            let domain = domain(range, values)?;
            let characteristic = ctx.service.create_characteristic(name, domain).await?;
            output(&characteristic, flags.format)
        }
        CharacteristicCommands::SetRange { id, min, max } => {
            require_expert(flags.role, "characteristic set-range")?;
            let characteristic = ctx.service.update_numeric_range(*id, *min, *max).await?;
            output(&characteristic, flags.format)
        }
        CharacteristicCommands::SetValues { id, values } => {
            require_expert(flags.role, "characteristic set-values")?;
            let characteristic = ctx.service.update_categorical_values(*id, values).await?;
            output(&characteristic, flags.format)
        }
        CharacteristicCommands::Delete { id } => {
            require_expert(flags.role, "characteristic delete")?;
            ctx.service.delete_characteristic(*id).await?;
            output(&json!({ "id": id, "deleted": true }), flags.format)
        }
        CharacteristicCommands::List => {
            let listing = ctx.service.list_characteristics().await?;
            output(&listing, flags.format)
        }
        CharacteristicCommands::Get { id } => {
            let characteristic = ctx.service.get_characteristic(*id).await?;
            output(&characteristic, flags.format)
        }
    }
}
