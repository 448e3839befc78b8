use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

use cafe_core::entities::Narrowing;
use cafe_core::ids::CharacteristicId;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BindingCommands;
use crate::commands::shared::parse::narrowing;
use crate::commands::shared::role::require_expert;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cafe binding`.
pub async fn handle(
    action: &BindingCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BindingCommands::Attach {
            coffee_type,
            characteristic,
        } => {
            require_expert(flags.role, "binding attach")?;
            let binding = ctx.service.attach(*coffee_type, *characteristic).await?;
            output(&binding, flags.format)
        }
        BindingCommands::Bind {
            coffee_type,
            characteristic,
            range,
            values,
        } => {
            require_expert(flags.role, "binding bind")?;
            let narrowing = narrowing(range, values)?;
            let binding = ctx
                .service
                .bind(*coffee_type, *characteristic, narrowing)
                .await?;
            output(&binding, flags.format)
        }
        BindingCommands::Unbind {
            coffee_type,
            characteristic,
        } => {
            require_expert(flags.role, "binding unbind")?;
            let removed = ctx.service.unbind(*coffee_type, *characteristic).await?;
            output(
                &json!({
                    "coffee_type_id": coffee_type,
                    "characteristic_id": characteristic,
                    "removed": removed,
                }),
                flags.format,
            )
        }
        BindingCommands::Replace { coffee_type, json } => {
            require_expert(flags.role, "binding replace")?;
            let entries = parse_entries(json)?;
            let bindings = ctx.service.replace_bindings(*coffee_type, &entries).await?;
            output(&bindings, flags.format)
        }
        BindingCommands::List { coffee_type } => {
            let bindings = ctx.service.list_for_type(*coffee_type).await?;
            output(&bindings, flags.format)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReplaceEntry {
    characteristic_id: CharacteristicId,
    #[serde(flatten)]
    narrowing: Narrowing,
}

fn parse_entries(raw: &str) -> anyhow::Result<Vec<(CharacteristicId, Narrowing)>> {
    let entries: Vec<ReplaceEntry> =
        serde_json::from_str(raw).context("invalid --json: expected an array of bindings")?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.characteristic_id, entry.narrowing))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_mixed_entries() {
        let entries = parse_entries(
            r#"[
                {"characteristic_id": 1, "type": "numeric", "min_value": 2.5, "max_value": 5},
                {"characteristic_id": 2, "type": "categorical", "values": ["Brazil"]}
            ]"#,
        )
        .expect("entries should parse");
        assert_eq!(
            entries,
            vec![
                (1, Narrowing::numeric(2.5, 5.0)),
                (2, Narrowing::categorical(["Brazil"])),
            ]
        );
    }

    #[test]
    fn empty_array_clears() {
        assert!(parse_entries("[]").expect("entries should parse").is_empty());
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert!(parse_entries(r#"[{"characteristic_id": 1}]"#).is_err());
        assert!(parse_entries("{}").is_err());
    }
}
