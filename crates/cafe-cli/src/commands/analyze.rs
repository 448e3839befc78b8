use anyhow::Context;

use cafe_core::request::{FormInput, FormKey, FormValues};
use cafe_core::snapshot::KnowledgeSnapshot;
use cafe_engine::{AnalysisError, AnalysisFlow, EngineClient};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyzeArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cafe analyze`.
pub async fn handle(args: &AnalyzeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let snapshot = ctx.service.snapshot().await?;
    let form = resolve_values(&snapshot, &args.values)?;
    let engine =
        EngineClient::from_config(&ctx.config.engine).context("classification engine is not configured")?;

    let mut flow = AnalysisFlow::new();
    match flow.analyze(&engine, args.method, &snapshot, form).await {
        Ok(response) => output(response, flags.format),
        Err(AnalysisError::Blocked(report)) => {
            output(&report, flags.format)?;
            anyhow::bail!("knowledge base is incomplete; an expert must finish it before analysis")
        }
        Err(error) => Err(error).with_context(|| format!("{} analysis failed", args.method)),
    }
}

/// Turn `<key>=<raw>` pairs into form values.
///
/// A key is matched first as an exact characteristic name, then as a
/// characteristic id, then as a legacy `numeric_<id>` / `categorical_<id>` key.
pub fn resolve_values(snapshot: &KnowledgeSnapshot, pairs: &[String]) -> anyhow::Result<FormValues> {
    let mut form = FormValues::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("invalid --value '{pair}': expected <id-or-name>=<value>"))?;
        let key = key.trim();

        let characteristic = snapshot
            .characteristic_by_name(key)
            .or_else(|| key.parse::<i64>().ok().and_then(|id| snapshot.characteristics.get(&id)));
        if let Some(characteristic) = characteristic {
            form.set(characteristic.id, FormInput::new(characteristic.kind(), raw));
            continue;
        }

        let legacy = key
            .parse::<FormKey>()
            .map_err(|_| anyhow::anyhow!("unknown characteristic '{key}'"))?;
        form.set(legacy.id, FormInput::new(legacy.kind, raw));
    }
    Ok(form)
}
