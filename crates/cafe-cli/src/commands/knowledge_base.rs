use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cafe completeness`.
pub async fn completeness(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.service.completeness().await?;
    if !report.is_ready() && !flags.quiet {
        tracing::warn!(
            no_characteristics = report.no_characteristics.len(),
            incomplete_values = report.incomplete_values.len(),
            "knowledge base is not ready for classification"
        );
    }
    output(&report, flags.format)
}

/// Handle `cafe kb`.
pub async fn show(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let profiles = ctx.service.knowledge_base().await?;
    output(&profiles, flags.format)
}
