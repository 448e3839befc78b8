use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Characteristic { action } => commands::characteristic::handle(&action, ctx, flags).await,
        Commands::CoffeeType { action } => commands::coffee_type::handle(&action, ctx, flags).await,
        Commands::Binding { action } => commands::binding::handle(&action, ctx, flags).await,
        Commands::Completeness => commands::knowledge_base::completeness(ctx, flags).await,
        Commands::Kb => commands::knowledge_base::show(ctx, flags).await,
        Commands::Analyze(args) => commands::analyze::handle(&args, ctx, flags).await,
    }
}
