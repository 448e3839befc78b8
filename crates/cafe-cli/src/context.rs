use anyhow::Context;

use cafe_config::CafeConfig;
use cafe_db::service::CafeService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: CafeService,
    pub config: CafeConfig,
}

impl AppContext {
    /// Open the knowledge base named by `database.path`, creating its directory if needed.
    pub async fn init(config: CafeConfig) -> anyhow::Result<Self> {
        if let Some(dir) = config.database.parent_dir() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let service = CafeService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open knowledge base at {}", config.database.path))?;
        tracing::debug!(path = %config.database.path, "knowledge base opened");

        Ok(Self { service, config })
    }
}
