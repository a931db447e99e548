//! Service startup and graceful shutdown

use std::future::Future;
use std::sync::Arc;

use eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::api::{ServiceState, router};
use crate::config::Config;
use crate::llm::{LlmClient, create_client};
use crate::planner::PlanGenerator;
use crate::prompt::PromptRenderer;

/// Assemble the shared state from config and a provider client
pub fn build_state(config: &Config, llm: Arc<dyn LlmClient>) -> Result<Arc<ServiceState>> {
    debug!(provider = llm.provider(), "build_state: called");
    let prompts = PromptRenderer::load(config.plan.prompt_path.as_deref())?;
    let generator = PlanGenerator::from_config(llm, prompts, &config.llm, &config.plan);
    Ok(Arc::new(ServiceState::new(generator)))
}

/// Run the service until ctrl-c
pub async fn run(config: &Config) -> Result<()> {
    debug!("run: called");
    config.validate()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let state = build_state(config, llm)?;

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    info!(
        "Plan service listening on http://{} (provider: {}, model: {})",
        addr, config.llm.provider, config.llm.model
    );
    serve(listener, state, &config.server.cors_origins, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: Arc<ServiceState>,
    cors_origins: &[String],
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(state, cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;
    info!("Plan service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await
        }
    }
}
