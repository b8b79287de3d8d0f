pub mod config;
pub mod logging;
pub mod model;
pub mod model_gateway;
pub mod providers;
pub mod render;
pub mod repl;
pub mod session;
mod spinner;

use anyhow::{Context, Result};
use reqwest::Client;
use std::env;
use std::io;
use std::time::Duration;
use tracing::info;

use config::Config;
use model_gateway::HostModelGateway;
use session::ChatSession;

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();

    let cfg = Config::from_env()?;
    info!(
        provider = %cfg.model_provider,
        model = %cfg.model,
        base_url = %cfg.model_base_url,
        timeout_secs = cfg.model_timeout_secs,
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .timeout(Duration::from_secs(cfg.model_timeout_secs))
        .build()
        .context("Failed to initialize HTTP client")?;
    let mut session = ChatSession::new(
        HostModelGateway::new(&client, &cfg),
        cfg.system_prompt.clone(),
    );

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        let mut input = io::stdin().lock();
        repl::run_repl(
            &mut session,
            &cfg.model,
            &mut input,
            &mut io::stdout(),
            &mut io::stderr(),
        )
        .await
    } else {
        repl::run_once(&mut session, &args.join(" "), &mut io::stdout()).await
    }
}
