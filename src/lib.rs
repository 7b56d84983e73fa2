pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod history;
pub mod language;
pub mod llm;
pub mod models;
pub mod offline;
pub mod router;
pub mod server;
pub mod status;

use cli::Args;
use config::prompt::{ self, PromptConfig };
use credentials::InMemoryCredentialStore;
use history::initialize_history_store;
use log::{ info, warn };
use router::AssistantRouter;
use server::Server;
use status::{ spawn_online_probe, OnlineStatus };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub async fn build_assistant(args: &Args) -> Result<Arc<AssistantRouter>, Box<dyn Error + Send + Sync>> {
    let history_store = initialize_history_store(args)?;
    let credentials = Arc::new(InMemoryCredentialStore::with_keys(args.credentials()));

    let prompts = match &args.prompts_path {
        Some(path) => prompt::load_prompts(path)?,
        None => Arc::new(PromptConfig::default()),
    };

    let online = OnlineStatus::new(args.online);
    if let Some(url) = args.online_probe_url.clone().filter(|u| !u.trim().is_empty()) {
        let interval = Duration::from_secs(args.online_probe_interval_secs.max(1));
        spawn_online_probe(online.clone(), url, interval)?;
    }

    let router = AssistantRouter::new(
        args.router_settings(),
        history_store,
        credentials,
        online,
        prompts
    );

    let status = router.status().await;
    if status.provider.is_hosted() && !status.has_valid_credential {
        warn!("No valid {} credential configured, answers will come from the offline library", status.provider);
    }

    Ok(Arc::new(router))
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Provider: {}", args.chat_provider);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("provider default"));
    info!("Response Language: {}", args.response_language);
    info!("Auto Detect Language: {}", args.auto_detect_language);
    info!("Context Window: {}", args.context_window);
    info!("Model Loading Policy: {}", args.model_loading_policy);
    info!("History Store Type: {}", args.history_type);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("Online Probe: {}", args.online_probe_url.as_deref().unwrap_or("disabled"));
    info!("-------------------------");

    let assistant = build_assistant(&args).await?;
    let server = Server::new(args.server_addr.clone(), assistant);
    server.run().await?;

    Ok(())
}
