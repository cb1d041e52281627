use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use setdesk_server::state::AppState;

use crate::context;

pub fn run(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = context::load_config(config_path)?;
    let store = context::open_store(&config)?;
    let executor = Arc::new(context::build_executor(&config, store)?);

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let state = AppState::new(executor.clone(), config.server.api_token.clone());

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind((host.as_str(), port))
            .await
            .with_context(|| format!("failed to bind {host}:{port}"))?;
        println!("setdesk API → http://{}", listener.local_addr()?);
        setdesk_server::serve_on(state, listener).await
    });

    // The blocking HTTP clients inside the executor are released only after
    // the runtime is gone.
    drop(rt);
    drop(executor);
    result
}
