use std::sync::Arc;

use anyhow::{bail, Context, Result};
use nerve_core::Responder;
use nerve_server::{AppState, BridgeAuth};

use crate::args::BotArgs;

pub fn run(bot: &BotArgs, token: &str, port: u16) -> Result<()> {
    if token.trim().is_empty() {
        bail!("the bridge token must not be empty");
    }
    let config = bot.config();
    tracing::debug!(?config, "starting bridge");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let responder = Responder::from_config(&config);
        responder
            .store()
            .ensure_schema()
            .await
            .context("could not prepare the content store")?;

        let state = AppState::new(Arc::new(responder), BridgeAuth::with_token(token.trim()));
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("nerve bridge → http://localhost:{actual_port}/api/messages");

        tokio::select! {
            res = nerve_server::serve_on(listener, state) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
