use anyhow::Context;
use revu_api::server::HttpServer;
use revu_config::RevuConfig;

use crate::bootstrap;
use crate::cli::{DatabaseArgs, HashidCommands, ServeArgs};

fn database_path<'a>(config: &'a RevuConfig, args: &'a DatabaseArgs) -> &'a str {
    args.database.as_deref().unwrap_or(&config.database.path)
}

fn bind_addr(config: &RevuConfig, args: &ServeArgs) -> String {
    let host = args.host.as_deref().unwrap_or(&config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    format!("{host}:{port}")
}

pub async fn serve(config: &RevuConfig, args: &ServeArgs) -> anyhow::Result<()> {
    let service = bootstrap::open_service(database_path(config, &args.database)).await?;
    let state = bootstrap::app_state(config, service)?;

    let server = HttpServer::bind(&bind_addr(config, args))?.with_body_limit(config.server.max_body_bytes);
    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to listen for Ctrl-C; stopping");
        }
    };
    server.serve(state, shutdown).await.context("server stopped unexpectedly")
}

pub async fn migrate(config: &RevuConfig, args: &DatabaseArgs) -> anyhow::Result<()> {
    let path = database_path(config, args);
    bootstrap::open_service(path).await?;
    tracing::info!(path, "migrations applied");
    println!("database ready: {path}");
    Ok(())
}

pub fn hashid(config: &RevuConfig, action: &HashidCommands) -> anyhow::Result<()> {
    let codec = bootstrap::hashid_codec(config)?;
    match action {
        HashidCommands::Encode { id } => println!("{}", codec.encode(*id)),
        HashidCommands::Decode { hashid } => {
            let id = codec
                .decode(hashid)
                .with_context(|| format!("'{hashid}' is not a hashid for this salt"))?;
            println!("{id}");
        }
    }
    Ok(())
}
