use anyhow::Context;
use redis_keyspace::config::{log_filter, StaticConfig};
use redis_keyspace::server::{RedisServer, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional redis.conf style file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let file = StaticConfig::from_file(&path)?;
            ServerConfig::from_static(&file)
                .with_context(|| format!("invalid configuration in {}", path))?
        }
        None => ServerConfig::default(),
    };

    // Initialize logging, RUST_LOG wins over the configured loglevel
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(&config.loglevel)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    info!("redis-keyspace server starting...");
    info!("Server will bind to {}", config.addr());
    info!("Max clients: {}", config.max_clients);

    let server = RedisServer::new(config);
    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
