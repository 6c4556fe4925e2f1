use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use efrup::api::{create_router, AppState};
use efrup::codec::ProtobufDecoder;
use efrup::config::Config;
use efrup::evaluator::ConditionEvaluator;
use efrup::observability::init_tracing;
use efrup::publish::LogPublisher;
use efrup::store::{load_fixtures, MemoryConditionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize tracing
    init_tracing(&config.log_level, config.log_json);

    let evaluator_config = config.evaluator_config();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rule_id = %evaluator_config.rule_id(),
        consumer = %config.consumer_subject(),
        producer = %config.producer_subject(),
        "Starting event flow rule processor"
    );

    // Seed the condition store
    let store = Arc::new(MemoryConditionStore::new());
    if let Some(ref path) = config.fixtures_path {
        match load_fixtures(path, evaluator_config.key_scheme, &store) {
            Ok(count) => info!(path = %path.display(), records = count, "Loaded condition fixtures"),
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    function_name = %evaluator_config.function_name,
                    "Failed to load condition fixtures"
                );
                return Err(e.into());
            }
        }
    } else {
        info!("No condition fixtures configured, store starts empty");
    }

    let publisher = Arc::new(LogPublisher::new(config.producer_subject()));

    let evaluator = ConditionEvaluator::new(
        evaluator_config,
        store,
        Arc::new(ProtobufDecoder::new()),
        publisher,
    );

    // Create application state
    let state = Arc::new(AppState {
        evaluator: Arc::new(evaluator),
        start_time: Instant::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    // Create router
    let app = create_router(state);

    // Parse listen address
    let addr: SocketAddr = config.listen_addr.parse()?;

    info!(addr = %addr, "Starting HTTP server");

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    if config.graceful_shutdown {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
