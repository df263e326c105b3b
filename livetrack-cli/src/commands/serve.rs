//! Serve command - run the tracking API until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use livetrack::assignment::{
    Assignment, AssignmentResolver, DriverContact, HttpAssignmentResolver, InMemoryAssignments,
    OrderId,
};
use livetrack::position::DriverId;
use livetrack::runtime::{LiveTrackRuntime, RuntimeConfig};
use livetrack::server;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
#[derive(Debug, Default)]
pub struct ServeArgs {
    pub config: Option<PathBuf>,
    pub port: Option<u16>,
    pub demo: bool,
}

pub async fn run(args: ServeArgs) -> Result<(), CliError> {
    let mut runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("serve");

    if let Some(port) = args.port {
        runner.config_mut().server.port = port;
    }
    let config = runner.config();
    let addr = format!("{}:{}", config.server.bind, config.server.port);

    // Resolve the order service before anything is spawned
    let order_service = if args.demo {
        info!("Demo mode: using in-memory orders");
        None
    } else {
        let url = config
            .assignment
            .url
            .as_deref()
            .ok_or(CliError::MissingOrderService)?;
        let resolver =
            HttpAssignmentResolver::new(url, Duration::from_secs(config.assignment.timeout_secs))
                .map_err(|e| CliError::Resolver(e.to_string()))?;
        info!(url, "Resolving orders via order service");
        Some(resolver)
    };

    let runtime = LiveTrackRuntime::start(RuntimeConfig::from_config_file(config))?;

    let result = match order_service {
        Some(resolver) => serve_with(&runtime, resolver, &addr).await,
        None => serve_with(&runtime, demo_orders(), &addr).await,
    };

    runtime.shutdown().await;
    result
}

async fn serve_with<R>(runtime: &LiveTrackRuntime, resolver: R, addr: &str) -> Result<(), CliError>
where
    R: AssignmentResolver + 'static,
{
    let app = server::router(runtime.app_state(resolver));
    let listener = server::bind(addr).await?;

    let shutdown = runtime.shutdown_token();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    server::serve(listener, app, shutdown).await?;
    Ok(())
}

/// Orders available in demo mode: one out for delivery with driver `D9`,
/// one still in the kitchen.
fn demo_orders() -> InMemoryAssignments {
    let orders = InMemoryAssignments::new();
    let driver = DriverContact {
        driver_id: DriverId::from_number(9),
        name: "Demo Driver".to_string(),
        mobile_no: "9000000009".to_string(),
    };
    orders.insert(
        OrderId::from(42),
        Assignment::assigned("out_for_delivery", driver),
    );
    orders.insert(OrderId::from(43), Assignment::unassigned("preparing"));

    info!("Demo orders: 42 (driver 9, out_for_delivery), 43 (preparing)");
    orders
}

/// Cancel `token` on Ctrl+C or SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = token.cancelled() => return,
    }
    token.cancel();
}
