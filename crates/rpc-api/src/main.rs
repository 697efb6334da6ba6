//! Jobs RPC Server

use std::process;

use salvo::{affix_state::inject, prelude::*, trailing_slash::remove_slash};
use tracing::{error, info};

use jobrpc_app::context::AppContext;

use crate::{config::ServerConfig, jobs::descriptor::access_policy, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod extensions;
mod healthcheck;
mod interceptors;
mod jobs;
mod observability;
mod router;
mod rpc;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Jobs RPC server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Logging error: {init_error}");
        }

        process::exit(1);
    }

    let settings = match config.auth.settings() {
        Ok(settings) => settings,
        Err(settings_error) => {
            error!("invalid authentication settings: {settings_error}");

            process::exit(1);
        }
    };

    let policy = match access_policy() {
        Ok(policy) => policy,
        Err(policy_error) => {
            error!("invalid method access rules: {policy_error}");

            process::exit(1);
        }
    };

    let app =
        match AppContext::from_database_url(&config.database.database_url, policy, settings).await
        {
            Ok(app) => app,
            Err(init_error) => {
                error!("failed to initialize app context: {init_error}");

                process::exit(1);
            }
        };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let state = State::from_app_context(app);

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(observability::request_logging)
        .hoop(inject(state))
        .push(router::app_router());

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;
}
