//! Latian command-line front end.
//!
//! Wires the named-implementation registries together: a transport
//! acceptor (`std`, `ws`), a storage backend (`file`, `memory`) and a
//! supervisor mode (`simple`, `multi`). Every name is resolved before
//! anything starts, so a typo fails fast with the list of valid names.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod args;
mod error;
mod local;

use std::sync::Arc;

pub use args::Args;
pub use error::CliError;
use latian_app::{
    Acceptor, AppError, Registry, Settings, Supervisor, default_actions, resolve, runtime_modes,
    storage::storage_backends,
};
use latian_server::WsAcceptor;
pub use local::{LocalAcceptor, LocalTransport, Screen};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the acceptor for the configured transport.
pub type AcceptorFactory = fn(&Settings) -> Result<Box<dyn Acceptor>, AppError>;

/// Transport acceptors by command-line name.
pub fn acceptors() -> Registry<AcceptorFactory> {
    Registry::new()
        .register("std", local_acceptor as AcceptorFactory)
        .register("ws", ws_acceptor as AcceptorFactory)
}

fn local_acceptor(_: &Settings) -> Result<Box<dyn Acceptor>, AppError> {
    Ok(Box::new(LocalAcceptor::new(Box::new(LocalTransport::stdio()))))
}

fn ws_acceptor(settings: &Settings) -> Result<Box<dyn Acceptor>, AppError> {
    Ok(Box::new(WsAcceptor::new(settings.socket_addr()?)))
}

/// Resolve every registry name and build the supervisor.
pub fn supervisor(settings: &Settings) -> Result<Supervisor, AppError> {
    let acceptor = *resolve(&acceptors(), "io", &settings.io)?;
    let backend = *resolve(&storage_backends(), "storage", &settings.storage)?;
    let mode = *resolve(&runtime_modes(), "runtime", &settings.runtime)?;

    Ok(Supervisor::new(
        mode,
        acceptor(settings)?,
        backend(settings),
        Arc::new(default_actions()),
        settings.user.clone(),
    ))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| CliError::Logging(err.to_string()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}

/// Run `latian` with parsed arguments.
pub async fn run(args: Args) -> Result<(), CliError> {
    let settings = args.settings();
    let supervisor = supervisor(&settings)?;
    tracing::info!(io = %settings.io, runtime = %settings.runtime, storage = %settings.storage, "starting");
    supervisor.run().await?;
    Ok(())
}
