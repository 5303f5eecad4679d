//! Session supervisor.
//!
//! Obtains transports from an [`Acceptor`] and runs one [`Session`] per
//! transport. In single-session mode exactly one session runs and the
//! supervisor returns when it ends. In multi-session mode every accepted
//! transport gets its own task, its own console and its own storage
//! context; accepting the next connection never waits on a running session.

use std::sync::Arc;

use async_trait::async_trait;
use latian_core::Transport;
use tokio::task::{JoinError, JoinSet};

use crate::{
    AppError, Registry,
    actions::ActionRegistry,
    session::{Identity, Session},
    storage::StorageFactory,
};

/// Source of transports, one per user connection.
#[async_trait]
pub trait Acceptor: Send {
    /// Prepare to accept, e.g. bind a listening socket.
    async fn start(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    /// Wait for the next connection. `None` once no more will arrive.
    async fn accept(&mut self) -> Option<Box<dyn Transport>>;
}

/// Supervisor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    /// One session for the configured user.
    Single,
    /// An accept loop spawning a session per connection.
    Multi,
}

/// Runtime modes by command-line name.
pub fn runtime_modes() -> Registry<RuntimeMode> {
    Registry::new().register("simple", RuntimeMode::Single).register("multi", RuntimeMode::Multi)
}

/// Accept loop and session owner.
pub struct Supervisor {
    mode: RuntimeMode,
    acceptor: Box<dyn Acceptor>,
    storage: StorageFactory,
    actions: Arc<ActionRegistry>,
    user: String,
    next_id: u64,
}

impl Supervisor {
    /// Create a supervisor. `user` names the single-session user.
    pub fn new(
        mode: RuntimeMode,
        acceptor: Box<dyn Acceptor>,
        storage: StorageFactory,
        actions: Arc<ActionRegistry>,
        user: impl Into<String>,
    ) -> Self {
        Self { mode, acceptor, storage, actions, user: user.into(), next_id: 0 }
    }

    /// Run until the mode's end condition.
    pub async fn run(mut self) -> Result<(), AppError> {
        self.acceptor.start().await?;
        match self.mode {
            RuntimeMode::Single => self.run_single().await,
            RuntimeMode::Multi => self.run_multi().await,
        }
    }

    async fn run_single(&mut self) -> Result<(), AppError> {
        let transport = self.acceptor.accept().await.ok_or(AppError::NoTransport)?;
        let mut session = self.session(transport, Identity::Fixed(self.user.clone()));

        session.bind().await?;
        if let Err(err) = session.run(&self.actions).await {
            tracing::error!(%err, "session failed");
            return Err(err.into());
        }
        Ok(())
    }

    async fn run_multi(&mut self) -> Result<(), AppError> {
        let mut sessions = JoinSet::new();

        loop {
            tokio::select! {
                accepted = self.acceptor.accept() => {
                    let Some(transport) = accepted else { break };
                    self.spawn_session(&mut sessions, transport).await;
                },
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => reap(joined),
            }
        }

        tracing::info!(active = sessions.len(), "acceptor closed, draining sessions");
        while let Some(joined) = sessions.join_next().await {
            reap(joined);
        }
        Ok(())
    }

    async fn spawn_session(&mut self, sessions: &mut JoinSet<()>, transport: Box<dyn Transport>) {
        let mut session = self.session(transport, Identity::Ask);
        let id = session.id();
        tracing::info!(session = id, "connection accepted");

        if let Err(err) = session.bind().await {
            tracing::warn!(session = id, %err, "bind failed");
            return;
        }

        let actions = Arc::clone(&self.actions);
        sessions.spawn(async move {
            if let Err(err) = session.run(&actions).await {
                tracing::error!(session = id, %err, "session failed");
            }
            tracing::info!(session = id, "connection closed");
        });
    }

    fn session(&mut self, transport: Box<dyn Transport>, identity: Identity) -> Session {
        self.next_id += 1;
        Session::new(self.next_id, transport, (self.storage)(), identity)
    }
}

fn reap(joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        tracing::error!(%err, "session task aborted");
    }
}
