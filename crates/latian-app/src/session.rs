//! One user's session: transport, console and storage context.

use latian_core::{Console, SessionError, Transport};

use crate::{
    actions::{Action, ActionRegistry, CONFIGURE, Configure, Context},
    model::{Config, default_exercises},
    storage::Storage,
};

/// Lifecycle of a session.
///
/// `Idle -> Bound -> Running -> Terminated`, where `Running` starts once a
/// storage context is established. A session that fails before reaching
/// `Running` still ends in `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, transport not yet bound.
    Idle,
    /// Transport bound, no storage context yet.
    Bound,
    /// Storage connected, dialog loop running.
    Running,
    /// Ended; transport unbound.
    Terminated,
}

/// Where a session gets its user from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A fixed user, e.g. from the command line.
    Fixed(String),
    /// Asked with one input read.
    Ask,
}

/// A transport paired with its own storage context.
pub struct Session {
    id: u64,
    state: SessionState,
    identity: Identity,
    ctx: Context,
}

impl Session {
    /// Create an idle session.
    pub fn new(
        id: u64,
        transport: Box<dyn Transport>,
        storage: Box<dyn Storage>,
        identity: Identity,
    ) -> Self {
        Self {
            id,
            state: SessionState::Idle,
            identity,
            ctx: Context::new(Console::new(transport), storage),
        }
    }

    /// Identifier used in logs.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Bind the transport.
    pub async fn bind(&mut self) -> Result<(), SessionError> {
        self.ctx.console.bind().await?;
        self.state = SessionState::Bound;
        tracing::debug!(session = self.id, "session bound");
        Ok(())
    }

    /// Run the dialog until the user leaves, then release everything.
    ///
    /// A termination is the normal end and returns `Ok`: the user's exit
    /// message is written and left visible. Any other error is returned
    /// after cleanup.
    pub async fn run(mut self, actions: &ActionRegistry) -> Result<(), SessionError> {
        if self.state == SessionState::Idle {
            self.bind().await?;
        }

        let result = self.drive(actions).await;
        self.finish(result).await
    }

    async fn drive(&mut self, actions: &ActionRegistry) -> Result<(), SessionError> {
        let user = match &self.identity {
            Identity::Fixed(user) => user.clone(),
            Identity::Ask => self.ctx.console.read_string(Some("who are you?")).await?,
        };

        let storage = &mut self.ctx.storage;
        storage.connect(&user)?;
        let config = match storage.config()? {
            Some(config) => config,
            None => {
                tracing::info!(session = self.id, %user, "new user");
                let config = Config::default();
                storage.set_config(config.clone())?;
                for exercise in default_exercises() {
                    storage.push_exercise(exercise)?;
                }
                storage.commit()?;
                config
            },
        };
        self.state = SessionState::Running;
        tracing::debug!(session = self.id, %user, "session running");

        if !config.loaded {
            match actions.get(CONFIGURE) {
                Some(configure) => configure.run(&mut self.ctx).await?,
                None => Configure.run(&mut self.ctx).await?,
            }
        }

        loop {
            let name = self.ctx.console.read_choice(actions.names(), Some("what to do")).await?;
            let Some(action) = actions.get(&name) else {
                continue;
            };

            match action.run(&mut self.ctx).await {
                Ok(()) => {},
                Err(SessionError::Reset) => {
                    tracing::debug!(session = self.id, action = %name, "action cancelled");
                },
                Err(err) => return Err(err),
            }
        }
    }

    async fn finish(mut self, result: Result<(), SessionError>) -> Result<(), SessionError> {
        let outcome = match result {
            Err(SessionError::Terminated) => {
                tracing::info!(session = self.id, "session terminated");
                let config = self.ctx.storage.config().ok().flatten().unwrap_or_default();
                self.ctx.console.write_message(config.exit_message)
            },
            other => other,
        };

        if let Err(err) = self.ctx.storage.disconnect() {
            tracing::warn!(session = self.id, %err, "storage disconnect failed");
        }
        self.ctx.console.unbind().await;
        self.state = SessionState::Terminated;
        outcome
    }
}
