use async_trait::async_trait;
use latian_core::SessionError;

use super::{Action, Context};
use crate::model::Config;

/// `configure`: ask for every configuration value and mark it loaded.
pub struct Configure;

#[async_trait]
impl Action for Configure {
    async fn run(&self, ctx: &mut Context) -> Result<(), SessionError> {
        let config = {
            let mut scope = ctx.console.scope();
            scope.write_message("- configuration -")?;

            Config {
                exit_message: scope.read_string(Some("exit message")).await?,
                milestone_reps: scope.read_int(Some("milestone reps"), 1, None).await?,
                milestone_seconds: scope.read_int(Some("milestone seconds"), 1, None).await?,
                timer_delay_seconds: scope.read_int(Some("timer delay seconds"), 1, None).await?,
                loaded: true,
            }
        };

        ctx.storage.set_config(config)?;
        ctx.storage.commit()?;
        Ok(())
    }
}
