use async_trait::async_trait;
use latian_core::SessionError;

use super::{Action, Context, kind_names};
use crate::model::Exercise;

/// `add exercise`: register a new exercise of either kind.
pub struct AddExercise;

#[async_trait]
impl Action for AddExercise {
    async fn run(&self, ctx: &mut Context) -> Result<(), SessionError> {
        let exercise = {
            let mut scope = ctx.console.scope();
            scope.write_message("- new exercise -")?;
            let kind = scope.read_choice(kind_names(), Some("mode")).await?;
            let Ok(kind) = kind.parse() else {
                return Ok(());
            };
            let name = scope.read_string(Some("name")).await?;

            let exercise = Exercise::new(kind, name);
            if ctx.storage.exercises(kind)?.contains(&exercise) {
                scope.read_signal(Some("already exists")).await?;
                return Ok(());
            }
            exercise
        };

        ctx.storage.push_exercise(exercise)?;
        ctx.storage.commit()?;
        Ok(())
    }
}
