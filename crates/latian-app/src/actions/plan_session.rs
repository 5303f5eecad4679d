use async_trait::async_trait;
use latian_core::{Choice, ChoiceSet, SessionError};
use latian_proto::ExerciseKind;

use super::{Action, BACK, CANCEL, Context, DONE};
use crate::model::{Exercise, SessionPlan};

/// `plan session`: compose a named series of exercises.
pub struct PlanSession;

#[async_trait]
impl Action for PlanSession {
    async fn run(&self, ctx: &mut Context) -> Result<(), SessionError> {
        let mut available: Vec<(ExerciseKind, Vec<String>)> = Vec::new();
        for kind in ExerciseKind::ALL {
            let names: Vec<String> =
                ctx.storage.exercises(kind)?.into_iter().map(|exercise| exercise.name).collect();
            if !names.is_empty() {
                available.push((kind, names));
            }
        }
        if available.is_empty() {
            ctx.console.read_signal(Some("add exercises first")).await?;
            return Ok(());
        }

        let plan = {
            let mut scope = ctx.console.scope();
            scope.write_message("- new session plan -")?;
            let name = scope.read_string(Some("name")).await?;
            scope.write_message(name.clone())?;

            let mut exercises = Vec::new();
            loop {
                let kinds = available.iter().map(|(kind, _)| kind.as_str());
                let choices = ChoiceSet::new(kinds).with_controls([DONE, CANCEL]);
                let picked = match scope.read_choice_with_controls(choices, Some("exercise type")).await? {
                    Choice::Option(kind) => kind,
                    Choice::Control(control) if control == DONE => break,
                    Choice::Control(_) => return Err(SessionError::Reset),
                };
                let Some((kind, names)) = available.iter().find(|(kind, _)| kind.as_str() == picked)
                else {
                    continue;
                };

                let choices = ChoiceSet::new(names.iter().cloned()).with_controls([BACK]);
                let Choice::Option(exercise) = scope.read_choice_with_controls(choices, Some("which")).await?
                else {
                    continue;
                };

                scope.write_exercise(*kind, &exercise, None)?;
                exercises.push(Exercise::new(*kind, exercise));
            }

            SessionPlan { name, exercises }
        };

        if plan.exercises.is_empty() {
            tracing::debug!(plan = %plan.name, "not storing empty session plan");
            return Ok(());
        }
        ctx.storage.push_session_plan(plan)?;
        ctx.storage.commit()?;
        Ok(())
    }
}
