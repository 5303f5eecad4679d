use async_trait::async_trait;
use latian_core::{Choice, ChoiceSet, SessionError};

use super::{Action, CANCEL, Context, exercise::run_exercise};

/// `start planned session`: run every exercise of a stored plan in order.
pub struct PlannedSession;

#[async_trait]
impl Action for PlannedSession {
    async fn run(&self, ctx: &mut Context) -> Result<(), SessionError> {
        let plans = ctx.storage.session_plans()?;
        if plans.is_empty() {
            ctx.console.read_signal(Some("add session plan first")).await?;
            return Ok(());
        }

        let plan = loop {
            let names = plans.iter().map(|plan| plan.name.clone());
            let choices = ChoiceSet::new(names).with_controls([CANCEL]);
            let name = match ctx.console.read_choice_with_controls(choices, Some("which")).await? {
                Choice::Option(name) => name,
                Choice::Control(_) => return Err(SessionError::Reset),
            };
            let Some(plan) = plans.iter().find(|plan| plan.name == name) else { continue };

            let mut preview = ctx.console.scope();
            preview.write_message(plan.name.clone())?;
            for exercise in &plan.exercises {
                preview.write_exercise(exercise.kind, &exercise.name, Some("-"))?;
            }
            if preview.read_confirm("this?").await? {
                break plan.clone();
            }
        };

        {
            let Context { console, storage } = &mut *ctx;
            let mut session = console.scope();
            for exercise in &plan.exercises {
                {
                    let mut next = session.scope();
                    next.write_message("next exercise")?;
                    next.write_exercise(exercise.kind, &exercise.name, None)?;
                    next.read_signal(None).await?;
                }
                run_exercise(&mut session, storage.as_mut(), exercise).await?;
            }
        }

        ctx.console.read_signal(Some("done session plan")).await
    }
}
