use async_trait::async_trait;
use latian_core::{Choice, ChoiceSet, SessionError};
use latian_proto::ExerciseKind;

use super::{Action, BACK, Context, exercise::run_exercise, kind_names, pick};
use crate::model::Exercise;

/// Option picking a random kind and exercise.
const RANDOM: &str = "random";

/// `start session`: pick exercises one at a time until the user backs out.
pub struct FreeSession;

#[async_trait]
impl Action for FreeSession {
    async fn run(&self, ctx: &mut Context) -> Result<(), SessionError> {
        loop {
            let mut options = kind_names();
            options.push(RANDOM.to_string());
            let choices = ChoiceSet::new(options).with_controls([BACK]);

            let picked = match ctx.console.read_choice_with_controls(choices, Some("exercise type")).await? {
                Choice::Option(picked) => picked,
                Choice::Control(_) => return Ok(()),
            };

            let random = picked == RANDOM;
            let kind = if random {
                pick(&ExerciseKind::ALL).unwrap_or(ExerciseKind::Rep)
            } else {
                let Ok(kind) = picked.parse() else { continue };
                kind
            };

            let exercises = ctx.storage.exercises(kind)?;
            if exercises.is_empty() {
                ctx.console.read_signal(Some("add exercises first")).await?;
                return Ok(());
            }

            let exercise = if random {
                let Some(exercise) = pick(&exercises) else { continue };
                let mut scope = ctx.console.scope();
                scope.write_exercise(exercise.kind, &exercise.name, None)?;
                if !scope.read_confirm("this?").await? {
                    continue;
                }
                exercise
            } else {
                let names = exercises.iter().map(|e| e.name.clone());
                let choices = ChoiceSet::new(names).with_controls([BACK]);
                match ctx.console.read_choice_with_controls(choices, Some("which")).await? {
                    Choice::Option(name) => Exercise::new(kind, name),
                    Choice::Control(_) => continue,
                }
            };

            run_exercise(&mut ctx.console, ctx.storage.as_mut(), &exercise).await?;
        }
    }
}
