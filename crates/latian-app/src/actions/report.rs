use async_trait::async_trait;
use latian_core::SessionError;
use latian_proto::ExerciseKind;

use super::{Action, Context};

/// `view report`: every logged event by day, then totals per exercise.
pub struct ViewReport;

#[async_trait]
impl Action for ViewReport {
    async fn run(&self, ctx: &mut Context) -> Result<(), SessionError> {
        let (events, totals) = {
            let ledger = ctx.ledger();
            let mut totals = Vec::new();
            for kind in ExerciseKind::ALL {
                totals.push((kind, ledger.totals(kind, None)?));
            }
            (ledger.events(None)?, totals)
        };

        let mut scope = ctx.console.scope();
        scope.write_message("-- log --")?;
        let mut last_day = None;
        for event in &events {
            if last_day != Some(event.day()) {
                scope.write_message(event.when.format("%d/%m/%Y").to_string())?;
                last_day = Some(event.day());
            }
            let time = event.when.format("%H:%M").to_string();
            scope.write_event(event.kind, &event.exercise, event.value, Some(&time))?;
        }

        scope.write_message("-- totals --")?;
        for (kind, exercises) in totals {
            scope.write_message(format!("- {kind} -"))?;
            for (exercise, total) in exercises {
                scope.write_event(kind, &exercise.name, total, None)?;
            }
        }

        scope.read_signal(None).await
    }
}
