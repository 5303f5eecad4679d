//! Property tests for scoped write regions.
//!
//! Whatever happens inside a region that closes normally, the visible log
//! returns to the length it had when the region opened.

use latian_core::{Console, SessionError, WriteScope};
use latian_harness::ScriptedTransport;
use proptest::prelude::*;

/// Operations applied inside a region.
#[derive(Debug, Clone)]
enum Step {
    Write,
    /// Retract up to this many of the region's own lines.
    Retract(usize),
    /// Open a nested region running these steps.
    Nested(Vec<Step>),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let leaf = prop_oneof![4 => Just(Step::Write), 1 => (0usize..3).prop_map(Step::Retract)];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            4 => Just(Step::Write),
            1 => (0usize..3).prop_map(Step::Retract),
            2 => prop::collection::vec(inner, 0..6).prop_map(Step::Nested),
        ]
    })
}

fn run(scope: &mut WriteScope<'_>, steps: &[Step]) -> Result<(), SessionError> {
    for step in steps {
        match step {
            Step::Write => scope.write_message("line")?,
            Step::Retract(n) => {
                let n = (*n).min(scope.written());
                scope.retract(n)?;
            },
            Step::Nested(inner) => {
                let before = scope.log().len();
                {
                    let mut nested = scope.scope();
                    run(&mut nested, inner)?;
                }
                assert_eq!(scope.log().len(), before);
            },
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn closed_scope_is_net_zero(
        preamble in 0usize..5,
        steps in prop::collection::vec(step_strategy(), 0..12),
    ) {
        let transport = ScriptedTransport::terminal(Vec::<String>::new());
        let probe = transport.probe();
        let mut console = Console::new(transport.boxed());
        for _ in 0..preamble {
            console.write_message("kept").unwrap();
        }
        let before = probe.lines();

        {
            let mut scope = console.scope();
            run(&mut scope, &steps).unwrap();
        }

        prop_assert_eq!(console.log().len(), preamble);
        prop_assert_eq!(probe.lines(), before);
        prop_assert_eq!(probe.surface().underflows(), 0);
    }

    #[test]
    fn terminated_scope_keeps_its_lines(writes in 1usize..10) {
        let transport = ScriptedTransport::terminal(Vec::<String>::new());
        let mut console = Console::new(transport.boxed());

        {
            let mut scope = console.scope();
            for _ in 0..writes {
                scope.write_message("final").unwrap();
            }
            scope.terminate();
        }

        prop_assert_eq!(console.log().len(), writes);
    }
}

#[test]
fn inner_scope_retracts_before_outer() {
    let transport = ScriptedTransport::terminal(Vec::<String>::new());
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());

    {
        let mut outer = console.scope();
        outer.write_message("heading").unwrap();
        {
            let mut inner = outer.scope();
            inner.write_message("a").unwrap();
            inner.write_message("b").unwrap();
        }
        assert_eq!(probe.lines(), ["heading"]);
        outer.write_message("footer").unwrap();
    }

    assert!(probe.lines().is_empty());
    assert_eq!(console.log().appended(), 4);
}

#[test]
fn retracting_past_visible_lines_faults_the_console() {
    let transport = ScriptedTransport::terminal(Vec::<String>::new());
    let mut console = Console::new(transport.boxed());
    console.write_message("only").unwrap();

    let err = console.retract(2).unwrap_err();

    assert_eq!(err, SessionError::RetractionUnderflow { requested: 2, available: 1 });
    assert_eq!(console.write_message("after"), Err(err));
    assert_eq!(console.log().len(), 1);
}
