//! Validated input loop behavior over both presentation modes.

use std::time::Duration;

use latian_core::{Choice, ChoiceSet, Console, InputEvent, Message, SessionError};
use latian_harness::{Op, ScriptedTransport};
use latian_proto::InputPrompt;

fn text(line: &str) -> Message {
    Message::from(line)
}

#[tokio::test]
async fn local_integer_read_retries_without_residue() {
    let transport = ScriptedTransport::terminal(["abc", "-1", "7"]);
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());
    console.write_message("welcome").unwrap();
    let before = probe.lines();

    let value = console.read_int(Some("how many?"), 0, None).await.unwrap();

    assert_eq!(value, 7);
    assert_eq!(probe.lines(), before);
    assert_eq!(console.log().len(), 1);
    assert_eq!(probe.surface().underflows(), 0);

    let prompts: Vec<Message> = probe
        .written()
        .into_iter()
        .filter(|m| matches!(m, Message::Prompt(_)))
        .collect();
    assert_eq!(
        prompts,
        [
            Message::Prompt("> ".into()),
            Message::Prompt("try again > ".into()),
            Message::Prompt("try again > ".into()),
        ]
    );
}

#[tokio::test]
async fn each_attempt_retracts_exactly_its_glyph() {
    let transport = ScriptedTransport::terminal(["", "", "bob"]);
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());

    let name = console.read_string(Some("who are you?")).await.unwrap();

    assert_eq!(name, "bob");
    let ops = probe.ops();
    let retractions: Vec<usize> = ops
        .iter()
        .filter_map(|op| match op {
            Op::Retract(n) => Some(*n),
            _ => None,
        })
        .collect();
    // three glyphs, then the prompt message on close
    assert_eq!(retractions, [1, 1, 1, 1]);
    assert!(probe.lines().is_empty());
}

#[tokio::test]
async fn terminal_choice_renders_numbered_options() {
    let transport = ScriptedTransport::terminal(["2"]);
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());

    let picked = console.read_choice(["rep", "timed"], Some("pick mode")).await.unwrap();

    assert_eq!(picked, "timed");
    let written = probe.written();
    assert_eq!(&written[..3], &[text("pick mode:"), text("  1: rep"), text("  2: timed")]);
    assert!(probe.lines().is_empty());
}

#[tokio::test]
async fn remote_choice_rejects_unknown_value_then_accepts() {
    let transport = ScriptedTransport::remote(["jump", "timed"]);
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());

    let picked = console.read_choice(["rep", "timed"], Some("pick mode")).await.unwrap();

    assert_eq!(picked, "timed");
    assert_eq!(
        probe.requests(),
        [InputPrompt {
            message: Some("pick mode".into()),
            signal_only: false,
            options: Some(vec!["rep".into(), "timed".into()]),
        }]
    );
    assert_eq!(probe.resolutions(), [false, true]);
    assert!(probe.written().is_empty());
}

#[tokio::test]
async fn remote_control_option_answers_by_wire_name() {
    let transport = ScriptedTransport::remote(["<cancel>"]);
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());

    let choices = ChoiceSet::new(["morning"]).with_controls(["cancel"]);
    let picked = console.read_choice_with_controls(choices, Some("plan")).await.unwrap();

    assert_eq!(picked, Choice::Control("cancel".into()));
    assert_eq!(probe.requests()[0].options.as_deref(), Some(&["morning".to_string(), "<cancel>".to_string()][..]));
}

#[tokio::test]
async fn signal_read_accepts_anything() {
    let transport = ScriptedTransport::terminal(["whatever"]);
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());

    console.read_signal(None).await.unwrap();

    assert_eq!(probe.written(), [Message::Prompt("press enter...".into())]);
    assert!(probe.lines().is_empty());
}

#[tokio::test]
async fn confirm_maps_yes_and_no() {
    let transport = ScriptedTransport::terminal(["1", "2"]);
    let mut console = Console::new(transport.boxed());

    assert!(console.read_confirm("sure?").await.unwrap());
    assert!(!console.read_confirm("sure?").await.unwrap());
}

#[tokio::test]
async fn termination_leaves_prompt_visible() {
    let transport = ScriptedTransport::terminal(["nope"]);
    let probe = transport.probe();
    probe.push_close();
    let mut console = Console::new(transport.boxed());

    let err = {
        let mut scope = console.scope();
        scope.write_message("-- session --").unwrap();
        scope.read_int(Some("how many?"), 1, None).await.unwrap_err()
    };

    assert_eq!(err, SessionError::Terminated);
    assert!(console.is_terminated());
    assert_eq!(probe.lines(), ["-- session --", "how many?"]);

    console.write_message("cya").unwrap();
    assert_eq!(probe.lines().last().map(String::as_str), Some("cya"));
}

#[tokio::test]
async fn reads_after_termination_fail_fast() {
    let transport = ScriptedTransport::terminal(["1"]);
    let probe = transport.probe();
    let mut console = Console::new(transport.boxed());
    console.terminate();

    let err = console.read_string(None).await.unwrap_err();

    assert!(err.is_termination());
    assert_eq!(probe.pending_inputs(), 1);
}

#[tokio::test(start_paused = true)]
async fn timer_overlay_runs_while_waiting_for_signal() {
    let transport = ScriptedTransport::terminal(Vec::<String>::new());
    let probe = transport.probe();
    probe.push_after(Duration::from_millis(7_050), InputEvent::Line(String::new()));
    let mut console = Console::new(transport.boxed());

    let timer = console.start_timer(5);
    console.read_signal(None).await.unwrap();
    let overlay = probe.surface().overlay().map(str::to_string);
    timer.stop();

    assert_eq!(overlay.as_deref(), Some("0m2s"));
    let surface = probe.surface();
    assert_eq!(surface.overlay(), None);
    assert!(surface.overlay_draws() >= 70);
    assert!(probe.ops().ends_with(&[Op::Resolve(true), Op::TimerStopped]));
}
