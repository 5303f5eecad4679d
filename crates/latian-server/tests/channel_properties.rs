//! Protocol properties of the channel transport against a well-behaved peer.

use latian_core::Console;
use latian_proto::{Directive, InboundMessage, encode_inbound};
use latian_server::{Link, queue_pair};
use proptest::prelude::*;
use tokio::sync::mpsc;

/// Answers every `input` and `input_invalid` with the next scripted value.
async fn peer(link: Link, mut outbound: mpsc::UnboundedReceiver<Directive>, answers: Vec<String>) -> Vec<Directive> {
    let mut answers = answers.into_iter();
    let mut seen = Vec::new();
    while let Some(directive) = outbound.recv().await {
        let asked = matches!(directive, Directive::Input(_) | Directive::InputInvalid);
        seen.push(directive);
        if !asked {
            continue;
        }
        match answers.next() {
            Some(value) => link.receive(&encode_inbound(&InboundMessage { input: value }).unwrap()).unwrap(),
            None => {
                link.close();
            },
        }
    }
    seen
}

fn run_read(answers: Vec<String>) -> (Option<i64>, Vec<Directive>) {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    runtime.block_on(async move {
        let (transport, link, outbound) = queue_pair(1);
        let peer = tokio::spawn(peer(link, outbound, answers));

        let mut console = Console::new(Box::new(transport));
        let value = console.read_int(Some("how many?"), 0, Some(50)).await.ok();
        drop(console);

        (value, peer.await.unwrap())
    })
}

fn invalid_answer() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z ]{0,6}", (51i64..1000).prop_map(|n| n.to_string()), (-1000i64..0).prop_map(|n| n.to_string())]
}

proptest! {
    #[test]
    fn one_input_directive_per_read(invalid in prop::collection::vec(invalid_answer(), 0..8), valid in 0i64..=50) {
        let retries = invalid.len();
        let mut answers = invalid;
        answers.push(valid.to_string());

        let (value, seen) = run_read(answers);

        prop_assert_eq!(value, Some(valid));
        let inputs = seen.iter().filter(|d| matches!(d, Directive::Input(_))).count();
        let rejections = seen.iter().filter(|d| matches!(d, Directive::InputInvalid)).count();
        prop_assert_eq!(inputs, 1);
        prop_assert_eq!(rejections, retries);
        prop_assert_eq!(seen.last(), Some(&Directive::InputOk));
    }

    #[test]
    fn peer_running_dry_terminates_read(invalid in prop::collection::vec(invalid_answer(), 0..8)) {
        let (value, seen) = run_read(invalid);

        prop_assert_eq!(value, None);
        prop_assert!(!seen.contains(&Directive::InputOk));
    }
}
