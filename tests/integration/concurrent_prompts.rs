//! Many prompts in flight at once, resolved in arbitrary order.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use prompt_bridge::prompt::PromptKind;

use crate::integration::test_utils::HostHarness;

#[test]
fn concurrent_prompts_have_distinct_ids() {
    const PROMPTS: usize = 25;
    let harness = HostHarness::new(Duration::from_secs(10));

    let callers: Vec<_> = (0..PROMPTS)
        .map(|i| {
            let broker = Arc::clone(&harness.broker);
            thread::spawn(move || broker.prompt(&format!("q{}", i), PromptKind::Text, None))
        })
        .collect();

    let descriptors: Vec<_> = (0..PROMPTS).map(|_| harness.next_prompt()).collect();
    let ids: HashSet<_> = descriptors.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids.len(), PROMPTS);

    let snapshot: HashSet<_> = harness.broker.pending().into_iter().map(|d| d.id).collect();
    assert_eq!(snapshot, ids, "every prompt is pending before any is resolved");

    for descriptor in &descriptors {
        harness.broker.submit_response(&descriptor.id, "ok").unwrap();
    }
    for caller in callers {
        assert_eq!(caller.join().unwrap(), Ok("ok".to_string()));
    }
    assert!(harness.broker.pending().is_empty());
}

#[test]
fn ten_prompts_each_get_their_own_answer() {
    const PROMPTS: usize = 10;
    let harness = HostHarness::new(Duration::from_secs(10));
    let start = Arc::new(Barrier::new(PROMPTS));

    let callers: Vec<_> = (0..PROMPTS)
        .map(|i| {
            let broker = Arc::clone(&harness.broker);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                let question = format!("question-{}", i);
                let answer = broker.prompt(&question, PromptKind::Text, None);
                (question, answer)
            })
        })
        .collect();

    let mut by_message: HashMap<String, String> = HashMap::new();
    for _ in 0..PROMPTS {
        let descriptor = harness.next_prompt();
        by_message.insert(descriptor.message.clone(), descriptor.id);
    }

    // Resolve in reverse message order from several resolver threads.
    let mut order: Vec<_> = by_message.into_iter().collect();
    order.sort_by(|a, b| b.0.cmp(&a.0));
    let resolvers: Vec<_> = order
        .chunks(3)
        .map(|chunk| {
            let broker = Arc::clone(&harness.broker);
            let chunk = chunk.to_vec();
            thread::spawn(move || {
                for (message, id) in chunk {
                    broker
                        .submit_response(&id, format!("answer-to-{}", message))
                        .unwrap();
                }
            })
        })
        .collect();
    for resolver in resolvers {
        resolver.join().unwrap();
    }

    for caller in callers {
        let (question, answer) = caller.join().unwrap();
        assert_eq!(answer, Ok(format!("answer-to-{}", question)));
    }
    assert!(harness.broker.pending().is_empty());
}

#[test]
fn racing_resolvers_deliver_exactly_once() {
    let harness = HostHarness::new(Duration::from_secs(10));
    for round in 0..20 {
        let broker = Arc::clone(&harness.broker);
        let caller = thread::spawn(move || broker.prompt("race", PromptKind::Text, None));
        let descriptor = harness.next_prompt();

        let racers: Vec<_> = (0..4)
            .map(|r| {
                let broker = Arc::clone(&harness.broker);
                let id = descriptor.id.clone();
                thread::spawn(move || {
                    if r % 2 == 0 {
                        broker.submit_response(&id, format!("racer-{}", r)).is_ok()
                    } else {
                        broker.cancel(&id, None).is_ok()
                    }
                })
            })
            .collect();
        let winners = racers
            .into_iter()
            .map(|racer| racer.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1, "round {}: exactly one resolver may win", round);
        let _ = caller.join().unwrap();
        assert!(harness.broker.pending().is_empty());
    }
}
