//! Properties of prompt IDs, kinds and descriptors

use prompt_bridge::prompt::{new_prompt_id, PromptBroker, PromptDescriptor, PromptKind};
use prompt_bridge::PromptError;
use proptest::prelude::*;
use std::collections::HashSet;

fn any_kind() -> impl Strategy<Value = PromptKind> {
    prop_oneof![
        Just(PromptKind::Text),
        Just(PromptKind::Confirm),
        Just(PromptKind::Resource),
    ]
}

/// IDs stay unique however many are drawn in a batch
#[test]
fn test_prompt_id_uniqueness_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..500), |count| {
            let ids: HashSet<String> = (0..count).map(|_| new_prompt_id()).collect();
            prop_assert_eq!(ids.len(), count);
            prop_assert!(ids.iter().all(|id| id.starts_with("prompt_")));
            Ok(())
        })
        .unwrap();
}

/// Kind names parse back regardless of case and padding
#[test]
fn test_prompt_kind_parse_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any_kind(), any::<bool>(), 0usize..3), |(kind, upper, pad)| {
            let name = if upper {
                kind.as_str().to_ascii_uppercase()
            } else {
                kind.as_str().to_string()
            };
            let padded = format!("{}{}{}", " ".repeat(pad), name, " ".repeat(pad));
            prop_assert_eq!(padded.parse::<PromptKind>(), Ok(kind));
            Ok(())
        })
        .unwrap();
}

/// The host sees exactly the message and hint the caller supplied
#[test]
fn test_descriptor_wire_shape_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(any::<String>(), any_kind(), proptest::option::of("[a-z]{1,8}")),
            |(message, kind, hint)| {
                let descriptor = PromptDescriptor {
                    id: new_prompt_id(),
                    message: message.clone(),
                    kind,
                    resource_hint: hint.clone(),
                };
                let value = serde_json::to_value(&descriptor).unwrap();
                prop_assert_eq!(value["message"].as_str(), Some(message.as_str()));
                prop_assert_eq!(value["type"].as_str(), Some(kind.as_str()));
                prop_assert_eq!(
                    value["resourceType"].as_str(),
                    Some(hint.as_deref().unwrap_or(""))
                );

                let back: PromptDescriptor = serde_json::from_value(value).unwrap();
                prop_assert_eq!(back, descriptor);
                Ok(())
            },
        )
        .unwrap();
}

/// Resolving an ID that was never issued always reports it as not found
#[test]
fn test_unknown_ids_not_found_property() {
    let broker = PromptBroker::new();
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<String>(), |id| {
            prop_assert_eq!(
                broker.submit_response(&id, "x"),
                Err(PromptError::RequestNotFound(id.clone()))
            );
            prop_assert_eq!(
                broker.cancel(&id, None),
                Err(PromptError::RequestNotFound(id.clone()))
            );
            Ok(())
        })
        .unwrap();
}
