//! Property tests for the edit engine

use proptest::prelude::*;
use stanza_core::{apply, ChangeReason, Intent, Scope, State};

const STANZAS: [&str; 3] = ["a", "b", "c"];

fn attribute_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("k"), Just("m")]
}

fn value() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("v1"), Just("v2"), Just("v3")]
}

fn body_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("# note".to_string()),
        (attribute_name(), value()).prop_map(|(k, v)| format!("  {k} = {v}")),
        (attribute_name(), value()).prop_map(|(k, v)| format!("{k}={v}")),
        attribute_name().prop_map(|k| format!("  {k}")),
    ]
}

/// Documents with stanzas in `a`, `b`, `c` order, sometimes followed by a
/// second `a` stanza
fn document() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(body_line(), 0..4),
        prop::collection::vec((any::<bool>(), prop::collection::vec(body_line(), 0..5)), 3),
        prop::option::weighted(0.3, prop::collection::vec(body_line(), 0..3)),
        any::<bool>(),
    )
        .prop_map(|(top, stanzas, repeated, trailing_newline)| {
            let mut lines = top;
            for (name, (included, body)) in STANZAS.iter().zip(stanzas) {
                if included {
                    lines.push(format!("{name}:"));
                    lines.extend(body);
                }
            }
            if let Some(body) = repeated {
                lines.push("a:".to_string());
                lines.extend(body);
            }
            let mut text = lines.join("\n");
            if trailing_newline && !lines.is_empty() {
                text.push('\n');
            }
            text
        })
}

fn scope() -> impl Strategy<Value = Scope> {
    prop_oneof![
        Just(Scope::TopLevel),
        Just(Scope::Stanza("a".into())),
        Just(Scope::Stanza("c".into())),
        Just(Scope::Stanza("new".into())),
    ]
}

fn values() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(value(), 0..4)
}

prop_compose! {
    fn any_intent()(
        scope in scope(),
        attribute in prop::option::weighted(0.8, attribute_name()),
        values in values(),
        absent in any::<bool>(),
        exclusive in any::<bool>(),
        allow_no_value in any::<bool>(),
    ) -> Option<Intent> {
        let mut builder = Intent::builder(scope)
            .values(values)
            .exclusive(exclusive)
            .allow_no_value(allow_no_value)
            .state(if absent { State::Absent } else { State::Present });
        if let Some(attribute) = attribute {
            builder = builder.attribute(attribute);
        }
        builder.build().ok()
    }
}

proptest! {
    #[test]
    fn prop_second_apply_is_noop(text in document(), intent in any_intent()) {
        let Some(intent) = intent else {
            return Ok(());
        };
        let first = apply(&text, &intent);
        let second = apply(first.text(), &intent);

        prop_assert_eq!(second.reason(), ChangeReason::Ok);
        prop_assert_eq!(second.text(), first.text());
    }

    #[test]
    fn prop_ok_returns_input(text in document(), intent in any_intent()) {
        let Some(intent) = intent else {
            return Ok(());
        };
        let outcome = apply(&text, &intent);
        if !outcome.changed() {
            prop_assert_eq!(outcome.text(), text.as_str());
        }
    }

    #[test]
    fn prop_value_order_is_irrelevant(
        text in document(),
        scope in scope(),
        attribute in attribute_name(),
        values in prop::collection::vec(value(), 1..4),
    ) {
        let forward = Intent::builder(scope.clone())
            .attribute(attribute)
            .values(values.iter().copied())
            .build()
            .unwrap();
        let reversed = Intent::builder(scope)
            .attribute(attribute)
            .values(values.iter().rev().copied())
            .build()
            .unwrap();

        let converged = apply(&text, &forward);
        prop_assert_eq!(apply(converged.text(), &reversed).reason(), ChangeReason::Ok);
    }

    #[test]
    fn prop_duplicate_values_collapse(
        text in document(),
        scope in scope(),
        attribute in attribute_name(),
        values in prop::collection::vec(value(), 1..4),
        exclusive in any::<bool>(),
    ) {
        let doubled: Vec<_> = values.iter().chain(values.iter()).copied().collect();
        let once = Intent::builder(scope.clone())
            .attribute(attribute)
            .values(values)
            .exclusive(exclusive)
            .build()
            .unwrap();
        let twice = Intent::builder(scope)
            .attribute(attribute)
            .values(doubled)
            .exclusive(exclusive)
            .build()
            .unwrap();

        prop_assert_eq!(apply(&text, &once), apply(&text, &twice));
    }

    #[test]
    fn prop_exclusive_absent_ignores_values(
        text in document(),
        scope in scope(),
        attribute in attribute_name(),
        values in values(),
    ) {
        let named = Intent::builder(scope.clone())
            .attribute(attribute)
            .values(values)
            .absent()
            .build()
            .unwrap();
        let bare = Intent::builder(scope).attribute(attribute).absent().build().unwrap();

        prop_assert_eq!(apply(&text, &named), apply(&text, &bare));
    }

    #[test]
    fn prop_non_exclusive_absent_without_values_is_noop(
        text in document(),
        scope in scope(),
        attribute in attribute_name(),
    ) {
        let intent = Intent::builder(scope)
            .attribute(attribute)
            .absent()
            .exclusive(false)
            .build()
            .unwrap();
        let outcome = apply(&text, &intent);

        prop_assert_eq!(outcome.reason(), ChangeReason::Ok);
        prop_assert_eq!(outcome.text(), text.as_str());
    }

    #[test]
    fn prop_stanza_removal_leaves_no_header(text in document()) {
        let intent = Intent::builder(Scope::Stanza("a".into())).absent().build().unwrap();
        let outcome = apply(&text, &intent);
        let names: Vec<String> = stanza_core::Document::parse(outcome.text())
            .stanza_names()
            .map(str::to_string)
            .collect();

        prop_assert!(!names.iter().any(|name| name == "a"));
        prop_assert_eq!(apply(outcome.text(), &intent).reason(), ChangeReason::Ok);
    }

    #[test]
    fn prop_other_stanzas_untouched(
        text in document(),
        attribute in attribute_name(),
        values in prop::collection::vec(value(), 1..3),
    ) {
        let intent = Intent::builder(Scope::Stanza("a".into()))
            .attribute(attribute)
            .values(values)
            .build()
            .unwrap();
        let outcome = apply(&text, &intent);

        // Everything from the first header after the edited `a:` onward is
        // unaffected, including a repeated `a:` stanza
        let tail = |s: &str| -> Option<String> {
            let start = s.find("\nb:").or_else(|| s.find("\nc:"))?;
            Some(s[start..].trim_end_matches('\n').to_string())
        };
        let first_a = if text.starts_with("a:") { Some(0) } else { text.find("\na:") };
        let rest = text.find("\nb:").or_else(|| text.find("\nc:"));
        if let (Some(first_a), Some(rest)) = (first_a, rest) {
            if first_a < rest {
                prop_assert_eq!(tail(outcome.text()), tail(&text));
            }
        }
    }
}
