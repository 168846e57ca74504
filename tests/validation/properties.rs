//! Property-based invariants of a validation run.

use super::*;
use proptest::prelude::*;
use schema_rules::{Descriptor, Rule, Schema, ValidateOptions, ValidateResult};
use serde_json::{Map, Value, json};
use tokio_test::block_on;

fn quiet() -> ValidateOptions {
    ValidateOptions::new().suppress_warning()
}

fn run(schema: &Schema, data: Value) -> ValidateResult<Value> {
    block_on(validate_owned(schema, data, quiet()))
}

fn outcome(result: ValidateResult<Value>) -> Result<Value, Vec<String>> {
    result.map_err(|failure| messages(&failure))
}

fn object_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8).prop_map(|entries| {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect::<Map<String, Value>>(),
        )
    })
}

proptest! {
    #[test]
    fn empty_schema_accepts_anything(data in object_strategy()) {
        let schema = Schema::new(Descriptor::new());
        let validated = run(&schema, data.clone());
        prop_assert_eq!(validated.ok(), Some(data));
    }

    #[test]
    fn validation_without_transforms_leaves_data_alone(text in "\\PC{0,12}", n in any::<i32>()) {
        let schema = Schema::new(
            Descriptor::new()
                .field("text", Rule::of_type("string").min(2.0).max(6.0))
                .field("n", Rule::of_type("integer").min(0.0)),
        );
        let data = json!({"text": text, "n": n});
        let mut copy = data.clone();
        let _ = block_on(schema.validate_with(&mut copy, quiet()));
        prop_assert_eq!(copy, data);
    }

    #[test]
    fn validation_is_repeatable(text in "\\PC{0,12}") {
        let schema = Schema::new(Descriptor::new().field(
            "v",
            vec![
                Rule::of_type("string").max(4.0),
                Rule::of_type("string").pattern(regex::Regex::new("^[a-m]*$").expect("valid")),
            ],
        ));
        let first = outcome(run(&schema, json!({"v": text})));
        let second = outcome(run(&schema, json!({"v": text})));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn required_string_fails_only_when_empty(text in "[a-z ]{0,4}") {
        let schema = Schema::new(Descriptor::new().field("v", Rule::of_type("string").required()));
        let result = outcome(run(&schema, json!({"v": text})));
        if text.is_empty() {
            prop_assert_eq!(result, Err(vec!["v is required".to_string()]));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn integer_range_matches_bounds(n in -100i64..100) {
        let schema = Schema::new(
            Descriptor::new().field("n", Rule::of_type("integer").min(-10.0).max(10.0)),
        );
        let result = outcome(run(&schema, json!({"n": n})));
        if (-10..=10).contains(&n) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(vec!["n must be between -10 and 10".to_string()]));
        }
    }

    #[test]
    fn array_items_report_their_own_index(items in prop::collection::vec(any::<bool>(), 0..6)) {
        let schema = Schema::new(Descriptor::new().field(
            "v",
            Rule::of_type("array").default_field(Rule::of_type("number")),
        ));
        let data = json!({"v": items});
        let expected: Vec<String> = (0..items.len())
            .map(|i| format!("v.{i} is not a number"))
            .collect();
        match run(&schema, data) {
            Ok(_) => prop_assert!(expected.is_empty()),
            Err(failure) => prop_assert_eq!(messages(&failure), expected),
        }
    }
}
