//! Template tables and rule messages.

use super::*;
use schema_rules::{
    Descriptor, Message, Messages, Outcome, Rule, Schema, Template, ValidateOptions, Validator,
};
use serde_json::json;

fn quiet() -> ValidateOptions {
    ValidateOptions::new().suppress_warning()
}

fn required_name() -> Schema {
    Schema::new(Descriptor::new().field("name", Rule::of_type("string").required()))
}

#[tokio::test]
async fn test_schema_messages_override_defaults() {
    let mut schema = required_name();
    schema.set_messages(Messages::new().with("required", "%s must be filled in"));

    let result = validate_owned(&schema, json!({}), quiet()).await;
    assert_error_messages!(result, ["name must be filled in"]);

    // other schemas keep the built-in table
    let result = validate_owned(&required_name(), json!({}), quiet()).await;
    assert_error_messages!(result, ["name is required"]);
}

#[tokio::test]
async fn test_per_call_messages_take_precedence() {
    let mut schema = required_name();
    schema.set_messages(Messages::new().with("required", "%s must be filled in"));

    let options = quiet().messages(Messages::new().with("required", "Missing: %s"));
    let result = validate_owned(&schema, json!({}), options).await;
    assert_error_messages!(result, ["Missing: name"]);

    // the schema table is untouched by the call
    let result = validate_owned(&schema, json!({}), quiet()).await;
    assert_error_messages!(result, ["name must be filled in"]);
}

#[tokio::test]
async fn test_grouped_override_keeps_siblings() {
    let mut schema = Schema::new(
        Descriptor::new()
            .field("a", Rule::of_type("string").max(2.0))
            .field("b", Rule::of_type("string").min(5.0)),
    );
    schema.set_messages(Messages::new().with_nested("string", "max", "%s is too long"));

    let result = validate_owned(&schema, json!({"a": "abc", "b": "abc"}), quiet()).await;
    assert_error_messages!(
        result,
        ["a is too long", "b must be at least 5 characters"]
    );
}

#[tokio::test]
async fn test_function_templates() {
    let mut schema = required_name();
    schema.set_messages(Messages::new().with(
        "required",
        Template::func(|args| format!("{} please", args[0].as_str().unwrap_or("?"))),
    ));
    let result = validate_owned(&schema, json!({}), quiet()).await;
    assert_error_messages!(result, ["name please"]);
}

#[tokio::test]
async fn test_messages_from_json() {
    let mut schema = required_name();
    let table = Messages::from_json(&json!({"required": "%s needed"})).expect("valid table");
    schema.set_messages(table);
    let result = validate_owned(&schema, json!({"name": ""}), quiet()).await;
    assert_error_messages!(result, ["name needed"]);
}

#[tokio::test]
async fn test_rule_message_replaces_leaf_errors() {
    let schema = Schema::new(Descriptor::new().field(
        "code",
        Rule::of_type("string")
            .len(4.0)
            .pattern(regex::Regex::new("^[0-9]+$").expect("valid"))
            .message("Enter a four digit code"),
    ));
    let result = validate_owned(&schema, json!({"code": "abc"}), quiet()).await;
    assert_error_messages!(result, ["Enter a four digit code"]);

    assert_validation_success!(validate_owned(&schema, json!({"code": "1234"}), quiet()).await);
}

#[tokio::test]
async fn test_list_message_reports_each_entry() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::of_type("string")
            .required()
            .message(vec!["first".to_string(), "second".to_string()]),
    ));
    let result = validate_owned(&schema, json!({}), quiet()).await;
    let failure = assert_error_messages!(result, ["first", "second"]);
    assert_eq!(fields(&failure), vec!["v", "v"]);
}

#[tokio::test]
async fn test_message_function_for_invalid_outcome() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::new()
            .validator(Validator::sync(|call| Ok(Outcome::from(call.value.is_some()))))
            .message(Message::func(|| "v must be supplied".to_string())),
    ));
    let result = validate_owned(&schema, json!({}), quiet()).await;
    assert_error_messages!(result, ["v must be supplied"]);
}

#[tokio::test]
async fn test_invalid_outcome_without_message() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::new().validator(Validator::sync(|_| Ok(Outcome::Invalid))),
    ));
    let result = validate_owned(&schema, json!({"v": 1}), quiet()).await;
    assert_error_messages!(result, ["v fails"]);
}
