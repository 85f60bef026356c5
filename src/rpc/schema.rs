//! Minimal built-in validator.
//!
//! The real schema validator is an external collaborator; this one covers
//! the contract for deployments (and tests) that only need required-field
//! and primitive-kind checks. Schema shape:
//!
//! ```json
//! { "type": "object",
//!   "required": ["name"],
//!   "fields": { "name": { "type": "string" } } }
//! ```
//!
//! A `null` schema accepts any value.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::proto::{ProtocolDescriptor, Schema, ValidationOutcome, Validator, ValidatorCompiler};

pub struct BasicValidator {
    schema: Schema,
}

impl BasicValidator {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

impl Validator for BasicValidator {
    fn validate(&self, value: &Value) -> ValidationOutcome {
        if self.schema.is_null() {
            return ValidationOutcome::pass();
        }

        if self.schema.get("type").and_then(Value::as_str) == Some("object") {
            let Some(obj) = value.as_object() else {
                return ValidationOutcome::fail("", "expected an object");
            };

            if let Some(required) = self.schema.get("required").and_then(Value::as_array) {
                for field in required.iter().filter_map(Value::as_str) {
                    if !obj.contains_key(field) {
                        return ValidationOutcome::fail(field, "missing required field");
                    }
                }
            }

            if let Some(fields) = self.schema.get("fields").and_then(Value::as_object) {
                for (name, field_schema) in fields {
                    let Some(actual) = obj.get(name) else {
                        continue; // absence is the required-list's concern
                    };
                    let Some(kind) = field_schema.get("type").and_then(Value::as_str) else {
                        continue;
                    };
                    if !kind_matches(actual, kind) {
                        return ValidationOutcome::fail(name.as_str(), format!("expected {kind}"));
                    }
                }
            }
        }

        ValidationOutcome::pass()
    }
}

fn kind_matches(value: &Value, kind: &str) -> bool {
    match kind {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

/// Default compiler: binds a `BasicValidator` to the descriptor's request
/// schema at registration time.
pub struct BasicCompiler;

impl ValidatorCompiler for BasicCompiler {
    fn compile(&self, descriptor: &ProtocolDescriptor) -> Arc<dyn Validator> {
        Arc::new(BasicValidator::new(descriptor.request_schema.clone()))
    }
}
