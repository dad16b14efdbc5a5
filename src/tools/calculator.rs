//! Arithmetic tools: `add` and `calculate`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_arguments, Tool, ToolResponse};
use crate::error::ToolError;

/// Payload returned by `calculate` when dividing by zero. The call itself
/// still succeeds.
pub const DIVIDE_BY_ZERO_MESSAGE: &str = "Error: Cannot divide by zero";

#[derive(Debug, Deserialize)]
struct AddInput {
    a: f64,
    b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// `None` for division by zero.
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Operation::Add => Some(a + b),
            Operation::Subtract => Some(a - b),
            Operation::Multiply => Some(a * b),
            Operation::Divide if b == 0.0 => None,
            Operation::Divide => Some(a / b),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalculateInput {
    operation: Operation,
    a: f64,
    b: f64,
}

/// Magnitudes at or above this switch to exponent notation.
const EXPONENT_UPPER: f64 = 1e21;
/// Non-zero magnitudes below this switch to exponent notation.
const EXPONENT_LOWER: f64 = 1e-6;

/// Render a number the way RPC clients print numbers: `3` not `3.0`,
/// `Infinity`/`NaN` for non-finite values, `0` for negative zero, and
/// `1e+21`/`1e-7` outside the plain-decimal range.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= EXPONENT_UPPER || value.abs() < EXPONENT_LOWER {
        // `{:e}` yields the shortest round-trip digits; only the sign of a
        // positive exponent is missing.
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        value.to_string()
    }
}

fn number_schema() -> Value {
    json!({ "type": "number" })
}

pub struct AddTool;

#[async_trait]
impl Tool for AddTool {
    fn name(&self) -> &'static str {
        "add"
    }

    fn description(&self) -> &'static str {
        "Add two numbers"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": number_schema(),
                "b": number_schema()
            },
            "required": ["a", "b"],
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value) -> Result<ToolResponse, ToolError> {
        let AddInput { a, b } = parse_arguments(self.name(), arguments)?;
        Ok(ToolResponse::text(format_number(a + b)))
    }
}

pub struct CalculateTool;

#[async_trait]
impl Tool for CalculateTool {
    fn name(&self) -> &'static str {
        "calculate"
    }

    fn description(&self) -> &'static str {
        "Apply add, subtract, multiply or divide to two numbers"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"]
                },
                "a": number_schema(),
                "b": number_schema()
            },
            "required": ["operation", "a", "b"],
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value) -> Result<ToolResponse, ToolError> {
        let CalculateInput { operation, a, b } = parse_arguments(self.name(), arguments)?;
        let text = match operation.apply(a, b) {
            Some(result) => format_number(result),
            None => DIVIDE_BY_ZERO_MESSAGE.to_string(),
        };
        Ok(ToolResponse::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn calculate(arguments: Value) -> Result<ToolResponse, ToolError> {
        CalculateTool.call(arguments).await
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e22), "-1.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.25e-10), "1.25e-10");

        // Boundaries stay in plain decimal
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-6), "0.000001");
    }

    #[tokio::test]
    async fn test_add() {
        let response = AddTool.call(json!({ "a": 2, "b": 3 })).await.unwrap();
        assert_eq!(response.first_text(), Some("5"));
        assert!(!response.is_error);

        let response = AddTool.call(json!({ "a": 1.5, "b": -0.25 })).await.unwrap();
        assert_eq!(response.first_text(), Some("1.25"));

        let response = AddTool.call(json!({ "a": 1e21, "b": 0 })).await.unwrap();
        assert_eq!(response.first_text(), Some("1e+21"));

        let response = AddTool.call(json!({ "a": 1e-7, "b": 0 })).await.unwrap();
        assert_eq!(response.first_text(), Some("1e-7"));
    }

    #[tokio::test]
    async fn test_add_rejects_non_numbers() {
        let err = AddTool.call(json!({ "a": "2", "b": 3 })).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams { .. }));

        let err = AddTool.call(json!({ "a": 2 })).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams { .. }));
    }

    #[tokio::test]
    async fn test_calculate_operations() {
        let cases = [
            ("add", 6.0, 3.0, "9"),
            ("subtract", 6.0, 3.0, "3"),
            ("multiply", 6.0, 3.0, "18"),
            ("divide", 6.0, 3.0, "2"),
            ("divide", 1.0, 4.0, "0.25"),
        ];
        for (operation, a, b, expected) in cases {
            let response = calculate(json!({ "operation": operation, "a": a, "b": b }))
                .await
                .unwrap();
            assert_eq!(response.first_text(), Some(expected), "{operation}");
        }
    }

    #[tokio::test]
    async fn test_divide_by_zero_is_successful_response() {
        let response = calculate(json!({ "operation": "divide", "a": 5, "b": 0 }))
            .await
            .unwrap();
        assert!(!response.is_error);
        assert_eq!(response.first_text(), Some(DIVIDE_BY_ZERO_MESSAGE));
    }

    #[tokio::test]
    async fn test_unknown_operation_is_invalid() {
        let err = calculate(json!({ "operation": "modulo", "a": 5, "b": 2 }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams { .. }));
    }
}
