//! Calculator tool.

use super::Tool;
use crate::calculator::evaluate;
use crate::error::ToolError;
use async_trait::async_trait;

/// Evaluates arithmetic expressions with [`crate::calculator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "Calculator"
    }

    fn description(&self) -> &str {
        "Performs calculations. Supports numbers, + - * / // % ** and parentheses."
    }

    fn input_description(&self) -> &str {
        "An arithmetic expression, e.g. \"(3 + 4) * 2 ** 3\""
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        evaluate(input.trim())
            .map(|n| n.to_string())
            .map_err(|e| ToolError::Validation(format!("Error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calculates() {
        assert_eq!(Calculator.invoke(" 7 / 2 ").await.unwrap(), "3.5");
        assert_eq!(Calculator.invoke("2 ** 8").await.unwrap(), "256");
    }

    #[tokio::test]
    async fn test_errors_are_prefixed() {
        let err = Calculator.invoke("1 / 0").await.unwrap_err();
        assert_eq!(err.to_string(), "Error: division by zero");

        let err = Calculator.invoke("open('/etc/passwd')").await.unwrap_err();
        assert!(err.to_string().starts_with("Error:"));
    }
}
