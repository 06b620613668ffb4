use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreditEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Malformed input: {field} — {reason}")]
    MalformedInput { field: String, reason: String },

    #[error("Out-of-range result: {quantity} = {value} violates its published bounds")]
    OutOfRangeResult { quantity: String, value: Decimal },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CreditEngineError {
    fn from(e: serde_json::Error) -> Self {
        CreditEngineError::SerializationError(e.to_string())
    }
}
