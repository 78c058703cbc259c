use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("Could not parse {quantity} from '{input}'")]
    Parse { quantity: &'static str, input: String },

    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: &'static str },

    #[error("Ambiguous unit '{unit}': {reason}")]
    AmbiguousUnit { unit: String, reason: &'static str },
}
