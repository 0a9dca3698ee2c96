use thiserror::Error;

pub type LsResult<T> = Result<T, LsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LsError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid configuration: {field} {reason}")]
    Config { field: &'static str, reason: String },
}

impl LsError {
    /// Shorthand for a configuration error on a named parameter.
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        LsError::Config {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_field() {
        let err = LsError::config("cylinder_bore_in", "must be positive (got 0)");
        let msg = err.to_string();
        assert!(msg.contains("cylinder_bore_in"));
        assert!(msg.contains("must be positive"));
    }
}
