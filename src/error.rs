//! Error handling for the IPTU engine
//!
//! Defines the domain error taxonomy and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for assessment and registry operations
#[derive(Error, Debug)]
pub enum IptuError {
    /// Raised by Property construction/setters on a field validation breach
    #[error("invalid property: {0}")]
    InvalidProperty(String),

    /// Raised when percentage/rate arguments or lookup identifiers fall
    /// outside their allowed ranges
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("database error: {0}")]
    Db(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for assessment operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = IptuError::InvalidProperty("area must be positive".to_string());
        assert_eq!(err.to_string(), "invalid property: area must be positive");
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> =
            Err(anyhow::anyhow!("original error")).context("failed to assess property");
        match result {
            Err(e) => {
                let msg = e.to_string();
                assert!(msg.contains("failed to assess property"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("original error") || msg.contains("original error"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_domain_error_variants() {
        let property_err = IptuError::InvalidProperty("test".to_string());
        assert!(property_err.to_string().starts_with("invalid property"));

        let argument_err = IptuError::InvalidArgument("test".to_string());
        assert!(argument_err.to_string().starts_with("invalid argument"));

        let db_err = IptuError::Db("test".to_string());
        assert!(db_err.to_string().starts_with("database error"));
    }
}
