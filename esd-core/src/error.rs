/// Error types for parsing core identifiers
use thiserror::Error;

/// Failure to parse one of the fixed identifier sets of the platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Chart type outside line / bar / pie / stacked
    #[error("Unknown chart type: {0}")]
    ChartType(String),

    /// Technology parameter id outside the six supported ids
    #[error("Unknown technology parameter: {0}")]
    Parameter(String),

    /// Category key that is not one of the fixed category files
    #[error("Unknown category: {0}")]
    Category(String),

    /// Province id or code not in the province table
    #[error("Unknown province: {0}")]
    Province(String),

    /// Scenario id not offered by the platform
    #[error("Unknown scenario: {0}")]
    Scenario(String),
}
