use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Number of periods must be > 0")]
    InvalidPeriods,

    #[error(
        "Payment cannot cover this prepayment schedule: {payment:.2} does not exceed interest on {principal:.2}"
    )]
    InfeasiblePrepayment { principal: f64, payment: f64 },

    #[error("Calculation produced a non-finite {0}")]
    NonFinite(&'static str),

    #[error("Schedule file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schedule serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CalcResult<T> = Result<T, CalcError>;
