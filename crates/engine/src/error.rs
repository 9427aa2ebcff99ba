//! The module contains the errors the engine can throw.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid installments: {0}")]
    InvalidInstallments(String),
    #[error("Insufficient credit: available {available}, required {required}")]
    InsufficientCredit { available: i64, required: i64 },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInstallments(a), Self::InvalidInstallments(b)) => a == b,
            (
                Self::InsufficientCredit {
                    available: a1,
                    required: r1,
                },
                Self::InsufficientCredit {
                    available: a2,
                    required: r2,
                },
            ) => a1 == a2 && r1 == r2,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
