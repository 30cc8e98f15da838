//! The module contains the errors the vehicle repository can throw.
//!
//! The errors are:
//!
//! - [`NotFound`] thrown when an item does not exist or does not belong to
//!   the active vehicle.
//! - [`NoActiveVehicle`] thrown when an operation needs an active vehicle
//!   and none exists.
//! - [`InvalidValue`] thrown when a numeric precondition fails.
//!
//! [`NotFound`]: RepositoryError::NotFound
//! [`NoActiveVehicle`]: RepositoryError::NoActiveVehicle
//! [`InvalidValue`]: RepositoryError::InvalidValue
use sea_orm::DbErr;
use thiserror::Error;

/// Vehicle repository custom errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("no active vehicle")]
    NoActiveVehicle,
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for RepositoryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::NoActiveVehicle, Self::NoActiveVehicle) => true,
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
