//! Activity audit log

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ActivityServiceError;
pub use service::*;
