//! Leads

pub mod access;
pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::LeadsServiceError;
pub use service::*;
