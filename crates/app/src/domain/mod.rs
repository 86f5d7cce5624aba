//! Leadbook Domain Concerns

pub mod leads;
pub mod users;
pub mod validation;
