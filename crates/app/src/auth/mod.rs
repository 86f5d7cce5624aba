//! Authentication

mod errors;
mod identity;
pub mod password;
mod service;
pub mod session;

pub use errors::*;
pub use identity::IdentityContext;
pub use service::*;
pub use session::{IssuedSession, SessionError, SessionSecret, SessionSigner};
