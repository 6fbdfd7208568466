//! Session delegation: time-boxed capability tokens substitutable for a
//! direct owner signature during mutation authorization.

mod authorization;
mod error;
mod token;


pub use authorization::Authorization;
pub use error::SessionError;
pub use token::{
    ProgramId, SessionToken, SignerKey, DEFAULT_VALIDITY_SECS, MAX_VALIDITY_SECS,
};
