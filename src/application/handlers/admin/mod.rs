//! Administrative use cases: diagnostics and resets.

mod clear_session;
mod get_session;

pub use clear_session::{ClearSessionCommand, ClearSessionError, ClearSessionHandler};
pub use get_session::{GetSessionError, GetSessionHandler, GetSessionQuery};
