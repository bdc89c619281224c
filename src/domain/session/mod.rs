//! Conversation sessions and their turn history.

mod session;
mod turn;

pub use session::ConversationSession;
pub use turn::{Turn, TurnRole};
