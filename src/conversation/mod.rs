//! Conversation module for deepvista
//!
//! The transcript context and the chat / video flows that read and write it.

mod context;
pub mod flow;

pub use context::{new_shared_context, ConversationContext, SharedContext};
pub use flow::{chat_turn, process_video};
