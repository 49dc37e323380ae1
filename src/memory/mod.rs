//! 记忆层：进程内对话历史

pub mod conversation;

pub use conversation::{ConversationHistory, Message, Role};
