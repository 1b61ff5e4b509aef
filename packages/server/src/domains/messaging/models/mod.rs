pub mod conversation;
pub mod message;

pub use conversation::{
    Conversation, ConversationMember, CONVERSATION_GROUP, CONVERSATION_PRIVATE,
};
pub use message::{Message, MESSAGE_IMAGE, MESSAGE_SYSTEM, MESSAGE_TEXT};
