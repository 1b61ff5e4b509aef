pub mod create_group;
pub mod list_conversations;
pub mod list_messages;
pub mod send_message;
pub mod start_private_chat;
pub mod views;

pub use create_group::create_group;
pub use list_conversations::list_conversations;
pub use list_messages::list_messages;
pub use send_message::send_message;
pub use start_private_chat::start_private_chat;
pub use views::{ConversationView, MessageView};
