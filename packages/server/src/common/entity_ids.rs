//! Typed ID definitions for all domain entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for Post entities.
pub struct Post;

/// Marker type for Comment entities.
pub struct Comment;

/// Marker type for Conversation entities.
pub struct Conversation;

/// Marker type for Message entities.
pub struct Message;

/// Marker type for SMS verification code records.
pub struct SmsCode;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;
pub type PostId = Id<Post>;
pub type CommentId = Id<Comment>;
pub type ConversationId = Id<Conversation>;
pub type MessageId = Id<Message>;
pub type SmsCodeId = Id<SmsCode>;
