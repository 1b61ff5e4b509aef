pub mod comment;
pub mod like;
pub mod post;

pub use comment::Comment;
pub use like::Like;
pub use post::Post;
