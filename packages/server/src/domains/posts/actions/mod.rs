pub mod add_comment;
pub mod create_post;
pub mod delete_post;
pub mod feed;
pub mod search;
pub mod toggle_like;
pub mod views;

pub use add_comment::add_comment;
pub use create_post::{create_post, CreatePostOutcome};
pub use delete_post::delete_post;
pub use feed::{list_feed, list_user_posts, post_detail, PostDetail};
pub use search::{search, SearchResults};
pub use toggle_like::toggle_like;
pub use views::{CommentView, PostView};
