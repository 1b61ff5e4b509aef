// CoSync - social backend core
//
// Phone-based auth (SMS codes + JWT session cookie), identity verification
// via CloudAuth, a post feed with likes and comments, and direct/group
// messaging, organized as domain modules over a Postgres store.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
