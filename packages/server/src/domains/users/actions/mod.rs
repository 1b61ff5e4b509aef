pub mod bind_phone;
pub mod update_profile;

pub use bind_phone::bind_phone;
pub use update_profile::update_profile;
