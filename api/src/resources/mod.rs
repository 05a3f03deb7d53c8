pub mod auth;
pub mod metadata;
pub mod server_info;
