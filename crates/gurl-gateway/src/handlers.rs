mod health;
mod link;

pub use health::{greeting_handler, health_handler};
pub use link::{create_link_handler, delete_link_handler, resolve_link_handler};
