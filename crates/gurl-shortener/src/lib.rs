//! Async link shortening service.
//!
//! [`ShortenerService`] adapts the blocking [`gurl_storage::LinkStore`] to
//! the async [`Shortener`] trait used by the HTTP gateway.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::{Result, ShortenerError};
pub use service::ShortenerService;
pub use shortener::Shortener;
