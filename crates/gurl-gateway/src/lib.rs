//! HTTP surface of gurl.
//!
//! [`App::router`] builds the axum router over any [`gurl_shortener::Shortener`].
//! The `gurl` binary wires it to an on-disk link store and the expiry sweeper.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
