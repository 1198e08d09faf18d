//! Core types for the gurl link shortener.
//!
//! This crate provides the shared data model, validation, and settings used
//! by the key generator, the link store, and the request layer.

pub mod clock;
pub mod error;
pub mod key;
pub mod origin;
pub mod record;
pub mod settings;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CoreError;
pub use key::ShortKey;
pub use origin::{normalize_target, Origin};
pub use record::LinkRecord;
pub use settings::LinkSettings;
