//! NovaDesk intent engine.
//!
//! Turns a free-form utterance ("open spotify", "turn up the volume") into a
//! desktop action: [`services::IntentClassifier`] picks the intent and the
//! command's object, [`services::AppIndex`] resolves application names, and
//! [`services::Commander`] performs or reports the action.

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{NovaError, Result};
pub use services::Engine;
