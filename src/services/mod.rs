pub mod app_indexer;
pub mod classifier;
pub mod commander;
pub mod embedding;
pub mod engine;
pub mod entity;
pub mod launcher;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use app_indexer::{AppDiscovery, AppIndex, ShortcutScanner, StaticDiscovery};
pub use classifier::IntentClassifier;
pub use commander::Commander;
pub use embedding::{Embedder, LexicalEmbedder};
pub use engine::Engine;
pub use launcher::{Launcher, MediaKey, SystemLauncher};
