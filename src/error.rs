//! Error types for the intent engine.
//!
//! Only construction-time failures ever escape the engine. Everything that
//! happens per utterance (resolution misses, launch refusals) is converted to
//! a status message by the commander instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NovaError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("engine initialization was interrupted: {0}")]
    Interrupted(String),
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model not found at {path} (run `novadesk fetch-model` or pass --lexical)")]
    ModelMissing { path: PathBuf },

    #[error("tokenizer not found at {path}")]
    TokenizerMissing { path: PathBuf },

    #[error("failed to load tokenizer: {0}")]
    Tokenizer(String),

    #[error("inference runtime error: {0}")]
    Runtime(String),

    #[error("model produced an unexpected output shape: {0}")]
    Shape(String),

    #[error("ONNX support was not compiled in (enable the `onnx` feature or pass --lexical)")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse knowledge base {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("knowledge base has no intents")]
    Empty,

    #[error("intent {0} is defined more than once")]
    DuplicateIntent(String),

    #[error("intent {0} has no trigger phrases")]
    NoTriggers(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("the operating system refused to open {target}")]
    Os {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, NovaError>;
