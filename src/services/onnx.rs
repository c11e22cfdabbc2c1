//! all-MiniLM-L6-v2 sentence embeddings through ONNX Runtime.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};

use super::embedding::{l2_normalize, masked_mean_pool, Embedder};
use crate::error::EmbeddingError;

pub const MODEL_FILE: &str = "onnx/model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Sentence embedder backed by an ONNX transformer.
///
/// `Session::run` needs exclusive access, so calls are serialized on a mutex;
/// the tokenizer is immutable after load and shared freely.
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimension: usize,
}

impl OnnxEmbedder {
    /// Loads `onnx/model.onnx` and `tokenizer.json` from `model_dir`.
    ///
    /// Missing files are fatal: the engine cannot classify without them.
    pub fn load(model_dir: &Path, max_tokens: usize) -> Result<Self, EmbeddingError> {
        let model_path = locate_model(model_dir)
            .ok_or_else(|| EmbeddingError::ModelMissing { path: model_dir.join(MODEL_FILE) })?;
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        if !tokenizer_path.exists() {
            return Err(EmbeddingError::TokenizerMissing { path: tokenizer_path });
        }

        log::info!("Loading embedding model from {}", model_path.display());

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_tokens,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let session = Session::builder()
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?;

        let embedder = Self {
            session: Mutex::new(session),
            tokenizer,
            dimension: 0,
        };

        // Probe once so the dimension is known before any prototype is built.
        let probe = embedder.run("probe")?;
        Ok(Self {
            dimension: probe.len(),
            ..embedder
        })
    }

    fn run(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&x| x as i64).collect();
        let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&x| x as i64).collect();
        let seq_len = ids.len();

        let input_ids = Tensor::from_array(([1usize, seq_len], ids))
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?;
        let attention_mask = Tensor::from_array(([1usize, seq_len], mask.clone()))
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?;
        let token_type_ids = Tensor::from_array(([1usize, seq_len], type_ids))
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| EmbeddingError::Runtime("inference session poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids
            ])
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?;

        let (shape, hidden) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| EmbeddingError::Runtime(e.to_string()))?;

        // last_hidden_state: [batch, seq, dim]
        if shape.len() != 3 || shape[1] as usize != seq_len {
            return Err(EmbeddingError::Shape(format!("{:?}", &shape[..])));
        }
        let dim = shape[2] as usize;

        let mut pooled = masked_mean_pool(hidden, &mask, dim);
        l2_normalize(&mut pooled);
        Ok(pooled)
    }
}

/// Accepts either the Xenova layout (`onnx/model.onnx`) or a flat `model.onnx`.
fn locate_model(model_dir: &Path) -> Option<PathBuf> {
    [model_dir.join(MODEL_FILE), model_dir.join("model.onnx")]
        .into_iter()
        .find(|p| p.exists())
}

impl Embedder for OnnxEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.run(text)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = OnnxEmbedder::load(dir.path(), 128).err().unwrap();
        assert!(matches!(err, EmbeddingError::ModelMissing { .. }));
    }

    #[test]
    fn missing_tokenizer_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("model.onnx"), b"").unwrap();
        let err = OnnxEmbedder::load(dir.path(), 128).err().unwrap();
        assert!(matches!(err, EmbeddingError::TokenizerMissing { .. }));
    }
}
