use std::sync::Arc;

use super::app_indexer::{AppDiscovery, AppIndex, ShortcutScanner};
use super::classifier::IntentClassifier;
use super::commander::Commander;
use super::embedding::{Embedder, LexicalEmbedder};
use super::launcher::{Launcher, SystemLauncher};
use crate::error::{NovaError, Result};
use crate::models::{Candidate, ClassificationResult, KnowledgeBase, Settings};

/// The ready-to-use (classifier, commander) pair handed to the host.
pub struct Engine {
    classifier: IntentClassifier,
    commander: Commander,
    confidence_threshold: f32,
}

impl Engine {
    /// Blocking construction: loads the model and embeds every trigger.
    pub fn load(settings: &Settings) -> Result<Self> {
        let knowledge_base = match &settings.launcher.knowledge_base {
            Some(path) => KnowledgeBase::load_file(path)?,
            None => KnowledgeBase::default(),
        };

        let embedder = build_embedder(settings, &knowledge_base)?;

        let discovery = ShortcutScanner::from_settings(&settings.launcher);

        let engine = Self::from_parts(
            knowledge_base,
            embedder,
            Box::new(discovery),
            Arc::new(SystemLauncher),
        )?;
        Ok(engine.with_confidence_threshold(settings.launcher.confidence_threshold))
    }

    /// Runs [`Engine::load`] on the blocking pool so the caller's thread stays
    /// responsive during model load.
    pub async fn spawn_load(settings: Settings) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::load(&settings))
            .await
            .map_err(|e| NovaError::Interrupted(e.to_string()))?
    }

    pub fn from_parts(
        knowledge_base: KnowledgeBase,
        embedder: Arc<dyn Embedder>,
        discovery: Box<dyn AppDiscovery>,
        launcher: Arc<dyn Launcher>,
    ) -> Result<Self> {
        let knowledge_base = Arc::new(knowledge_base);
        let apps = Arc::new(AppIndex::build(discovery));
        let classifier = IntentClassifier::new(embedder, &knowledge_base)?
            .with_protected_words(apps.entries().into_iter().map(|(key, _)| key));
        let commander = Commander::new(knowledge_base, apps, launcher);

        Ok(Self {
            classifier,
            commander,
            confidence_threshold: 0.35,
        })
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn classify(&self, utterance: &str) -> ClassificationResult {
        self.classifier.classify(utterance)
    }

    pub fn resolve_candidates(&self, intent_id: &str, entity: &str) -> Vec<Candidate> {
        self.commander.resolve_candidates(intent_id, entity)
    }

    pub fn execute(&self, intent_id: &str, entity: &str) -> String {
        self.commander.execute(intent_id, entity)
    }

    pub fn open_candidate(&self, candidate: &Candidate) -> String {
        self.commander.open_candidate(candidate)
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn commander(&self) -> &Commander {
        &self.commander
    }
}

fn build_embedder(settings: &Settings, knowledge_base: &KnowledgeBase) -> Result<Arc<dyn Embedder>> {
    if settings.model.lexical {
        log::info!("Using lexical embeddings (no model)");
        let phrases = knowledge_base.iter().flat_map(|i| i.triggers.iter().map(String::as_str));
        return Ok(Arc::new(LexicalEmbedder::fit(phrases)));
    }

    #[cfg(feature = "onnx")]
    {
        let embedder = super::onnx::OnnxEmbedder::load(&settings.model.dir, settings.model.max_tokens)?;
        Ok(Arc::new(embedder))
    }
    #[cfg(not(feature = "onnx"))]
    {
        Err(crate::error::EmbeddingError::Unavailable.into())
    }
}
