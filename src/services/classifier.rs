use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use super::embedding::{dot, l2_normalize, Embedder};
use super::entity::extract_entity;
use crate::error::EmbeddingError;
use crate::models::{ClassificationResult, KnowledgeBase};
use crate::utils::fuzzy::{best_match, damerau_levenshtein, jaro_winkler};

/// Minimum Jaro-Winkler score for replacing an out-of-vocabulary token.
pub const AUTOCORRECT_CUTOFF: f64 = 0.8;

/// Words up to this length may be off by one edit; longer ones by two.
const SHORT_WORD_LEN: usize = 7;

#[derive(Debug, Clone)]
struct Prototype {
    vector: Vec<f32>,
    intent_id: String,
}

/// Nearest-prototype intent classifier.
///
/// Every trigger phrase is embedded on its own; nothing is averaged per
/// intent. All state is built in [`IntentClassifier::new`] and read-only
/// afterwards.
pub struct IntentClassifier {
    embedder: Arc<dyn Embedder>,
    prototypes: Vec<Prototype>,
    vocabulary: BTreeSet<String>,
    /// Names that are never rewritten: knowledge-base targets and app keys.
    protected: HashSet<String>,
}

impl IntentClassifier {
    pub fn new(embedder: Arc<dyn Embedder>, knowledge_base: &KnowledgeBase) -> Result<Self, EmbeddingError> {
        let mut prototypes = Vec::new();
        let mut vocabulary = BTreeSet::new();
        let mut protected = HashSet::new();

        for intent in knowledge_base.iter() {
            protected.extend(intent.targets.iter().flat_map(|t| split_lower(t)));
            for trigger in &intent.triggers {
                let mut vector = embedder.embed(trigger)?;
                l2_normalize(&mut vector);
                prototypes.push(Prototype {
                    vector,
                    intent_id: intent.id.clone(),
                });
                vocabulary.extend(trigger.split_whitespace().map(|w| w.to_lowercase()));
            }
        }

        log::info!(
            "Intent classifier ready: {} prototypes, {} vocabulary words ({} embedder)",
            prototypes.len(),
            vocabulary.len(),
            embedder.name()
        );

        Ok(Self {
            embedder,
            prototypes,
            vocabulary,
            protected,
        })
    }

    /// Adds names (e.g. installed application keys) that auto-correct must
    /// leave alone.
    pub fn with_protected_words<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.protected.extend(split_lower(name.as_ref()));
        }
        self
    }

    pub fn classify(&self, utterance: &str) -> ClassificationResult {
        let corrected = self.autocorrect(utterance);

        let mut query = match self.embedder.embed(&corrected) {
            Ok(vector) => vector,
            Err(e) => {
                log::error!("Embedding failed for {:?}: {}", corrected, e);
                vec![0.0; self.embedder.dimension()]
            }
        };
        l2_normalize(&mut query);

        let (intent_id, score) = self.nearest(&query);
        let entity = extract_entity(&corrected);

        log::debug!("Classified {:?} as {} ({:.3}) -> {:?}", corrected, intent_id, score, entity);

        ClassificationResult {
            intent_id,
            confidence: score.clamp(-1.0, 1.0),
            entity,
            corrected,
        }
    }

    /// Replaces misspelled domain words; everything else passes through.
    ///
    /// A vocabulary word is only a candidate when it is a plausible typo of
    /// the token: lengths within one char and at most one edit (two for long
    /// words). App names such as "steam" or "notion" therefore survive.
    pub fn autocorrect(&self, utterance: &str) -> String {
        utterance
            .split_whitespace()
            .map(|token| {
                let lowered = token.to_lowercase();
                if self.vocabulary.contains(&lowered) || self.protected.contains(&lowered) {
                    return token.to_string();
                }
                let candidates = self
                    .vocabulary
                    .iter()
                    .map(String::as_str)
                    .filter(|word| is_plausible_typo(&lowered, word));
                match best_match(&lowered, candidates, AUTOCORRECT_CUTOFF, jaro_winkler) {
                    Some(word) => {
                        log::debug!("Autocorrected {:?} -> {:?}", token, word);
                        word.to_string()
                    }
                    None => token.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Strictly greater scores replace the incumbent, so the first prototype
    /// in knowledge-base order wins a tie.
    fn nearest(&self, query: &[f32]) -> (String, f32) {
        let mut best: Option<(&Prototype, f32)> = None;
        for prototype in &self.prototypes {
            let score = dot(query, &prototype.vector);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((prototype, score));
            }
        }

        match best {
            Some((prototype, score)) => (prototype.intent_id.clone(), score),
            // KnowledgeBase guarantees at least one trigger
            None => (String::new(), 0.0),
        }
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.iter().map(String::as_str)
    }

    pub fn prototype_count(&self) -> usize {
        self.prototypes.len()
    }
}

fn split_lower(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(|w| w.to_lowercase())
}

fn is_plausible_typo(token: &str, word: &str) -> bool {
    let (a, b) = (token.chars().count(), word.chars().count());
    if a.abs_diff(b) > 1 {
        return false;
    }
    let max_edits = if a.max(b) <= SHORT_WORD_LEN { 1 } else { 2 };
    damerau_levenshtein(token, word) <= max_edits
}
