use std::io::{BufRead, Write};

use serde::Serialize;

use novadesk::models::{Candidate, ClassificationResult};
use novadesk::Engine;

/// What the host did with one utterance.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub classification: ClassificationResult,
    pub candidates: Vec<Candidate>,
    pub message: Option<String>,
}

/// Classify, offer candidates, and execute directly only when there is
/// nothing to choose from and the classifier is confident enough.
pub fn respond(engine: &Engine, utterance: &str) -> Outcome {
    let classification = engine.classify(utterance);
    log::info!(
        "Predicted: {} ({:.3}) -> {:?}",
        classification.intent_id,
        classification.confidence,
        classification.entity
    );

    let candidates = engine.resolve_candidates(&classification.intent_id, &classification.entity);

    let message = if !candidates.is_empty() {
        None
    } else if classification.confidence > engine.confidence_threshold() {
        Some(engine.execute(&classification.intent_id, &classification.entity))
    } else {
        Some("I'm not sure what you mean.".to_string())
    };

    Outcome {
        classification,
        candidates,
        message,
    }
}

pub fn print_outcome(utterance: &str, outcome: &Outcome, json: bool) {
    if json {
        match serde_json::to_string_pretty(outcome) {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("Failed to serialize outcome: {}", e),
        }
        return;
    }

    if !outcome.candidates.is_empty() {
        println!("✨ Found {} suggestions for '{}':", outcome.candidates.len(), utterance);
        for (idx, candidate) in outcome.candidates.iter().enumerate() {
            println!("  {}. 🚀 {}", idx + 1, candidate.name);
        }
    }
    if let Some(message) = &outcome.message {
        println!("✅ {}", message);
    }
}

pub fn print_classification(result: &ClassificationResult, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("Failed to serialize classification: {}", e),
        }
        return;
    }
    println!("intent:     {}", result.intent_id);
    println!("confidence: {:.3}", result.confidence);
    println!("entity:     {}", result.entity);
    println!("corrected:  {}", result.corrected);
}

/// One-shot: respond, then launch candidate `pick` (1-based) if requested.
pub fn run_once(engine: &Engine, utterance: &str, pick: Option<usize>, json: bool) {
    let outcome = respond(engine, utterance);
    print_outcome(utterance, &outcome, json);

    if let Some(n) = pick {
        match n.checked_sub(1).and_then(|i| outcome.candidates.get(i)) {
            Some(candidate) => println!("✅ {}", engine.open_candidate(candidate)),
            None => println!("No suggestion number {}", n),
        }
    }
}

/// Interactive loop. A bare number launches that suggestion from the
/// previous answer; `quit` or EOF exits.
pub fn repl(engine: &Engine, json: bool) -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut last: Vec<Candidate> = Vec::new();

    println!("Ask NovaDesk... (e.g. 'Open Spotify'), 'quit' to exit");
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }

        if let Ok(n) = input.parse::<usize>() {
            match n.checked_sub(1).and_then(|i| last.get(i)) {
                Some(candidate) => {
                    println!("Executing: {}...", candidate.name);
                    println!("✅ {}", engine.open_candidate(candidate));
                }
                None => println!("No suggestion number {}", n),
            }
            continue;
        }

        let outcome = respond(engine, input);
        print_outcome(input, &outcome, json);
        last = outcome.candidates;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use novadesk::error::LaunchError;
    use novadesk::models::KnowledgeBase;
    use novadesk::services::{Launcher, LexicalEmbedder, MediaKey, StaticDiscovery};

    struct NullLauncher;

    impl Launcher for NullLauncher {
        fn launch(&self, _: &str) -> Result<(), LaunchError> {
            Ok(())
        }
        fn open_uri(&self, _: &str) -> Result<(), LaunchError> {
            Ok(())
        }
        fn send_media_key(&self, _: MediaKey) -> Result<(), LaunchError> {
            Ok(())
        }
        fn lock_workstation(&self) -> Result<(), LaunchError> {
            Ok(())
        }
    }

    fn engine() -> Engine {
        let kb = KnowledgeBase::default();
        let embedder = LexicalEmbedder::fit(kb.iter().flat_map(|i| i.triggers.iter().map(String::as_str)));
        Engine::from_parts(
            kb,
            Arc::new(embedder),
            Box::new(StaticDiscovery::new([("spotify", "spotify.lnk"), ("vlc", "vlc.lnk")])),
            Arc::new(NullLauncher),
        )
        .unwrap()
    }

    #[test]
    fn candidates_suppress_direct_execution() {
        let outcome = respond(&engine(), "open spotify");
        assert_eq!(outcome.candidates.len(), 2);
        assert!(outcome.message.is_none());
    }

    #[test]
    fn confident_system_command_executes() {
        let outcome = respond(&engine(), "volume up");
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.message.as_deref(), Some("Executed volume_up"));
    }

    #[test]
    fn low_confidence_asks_for_clarification() {
        let outcome = respond(&engine(), "qqqq zzzz");
        assert_eq!(outcome.message.as_deref(), Some("I'm not sure what you mean."));
    }
}
