//! Heuristic extraction of a command's object ("spotify" in "open spotify").
//!
//! Stands in for a dependency parse: find the imperative verb, then take its
//! direct object, or the object of a following preposition for phrasal verbs
//! ("search for X").

const FILLERS: &[&str] = &["please", "can", "could", "would", "will", "you", "kindly", "hey"];

const VERBS: &[&str] = &[
    "open", "launch", "start", "run", "play", "find", "search", "locate", "look", "show", "turn",
    "lock", "close", "go", "explore", "change", "increase", "lower", "power", "google", "get",
    "fire", "load", "mute", "execute", "browse", "check", "bring", "pull",
];

const PARTICLES: &[&str] = &["up", "down", "on", "off", "out"];

const PREPOSITIONS: &[&str] = &[
    "for", "to", "in", "at", "with", "about", "into", "of", "from", "on", "inside", "within",
];

const ARTICLES: &[&str] = &["the", "a", "an"];

fn is(word: &str, set: &[&str]) -> bool {
    let lowered = word.to_lowercase();
    set.contains(&lowered.as_str())
}

fn strip_articles<'a>(mut tokens: &'a [&'a str]) -> &'a [&'a str] {
    while let Some((first, rest)) = tokens.split_first() {
        if !is(first, ARTICLES) {
            break;
        }
        tokens = rest;
    }
    tokens
}

fn join(tokens: &[&str]) -> String {
    tokens.join(" ")
}

/// Object text of `utterance`, or an empty string when there is none.
pub fn extract_entity(utterance: &str) -> String {
    let tokens: Vec<&str> = utterance.split_whitespace().collect();
    if tokens.is_empty() {
        return String::new();
    }

    let start = tokens.iter().take_while(|t| is(t, FILLERS)).count();
    let rest = &tokens[start..];

    let Some((verb, after_verb)) = rest.split_first() else {
        return String::new();
    };

    if !is(verb, VERBS) {
        // verb-less: the utterance names the object itself
        return join(strip_articles(rest));
    }

    if let Some(object) = object_of(after_verb) {
        return object;
    }

    join(&tokens[1..])
}

fn object_of(after_verb: &[&str]) -> Option<String> {
    let mut tail = after_verb;

    // "turn up the volume": skip the particle only when something follows it
    if tail.len() > 1 && is(tail[0], PARTICLES) {
        tail = &tail[1..];
    }

    let (first, remainder) = tail.split_first()?;

    if is(first, PREPOSITIONS) {
        let object = strip_articles(remainder);
        return (!object.is_empty()).then(|| join(object));
    }

    let end = tail.iter().position(|t| is(t, PREPOSITIONS)).unwrap_or(tail.len());
    let object = strip_articles(&tail[..end]);
    (!object.is_empty()).then(|| join(object))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_object_of_command_verb() {
        assert_eq!(extract_entity("open spotify"), "spotify");
        assert_eq!(extract_entity("launch visual studio code"), "visual studio code");
        assert_eq!(extract_entity("find resume.pdf"), "resume.pdf");
    }

    #[test]
    fn leading_articles_are_stripped() {
        assert_eq!(extract_entity("open the calculator"), "calculator");
        assert_eq!(extract_entity("start an editor"), "editor");
    }

    #[test]
    fn prepositional_object_for_phrasal_verbs() {
        assert_eq!(extract_entity("search for holiday photos"), "holiday photos");
        assert_eq!(extract_entity("look for the budget sheet"), "budget sheet");
    }

    #[test]
    fn direct_object_stops_at_preposition() {
        assert_eq!(extract_entity("open notes in word"), "notes");
        assert_eq!(extract_entity("search web for weather"), "web");
    }

    #[test]
    fn particles_are_skipped() {
        assert_eq!(extract_entity("turn up the volume"), "volume");
        assert_eq!(extract_entity("turn off computer"), "computer");
    }

    #[test]
    fn politeness_fillers_are_skipped() {
        assert_eq!(extract_entity("please open spotify"), "spotify");
        assert_eq!(extract_entity("could you launch chrome"), "chrome");
    }

    #[test]
    fn verb_without_object_falls_back_to_tail() {
        assert_eq!(extract_entity("open"), "");
        // only an article after the preposition: nothing to extract
        assert_eq!(extract_entity("search for the"), "for the");
    }

    #[test]
    fn verbless_utterance_is_its_own_entity() {
        assert_eq!(extract_entity("spotify"), "spotify");
        assert_eq!(extract_entity("the budget sheet"), "budget sheet");
        assert_eq!(extract_entity("where is the budget sheet"), "where is the budget sheet");
    }

    #[test]
    fn casing_is_preserved() {
        assert_eq!(extract_entity("Open Google Chrome"), "Google Chrome");
    }

    #[test]
    fn blank_input() {
        assert_eq!(extract_entity(""), "");
        assert_eq!(extract_entity("   "), "");
        assert_eq!(extract_entity("please"), "");
    }
}
