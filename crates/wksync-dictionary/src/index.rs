use std::collections::{HashMap, HashSet};

use crate::types::JmdictWord;

#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Unique definitions kept per term. Common words like 上げる list far
    /// more glosses than a synonym slot can hold.
    pub max_definitions: usize,
    /// Definitions longer than this are dropped; matches the remote
    /// meaning-synonym field limit.
    pub max_definition_len: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            max_definitions: 5,
            max_definition_len: 64,
        }
    }
}

/// Term → unique English definitions, built once per run from the dictionary
/// and the set of vocabulary terms being synced.
#[derive(Debug, Default)]
pub struct DefinitionIndex {
    terms: HashMap<String, Vec<String>>,
}

impl DefinitionIndex {
    /// Walk the dictionary once, collecting definitions for every word whose
    /// match candidates intersect `targets`.
    ///
    /// Words with any kanji rendering match on kanji texts only; kana texts
    /// are candidates only for kana-only words. A term never maps to an
    /// empty definition list: terms with no surviving definitions are
    /// absent from the index.
    pub fn build(words: &[JmdictWord], targets: &HashSet<String>, options: &IndexOptions) -> Self {
        let mut terms: HashMap<String, Vec<String>> = HashMap::new();

        for word in words {
            let matched = match_candidates(word, targets);
            if matched.is_empty() {
                continue;
            }

            let definitions = word_definitions(word, options.max_definition_len);
            if definitions.is_empty() {
                continue;
            }

            for term in matched {
                terms
                    .entry(term.to_string())
                    .or_default()
                    .extend(definitions.iter().cloned());
            }
        }

        for definitions in terms.values_mut() {
            *definitions = dedup_capped(definitions, options.max_definitions);
        }
        terms.retain(|_, definitions| !definitions.is_empty());

        tracing::debug!(terms = terms.len(), "definition index built");
        Self { terms }
    }

    pub fn get(&self, term: &str) -> Option<&[String]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Candidate texts of a word that appear in the target set, deduplicated in
/// first-seen order.
fn match_candidates<'a>(word: &'a JmdictWord, targets: &HashSet<String>) -> Vec<&'a str> {
    let forms = if word.kanji.is_empty() {
        &word.kana
    } else {
        &word.kanji
    };

    let mut seen = HashSet::new();
    forms
        .iter()
        .map(|form| form.text.as_str())
        .filter(|text| !text.is_empty() && targets.contains(*text))
        .filter(|text| seen.insert(*text))
        .collect()
}

/// Gloss texts of a word in sense order then gloss order, deduplicated
/// exactly, with over-long definitions dropped.
fn word_definitions(word: &JmdictWord, max_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut definitions = Vec::new();

    for sense in &word.sense {
        for gloss in &sense.gloss {
            if gloss.text.chars().count() > max_len {
                continue;
            }
            if seen.insert(gloss.text.as_str()) {
                definitions.push(gloss.text.clone());
            }
        }
    }

    definitions
}

/// First `cap` unique definitions, preserving order.
fn dedup_capped(definitions: &[String], cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for definition in definitions {
        if unique.len() == cap {
            break;
        }
        if seen.insert(definition.as_str()) {
            unique.push(definition.clone());
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn word(value: serde_json::Value) -> JmdictWord {
        serde_json::from_value(value).unwrap()
    }

    fn targets(terms: &[&str]) -> HashSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    fn defaults() -> IndexOptions {
        IndexOptions::default()
    }

    #[test]
    fn duplicate_glosses_collapse_within_a_word() {
        let words = vec![word(json!({
            "kanji": [{"text": "食べる"}],
            "kana": [{"text": "たべる"}],
            "sense": [{"gloss": [{"text": "to eat"}, {"text": "to eat"}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["食べる"]), &defaults());
        assert_eq!(index.get("食べる").unwrap(), ["to eat"]);
    }

    #[test]
    fn kana_only_words_match_on_kana() {
        let words = vec![word(json!({
            "kana": [{"text": "あっさり"}],
            "sense": [{"gloss": [{"text": "lightly"}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["あっさり"]), &defaults());
        assert_eq!(index.get("あっさり").unwrap(), ["lightly"]);
    }

    #[test]
    fn kanji_words_never_match_on_kana() {
        // Both renderings are in the target set, but a kanji-bearing word is
        // keyed by its kanji texts only.
        let words = vec![word(json!({
            "kanji": [{"text": "食べる"}],
            "kana": [{"text": "たべる"}],
            "sense": [{"gloss": [{"text": "to eat"}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["食べる", "たべる"]), &defaults());
        assert!(index.get("食べる").is_some());
        assert!(index.get("たべる").is_none());
    }

    #[test]
    fn non_target_words_are_skipped() {
        let words = vec![word(json!({
            "kanji": [{"text": "犬"}],
            "sense": [{"gloss": [{"text": "dog"}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["猫"]), &defaults());
        assert!(index.is_empty());
    }

    #[test]
    fn words_without_glosses_contribute_nothing() {
        let words = vec![word(json!({
            "kanji": [{"text": "犬"}],
            "sense": []
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["犬"]), &defaults());
        assert!(index.get("犬").is_none());
    }

    #[test]
    fn definitions_cap_at_five_unique() {
        let words = vec![word(json!({
            "kanji": [{"text": "上げる"}],
            "sense": [
                {"gloss": [{"text": "a"}, {"text": "b"}, {"text": "a"}]},
                {"gloss": [{"text": "c"}, {"text": "d"}, {"text": "e"}, {"text": "f"}]}
            ]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["上げる"]), &defaults());
        assert_eq!(index.get("上げる").unwrap(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn over_long_definitions_are_dropped() {
        let long = "x".repeat(65);
        let words = vec![word(json!({
            "kanji": [{"text": "犬"}],
            "sense": [{"gloss": [{"text": long}, {"text": "dog"}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["犬"]), &defaults());
        assert_eq!(index.get("犬").unwrap(), ["dog"]);
    }

    #[test]
    fn word_with_only_over_long_definitions_is_absent() {
        let long = "y".repeat(100);
        let words = vec![word(json!({
            "kanji": [{"text": "犬"}],
            "sense": [{"gloss": [{"text": long}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["犬"]), &defaults());
        assert!(index.get("犬").is_none());
    }

    #[test]
    fn repeated_candidate_text_appends_once() {
        let words = vec![word(json!({
            "kanji": [{"text": "日本"}, {"text": "日本"}],
            "sense": [{"gloss": [{"text": "Japan"}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["日本"]), &defaults());
        assert_eq!(index.get("日本").unwrap(), ["Japan"]);
    }

    #[test]
    fn definitions_accumulate_across_words_without_duplicates() {
        let words = vec![
            word(json!({
                "kanji": [{"text": "犬"}],
                "sense": [{"gloss": [{"text": "dog"}, {"text": "hound"}]}]
            })),
            word(json!({
                "kanji": [{"text": "犬"}],
                "sense": [{"gloss": [{"text": "dog"}, {"text": "canine"}]}]
            })),
        ];

        let index = DefinitionIndex::build(&words, &targets(&["犬"]), &defaults());
        assert_eq!(index.get("犬").unwrap(), ["dog", "hound", "canine"]);
    }

    #[test]
    fn one_word_can_feed_multiple_terms() {
        let words = vec![word(json!({
            "kanji": [{"text": "行く"}, {"text": "往く"}],
            "sense": [{"gloss": [{"text": "to go"}]}]
        }))];

        let index = DefinitionIndex::build(&words, &targets(&["行く", "往く"]), &defaults());
        assert_eq!(index.get("行く").unwrap(), ["to go"]);
        assert_eq!(index.get("往く").unwrap(), ["to go"]);
        assert_eq!(index.len(), 2);
    }
}
