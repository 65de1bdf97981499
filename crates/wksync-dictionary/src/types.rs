use serde::Deserialize;

/// Top level of a jmdict-simplified JSON document.
#[derive(Debug, Deserialize)]
pub struct JmdictDocument {
    pub words: Vec<JmdictWord>,
}

/// One dictionary word. Kana-only words (e.g. mimetic adverbs like あっさり)
/// carry an empty `kanji` list, not a missing entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JmdictWord {
    #[serde(default)]
    pub kanji: Vec<FormText>,
    #[serde(default)]
    pub kana: Vec<FormText>,
    #[serde(default)]
    pub sense: Vec<Sense>,
}

/// A kanji or kana rendering of a word.
#[derive(Debug, Clone, Deserialize)]
pub struct FormText {
    pub text: String,
}

/// One meaning of a word, holding its English glosses.
#[derive(Debug, Clone, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub gloss: Vec<Gloss>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gloss {
    pub text: String,
}
