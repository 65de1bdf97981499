use serde::Serialize;

use crate::subject::VocabularySubject;

/// One line of the review file written before the push phase.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry {
    pub id: u64,
    pub characters: String,
    pub synonyms: Vec<String>,
    pub definitions: Vec<String>,
    pub needs_update: bool,
}

impl From<&VocabularySubject> for ReviewEntry {
    fn from(subject: &VocabularySubject) -> Self {
        Self {
            id: subject.id,
            characters: subject.characters.clone(),
            synonyms: subject.synonyms.clone(),
            definitions: subject.definitions.clone(),
            needs_update: subject.needs_update,
        }
    }
}
