use serde::{Deserialize, Serialize};

use crate::merge;

/// One vocabulary subject as assembled for a sync run: the remote record's
/// meanings, the user's existing study material (if any), and the dictionary
/// definitions attached after the index is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularySubject {
    pub id: u64,
    pub characters: String,
    /// Accepted meanings plus whitelisted auxiliary meanings.
    pub meanings: Vec<String>,
    /// Id of the existing study material record, when one exists.
    pub study_material_id: Option<u64>,
    /// The user's meaning synonyms, as currently stored remotely.
    pub synonyms: Vec<String>,
    /// Dictionary-derived definitions for this term.
    pub definitions: Vec<String>,
    /// Set by the merge step when the synonym list gained entries.
    pub needs_update: bool,
}

impl VocabularySubject {
    /// Merge the attached dictionary definitions into the synonym list.
    /// Returns true when at least one definition was appended.
    pub fn merge_definitions(&mut self, capacity: usize) -> bool {
        let outcome = merge::merge(&self.meanings, &self.synonyms, &self.definitions, capacity);
        if outcome.changed {
            self.synonyms = outcome.synonyms;
            self.needs_update = true;
        }
        outcome.changed
    }
}
