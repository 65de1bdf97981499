use std::collections::HashSet;

/// WaniKani stores at most 8 meaning synonyms per study material.
pub const DEFAULT_SYNONYM_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Existing synonyms, in their original order, followed by the accepted
    /// dictionary definitions.
    pub synonyms: Vec<String>,
    /// True when at least one definition was appended.
    pub changed: bool,
}

/// Merge dictionary definitions into an existing synonym list.
///
/// Definitions are considered in order and appended verbatim unless the list
/// is already at `capacity` or the definition duplicates (case-insensitively)
/// an existing meaning or synonym. Existing synonyms are never removed or
/// reordered.
pub fn merge(
    meanings: &[String],
    synonyms: &[String],
    definitions: &[String],
    capacity: usize,
) -> MergeOutcome {
    let meaning_set: HashSet<String> = meanings.iter().map(|m| m.to_lowercase()).collect();
    let mut synonym_set: HashSet<String> = synonyms.iter().map(|s| s.to_lowercase()).collect();

    let mut merged = synonyms.to_vec();
    let mut changed = false;

    for definition in definitions {
        if merged.len() >= capacity {
            break;
        }
        let folded = definition.to_lowercase();
        if meaning_set.contains(&folded) || synonym_set.contains(&folded) {
            continue;
        }
        merged.push(definition.clone());
        synonym_set.insert(folded);
        changed = true;
    }

    MergeOutcome {
        synonyms: merged,
        changed,
    }
}
