use serde::Deserialize;

/// One page of a paginated listing. Pagination follows `pages.next_url`
/// until it is absent.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pages {
    pub next_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectRecord {
    pub id: u64,
    pub data: SubjectData,
}

#[derive(Debug, Deserialize)]
pub struct SubjectData {
    /// Absent for radicals without a glyph; vocabulary always carries one,
    /// but records missing it are skipped rather than trusted.
    pub characters: Option<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub auxiliary_meanings: Vec<AuxiliaryMeaning>,
}

#[derive(Debug, Deserialize)]
pub struct Meaning {
    pub meaning: String,
    #[serde(default)]
    pub accepted_answer: bool,
}

#[derive(Debug, Deserialize)]
pub struct AuxiliaryMeaning {
    pub meaning: String,
    /// "whitelist" or "blacklist".
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct StudyMaterialRecord {
    pub id: u64,
    pub data: StudyMaterialData,
}

#[derive(Debug, Deserialize)]
pub struct StudyMaterialData {
    pub subject_id: u64,
    #[serde(default)]
    pub meaning_synonyms: Vec<String>,
}
