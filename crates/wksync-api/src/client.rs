use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::json;

use wksync_core::VocabularySubject;

use crate::ApiError;
use crate::transport::{ApiRequest, HttpTransport, Method, RateLimited, Transport};
use crate::types::{Page, StudyMaterialRecord, SubjectRecord};

/// An existing remote synonym record for one subject.
#[derive(Debug, Clone)]
pub struct StudyMaterial {
    pub id: u64,
    pub subject_id: u64,
    pub meaning_synonyms: Vec<String>,
}

/// Result of one write, successful or not. Non-2xx statuses are reported to
/// the caller instead of raised so one subject's failure cannot stop the
/// rest of the push.
#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub subject_id: u64,
    pub status: u16,
    pub body: String,
}

impl PushOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// WaniKani v2 client. Every call goes through the rate-limited transport,
/// strictly one request at a time.
pub struct WaniKaniClient<T> {
    base_url: String,
    transport: RateLimited<T>,
}

impl WaniKaniClient<HttpTransport> {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self::with_transport(base_url, HttpTransport::new(api_key))
    }
}

impl<T: Transport> WaniKaniClient<T> {
    pub fn with_transport(base_url: String, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport: RateLimited::new(transport),
        }
    }

    /// Fetch all vocabulary subjects, optionally filtered to a
    /// comma-separated level list, following pagination to the end.
    pub async fn fetch_vocabulary(
        &self,
        levels: Option<&str>,
    ) -> Result<Vec<VocabularySubject>, ApiError> {
        let mut url = format!("{}/subjects?types=vocabulary", self.base_url);
        if let Some(levels) = levels.filter(|l| !l.is_empty()) {
            url.push_str("&levels=");
            url.push_str(levels);
        }

        let records: Vec<SubjectRecord> = self.fetch_all_pages(url).await?;

        let mut subjects = Vec::new();
        for record in records {
            let Some(characters) = record.data.characters.filter(|c| !c.is_empty()) else {
                continue;
            };

            let mut meanings: Vec<String> = record
                .data
                .meanings
                .into_iter()
                .filter(|m| m.accepted_answer)
                .map(|m| m.meaning)
                .collect();
            meanings.extend(
                record
                    .data
                    .auxiliary_meanings
                    .into_iter()
                    .filter(|m| m.kind == "whitelist")
                    .map(|m| m.meaning),
            );

            subjects.push(VocabularySubject {
                id: record.id,
                characters,
                meanings,
                study_material_id: None,
                synonyms: Vec::new(),
                definitions: Vec::new(),
                needs_update: false,
            });
        }

        tracing::info!(count = subjects.len(), "fetched vocabulary subjects");
        Ok(subjects)
    }

    /// Fetch all study materials and key them by subject id, so attaching
    /// them to subjects is a single map lookup per subject.
    pub async fn fetch_study_materials(&self) -> Result<HashMap<u64, StudyMaterial>, ApiError> {
        let url = format!("{}/study_materials", self.base_url);
        let records: Vec<StudyMaterialRecord> = self.fetch_all_pages(url).await?;

        let mut by_subject = HashMap::new();
        for record in records {
            by_subject.insert(
                record.data.subject_id,
                StudyMaterial {
                    id: record.id,
                    subject_id: record.data.subject_id,
                    meaning_synonyms: record.data.meaning_synonyms,
                },
            );
        }

        tracing::info!(count = by_subject.len(), "fetched study materials");
        Ok(by_subject)
    }

    /// Write one subject's synonym list: POST to create a study material,
    /// PUT to update an existing one.
    pub async fn push_synonyms(
        &self,
        subject: &VocabularySubject,
    ) -> Result<PushOutcome, ApiError> {
        let body = json!({
            "subject_id": subject.id,
            "meaning_synonyms": subject.synonyms,
        });

        let request = match subject.study_material_id {
            Some(id) => ApiRequest {
                method: Method::Put,
                url: format!("{}/study_materials/{id}", self.base_url),
                body: Some(body),
            },
            None => ApiRequest {
                method: Method::Post,
                url: format!("{}/study_materials", self.base_url),
                body: Some(body),
            },
        };

        let response = self.transport.send(&request).await?;
        Ok(PushOutcome {
            subject_id: subject.id,
            status: response.status,
            body: response.body,
        })
    }

    /// Collect every page of a listing before returning. A non-2xx status
    /// on a listing aborts the fetch.
    async fn fetch_all_pages<R: DeserializeOwned>(
        &self,
        first_url: String,
    ) -> Result<Vec<R>, ApiError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let response = self.transport.send(&ApiRequest::get(url)).await?;
            if !response.is_success() {
                return Err(ApiError::Status {
                    status: response.status,
                    body: response.body,
                });
            }

            let page: Page<R> = serde_json::from_str(&response.body)?;
            items.extend(page.data);
            next = page.pages.and_then(|p| p.next_url);
        }

        Ok(items)
    }
}
