//! Test doubles shared across feature tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::Utc;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::models::{
    IssueFilter, IssueReport, IssueStatusUpdate, NewIssueReport,
};
use crate::features::issues::store::{IssueStore, StoreError};
use crate::modules::storage::{MediaStorage, StorageError};
use crate::shared::llm::{LanguageModel, LlmError};

// =============================================================================
// LANGUAGE MODEL
// =============================================================================

/// `LanguageModel` that replays queued responses in order and records every
/// prompt pair it receives. An empty queue behaves like a failed call.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, text: &str) -> Self {
        self.push(Ok(text.to_string()));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.push(Err(message.to_string()));
        self
    }

    fn push(&self, response: Result<String, String>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// (system prompt, user prompt) for each call so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Inference(message)),
            None => Err(LlmError::Inference("no scripted response".to_string())),
        }
    }
}

// =============================================================================
// ISSUE STORE
// =============================================================================

/// In-memory `IssueStore` that counts insert calls.
#[derive(Default)]
pub struct InMemoryIssueStore {
    reports: Mutex<Vec<IssueReport>>,
    writes: AtomicUsize,
    deny_writes: bool,
}

impl InMemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose inserts fail as a permission error
    pub fn denying_writes() -> Self {
        Self {
            deny_writes: true,
            ..Default::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reports(&self) -> Vec<IssueReport> {
        self.reports.lock().unwrap().clone()
    }
}

fn matches_filter(filter: &IssueFilter, report: &IssueReport) -> bool {
    let status_ok = filter.status.is_none_or(|s| s == report.status);
    let urgency_ok = filter.urgency.is_none_or(|u| {
        report
            .ai_urgency_assessment
            .as_ref()
            .is_some_and(|a| a.urgency == u)
    });
    let category_ok = filter.category.as_ref().is_none_or(|c| {
        report.category_manual.as_ref() == Some(c)
            || report
                .ai_classification
                .as_ref()
                .is_some_and(|ai| &ai.category == c)
    });
    let reporter_ok = filter
        .reported_by_id
        .as_ref()
        .is_none_or(|r| &report.reported_by_id == r);

    status_ok && urgency_ok && category_ok && reporter_ok
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    async fn insert(&self, report: NewIssueReport) -> Result<IssueReport, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.deny_writes {
            return Err(StoreError::PermissionDenied(
                "permission denied for table issue_reports".to_string(),
            ));
        }

        let stored = IssueReport {
            id: Uuid::new_v4(),
            title: report.title,
            description: report.description,
            location: report.location,
            category_manual: report.category_manual,
            ai_classification: report.ai_classification,
            ai_urgency_assessment: report.ai_urgency_assessment,
            ai_summary: report.ai_summary,
            media_urls: report.media_urls,
            status: report.status,
            reported_by_id: report.reported_by_id,
            date_reported: report.date_reported,
            created_at: Utc::now(),
            status_updated_at: None,
            status_updated_by: None,
            status_note: None,
        };
        self.reports.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<Option<IssueReport>, StoreError> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(
        &self,
        filter: &IssueFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<IssueReport>, i64), StoreError> {
        let reports = self.reports.lock().unwrap();
        // Newest first: later inserts sit at the end of the vec
        let matching: Vec<IssueReport> = reports
            .iter()
            .rev()
            .filter(|r| matches_filter(filter, r))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn update_status(
        &self,
        id: Uuid,
        update: &IssueStatusUpdate,
    ) -> Result<Option<IssueReport>, StoreError> {
        let mut reports = self.reports.lock().unwrap();
        let Some(report) = reports
            .iter_mut()
            .find(|r| r.id == id && r.status == update.from)
        else {
            return Ok(None);
        };

        report.status = update.to;
        report.status_updated_at = Some(Utc::now());
        report.status_updated_by = Some(update.updated_by.clone());
        report.status_note = update.note.clone();
        Ok(Some(report.clone()))
    }
}

// =============================================================================
// AUTH
// =============================================================================

pub fn create_citizen_user(sub: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.to_string(),
        name: None,
        roles: vec![],
    }
}

pub fn create_official_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "official-1".to_string(),
        name: Some("Test Official".to_string()),
        roles: vec!["official".to_string()],
    }
}

/// Layer that injects `user` as if the auth middleware had validated a token
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    let user = Arc::new(user);
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert((*user).clone());
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

// =============================================================================
// MEDIA STORAGE
// =============================================================================

/// `MediaStorage` that keeps object keys in memory and serves them from
/// `https://media.test/`.
#[derive(Default)]
pub struct InMemoryMediaStorage {
    keys: Mutex<Vec<String>>,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn put(
        &self,
        key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(format!("https://media.test/{}", key))
    }
}
