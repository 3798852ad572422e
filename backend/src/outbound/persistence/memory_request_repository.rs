//! In-memory `RequestRepository` implementation.
//!
//! Provides storage for requests, responses and attachments behind a
//! single mutex, with optimistic concurrency via version checks: an
//! update only lands when the stored version still equals the version
//! the writer read, and the surviving record's version is bumped by one.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::attachment::Attachment;
use crate::domain::filters::RequestSearchFilters;
use crate::domain::ports::{
    NewRequest, NewRequestResponse, RequestRepository, RequestRepositoryError,
};
use crate::domain::request::{Request, RequestResponse};

#[derive(Default)]
struct Store {
    requests: BTreeMap<i32, Request>,
    responses: BTreeMap<i32, RequestResponse>,
    attachments: BTreeMap<i32, Attachment>,
    next_request_id: i32,
    next_response_id: i32,
    next_attachment_id: i32,
}

impl Store {
    fn next_request_id(&mut self) -> i32 {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn next_response_id(&mut self) -> i32 {
        self.next_response_id += 1;
        self.next_response_id
    }

    fn next_attachment_id(&mut self) -> i32 {
        self.next_attachment_id += 1;
        self.next_attachment_id
    }
}

/// Mutex-guarded in-memory implementation of the request store port.
#[derive(Default)]
pub struct MemoryRequestRepository {
    inner: Mutex<Store>,
}

impl MemoryRequestRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, Store>, RequestRepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RequestRepositoryError::query("request store mutex poisoned"))
    }
}

#[async_trait]
impl RequestRepository for MemoryRequestRepository {
    async fn list(
        &self,
        filters: &RequestSearchFilters,
    ) -> Result<Vec<Request>, RequestRepositoryError> {
        let store = self.locked()?;
        let mut requests: Vec<Request> = store.requests.values().cloned().collect();
        // Newest first; id breaks same-instant ties deterministically.
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(filters.apply(requests))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Request>, RequestRepositoryError> {
        let store = self.locked()?;
        Ok(store.requests.get(&id).cloned())
    }

    async fn insert(&self, request: NewRequest) -> Result<i32, RequestRepositoryError> {
        let mut store = self.locked()?;
        let id = store.next_request_id();

        for attachment in request.attachments {
            let attachment_id = store.next_attachment_id();
            store.attachments.insert(
                attachment_id,
                Attachment {
                    id: attachment_id,
                    request_id: id,
                    file_name: attachment.file_name,
                    content_type: attachment.content_type,
                    payload: attachment.payload,
                },
            );
        }

        store.requests.insert(
            id,
            Request {
                id,
                title: request.title,
                description: request.description,
                status: request.status,
                priority: request.priority,
                created_at: request.created_at,
                updated_at: None,
                category_id: request.category_id,
                author_id: request.author_id,
                assigned_user_id: None,
                assigned_team_id: None,
                version: 1,
            },
        );

        debug!(request_id = id, "stored request");
        Ok(id)
    }

    async fn update(
        &self,
        request: &Request,
        expected_version: u32,
    ) -> Result<(), RequestRepositoryError> {
        let mut store = self.locked()?;
        let Some(current) = store.requests.get_mut(&request.id) else {
            return Err(RequestRepositoryError::NotFound { id: request.id });
        };

        if current.version != expected_version {
            return Err(RequestRepositoryError::VersionConflict {
                id: request.id,
                expected: expected_version,
            });
        }

        let mut stored = request.clone();
        stored.version = expected_version + 1;
        *current = stored;
        Ok(())
    }

    async fn insert_response(
        &self,
        response: NewRequestResponse,
    ) -> Result<i32, RequestRepositoryError> {
        let mut store = self.locked()?;
        // Foreign-key backstop: a response never outlives a missing parent.
        if !store.requests.contains_key(&response.request_id) {
            return Err(RequestRepositoryError::NotFound {
                id: response.request_id,
            });
        }

        let id = store.next_response_id();
        store.responses.insert(
            id,
            RequestResponse {
                id,
                request_id: response.request_id,
                author_id: response.author_id,
                text: response.text,
                created_at: response.created_at,
            },
        );
        Ok(id)
    }

    async fn responses_for(
        &self,
        request_id: i32,
    ) -> Result<Vec<RequestResponse>, RequestRepositoryError> {
        let store = self.locked()?;
        let mut responses: Vec<RequestResponse> = store
            .responses
            .values()
            .filter(|response| response.request_id == request_id)
            .cloned()
            .collect();
        responses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(responses)
    }

    async fn attachments_for(
        &self,
        request_id: i32,
    ) -> Result<Vec<Attachment>, RequestRepositoryError> {
        let store = self.locked()?;
        Ok(store
            .attachments
            .values()
            .filter(|attachment| attachment.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn find_attachment(
        &self,
        id: i32,
    ) -> Result<Option<Attachment>, RequestRepositoryError> {
        let store = self.locked()?;
        Ok(store.attachments.get(&id).cloned())
    }
}
