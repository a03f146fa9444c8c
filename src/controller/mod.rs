//! UI-state controllers.
//!
//! Controllers never perform I/O. Every operation returns [`Request`]s that an
//! executor (see [`dispatch`]) runs against a [`Backend`]; the resulting
//! [`Completion`]s are fed back through `apply`. A completion whose ticket no
//! longer matches the controller's current fetch key or latest sequence
//! number is dropped, so a late answer for a previously active project never
//! overwrites the current one.

pub mod charter;
pub mod dispatch;
pub mod panel;
pub mod resource_list;
pub mod router;
pub mod shell;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiError, Backend, Method};
use crate::model::{FormError, Project, RecordId, Resource};

/// The active project as seen by a mounted panel. Fixed for the panel's
/// lifetime; a different project means a fresh panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub id: RecordId,
    pub name: String,
}

impl From<&Project> for ProjectContext {
    fn from(project: &Project) -> Self {
        ProjectContext {
            id: project.id.clone(),
            name: project.name.clone(),
        }
    }
}

/// What a request is about: the project list, or one project's sub-resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    Projects,
    Resource {
        project_id: RecordId,
        resource: Resource,
    },
}

impl FetchKey {
    pub fn resource(project_id: &RecordId, resource: Resource) -> Self {
        FetchKey::Resource {
            project_id: project_id.clone(),
            resource,
        }
    }

    pub fn project_id(&self) -> Option<&RecordId> {
        match self {
            FetchKey::Projects => None,
            FetchKey::Resource { project_id, .. } => Some(project_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Load,
    Add,
    Save,
}

/// Identity of one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub key: FetchKey,
    /// Process-unique, increasing
    pub seq: u64,
    pub purpose: Purpose,
}

static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

impl Ticket {
    pub fn new(key: FetchKey, purpose: Purpose) -> Self {
        Ticket {
            key,
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
            purpose,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub ticket: Ticket,
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(ticket: Ticket, path: String) -> Self {
        Request {
            ticket,
            method: Method::Get,
            path,
            body: None,
        }
    }

    /// A request carrying a serialized payload.
    pub fn with_body<T: Serialize>(
        ticket: Ticket,
        method: Method,
        path: String,
        payload: &T,
    ) -> Result<Self, FormError> {
        Ok(Request {
            ticket,
            method,
            path,
            body: Some(serde_json::to_value(payload)?),
        })
    }

    /// Run this request to completion on the calling thread.
    pub fn execute(&self, backend: &dyn Backend) -> Completion {
        Completion {
            ticket: self.ticket.clone(),
            result: backend.send(self.method, &self.path, self.body.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub ticket: Ticket,
    pub result: Result<Value, ApiError>,
}

/// Work produced by a state change: fetch keys whose in-flight requests are
/// now irrelevant, and new requests to issue.
#[derive(Debug, Default)]
pub struct Effects {
    pub cancel: Vec<FetchKey>,
    pub requests: Vec<Request>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn request(request: Request) -> Self {
        Effects {
            cancel: Vec::new(),
            requests: vec![request],
        }
    }

    pub fn extend(&mut self, other: Effects) {
        self.cancel.extend(other.cancel);
        self.requests.extend(other.requests);
    }

    pub fn is_empty(&self) -> bool {
        self.cancel.is_empty() && self.requests.is_empty()
    }
}

impl From<Option<Request>> for Effects {
    fn from(request: Option<Request>) -> Self {
        match request {
            Some(r) => Effects::request(r),
            None => Effects::none(),
        }
    }
}
