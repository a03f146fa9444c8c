//! In-process [`Backend`] that behaves like the REST server: it assigns ids,
//! computes risk exposure, sets change decisions and keeps every list in
//! insertion order. Used by the test suites and for exercising the client
//! without a server.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value, json};

use super::{ApiError, Backend, Method};
use crate::model::Resource;

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    projects: Vec<Value>,
    /// Keyed by (project id text, resource segment)
    lists: HashMap<(String, &'static str), Vec<Value>>,
    charters: HashMap<String, Value>,
    /// Paths that answer 500 until cleared
    failing: HashSet<String>,
    /// Every request seen, as `"METHOD path"`
    log: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every request to `path` fail with a 500 until [`Self::recover`].
    pub fn fail_path(&self, path: &str) {
        self.state().failing.insert(path.to_string());
    }

    pub fn recover(&self, path: &str) {
        self.state().failing.remove(path);
    }

    /// Requests received so far, as `"METHOD path"`.
    pub fn requests(&self) -> Vec<String> {
        self.state().log.clone()
    }

    /// Insert a project directly, returning its id.
    pub fn seed_project(&self, name: &str) -> u64 {
        let mut state = self.state();
        create_project(&mut state, json!({ "name": name }))
    }
}

impl Backend for MemoryBackend {
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let mut state = self.state();
        state.log.push(format!("{method} {path}"));

        let status = |status: u16, message: &str| ApiError::Status {
            method,
            path: path.to_string(),
            status,
            body: message.to_string(),
        };

        if state.failing.contains(path) {
            return Err(status(500, "internal server error"));
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method, segments.as_slice()) {
            (Method::Get, ["projects"]) => Ok(Value::Array(state.projects.clone())),
            (Method::Post, ["projects"]) => {
                let body = body.cloned().unwrap_or(Value::Null);
                if body.get("name").and_then(Value::as_str).unwrap_or("").is_empty() {
                    return Err(status(422, "name is required"));
                }
                let id = create_project(&mut state, body);
                Ok(find_project(&state, &id.to_string())
                    .cloned()
                    .unwrap_or(Value::Null))
            }
            (_, ["projects", project_id, segment]) => {
                let project_id = project_id.to_string();
                if find_project(&state, &project_id).is_none() {
                    return Err(status(404, "project not found"));
                }
                let Some(resource) = Resource::from_segment(segment) else {
                    return Err(status(404, "not found"));
                };
                match (method, resource) {
                    (Method::Get, Resource::Charter) => Ok(state
                        .charters
                        .get(&project_id)
                        .cloned()
                        .unwrap_or_else(empty_charter)),
                    (Method::Put, Resource::Charter) => {
                        let charter = body.cloned().unwrap_or_else(empty_charter);
                        state.charters.insert(project_id, charter.clone());
                        Ok(charter)
                    }
                    (Method::Get, _) => Ok(Value::Array(
                        state
                            .lists
                            .get(&(project_id, resource.segment()))
                            .cloned()
                            .unwrap_or_default(),
                    )),
                    (Method::Post, _) => {
                        let record = create_record(&mut state, resource, body);
                        state
                            .lists
                            .entry((project_id, resource.segment()))
                            .or_default()
                            .push(record.clone());
                        Ok(record)
                    }
                    _ => Err(status(405, "method not allowed")),
                }
            }
            _ => Err(status(404, "not found")),
        }
    }
}

fn next_id(state: &mut State) -> u64 {
    state.next_id += 1;
    state.next_id
}

fn create_project(state: &mut State, body: Value) -> u64 {
    let id = next_id(state);
    let mut record = into_object(body);
    record.insert("id".into(), json!(id));
    record.entry("status").or_insert(json!("initiating"));
    state.projects.push(Value::Object(record));
    id
}

fn find_project<'a>(state: &'a State, id: &str) -> Option<&'a Value> {
    state
        .projects
        .iter()
        .find(|p| p.get("id").map(id_text).as_deref() == Some(id))
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn create_record(state: &mut State, resource: Resource, body: Option<&Value>) -> Value {
    let id = next_id(state);
    let mut record = into_object(body.cloned().unwrap_or(Value::Null));
    record.insert("id".into(), json!(id));
    match resource {
        Resource::Risks => {
            let p = record.get("probability").and_then(Value::as_i64).unwrap_or(0);
            let i = record.get("impact").and_then(Value::as_i64).unwrap_or(0);
            record.insert("exposure".into(), json!(p * i));
        }
        Resource::Changes => {
            record.insert("decision".into(), json!("pending"));
        }
        Resource::Tasks => {
            let empty = record
                .get("status")
                .and_then(Value::as_str)
                .is_none_or(str::is_empty);
            if empty {
                record.insert("status".into(), json!("todo"));
            }
        }
        _ => {}
    }
    Value::Object(record)
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn empty_charter() -> Value {
    json!({
        "business_need": "",
        "product_description": "",
        "goals": [],
        "constraints": {},
        "approvers": [],
        "signed_off": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risks_get_server_exposure() {
        let backend = MemoryBackend::new();
        let id = backend.seed_project("Atlas");
        let path = format!("/projects/{id}/risks");
        let created = backend
            .send(
                Method::Post,
                &path,
                Some(&json!({"title": "Vendor delay", "probability": 2, "impact": 5})),
            )
            .unwrap();
        assert_eq!(created["exposure"], 10);
        let list = backend.send(Method::Get, &path, None).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[test]
    fn unknown_project_is_404() {
        let backend = MemoryBackend::new();
        let err = backend.send(Method::Get, "/projects/99/risks", None).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[test]
    fn charter_defaults_then_replaces() {
        let backend = MemoryBackend::new();
        let id = backend.seed_project("Atlas");
        let path = format!("/projects/{id}/charter");
        let charter = backend.send(Method::Get, &path, None).unwrap();
        assert_eq!(charter["signed_off"], false);
        backend
            .send(Method::Put, &path, Some(&json!({"goals": ["Ship v1"]})))
            .unwrap();
        let charter = backend.send(Method::Get, &path, None).unwrap();
        assert_eq!(charter, json!({"goals": ["Ship v1"]}));
    }

    #[test]
    fn failing_path_answers_500_until_recovered() {
        let backend = MemoryBackend::new();
        backend.fail_path("/projects");
        assert!(backend.send(Method::Get, "/projects", None).is_err());
        backend.recover("/projects");
        assert_eq!(
            backend.send(Method::Get, "/projects", None).unwrap(),
            json!([])
        );
        assert_eq!(backend.requests(), vec!["GET /projects", "GET /projects"]);
    }

    #[test]
    fn project_name_is_required() {
        let backend = MemoryBackend::new();
        let err = backend
            .send(Method::Post, "/projects", Some(&json!({"name": ""})))
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 422, .. }));
    }
}
