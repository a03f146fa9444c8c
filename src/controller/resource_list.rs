use log::{debug, warn};

use super::{Completion, FetchKey, ProjectContext, Purpose, Request, Ticket};
use crate::api::{self, Method};
use crate::model::{FormError, FormInput, FormValues, ListRecord};

/// Held list of one project-scoped sub-resource.
///
/// `load` replaces the list with the server's (in server order). `add` posts
/// the draft and, once the post succeeds, clears the draft and reloads; the
/// post's response body is not merged. Any failure keeps the last good list
/// and records an error message until the next success.
#[derive(Debug)]
pub struct ResourceList<T> {
    ctx: ProjectContext,
    items: Vec<T>,
    loaded: bool,
    error: Option<String>,
    pending_load: Option<u64>,
    pending_add: Option<u64>,
    draft: FormValues,
}

impl<T: ListRecord> ResourceList<T> {
    pub fn new(ctx: ProjectContext) -> Self {
        ResourceList {
            ctx,
            items: Vec::new(),
            loaded: false,
            error: None,
            pending_load: None,
            pending_add: None,
            draft: FormValues::blank(T::Input::FIELDS),
        }
    }

    pub fn context(&self) -> &ProjectContext {
        &self.ctx
    }

    pub fn key(&self) -> FetchKey {
        FetchKey::resource(&self.ctx.id, T::RESOURCE)
    }

    fn path(&self) -> String {
        api::resource_path(&self.ctx.id, T::RESOURCE)
    }

    pub fn load(&mut self) -> Request {
        let ticket = Ticket::new(self.key(), Purpose::Load);
        self.pending_load = Some(ticket.seq);
        debug!("load {} seq={}", self.path(), ticket.seq);
        Request::get(ticket, self.path())
    }

    /// Post a typed payload.
    pub fn add(&mut self, input: &T::Input) -> Result<Request, FormError> {
        let ticket = Ticket::new(self.key(), Purpose::Add);
        let seq = ticket.seq;
        let request = Request::with_body(ticket, Method::Post, self.path(), input)?;
        self.pending_add = Some(seq);
        debug!("add {} seq={}", self.path(), seq);
        Ok(request)
    }

    /// Build the payload from the current draft and post it. Nothing is sent
    /// when the draft does not convert.
    pub fn submit(&mut self) -> Result<Request, FormError> {
        let input = T::Input::from_form(&self.draft)
            .inspect_err(|e| warn!("{} form rejected: {}", T::RESOURCE.segment(), e))?;
        self.add(&input)
    }

    pub fn apply(&mut self, completion: Completion) -> Option<Request> {
        if completion.ticket.key != self.key() {
            debug!(
                "drop completion for {:?} (panel holds {:?})",
                completion.ticket.key,
                self.key()
            );
            return None;
        }
        let seq = completion.ticket.seq;
        match completion.ticket.purpose {
            Purpose::Load => {
                if self.pending_load != Some(seq) {
                    debug!("drop superseded load seq={}", seq);
                    return None;
                }
                self.pending_load = None;
                self.loaded = true;
                let path = self.path();
                match completion.result.and_then(|body| api::decode::<Vec<T>>(&path, body)) {
                    Ok(items) => {
                        self.items = items;
                        self.error = None;
                    }
                    Err(e) => {
                        warn!("load {} failed: {}", path, e);
                        self.error = Some(e.to_string());
                    }
                }
                None
            }
            Purpose::Add => {
                if self.pending_add != Some(seq) {
                    return None;
                }
                self.pending_add = None;
                match completion.result {
                    Ok(_) => {
                        self.draft = FormValues::blank(T::Input::FIELDS);
                        self.error = None;
                        Some(self.load())
                    }
                    Err(e) => {
                        warn!("add to {} failed: {}", self.path(), e);
                        self.error = Some(e.to_string());
                        None
                    }
                }
            }
            Purpose::Save => None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// True until the first load completes, successfully or not.
    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn is_busy(&self) -> bool {
        self.pending_load.is_some() || self.pending_add.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &FormValues {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FormValues {
        &mut self.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Backend, MemoryBackend};
    use crate::model::{Meeting, Risk, Stakeholder};
    use pretty_assertions::assert_eq;

    fn setup() -> (MemoryBackend, ProjectContext) {
        let backend = MemoryBackend::new();
        let id = backend.seed_project("Atlas");
        let ctx = ProjectContext {
            id: id.into(),
            name: "Atlas".into(),
        };
        (backend, ctx)
    }

    /// Execute a request and every follow-up it triggers.
    fn settle<T: ListRecord>(list: &mut ResourceList<T>, backend: &dyn Backend, request: Request) {
        let mut next = Some(request);
        while let Some(request) = next {
            next = list.apply(request.execute(backend));
        }
    }

    #[test]
    fn load_replaces_list_in_server_order() {
        let (backend, ctx) = setup();
        let path = api::resource_path(&ctx.id, crate::model::Resource::Stakeholders);
        for name in ["Ann", "Ben"] {
            backend
                .send(Method::Post, &path, Some(&serde_json::json!({ "name": name })))
                .unwrap();
        }
        let mut list = ResourceList::<Stakeholder>::new(ctx);
        assert!(list.is_loading());
        let request = list.load();
        settle(&mut list, &backend, request);
        assert!(!list.is_loading());
        let names: Vec<&str> = list.items().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Ben"]);
    }

    #[test]
    fn add_reloads_and_matches_independent_load() {
        let (backend, ctx) = setup();
        let mut list = ResourceList::<Risk>::new(ctx.clone());
        let request = list.load();
        settle(&mut list, &backend, request);

        list.draft_mut().set("title", "Vendor delay");
        list.draft_mut().set("probability", "2");
        list.draft_mut().set("impact", "5");
        let request = list.submit().unwrap();
        assert_eq!(request.body.as_ref().unwrap()["probability"], 2);
        settle(&mut list, &backend, request);

        let mut fresh = ResourceList::<Risk>::new(ctx);
        let request = fresh.load();
        settle(&mut fresh, &backend, request);
        assert_eq!(list.items(), fresh.items());
        assert_eq!(list.items()[0].exposure.as_ref().unwrap().to_string(), "10");
        // Draft cleared only after success
        assert_eq!(list.draft().text("title"), "");
    }

    #[test]
    fn failed_load_keeps_stale_list_and_flags_error() {
        let (backend, ctx) = setup();
        let path = api::resource_path(&ctx.id, crate::model::Resource::Stakeholders);
        backend
            .send(Method::Post, &path, Some(&serde_json::json!({ "name": "Ann" })))
            .unwrap();
        let mut list = ResourceList::<Stakeholder>::new(ctx);
        let request = list.load();
        settle(&mut list, &backend, request);

        backend.fail_path(&path);
        let request = list.load();
        settle(&mut list, &backend, request);
        assert_eq!(list.items().len(), 1);
        assert!(list.error().unwrap().contains("500"));

        backend.recover(&path);
        let request = list.load();
        settle(&mut list, &backend, request);
        assert_eq!(list.error(), None);
    }

    #[test]
    fn failed_add_keeps_draft() {
        let (backend, ctx) = setup();
        let path = api::resource_path(&ctx.id, crate::model::Resource::Meetings);
        let mut list = ResourceList::<Meeting>::new(ctx);
        list.draft_mut().set("type", "status");
        backend.fail_path(&path);
        let request = list.submit().unwrap();
        settle(&mut list, &backend, request);
        assert_eq!(list.draft().text("type"), "status");
        assert!(list.error().is_some());
        assert!(list.items().is_empty());
    }

    #[test]
    fn superseded_load_is_dropped() {
        let (backend, ctx) = setup();
        let mut list = ResourceList::<Risk>::new(ctx.clone());
        let first = list.load();
        let first_done = first.execute(&backend);

        backend
            .send(
                Method::Post,
                &api::resource_path(&ctx.id, crate::model::Resource::Risks),
                Some(&serde_json::json!({"title": "late", "probability": 1, "impact": 1})),
            )
            .unwrap();
        let second = list.load();
        list.apply(second.execute(&backend));
        assert_eq!(list.items().len(), 1);

        // The earlier response lands last and must not overwrite.
        list.apply(first_done);
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn completion_for_other_project_is_ignored() {
        let (backend, ctx) = setup();
        let other_id = backend.seed_project("Zephyr");
        let mut other = ResourceList::<Risk>::new(ProjectContext {
            id: other_id.into(),
            name: "Zephyr".into(),
        });
        let foreign = other.load().execute(&backend);

        let mut list = ResourceList::<Risk>::new(ctx);
        let _ = list.load();
        assert!(list.apply(foreign).is_none());
        assert!(list.is_loading());
    }

    #[test]
    fn invalid_draft_sends_nothing() {
        let (_backend, ctx) = setup();
        let mut list = ResourceList::<Risk>::new(ctx);
        list.draft_mut().set("probability", "seven");
        assert!(list.submit().is_err());
        assert!(!list.is_busy());
    }
}
