use log::{debug, warn};

use super::{Completion, FetchKey, ProjectContext, Purpose, Request, Ticket};
use crate::api::{self, Method};
use crate::model::{Charter, CharterInput, FormError, FormInput, FormValues, Resource};

/// The charter singleton of one project.
///
/// Unlike list resources, a save replaces the held charter with the PUT
/// response directly instead of reloading.
#[derive(Debug)]
pub struct CharterPanel {
    ctx: ProjectContext,
    charter: Option<Charter>,
    loaded: bool,
    error: Option<String>,
    pending_load: Option<u64>,
    pending_save: Option<u64>,
    draft: FormValues,
    /// The draft as last filled from the server; an edited draft differs
    synced: FormValues,
}

impl CharterPanel {
    pub fn new(ctx: ProjectContext) -> Self {
        CharterPanel {
            ctx,
            charter: None,
            loaded: false,
            error: None,
            pending_load: None,
            pending_save: None,
            draft: FormValues::blank(CharterInput::FIELDS),
            synced: FormValues::blank(CharterInput::FIELDS),
        }
    }

    pub fn context(&self) -> &ProjectContext {
        &self.ctx
    }

    pub fn key(&self) -> FetchKey {
        FetchKey::resource(&self.ctx.id, Resource::Charter)
    }

    fn path(&self) -> String {
        api::resource_path(&self.ctx.id, Resource::Charter)
    }

    pub fn load(&mut self) -> Request {
        let ticket = Ticket::new(self.key(), Purpose::Load);
        self.pending_load = Some(ticket.seq);
        debug!("load {} seq={}", self.path(), ticket.seq);
        Request::get(ticket, self.path())
    }

    pub fn save(&mut self, input: &CharterInput) -> Result<Request, FormError> {
        let ticket = Ticket::new(self.key(), Purpose::Save);
        let seq = ticket.seq;
        let request = Request::with_body(ticket, Method::Put, self.path(), input)?;
        self.pending_save = Some(seq);
        debug!("save {} seq={}", self.path(), seq);
        Ok(request)
    }

    /// Parse the draft and save it. A JSON field that does not parse aborts
    /// before anything is sent.
    pub fn submit(&mut self) -> Result<Request, FormError> {
        let input = CharterInput::from_form(&self.draft)
            .inspect_err(|e| warn!("charter form rejected: {}", e))?;
        self.save(&input)
    }

    pub fn apply(&mut self, completion: Completion) -> Option<Request> {
        if completion.ticket.key != self.key() {
            return None;
        }
        let seq = completion.ticket.seq;
        let pending = match completion.ticket.purpose {
            Purpose::Load => &mut self.pending_load,
            Purpose::Save => &mut self.pending_save,
            Purpose::Add => return None,
        };
        if *pending != Some(seq) {
            debug!("drop superseded charter completion seq={}", seq);
            return None;
        }
        *pending = None;
        if completion.ticket.purpose == Purpose::Load {
            self.loaded = true;
        }

        let path = self.path();
        match completion
            .result
            .and_then(|body| api::decode::<Charter>(&path, body))
        {
            Ok(charter) => {
                let form = charter.to_form();
                // A reload must not clobber edits in progress; a save
                // means the edits are now the server's
                if completion.ticket.purpose == Purpose::Save || self.draft == self.synced {
                    self.draft = form.clone();
                } else {
                    debug!("charter reloaded, keeping edited draft");
                }
                self.synced = form;
                self.charter = Some(charter);
                self.error = None;
            }
            Err(e) => {
                warn!("charter {:?} failed: {}", completion.ticket.purpose, e);
                self.error = Some(e.to_string());
            }
        }
        None
    }

    pub fn charter(&self) -> Option<&Charter> {
        self.charter.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn is_busy(&self) -> bool {
        self.pending_load.is_some() || self.pending_save.is_some()
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
