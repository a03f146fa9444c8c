//! Running requests.
//!
//! The event loop stays single-threaded: [`Dispatcher`] runs each request on
//! a worker thread and hands completions back over a channel, drained with
//! `poll` once per tick. Cancelling a fetch key flips the token shared by its
//! in-flight requests; their results are discarded when they arrive.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

use log::{debug, error, trace};

use super::shell::Shell;
use super::{Completion, Effects, FetchKey};
use crate::api::Backend;

/// Something that runs [`Effects`] and reports what finished.
pub trait Executor {
    /// Cancel, then start, the work described by `effects`.
    fn execute(&mut self, effects: Effects);
    /// Completions that arrived since the last call. Never blocks.
    fn poll(&mut self) -> Vec<Completion>;
    /// Like `poll`, but blocks until at least one completion is available
    /// while anything is in flight.
    fn wait(&mut self) -> Vec<Completion>;
    fn is_idle(&self) -> bool;
}

struct Finished {
    completion: Completion,
    cancelled: bool,
}

/// Thread-per-request executor.
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<Finished>,
    rx: mpsc::Receiver<Finished>,
    tokens: HashMap<FetchKey, Arc<AtomicBool>>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Dispatcher {
            backend,
            tx,
            rx,
            tokens: HashMap::new(),
            in_flight: 0,
        }
    }

    fn cancel(&mut self, key: &FetchKey) {
        if let Some(token) = self.tokens.remove(key) {
            debug!("cancel {:?}", key);
            token.store(true, Ordering::SeqCst);
        }
    }

    fn received(&mut self, finished: Finished) -> Option<Completion> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let ticket = &finished.completion.ticket;
        if finished.cancelled {
            debug!("discard cancelled {:?} seq={}", ticket.key, ticket.seq);
            return None;
        }
        trace!("completed {:?} seq={}", ticket.key, ticket.seq);
        Some(finished.completion)
    }
}

impl Executor for Dispatcher {
    fn execute(&mut self, effects: Effects) {
        for key in &effects.cancel {
            self.cancel(key);
        }
        for request in effects.requests {
            let token = self
                .tokens
                .entry(request.ticket.key.clone())
                .or_insert_with(|| Arc::new(AtomicBool::new(false)))
                .clone();
            let backend = Arc::clone(&self.backend);
            let tx = self.tx.clone();
            debug!(
                "{} {} seq={}",
                request.method, request.path, request.ticket.seq
            );
            let spawned = thread::Builder::new()
                .name(format!("pb-request-{}", request.ticket.seq))
                .spawn(move || {
                    let completion = request.execute(backend.as_ref());
                    let cancelled = token.load(Ordering::SeqCst);
                    // The receiver is gone once the app has shut down.
                    let _ = tx.send(Finished {
                        completion,
                        cancelled,
                    });
                });
            match spawned {
                Ok(_) => self.in_flight += 1,
                Err(e) => error!("could not start request thread: {}", e),
            }
        }
    }

    fn poll(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        while let Ok(finished) = self.rx.try_recv() {
            done.extend(self.received(finished));
        }
        done
    }

    fn wait(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        while done.is_empty() && self.in_flight > 0 {
            match self.rx.recv() {
                Ok(finished) => done.extend(self.received(finished)),
                Err(_) => break,
            }
        }
        done.extend(self.poll());
        done
    }

    fn is_idle(&self) -> bool {
        self.in_flight == 0
    }
}

/// Runs every request on the calling thread as soon as it is issued.
/// Used by the CLI and by tests.
pub struct Inline {
    backend: Arc<dyn Backend>,
    done: VecDeque<Completion>,
}

impl Inline {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Inline {
            backend,
            done: VecDeque::new(),
        }
    }
}

impl Executor for Inline {
    fn execute(&mut self, effects: Effects) {
        if !effects.cancel.is_empty() {
            self.done
                .retain(|c| !effects.cancel.contains(&c.ticket.key));
        }
        for request in effects.requests {
            debug!("{} {} seq={}", request.method, request.path, request.ticket.seq);
            self.done.push_back(request.execute(self.backend.as_ref()));
        }
    }

    fn poll(&mut self) -> Vec<Completion> {
        self.done.drain(..).collect()
    }

    fn wait(&mut self) -> Vec<Completion> {
        self.poll()
    }

    fn is_idle(&self) -> bool {
        self.done.is_empty()
    }
}

/// Feed completions into the shell until nothing is left in flight.
pub fn run_until_idle(shell: &mut Shell, executor: &mut dyn Executor) {
    loop {
        let completions = executor.wait();
        if completions.is_empty() && executor.is_idle() {
            break;
        }
        for completion in completions {
            let effects = shell.apply(completion);
            executor.execute(effects);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Condvar, Mutex};

    use serde_json::Value;

    use super::*;
    use crate::api::{ApiError, Method, MemoryBackend};
    use crate::controller::{Purpose, Request, Ticket};
    use crate::model::{RecordId, Resource};

    /// Backend that holds every request until released.
    struct Gate {
        inner: MemoryBackend,
        open: Mutex<bool>,
        cv: Condvar,
    }

    impl Gate {
        fn new(inner: MemoryBackend) -> Self {
            Gate {
                inner,
                open: Mutex::new(false),
                cv: Condvar::new(),
            }
        }

        fn release(&self) {
            *self.open.lock().unwrap() = true;
            self.cv.notify_all();
        }
    }

    impl Backend for Gate {
        fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
            let mut open = self.open.lock().unwrap();
            while !*open {
                open = self.cv.wait(open).unwrap();
            }
            drop(open);
            self.inner.send(method, path, body)
        }
    }

    fn risks_request(id: u64) -> Request {
        let key = FetchKey::resource(&RecordId::from(id), Resource::Risks);
        Request::get(Ticket::new(key, Purpose::Load), format!("/projects/{id}/risks"))
    }

    #[test]
    fn dispatcher_delivers_completions() {
        let backend = MemoryBackend::new();
        let id = backend.seed_project("Atlas");
        let mut dispatcher = Dispatcher::new(Arc::new(backend));
        dispatcher.execute(Effects::request(risks_request(id)));
        assert!(!dispatcher.is_idle());
        let done = dispatcher.wait();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].result, Ok(Value::Array(vec![])));
        assert!(dispatcher.is_idle());
    }

    #[test]
    fn cancelled_key_is_discarded() {
        let inner = MemoryBackend::new();
        let atlas = inner.seed_project("Atlas");
        let zephyr = inner.seed_project("Zephyr");
        let gate = Arc::new(Gate::new(inner));
        let mut dispatcher = Dispatcher::new(gate.clone());

        let stale = risks_request(atlas);
        let stale_key = stale.ticket.key.clone();
        dispatcher.execute(Effects::request(stale));
        dispatcher.execute(Effects {
            cancel: vec![stale_key],
            requests: vec![risks_request(zephyr)],
        });
        gate.release();

        let mut done = Vec::new();
        while !dispatcher.is_idle() {
            done.extend(dispatcher.wait());
        }
        assert_eq!(done.len(), 1);
        assert_eq!(
            done[0].ticket.key.project_id(),
            Some(&RecordId::from(zephyr))
        );
    }

    #[test]
    fn inline_cancel_drops_queued_completion() {
        let backend = MemoryBackend::new();
        let id = backend.seed_project("Atlas");
        let mut inline = Inline::new(Arc::new(backend));
        let request = risks_request(id);
        let key = request.ticket.key.clone();
        inline.execute(Effects::request(request));
        inline.execute(Effects {
            cancel: vec![key],
            requests: Vec::new(),
        });
        assert!(inline.is_idle());
        assert!(inline.poll().is_empty());
    }

    #[test]
    fn shell_settles_through_dispatcher() {
        let backend = MemoryBackend::new();
        backend.seed_project("Atlas");
        let mut dispatcher = Dispatcher::new(Arc::new(backend));
        let mut shell = Shell::new();
        dispatcher.execute(shell.activate());
        run_until_idle(&mut shell, &mut dispatcher);
        assert_eq!(shell.active().unwrap().name, "Atlas");
        assert_eq!(shell.panels().len(), 3);
        assert!(shell.panels().iter().all(|p| !p.is_loading()));
    }
}
