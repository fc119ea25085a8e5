//! # Store worker
//!
//! A [`NoteStore`] is not shared. [`StoreWorker::spawn`] moves it onto a
//! dedicated thread and every operation becomes a job on a single-consumer
//! queue, so mutations (and the file writes behind them) run one at a time
//! in submission order no matter how many callers there are.
//!
//! Each job answers on its own channel. Callers get a [`Pending`] they can
//! block on (`wait`) or poll (`try_take`) from an event loop.
//!
//! The owning [`StoreHandle`] stops the worker with an explicit shutdown
//! message, so outstanding [`StoreClient`] clones never keep it alive. Jobs
//! queued before the shutdown still run; later ones fail with
//! `StickiesError::Worker`.
//!
//! ```text
//!   client ─┐                 ┌──────────── worker thread ────────────┐
//!   client ─┼─ jobs (mpsc) ──▶│ job(&mut NoteStore) ─▶ reply (mpsc)   │
//!   client ─┘                 └───────────────────────────────────────┘
//! ```

use crate::error::{Result, StickiesError};
use crate::model::{Note, NoteId};
use crate::query::NoteQuery;
use crate::store::{NoteBackend, NoteStore};
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

type Job<B> = Box<dyn FnOnce(&mut NoteStore<B>) + Send>;

enum Message<B: NoteBackend> {
    Job(Job<B>),
    Shutdown,
}

/// Result of a queued operation, delivered once the worker gets to it.
#[must_use = "a pending result does nothing unless waited on or polled"]
pub struct Pending<T> {
    reply: Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// Blocks until the worker has run the job.
    pub fn wait(self) -> Result<T> {
        self.reply.recv().unwrap_or_else(|_| Err(worker_gone()))
    }

    /// Returns the result if the job has finished, `None` while it is queued.
    pub fn try_take(&self) -> Option<Result<T>> {
        match self.reply.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_gone())),
        }
    }
}

fn worker_gone() -> StickiesError {
    StickiesError::Worker("store worker stopped".to_string())
}

/// Cheap, cloneable sender side of the queue.
pub struct StoreClient<B: NoteBackend> {
    jobs: Sender<Message<B>>,
}

impl<B: NoteBackend> Clone for StoreClient<B> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<B: NoteBackend + 'static> StoreClient<B> {
    /// Queues an arbitrary operation on the store.
    pub fn submit<T, F>(&self, op: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut NoteStore<B>) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let job: Job<B> = Box::new(move |store| {
            // The caller may have dropped its Pending; nobody to tell then.
            let _ = tx.send(op(store));
        });
        if self.jobs.send(Message::Job(job)).is_err() {
            // The worker is gone; rx disconnects and reports it on wait.
            debug!("job submitted after store worker stopped");
        }
        Pending { reply: rx }
    }

    pub fn load(&self) -> Pending<usize> {
        self.submit(|store| store.load())
    }

    pub fn append(&self, text: impl Into<String>) -> Pending<Option<Note>> {
        let text = text.into();
        self.submit(move |store| store.append(&text))
    }

    pub fn update(&self, id: NoteId, text: impl Into<String>) -> Pending<Note> {
        let text = text.into();
        self.submit(move |store| store.update(&id, &text))
    }

    pub fn delete(&self, id: NoteId) -> Pending<Option<Note>> {
        self.submit(move |store| store.delete(&id))
    }

    pub fn clear(&self) -> Pending<usize> {
        self.submit(|store| store.clear())
    }

    pub fn persist(&self) -> Pending<()> {
        self.submit(|store| store.persist())
    }

    pub fn replace_all(&self, raw: impl Into<String>) -> Pending<usize> {
        let raw = raw.into();
        self.submit(move |store| store.replace_all(&raw))
    }

    pub fn import(&self, path: impl Into<PathBuf>) -> Pending<usize> {
        let path = path.into();
        self.submit(move |store| store.import(&path))
    }

    /// Copy of every note in storage order.
    pub fn snapshot(&self) -> Pending<Vec<Note>> {
        self.submit(|store| Ok(store.notes().to_vec()))
    }

    pub fn project(&self, query: NoteQuery) -> Pending<Vec<Note>> {
        self.submit(move |store| Ok(query.project(store.notes())))
    }
}

/// Owning handle: dropping it (or calling [`StoreHandle::shutdown`]) runs the
/// jobs already queued and stops the worker, whether or not clients remain.
pub struct StoreHandle<B: NoteBackend> {
    client: StoreClient<B>,
    thread: Option<JoinHandle<NoteStore<B>>>,
}

pub struct StoreWorker;

impl StoreWorker {
    pub fn spawn<B: NoteBackend + 'static>(mut store: NoteStore<B>) -> Result<StoreHandle<B>> {
        let (tx, rx) = mpsc::channel::<Message<B>>();
        let thread = thread::Builder::new()
            .name("stickies-store".to_string())
            .spawn(move || {
                for message in rx {
                    match message {
                        Message::Job(job) => job(&mut store),
                        Message::Shutdown => break,
                    }
                }
                debug!("store worker drained");
                store
            })?;

        Ok(StoreHandle {
            client: StoreClient { jobs: tx },
            thread: Some(thread),
        })
    }
}

impl<B: NoteBackend> StoreHandle<B> {
    pub fn client(&self) -> StoreClient<B> {
        self.client.clone()
    }

    /// Queues the stop message behind every job sent so far. A worker that
    /// already exited has nothing left to stop.
    fn request_stop(&self) {
        if self.client.jobs.send(Message::Shutdown).is_err() {
            debug!("store worker already stopped");
        }
    }

    /// Finishes every queued job, stops the worker and hands the store back.
    pub fn shutdown(mut self) -> Result<NoteStore<B>> {
        self.request_stop();
        let thread = self.thread.take().ok_or_else(worker_gone)?;
        thread.join().map_err(|_| {
            error!("store worker panicked");
            StickiesError::Worker("store worker panicked".to_string())
        })
    }
}

impl<B: NoteBackend> Deref for StoreHandle<B> {
    type Target = StoreClient<B>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl<B: NoteBackend> Drop for StoreHandle<B> {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.request_stop();
            let _ = thread.join();
        }
    }
}
