//! Test doubles for the entity store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use dashgate_core::Entity;

use crate::store::{EntityStore, InMemoryEntityStore, Query, StoreError};

/// In-memory store with switchable failures and write counters.
#[derive(Debug)]
pub struct FlakyStore<E> {
    inner: InMemoryEntityStore<E>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    creates: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    reads: AtomicUsize,
    list_stall: Mutex<Option<Duration>>,
    list_stalled: AtomicBool,
}

impl<E> FlakyStore<E> {
    pub fn new() -> Self {
        Self {
            inner: InMemoryEntityStore::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            list_stall: Mutex::new(None),
            list_stalled: AtomicBool::new(false),
        }
    }

    /// Make `get` and `list` fail with a backend error.
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    /// Make `create`, `update` and `delete` fail with a backend error.
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// The next `list` reads its result, then sleeps for `pause` before returning it.
    pub fn stall_next_list(&self, pause: Duration) {
        *self.list_stall.lock().unwrap() = Some(pause);
    }

    /// Whether a stalled `list` has already read its result.
    pub fn list_stalled(&self) -> bool {
        self.list_stalled.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Number of `get`/`list` calls, including failed ones.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn calls(&self) -> usize {
        self.creates() + self.updates() + self.deletes() + self.reads()
    }

    fn check_read(&self) -> Result<(), StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self, counter: &AtomicUsize) -> Result<(), StoreError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl<E> Default for FlakyStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> for FlakyStore<E> {
    fn create(&self, entity: E) -> Result<E, StoreError> {
        self.check_write(&self.creates)?;
        self.inner.create(entity)
    }

    fn get(&self, project: &str, name: &str) -> Result<E, StoreError> {
        self.check_read()?;
        self.inner.get(project, name)
    }

    fn update(&self, entity: E) -> Result<E, StoreError> {
        self.check_write(&self.updates)?;
        self.inner.update(entity)
    }

    fn delete(&self, project: &str, name: &str) -> Result<(), StoreError> {
        self.check_write(&self.deletes)?;
        self.inner.delete(project, name)
    }

    fn list(&self, query: &Query) -> Result<Vec<E>, StoreError> {
        self.check_read()?;
        let items = self.inner.list(query)?;
        if let Some(pause) = self.list_stall.lock().unwrap().take() {
            self.list_stalled.store(true, Ordering::SeqCst);
            std::thread::sleep(pause);
        }
        Ok(items)
    }
}
