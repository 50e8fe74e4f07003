//! The observable application state container.
//!
//! All writes go through [`Mutation`]s. After each mutation is applied the
//! single registered [`Listener`] is called with the changed path, the
//! mutation, and the resulting state.

mod mutation;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::domain::AppState;

pub use mutation::{Mutation, StatePath};

/// Receives every state change, in the order the changes were applied.
pub trait Listener: Send {
    fn on_change(&mut self, path: StatePath, change: &Mutation, state: &AppState);
}

impl<F> Listener for F
where
    F: FnMut(StatePath, &Mutation, &AppState) + Send,
{
    fn on_change(&mut self, path: StatePath, change: &Mutation, state: &AppState) {
        self(path, change, state)
    }
}

#[derive(Default)]
pub struct ObservableStore {
    state: AppState,
    listener: Option<Box<dyn Listener>>,
}

impl ObservableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the listener, replacing any previous one.
    pub fn subscribe(&mut self, listener: Box<dyn Listener>) {
        self.listener = Some(listener);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply a mutation and notify the listener.
    ///
    /// Entering a form stage with an on-enter transition issues exactly one
    /// follow-up stage mutation, which is itself not checked for transitions.
    /// Returns false when the mutation changed nothing; no notification is sent then.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        let follow_up = match &mutation {
            Mutation::SetFormStage(stage) => stage.on_enter(),
            _ => None,
        };

        if !self.apply_and_notify(mutation) {
            return false;
        }

        if let Some(next) = follow_up {
            self.apply_and_notify(Mutation::SetFormStage(next));
        }
        true
    }

    fn apply_and_notify(&mut self, mutation: Mutation) -> bool {
        if !mutation.apply_to(&mut self.state) {
            return false;
        }

        let path = mutation.path();
        trace!("State changed at {}", path);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_change(path, &mutation, &self.state);
        }
        true
    }
}

/// Cloneable handle to the process-wide store.
///
/// The lock is only ever held for synchronous work, so each call is one
/// whole operation as seen by the listener. The listener runs under the
/// lock too, so it should do little more than a single buffered write.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<ObservableStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ObservableStore> {
        // A panicking listener must not take the whole store down with it
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn subscribe<L: Listener + 'static>(&self, listener: L) {
        self.lock().subscribe(Box::new(listener));
    }

    pub fn apply(&self, mutation: Mutation) -> bool {
        self.lock().apply(mutation)
    }

    /// Apply several mutations without letting other writers interleave.
    pub fn apply_all<I: IntoIterator<Item = Mutation>>(&self, mutations: I) {
        let mut store = self.lock();
        for mutation in mutations {
            store.apply(mutation);
        }
    }

    /// Run `f` with exclusive access, for read-then-write operations.
    pub fn update<R>(&self, f: impl FnOnce(&mut ObservableStore) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(self.lock().state())
    }

    pub fn snapshot(&self) -> AppState {
        self.read(AppState::clone)
    }
}
