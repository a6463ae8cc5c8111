//! Session Store.
//!
//! Holds the single authoritative [`SessionState`] of one session and fans
//! every change out to subscribers (the user view and the admin mirror).
//! All mutation goes through [`SessionStore::apply`], which runs under the
//! store lock and publishes at most one event per call, so compound updates
//! such as navigation are observed atomically and in issue order.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::managers::cue_controller::{self, ExpirySlot};
use crate::managers::navigation_controller::{NavigationController, NavigationControllerTrait};
use crate::types::form::FormValue;
use crate::types::route::Route;
use crate::types::session::{CuePhase, SessionEvent, SessionId, SessionState};

/// Event channel capacity used when none is configured.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Trait defining the session store interface.
pub trait SessionStoreTrait {
    fn get_state(&self) -> SessionState;
    fn set_route(&self, route: Route);
    fn set_form_field(&self, key: &str, value: FormValue);
    fn toggle_form_field(&self, key: &str) -> bool;
    fn set_scroll_position(&self, position: f64);
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

pub(crate) struct StoreInner {
    pub(crate) state: SessionState,
    pub(crate) revision: u64,
    pub(crate) expiry: ExpirySlot,
}

/// Cloneable handle to one session's shared state.
#[derive(Clone)]
pub struct SessionStore {
    id: SessionId,
    inner: Arc<Mutex<StoreInner>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Creates a store holding the initial state of a new session.
    pub fn new(id: SessionId, event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            id,
            inner: Arc::new(Mutex::new(StoreInner {
                state: SessionState::default(),
                revision: 0,
                expiry: ExpirySlot::default(),
            })),
            events,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Number of notified changes so far.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Current state with its revision, read under one lock.
    pub fn snapshot(&self) -> SessionEvent {
        let inner = self.lock();
        SessionEvent {
            session_id: self.id,
            revision: inner.revision,
            state: inner.state.clone(),
        }
    }

    pub fn cue_phase(&self) -> CuePhase {
        if self.lock().expiry.is_armed() {
            CuePhase::Active
        } else {
            CuePhase::Idle
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Hides the cue and cancels its pending expiry. Called when the session
    /// ends, so handles still held elsewhere never see a cue that cannot expire.
    pub fn teardown(&self) {
        self.apply("teardown", cue_controller::reset_locked);
    }

    /// Runs `op` against the locked store and publishes one event if the
    /// visible state changed.
    ///
    /// The event is sent before the lock is released, which keeps event order
    /// identical to mutation order for every subscriber.
    pub(crate) fn apply<R>(&self, action: &'static str, op: impl FnOnce(&mut StoreInner) -> R) -> R {
        let mut inner = self.lock();
        let before = inner.state.clone();
        let out = op(&mut inner);
        if inner.state != before {
            inner.revision += 1;
            debug!(session = %self.id, revision = inner.revision, action, "session state changed");
            // No receivers is not an error: nobody is watching yet.
            let _ = self.events.send(SessionEvent {
                session_id: self.id,
                revision: inner.revision,
                state: inner.state.clone(),
            });
        }
        out
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A panic while holding the lock cannot leave the state half-written
        // in a way later readers care about, so recover the guard.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStoreTrait for SessionStore {
    /// Returns an owned snapshot; changing it never affects the store.
    fn get_state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Changes the route. Goes through navigation so the cue and scroll reset
    /// can never be skipped.
    fn set_route(&self, route: Route) {
        NavigationController::new(self.clone()).navigate(route);
    }

    fn set_form_field(&self, key: &str, value: FormValue) {
        self.apply("form.set", |inner| inner.state.form_state.set(key, value));
    }

    /// Flips a boolean field and returns its new value. A missing or
    /// non-boolean field becomes `true`.
    fn toggle_form_field(&self, key: &str) -> bool {
        self.apply("form.toggle", |inner| {
            let next = !inner
                .state
                .form_state
                .get(key)
                .and_then(FormValue::as_flag)
                .unwrap_or(false);
            inner.state.form_state.set(key, FormValue::Flag(next));
            next
        })
    }

    /// Negative offsets are stored as given. A NaN or infinite offset is
    /// ignored: it has no JSON form and would never compare equal to itself.
    fn set_scroll_position(&self, position: f64) {
        if !position.is_finite() {
            warn!(session = %self.id, position, "ignoring non-finite scroll position");
            return;
        }
        self.apply("scroll.set", |inner| inner.state.scroll_position = position);
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionId::new(), DEFAULT_EVENT_BUFFER)
    }
}
