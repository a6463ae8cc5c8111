//! Session Registry.
//!
//! Maps session identifiers to their isolated store and controllers. Each
//! session owns its own store; nothing is shared between sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::info;
use uuid::Uuid;

use crate::managers::cue_controller::CueController;
use crate::managers::navigation_controller::NavigationController;
use crate::managers::session_store::SessionStore;
use crate::types::advisory::{ChatMessage, ChatRole};
use crate::types::config::SimulatorConfig;
use crate::types::errors::SessionError;
use crate::types::session::SessionId;

/// Trait defining session registry operations.
pub trait SessionRegistryTrait {
    fn create_session(&self) -> Arc<SessionHandle>;
    fn get_session(&self, id: &SessionId) -> Result<Arc<SessionHandle>, SessionError>;
    fn end_session(&self, id: &SessionId) -> Result<(), SessionError>;
    fn list_sessions(&self) -> Vec<SessionId>;
    fn session_count(&self) -> usize;
}

/// Everything belonging to one live session.
pub struct SessionHandle {
    pub store: SessionStore,
    pub cue: CueController,
    pub navigation: NavigationController,
    transcript: Mutex<Vec<ChatMessage>>,
    sequence: u64,
    created_at: i64,
}

impl SessionHandle {
    fn new(id: SessionId, cue_duration: Duration, event_buffer: usize, sequence: u64) -> Self {
        let store = SessionStore::new(id, event_buffer);
        Self {
            cue: CueController::new(store.clone(), cue_duration),
            navigation: NavigationController::new(store.clone()),
            store,
            transcript: Mutex::new(Vec::new()),
            sequence,
            created_at: now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.store.id()
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Appends an entry to the in-memory guidance transcript.
    pub fn record(&self, role: ChatRole, text: &str) -> ChatMessage {
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.to_string(),
            timestamp: now(),
        };
        self.lock_transcript().push(message.clone());
        message
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock_transcript().clone()
    }

    fn lock_transcript(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.transcript.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// In-memory registry of live sessions.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, Arc<SessionHandle>>>,
    next_sequence: AtomicU64,
    cue_duration: Duration,
    event_buffer: usize,
}

impl SessionRegistry {
    pub fn new(cue_duration: Duration, event_buffer: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_sequence: AtomicU64::new(0),
            cue_duration,
            event_buffer,
        }
    }

    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(
            Duration::from_millis(config.cue.duration_ms),
            config.session.event_buffer,
        )
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<SessionHandle>>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionRegistryTrait for SessionRegistry {
    fn create_session(&self) -> Arc<SessionHandle> {
        let id = SessionId::new();
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let handle = Arc::new(SessionHandle::new(
            id,
            self.cue_duration,
            self.event_buffer,
            sequence,
        ));
        self.lock().insert(id, handle.clone());
        info!(session = %id, "session created");
        handle
    }

    fn get_session(&self, id: &SessionId) -> Result<Arc<SessionHandle>, SessionError> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotInitialized(id.to_string()))
    }

    /// Removes the session and cancels its pending cue expiry. Handles still
    /// held elsewhere keep working but are no longer reachable by id.
    fn end_session(&self, id: &SessionId) -> Result<(), SessionError> {
        let handle = self
            .lock()
            .remove(id)
            .ok_or_else(|| SessionError::NotInitialized(id.to_string()))?;
        handle.store.teardown();
        info!(session = %id, "session ended");
        Ok(())
    }

    /// Live sessions in creation order.
    fn list_sessions(&self) -> Vec<SessionId> {
        let sessions = self.lock();
        let mut handles: Vec<&Arc<SessionHandle>> = sessions.values().collect();
        handles.sort_by_key(|h| h.sequence);
        handles.iter().map(|h| h.id()).collect()
    }

    fn session_count(&self) -> usize {
        self.lock().len()
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
