//! Per-session `session.updated` event streams for the RPC server.
//!
//! Each live session gets one forwarder task that copies store events onto the
//! server's output channel in revision order. A forwarder that falls behind
//! the store's event buffer is resynced with the current snapshot instead of
//! replaying what it missed.

use std::collections::HashMap;

use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::App;
use crate::managers::session_registry::SessionRegistryTrait;
use crate::managers::session_store::{SessionStore, SessionStoreTrait};
use crate::rpc_handler::session_id_param;
use crate::types::session::{SessionEvent, SessionId};

/// Event name of a state change line.
pub const SESSION_UPDATED: &str = "session.updated";

/// Output line for one state change.
pub fn event_line(event: &SessionEvent) -> Value {
    json!({
        "event": SESSION_UPDATED,
        "session_id": event.session_id,
        "revision": event.revision,
        "state": event.state,
    })
}

fn spawn_forwarder(store: SessionStore, out: mpsc::UnboundedSender<Value>) -> JoinHandle<()> {
    // Subscribe before spawning so no change made after this call is missed.
    let mut events = store.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if out.send(event_line(&event)).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(session = %store.id(), skipped, "event subscriber lagged, resyncing");
                    if out.send(event_line(&store.snapshot())).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Running forwarders keyed by session.
#[derive(Default)]
pub struct EventForwarders {
    tasks: HashMap<SessionId, JoinHandle<()>>,
}

impl EventForwarders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts streaming changes of session `id` to `out`, replacing any
    /// earlier stream for it. Returns false for an unknown session.
    pub fn start(&mut self, app: &App, id: SessionId, out: mpsc::UnboundedSender<Value>) -> bool {
        let Ok(handle) = app.registry.get_session(&id) else {
            return false;
        };
        let task = spawn_forwarder(handle.store.clone(), out);
        if let Some(previous) = self.tasks.insert(id, task) {
            previous.abort();
        }
        debug!(
            session = %id,
            subscribers = handle.store.subscriber_count(),
            "event stream started"
        );
        true
    }

    /// Stops the stream of session `id`. Returns whether one was running.
    pub fn stop(&mut self, id: &SessionId) -> bool {
        match self.tasks.remove(id) {
            Some(task) => {
                task.abort();
                debug!(session = %id, "event stream stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, id: &SessionId) -> bool {
        self.tasks.get(id).is_some_and(|task| !task.is_finished())
    }

    /// Starts or stops a stream after a successful `session.create` or
    /// `session.end` call. Other methods are ignored.
    pub fn track(
        &mut self,
        app: &App,
        method: &str,
        params: &Value,
        result: &Value,
        out: &mpsc::UnboundedSender<Value>,
    ) {
        match method {
            "session.create" => {
                if let Ok(id) = session_id_param(result) {
                    self.start(app, id, out.clone());
                }
            }
            "session.end" => {
                if let Ok(id) = session_id_param(params) {
                    self.stop(&id);
                }
            }
            _ => {}
        }
    }

    pub fn stop_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
