//! Cue Lifecycle Controller.
//!
//! Two-state machine (`Idle` / `Active`) for the admin's guidance cue. A
//! trigger shows the cue and arms an expiry task; a later trigger cancels the
//! pending expiry and arms a fresh one for the full duration, so the most
//! recent trigger always decides when the cue hides.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::managers::session_store::{SessionStore, StoreInner};
use crate::services::coordinate_mapper;
use crate::types::coordinate::{Coordinate, SurfaceSize};
use crate::types::errors::MapperError;
use crate::types::session::CuePhase;

/// Default time a cue stays visible after its latest trigger.
pub const DEFAULT_CUE_DURATION: Duration = Duration::from_millis(5000);

/// Trait defining cue lifecycle operations.
pub trait CueControllerTrait {
    /// Shows the cue at `coordinate` and restarts its expiry. Needs a Tokio
    /// runtime to run the expiry; without one the trigger is dropped.
    fn trigger(&self, coordinate: Coordinate);
    fn reset(&self);
    fn phase(&self) -> CuePhase;
}

/// The pending expiry of the active cue, kept inside the store lock.
///
/// `generation` increases on every arm; an expiry task only takes effect if
/// its generation is still current, so a task that woke just as it was being
/// superseded does nothing.
#[derive(Default)]
pub(crate) struct ExpirySlot {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl ExpirySlot {
    pub(crate) fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Aborts the pending task, if any. Returns whether one was pending.
    /// Aborting a task that already finished is a no-op.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn arm(&mut self, spawn: impl FnOnce(u64) -> JoinHandle<()>) {
        self.generation += 1;
        self.handle = Some(spawn(self.generation));
    }

    /// Disarms the slot if `generation` is current. Returns whether it was.
    fn fire(&mut self, generation: u64) -> bool {
        if self.generation == generation && self.handle.is_some() {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

/// Hides the cue and cancels its expiry. Caller holds the store lock.
pub(crate) fn reset_locked(inner: &mut StoreInner) {
    inner.expiry.cancel();
    inner.state.cue_coordinate = None;
    inner.state.cue_active = false;
}

/// Cue controller bound to one session store.
///
/// Triggering spawns the expiry on the current Tokio runtime.
#[derive(Clone)]
pub struct CueController {
    store: SessionStore,
    duration: Duration,
}

impl CueController {
    pub fn new(store: SessionStore, duration: Duration) -> Self {
        Self { store, duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Maps an admin pointer event on `surface` and triggers the cue there.
    ///
    /// An invalid surface skips the event; the cue is left untouched.
    pub fn trigger_at_pointer(
        &self,
        offset_x: f64,
        offset_y: f64,
        surface: SurfaceSize,
    ) -> Result<Coordinate, MapperError> {
        let coordinate =
            coordinate_mapper::to_percentage(offset_x, offset_y, surface.width, surface.height)?;
        self.trigger(coordinate);
        Ok(coordinate)
    }
}

impl CueControllerTrait for CueController {
    fn trigger(&self, coordinate: Coordinate) {
        let session = self.store.id();
        let Ok(runtime) = Handle::try_current() else {
            warn!(%session, "cue trigger dropped: no Tokio runtime to run its expiry");
            return;
        };
        let deadline = Instant::now() + self.duration;
        let store = self.store.clone();

        self.store.apply("cue.trigger", move |inner| {
            let superseded = inner.expiry.cancel();
            inner.state.cue_coordinate = Some(coordinate);
            inner.state.cue_active = true;
            inner.expiry.arm(move |generation| {
                runtime.spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    expire(&store, generation);
                })
            });
            debug!(
                %session,
                x = coordinate.x,
                y = coordinate.y,
                on_surface = coordinate.is_within_surface(),
                superseded,
                "cue triggered"
            );
        });
    }

    /// Unconditional; a no-op when already idle.
    fn reset(&self) {
        self.store.apply("cue.reset", reset_locked);
    }

    fn phase(&self) -> CuePhase {
        self.store.cue_phase()
    }
}

fn expire(store: &SessionStore, generation: u64) {
    store.apply("cue.expire", |inner| {
        if inner.expiry.fire(generation) {
            // The coordinate stays as the last known position.
            inner.state.cue_active = false;
            trace!(session = %store.id(), generation, "cue expired");
        }
    });
}
