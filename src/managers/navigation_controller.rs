//! Route Navigation Controller.

use tracing::info;

use crate::managers::cue_controller;
use crate::managers::session_store::{SessionStore, SessionStoreTrait, StoreInner};
use crate::types::route::Route;

/// Trait defining navigation operations.
pub trait NavigationControllerTrait {
    fn navigate(&self, route: Route);
    fn current_route(&self) -> Route;
}

/// Moves the user view between pages and clears per-page transient state.
#[derive(Clone)]
pub struct NavigationController {
    store: SessionStore,
}

impl NavigationController {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

/// Route change plus cue and scroll reset, applied under one lock.
fn navigate_locked(inner: &mut StoreInner, route: Route) {
    inner.state.route = route;
    cue_controller::reset_locked(inner);
    inner.state.scroll_position = 0.0;
}

impl NavigationControllerTrait for NavigationController {
    /// Navigating to the current route still resets cue and scroll.
    /// Form values survive navigation.
    fn navigate(&self, route: Route) {
        let from = self.store.apply("route.navigate", |inner| {
            let from = inner.state.route;
            navigate_locked(inner, route);
            from
        });
        info!(session = %self.store.id(), %from, to = %route, "navigated");
    }

    fn current_route(&self) -> Route {
        self.store.get_state().route
    }
}
