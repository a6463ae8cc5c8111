//! View projection: what each renderer draws for a session snapshot.
//!
//! The user device and the admin mirror each project the same
//! [`SessionState`] onto their own surface. Cue positions go through the
//! coordinate mapper, so a cue placed on a scaled mirror lands on the same
//! spot of the full-size device.

use crate::services::coordinate_mapper;
use crate::types::coordinate::SurfaceSize;
use crate::types::session::SessionState;
use crate::types::view::{ViewFrame, ViewRole};

/// Projects `state` onto a surface of the given pixel size for `role`.
///
/// Only the user view is interactive; the mirror renders the same content
/// read-only and applies the user's scroll offset.
pub fn project(state: &SessionState, role: ViewRole, surface: SurfaceSize) -> ViewFrame {
    ViewFrame {
        role,
        route: state.route,
        interactive: role == ViewRole::User,
        scroll_offset: state.scroll_position,
        cue_pixels: state
            .visible_cue()
            .map(|c| coordinate_mapper::to_pixels(&c, surface.width, surface.height)),
    }
}
