//! RPC method handler for the Cobrowse JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested directly. The
//! `handle_method` function dispatches one call to the session registry,
//! the per-session controllers and the advisory builder held by [`App`].
//! Methods under `user.` are the user device writing its state; `admin.`
//! methods are the console placing cues. Both sides read through
//! `session.state` and `view.frame`.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::warn;

use crate::app::App;
use crate::managers::cue_controller::CueControllerTrait;
use crate::managers::navigation_controller::NavigationControllerTrait;
use crate::managers::session_registry::{SessionHandle, SessionRegistryTrait};
use crate::managers::session_store::SessionStoreTrait;
use crate::services::view_projection;
use crate::types::coordinate::{Coordinate, SurfaceSize};
use crate::types::form::FormValue;
use crate::types::route::Route;
use crate::types::session::SessionId;
use crate::types::view::ViewRole;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn f64_param(params: &Value, name: &str) -> Result<f64, String> {
    params
        .get(name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| format!("missing {}", name))
}

/// Parses `session_id` from params.
pub fn session_id_param(params: &Value) -> Result<SessionId, String> {
    str_param(params, "session_id")?
        .parse::<SessionId>()
        .map_err(|e| format!("invalid session_id: {}", e))
}

fn session(app: &App, params: &Value) -> Result<Arc<SessionHandle>, String> {
    let id = session_id_param(params)?;
    app.registry.get_session(&id).map_err(|e| e.to_string())
}

/// Surface from `surface_width`/`surface_height`, or the configured
/// reference surface for the role when both are omitted.
fn surface_param(app: &App, params: &Value, role: ViewRole) -> Result<SurfaceSize, String> {
    match (params.get("surface_width"), params.get("surface_height")) {
        (None, None) => Ok(match role {
            ViewRole::User => app.config.surface.reference_surface(),
            ViewRole::Admin => app.config.surface.mirror_surface(),
        }),
        _ => Ok(SurfaceSize::new(
            f64_param(params, "surface_width")?,
            f64_param(params, "surface_height")?,
        )),
    }
}

/// Percentages only line up across surfaces of the same shape. A mismatch is
/// the caller's contract violation; the click is still mapped.
fn warn_on_aspect_mismatch(app: &App, surface: SurfaceSize) {
    let reference = app.config.surface.reference_surface();
    if (surface.aspect_ratio() - reference.aspect_ratio()).abs() > 0.01 {
        warn!(
            surface_width = surface.width,
            surface_height = surface.height,
            reference_width = reference.width,
            reference_height = reference.height,
            "admin surface aspect ratio differs from the user device"
        );
    }
}

fn state_json(handle: &SessionHandle) -> Value {
    let snapshot = handle.store.snapshot();
    json!({
        "session_id": snapshot.session_id,
        "revision": snapshot.revision,
        "cue_phase": handle.store.cue_phase(),
        "state": snapshot.state,
    })
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Sessions ───
        "session.create" => {
            let handle = app.registry.create_session();
            let mut result = state_json(&handle);
            result["user"] = json!(app.config.session.user_display_name);
            result["device"] = json!(app.config.surface.device_name);
            Ok(result)
        }
        "session.end" => {
            let id = session_id_param(params)?;
            app.registry.end_session(&id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "session.list" => {
            let sessions: Vec<Value> = app
                .registry
                .list_sessions()
                .iter()
                .filter_map(|id| app.registry.get_session(id).ok())
                .map(|handle| json!({"session_id": handle.id(), "created_at": handle.created_at()}))
                .collect();
            Ok(json!(sessions))
        }
        "session.state" => {
            let handle = session(app, params)?;
            Ok(state_json(&handle))
        }

        // ─── User device ───
        "user.navigate" => {
            let route: Route = str_param(params, "route")?.parse()?;
            let handle = session(app, params)?;
            handle.navigation.navigate(route);
            Ok(state_json(&handle))
        }
        "user.set_field" => {
            let key = str_param(params, "key")?;
            let value: FormValue = params
                .get("value")
                .cloned()
                .ok_or("missing value")
                .and_then(|v| serde_json::from_value(v).map_err(|_| "value must be a string or boolean"))?;
            let handle = session(app, params)?;
            handle.store.set_form_field(key, value);
            Ok(state_json(&handle))
        }
        "user.toggle_field" => {
            let key = str_param(params, "key")?;
            let handle = session(app, params)?;
            let value = handle.store.toggle_form_field(key);
            Ok(json!({"key": key, "value": value}))
        }
        "user.scroll" => {
            let position = f64_param(params, "position")?;
            let handle = session(app, params)?;
            handle.store.set_scroll_position(position);
            Ok(state_json(&handle))
        }

        // ─── Admin console ───
        "admin.cue" => {
            let coordinate = Coordinate::new(f64_param(params, "x")?, f64_param(params, "y")?);
            let handle = session(app, params)?;
            handle.cue.trigger(coordinate);
            Ok(json!({"coordinate": coordinate, "cue_phase": handle.cue.phase()}))
        }
        "admin.cue_click" => {
            let offset_x = f64_param(params, "offset_x")?;
            let offset_y = f64_param(params, "offset_y")?;
            let surface = surface_param(app, params, ViewRole::Admin)?;
            let handle = session(app, params)?;
            let coordinate = handle
                .cue
                .trigger_at_pointer(offset_x, offset_y, surface)
                .map_err(|e| e.to_string())?;
            warn_on_aspect_mismatch(app, surface);
            Ok(json!({"coordinate": coordinate, "cue_phase": handle.cue.phase()}))
        }

        // ─── Rendering ───
        "view.frame" => {
            let role: ViewRole = str_param(params, "role")?.parse()?;
            let surface = surface_param(app, params, role)?;
            let handle = session(app, params)?;
            let frame = view_projection::project(&handle.store.get_state(), role, surface);
            Ok(json!(frame))
        }

        // ─── Advisory ───
        "advice.request" => {
            let query = params.get("query").and_then(|v| v.as_str()).unwrap_or("");
            let handle = session(app, params)?;
            let advice = app.advise(&handle, query).await;
            Ok(json!({"advice": advice}))
        }
        "advice.transcript" => {
            let handle = session(app, params)?;
            Ok(json!(handle.transcript()))
        }

        "config.get" => Ok(json!(app.config)),

        _ => Err(format!("unknown method: {}", method)),
    }
}
