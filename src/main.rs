//! Cobrowse console demo.
//!
//! Plays one scripted user/admin session against the real controllers and
//! prints what each side sees. Run `cobrowse-rpc` for the protocol server.

use std::time::Duration;

use cobrowse::app::App;
use cobrowse::managers::cue_controller::CueControllerTrait;
use cobrowse::managers::navigation_controller::NavigationControllerTrait;
use cobrowse::managers::session_registry::{SessionHandle, SessionRegistryTrait};
use cobrowse::managers::session_store::SessionStoreTrait;
use cobrowse::services::config_engine::{ConfigEngine, ConfigEngineTrait};
use cobrowse::services::logging::init_tracing;
use cobrowse::services::view_projection;
use cobrowse::types::form::FormValue;
use cobrowse::types::route::Route;
use cobrowse::types::view::ViewRole;

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn show_frames(app: &App, session: &SessionHandle) {
    let state = session.store.get_state();
    for (role, surface) in [
        (ViewRole::User, app.config.surface.reference_surface()),
        (ViewRole::Admin, app.config.surface.mirror_surface()),
    ] {
        let frame = view_projection::project(&state, role, surface);
        let cue = match frame.cue_pixels {
            Some((x, y)) => format!("cue at ({:.1}, {:.1}) px", x, y),
            None => "no cue".to_string(),
        };
        println!(
            "  {:<5} {:>9}  scroll {:>6.1}  {}",
            format!("{:?}", role).to_lowercase(),
            frame.route,
            frame.scroll_offset,
            cue
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = ConfigEngine::new(None);
    let mut config = engine.load()?;
    init_tracing(&config.logging.filter);
    // Shortened so the demo shows an expiry without a long wait.
    config.cue.duration_ms = config.cue.duration_ms.min(1500);

    let app = App::new(config)?;
    let session = app.registry.create_session();

    println!();
    println!("  Cobrowse v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!(
        "  Session {} · {} on {}",
        session.id(),
        app.config.session.user_display_name,
        app.config.surface.device_name
    );
    println!();

    section("User opens Profile, types and scrolls");
    session.navigation.navigate(Route::Profile);
    session.store.set_form_field("fullName", FormValue::from("Jane Roe"));
    session.store.set_form_field("email", FormValue::from("jane@example.com"));
    session.store.set_scroll_position(120.0);
    show_frames(&app, &session);

    section("Admin clicks the mirror to place a cue");
    let mirror = app.config.surface.mirror_surface();
    let coordinate = session
        .cue
        .trigger_at_pointer(mirror.width * 0.8, mirror.height * 0.15, mirror)?;
    println!("  mapped click to ({:.1}%, {:.1}%)", coordinate.x, coordinate.y);
    show_frames(&app, &session);

    section("Cue expires");
    tokio::time::sleep(session.cue.duration() + Duration::from_millis(100)).await;
    println!("  cue phase: {:?}", session.cue.phase());
    show_frames(&app, &session);

    section("User navigates to Settings (cue and scroll reset)");
    session.cue.trigger(coordinate);
    session.navigation.navigate(Route::Settings);
    show_frames(&app, &session);

    section("Admin asks for guidance");
    let advice = app.advise(&session, "The user cannot find notifications").await;
    println!("  {}", advice);

    app.registry.end_session(&session.id())?;
    println!();
    Ok(())
}
