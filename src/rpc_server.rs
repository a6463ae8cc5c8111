//! Cobrowse RPC Server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"admin.cue", "params":{"session_id":"...","x":40,"y":25}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Event:    {"event":"session.updated", "session_id":"...", "revision":3, "state":{...}}
//!
//! The process is the single authoritative owner of every session it creates.
//! Requests are applied in arrival order; `advice.request` runs in the
//! background so a slow advisory call never holds up state sync. All output
//! goes through one writer task so responses and events never interleave
//! mid-line.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use cobrowse::app::App;
use cobrowse::managers::session_registry::SessionRegistryTrait;
use cobrowse::rpc_events::EventForwarders;
use cobrowse::rpc_handler::handle_method;
use cobrowse::services::config_engine::{ConfigEngine, ConfigEngineTrait};
use cobrowse::services::logging::init_tracing;

/// Simple rate limiter: max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

#[tokio::main]
async fn main() {
    let mut engine = ConfigEngine::new(None);
    let config = match engine.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config from {}: {}", engine.get_config_path(), e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.filter);

    let app = match App::new(config) {
        Ok(app) => Arc::new(app),
        Err(e) => {
            eprintln!("failed to initialize cobrowse: {}", e);
            std::process::exit(1);
        }
    };

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            let mut bytes = line.to_string().into_bytes();
            bytes.push(b'\n');
            if stdout.write_all(&bytes).await.is_err() || stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let _ = out_tx.send(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));
    info!(config = %engine.get_config_path(), "rpc server ready");

    // Max 200 RPC requests per second.
    let mut rate_limiter = RateLimiter::new(200);
    let mut forwarders = EventForwarders::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = out_tx.send(json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            let _ = out_tx.send(json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("").to_string();
        let params = req.get("params").cloned().unwrap_or(json!({}));

        if method == "advice.request" {
            let app = app.clone();
            let out = out_tx.clone();
            tokio::spawn(async move {
                let response = match handle_method(&app, &method, &params).await {
                    Ok(val) => json!({"id": id, "result": val}),
                    Err(err) => json!({"id": id, "error": err}),
                };
                let _ = out.send(response);
            });
            continue;
        }

        let result = handle_method(&app, &method, &params).await;
        if let Ok(value) = &result {
            forwarders.track(&app, &method, &params, value, &out_tx);
        }

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        let _ = out_tx.send(response);
    }

    forwarders.stop_all();
    for session_id in app.registry.list_sessions() {
        let _ = app.registry.end_session(&session_id);
    }
    drop(out_tx);
    let _ = writer.await;
}
