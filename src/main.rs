mod book;
mod calc;
mod config;
mod db;
mod events;
mod grading;
mod ipc;
mod predictor;
mod study;
mod transcript;

use serde_json::json;
use simplelog::{ConfigBuilder, WriteLogger};
use std::io::{self, BufRead, Write};

fn init_logging(cfg: &config::Config) {
    // stdout carries responses; logs go to stderr.
    let log_cfg = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Err(e) = WriteLogger::init(cfg.log_level, log_cfg, io::stderr()) {
        eprintln!("logger init failed: {}", e);
    }
}

fn main() {
    let cfg = config::Config::from_env();
    init_logging(&cfg);

    let mut state = ipc::AppState::default();
    if let Some(path) = cfg.workspace.as_deref() {
        if let Err(e) = state.open_workspace(path) {
            log::error!("could not open {}: {:#}", path.to_string_lossy(), e);
        }
    }
    log::info!("uthmhubd {} ready", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                log::warn!("stdin closed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to reply to.
                log::warn!("bad request line: {}", e);
                let _ = writeln!(
                    stdout,
                    "{}",
                    json!({ "ok": false, "error": { "code": "bad_json", "message": e.to_string() } })
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
