use std::fs;
use std::io;

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::club_http::{FetchError, VisitSource};
use crate::domain::visit::{VisitRecord, latest_visit, parse_visit_history};

/// A recorded debug session: what `GetCustomerVisits` answered on each refresh.
#[derive(Debug, Deserialize)]
struct VisitScript {
    #[serde(default = "repeat_by_default")]
    repeat: bool,
    refreshes: Vec<ScriptedRefresh>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScriptedRefresh {
    /// Site answered; `body` is either the JSON history or raw text such as an HTML page.
    Response {
        #[serde(default = "ok_status")]
        status: u16,
        body: Value,
    },
    /// Site could not be reached at all.
    Unreachable {
        #[serde(default)]
        reason: Option<String>,
    },
}

fn repeat_by_default() -> bool {
    true
}

fn ok_status() -> u16 {
    200
}

/// Replays a recorded `GetCustomerVisits` conversation instead of talking to
/// ourclublogin.com. Bodies go through the same parsing as live responses.
#[derive(Debug)]
pub struct DebugFileVisitSource {
    path: String,
    script: VisitScript,
    played: usize,
}

impl DebugFileVisitSource {
    pub fn from_file(path: &str) -> Result<Self, FetchError> {
        let content = fs::read_to_string(path)?;
        let script: VisitScript =
            serde_json::from_str(&content).map_err(|source| FetchError::Script {
                path: path.to_string(),
                source,
            })?;

        if script.refreshes.is_empty() {
            return Err(FetchError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("debug script {path} lists no refreshes"),
            )));
        }

        Ok(Self {
            path: path.to_string(),
            script,
            played: 0,
        })
    }

    fn next_refresh(&mut self) -> Option<&ScriptedRefresh> {
        let total = self.script.refreshes.len();
        if !self.script.repeat && self.played >= total {
            return None;
        }

        let position = self.played % total;
        self.played += 1;
        self.script.refreshes.get(position)
    }
}

fn body_bytes(body: &Value) -> Vec<u8> {
    match body {
        Value::String(text) => text.as_bytes().to_vec(),
        other => other.to_string().into_bytes(),
    }
}

impl VisitSource for DebugFileVisitSource {
    fn refresh(&mut self) -> Result<VisitRecord, FetchError> {
        let path = self.path.clone();
        let refresh = self.next_refresh().ok_or_else(|| {
            FetchError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("debug script {path} has no refreshes left"),
            ))
        })?;

        match refresh {
            ScriptedRefresh::Unreachable { reason } => Err(FetchError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                reason
                    .clone()
                    .unwrap_or_else(|| "scripted site outage".to_string()),
            ))),
            ScriptedRefresh::Response { status, body } => {
                if (200..300).contains(status) {
                    tracing::info!(status, debug_file = %path, "replayed GetCustomerVisits response");
                } else {
                    tracing::error!(status, debug_file = %path, "replayed GetCustomerVisits failure status");
                }

                let visits = parse_visit_history(&body_bytes(body))?;
                latest_visit(visits).ok_or(FetchError::NoVisits)
            }
        }
    }
}
