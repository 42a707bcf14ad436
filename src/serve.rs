//! Log/analytics HTTP endpoints.
//!
//! Two tiny stateless endpoints the deployed site posts to, formerly
//! serverless functions:
//!
//! - `POST /log-error` — client error reports
//!   (`{message, stack?, url, userAgent, timestamp}`). Strict about its
//!   input: JSON content type required, body must parse to an object.
//! - `POST /cms-analytics` — editor usage events
//!   (`{eventType, timestamp, source?, data?}`). Lenient: missing body
//!   reads as `{}`, absent fields get defaults.
//!
//! Both log exactly one tagged JSON line per accepted request, stamped with
//! `receivedAt`; the log stream is the storage layer, as it was on the
//! serverless platform. Handlers share no state, so requests are dispatched
//! onto a small thread pool and never block each other.
//!
//! [`handle`] is a pure function over the request surface — method, path,
//! content type, body — which keeps every status-code branch unit-testable
//! without opening a socket.

use crate::config::ToolConfig;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use std::io::Read;
use thiserror::Error;
use tiny_http::{Header, Response, Server, StatusCode};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("failed to bind server: {0}")]
    Bind(String),
    #[error("failed to create thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Request surface the handlers care about.
#[derive(Debug, Clone, Copy)]
pub struct EndpointRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub content_type: Option<&'a str>,
    pub body: &'a str,
}

/// What to send back.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    /// JSON body; `None` sends an empty response (204).
    pub body: Option<String>,
    /// Value for an `Allow` header (405 replies).
    pub allow: Option<&'static str>,
}

impl Reply {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body.to_string()),
            allow: None,
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    fn method_not_allowed() -> Self {
        Self {
            allow: Some("POST"),
            ..Self::error(405, "Method Not Allowed")
        }
    }
}

/// One line for the process log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    /// Tag in brackets: `client-error` or `cms-analytics`.
    pub tag: &'static str,
    /// JSON payload after the tag.
    pub payload: String,
}

impl LogLine {
    pub fn render(&self) -> String {
        format!("[{}] {}", self.tag, self.payload)
    }
}

/// Handler outcome: the reply plus at most one log line.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reply: Reply,
    pub log: Option<LogLine>,
}

impl Outcome {
    fn reply_only(reply: Reply) -> Self {
        Self { reply, log: None }
    }
}

/// Route and handle one request, stamping accepted payloads with now.
pub fn handle(request: &EndpointRequest) -> Outcome {
    let received_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    handle_at(request, &received_at)
}

/// [`handle`] with an explicit `receivedAt` stamp, for tests.
pub fn handle_at(request: &EndpointRequest, received_at: &str) -> Outcome {
    match request.path {
        "/log-error" => log_error(request, received_at),
        "/cms-analytics" => cms_analytics(request, received_at),
        _ => Outcome::reply_only(Reply::error(404, "Not Found")),
    }
}

fn log_error(request: &EndpointRequest, received_at: &str) -> Outcome {
    if request.method != "POST" {
        return Outcome::reply_only(Reply::method_not_allowed());
    }
    if !is_json_content_type(request.content_type) {
        return Outcome::reply_only(Reply::error(415, "Unsupported Media Type"));
    }
    if request.body.is_empty() {
        return Outcome::reply_only(Reply::error(400, "Missing JSON body"));
    }

    let payload: Value = match serde_json::from_str(request.body) {
        Ok(payload) => payload,
        Err(_) => return Outcome::reply_only(Reply::error(400, "Invalid JSON payload")),
    };
    let Value::Object(mut payload) = payload else {
        return Outcome::reply_only(Reply::error(400, "Invalid payload structure"));
    };

    payload.insert("receivedAt".to_string(), json!(received_at));

    Outcome {
        reply: Reply::json(200, json!({ "ok": true })),
        log: Some(LogLine {
            tag: "client-error",
            payload: Value::Object(payload).to_string(),
        }),
    }
}

fn cms_analytics(request: &EndpointRequest, received_at: &str) -> Outcome {
    if request.method != "POST" {
        return Outcome::reply_only(Reply::method_not_allowed());
    }

    let body = if request.body.is_empty() {
        "{}"
    } else {
        request.body
    };
    let payload: Value = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(_) => return Outcome::reply_only(Reply::error(400, "Invalid payload")),
    };

    let mut event = Map::new();
    event.insert(
        "eventType".to_string(),
        payload.get("eventType").cloned().unwrap_or(Value::Null),
    );
    event.insert(
        "timestamp".to_string(),
        payload.get("timestamp").cloned().unwrap_or(Value::Null),
    );
    event.insert(
        "source".to_string(),
        payload
            .get("source")
            .cloned()
            .unwrap_or_else(|| json!("decap-admin")),
    );
    event.insert(
        "data".to_string(),
        payload.get("data").cloned().unwrap_or_else(|| json!({})),
    );
    event.insert("receivedAt".to_string(), json!(received_at));

    Outcome {
        reply: Reply {
            status: 204,
            body: None,
            allow: None,
        },
        log: Some(LogLine {
            tag: "cms-analytics",
            payload: Value::Object(event).to_string(),
        }),
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.to_ascii_lowercase()
            .trim_start()
            .starts_with("application/json")
    })
}

// =============================================================================
// Server loop
// =============================================================================

/// Bind on localhost and serve requests until the process is killed.
///
/// Requests run on a small thread pool so a slow client cannot stall the
/// loop; handlers are stateless, so there is nothing to coordinate.
pub fn run(config: &ToolConfig) -> Result<(), ServeError> {
    let server =
        Server::http(("127.0.0.1", config.serve.port)).map_err(|e| ServeError::Bind(e.to_string()))?;
    println!("[serve] listening on http://127.0.0.1:{}", config.serve.port);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build()?;

    for request in server.incoming_requests() {
        pool.spawn(move || {
            if let Err(e) = dispatch(request) {
                eprintln!("[serve] request error: {e}");
            }
        });
    }

    Ok(())
}

/// Read one request, run the pure handler, emit log line and response.
fn dispatch(mut request: tiny_http::Request) -> std::io::Result<()> {
    let method = request.method().to_string();
    let path = request.url().to_string();
    let content_type = header_value(&request, "content-type");

    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;

    let outcome = handle(&EndpointRequest {
        method: &method,
        path: &path,
        content_type: content_type.as_deref(),
        body: &body,
    });

    if let Some(line) = &outcome.log {
        match line.tag {
            "client-error" => eprintln!("{}", line.render()),
            _ => println!("{}", line.render()),
        }
    }

    respond(request, &outcome.reply)
}

fn respond(request: tiny_http::Request, reply: &Reply) -> std::io::Result<()> {
    match &reply.body {
        Some(body) => {
            let mut response = Response::from_string(body.clone())
                .with_status_code(StatusCode(reply.status))
                .with_header(
                    Header::from_bytes("Content-Type", "application/json").unwrap(),
                );
            if let Some(allow) = reply.allow {
                response = response.with_header(Header::from_bytes("Allow", allow).unwrap());
            }
            request.respond(response)
        }
        None => request.respond(Response::empty(StatusCode(reply.status))),
    }
}

fn header_value(request: &tiny_http::Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}
