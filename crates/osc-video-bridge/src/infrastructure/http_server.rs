//! Media Range Server: the presentation page and the video resource.
//!
//! | Route        | Response                                              |
//! |--------------|-------------------------------------------------------|
//! | `GET /`      | HTML page with a `<video>` element and push client    |
//! | `GET /video` | current file, whole (200) or by byte range (206/416)  |
//!
//! `/video` answers 404 while no file is set and 500 when the file vanished
//! after it was accepted.  Neither touches the playback state.
//!
//! Once a 200 or 206 response is ready to stream, the last known position is
//! pushed to the presentation client so a freshly reloaded video resumes where
//! the upstream transport is instead of at zero.  This happens once per
//! request, and never for `HEAD`, which streams no body.

use std::io::SeekFrom;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::net::TcpListener;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::application::{plan_range, PlaybackStore, PresentationNotifier, RangePlan};
use crate::domain::PushMessage;

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Why `/video` could not stream.
#[derive(Debug, Error)]
pub enum MediaError {
    /// No file has been accepted yet.
    #[error("no active media file")]
    NoActiveMediaFile,

    /// The accepted file could not be opened or inspected.
    #[error("cannot open {path}: {source}")]
    FileMissingAtStreamTime {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested range lies outside the file.
    #[error("range not satisfiable for {file_size} byte file")]
    RangeNotSatisfiable { file_size: u64 },
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        match self {
            MediaError::NoActiveMediaFile => StatusCode::NOT_FOUND.into_response(),
            MediaError::FileMissingAtStreamTime { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            MediaError::RangeNotSatisfiable { file_size } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(header::CONTENT_RANGE, format!("bytes */{file_size}"))],
            )
                .into_response(),
        }
    }
}

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub store: Arc<PlaybackStore>,
    pub notifier: Arc<dyn PresentationNotifier>,
    /// Port the presentation page connects its push client to.
    pub ws_port: u16,
}

/// Builds the router serving `/` and `/video`.
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video", get(video))
        .with_state(state)
}

/// Serves HTTP on `listener` until `running` is cleared.
pub async fn run_http_server(
    listener: TcpListener,
    state: HttpState,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            while running.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            info!("shutdown flag set; stopping HTTP server");
        })
        .await
        .context("HTTP server failed")
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn index(State(state): State<HttpState>) -> Html<String> {
    Html(presentation_page(state.ws_port))
}

async fn video(
    State(state): State<HttpState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, MediaError> {
    let Some(path) = state.store.snapshot().file_path else {
        debug!("/video requested with no active file");
        return Err(MediaError::NoActiveMediaFile);
    };

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    let response = open_media(path.as_path().to_path_buf(), range_header)
        .await
        .inspect_err(|e| match e {
            MediaError::FileMissingAtStreamTime { .. } => warn!("/video failed: {e}"),
            _ => debug!("/video: {e}"),
        })?;

    if method == Method::HEAD {
        return Ok(response);
    }
    // Positions may have arrived while the file was opening.
    if let Some(seconds) = state.store.snapshot().position_seconds {
        state.notifier.push(PushMessage::SetPlayPos(seconds));
    }
    Ok(response)
}

/// Opens `path` and builds a 200 or 206 streaming response for `range_header`.
async fn open_media(path: PathBuf, range_header: Option<&str>) -> Result<Response, MediaError> {
    let missing = |source: std::io::Error| MediaError::FileMissingAtStreamTime {
        path: path.clone(),
        source,
    };

    let mut file = tokio::fs::File::open(&path).await.map_err(missing)?;
    let file_size = file.metadata().await.map_err(missing)?.len();
    let plan = plan_range(range_header, file_size);
    let content_length = plan.content_length(file_size);

    match plan {
        RangePlan::Full => {
            debug!("streaming {} ({file_size} bytes)", path.display());
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, VIDEO_CONTENT_TYPE.to_string()),
                    (header::CONTENT_LENGTH, file_size.to_string()),
                ],
                Body::from_stream(ReaderStream::new(file)),
            )
                .into_response())
        }
        RangePlan::Partial { start, end } => {
            debug!("streaming {} bytes {start}-{end}/{file_size}", path.display());
            file.seek(SeekFrom::Start(start)).await.map_err(missing)?;
            Ok((
                StatusCode::PARTIAL_CONTENT,
                [
                    (
                        header::CONTENT_RANGE,
                        format!("bytes {start}-{end}/{file_size}"),
                    ),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                    (header::CONTENT_LENGTH, content_length.to_string()),
                    (header::CONTENT_TYPE, VIDEO_CONTENT_TYPE.to_string()),
                ],
                Body::from_stream(ReaderStream::new(file.take(content_length))),
            )
                .into_response())
        }
        RangePlan::Unsatisfiable => Err(MediaError::RangeNotSatisfiable { file_size }),
    }
}

/// Renders the presentation page.  The push client connects to `ws_port` on
/// whatever host the page itself was loaded from.
pub fn presentation_page(ws_port: u16) -> String {
    PAGE_TEMPLATE.replace("{{WS_PORT}}", &ws_port.to_string())
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <title>OSC Video Player</title>
    <style>
      html, body { margin: 0; height: 100%; background: #000; }
      video { width: 100%; height: 100%; }
    </style>
  </head>
  <body>
    <video id="video" muted controls>
      <source src="/video" type="video/mp4">
    </video>
    <script>
      const video = document.getElementById('video');
      const wsPort = {{WS_PORT}};

      function connect() {
        const ws = new WebSocket('ws://' + location.hostname + ':' + wsPort);
        ws.onopen = () => console.log('push channel connected on port ' + wsPort);
        ws.onmessage = e => {
          const msg = JSON.parse(e.data);
          switch (msg.command) {
            case 'set-play-pos':
              video.currentTime = msg.data;
              break;
            case 'reload-video':
              video.load();
              break;
          }
        };
        ws.onclose = () => setTimeout(connect, 1000);
      }
      connect();
    </script>
  </body>
</html>
"#;

// ── Tests ─────────────────────────────────────────────────────────────────────
