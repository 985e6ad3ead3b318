//! File handlers: listing page, download and upload.

use std::io::{self, Read};
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{multipart::Field, Multipart, Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::file::{FileEntry, StoreReceipt};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::LanshareError;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Chunks buffered between the request body and the blocking writer.
const UPLOAD_CHANNEL_CAPACITY: usize = 8;

/// Generate a Content-Disposition header value for a download.
///
/// Control characters are dropped and quotes/backslashes replaced in the
/// plain `filename` parameter; non-ASCII names also get an RFC 5987
/// `filename*` parameter.
fn content_disposition_header(filename: &str, attachment: bool) -> String {
    let disposition = if attachment { "attachment" } else { "inline" };

    let is_plain = filename
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\');
    if is_plain {
        return format!("{disposition}; filename=\"{filename}\"");
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    format!(
        "{disposition}; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

/// Take a fresh listing on the blocking pool.
async fn list_files(state: &Arc<AppState>) -> Result<Vec<FileEntry>, ApiError> {
    let store = state.store.clone();
    let files = tokio::task::spawn_blocking(move || store.list()).await??;
    Ok(files)
}

/// GET / - Listing page.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let files = list_files(&state).await?;
    let page = state.pages.render_index(&files, None)?;
    Ok(Html(page))
}

/// GET /download/:filename - Stream a shared file.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let store = state.store.clone();
    let name = filename.clone();
    let resolved = match tokio::task::spawn_blocking(move || store.resolve(&name)).await? {
        Ok(resolved) if resolved.exists => resolved,
        Ok(_) => {
            tracing::debug!(filename = %filename, "Download target not found");
            return Err(ApiError::file_not_found(&filename));
        }
        Err(LanshareError::InvalidName(_)) => {
            tracing::warn!(filename = %filename, "Rejected download name");
            return Err(ApiError::file_not_found(&filename));
        }
        Err(e) => return Err(e.into()),
    };

    let response = ServeFile::new(&resolved.path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});

    // The file can disappear between the probe and the open.
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::file_not_found(&filename));
    }

    let mut response = response.map(Body::new);
    if response.status().is_success() {
        let disposition = content_disposition_header(&filename, state.force_download);
        let value = HeaderValue::from_str(&disposition).map_err(|e| {
            tracing::error!("Failed to build Content-Disposition: {}", e);
            ApiError::internal("Failed to build response")
        })?;
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

/// POST /upload - Store an uploaded file.
///
/// Request body: multipart/form-data with a "file" field. Without a file the
/// request is a no-op and redirects to the listing.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // Browsers submit an empty filename for an empty file input.
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => break,
        };

        let receipt = persist_field(&state, &filename, field).await?;
        tracing::info!(
            file = %receipt.name,
            bytes = receipt.bytes,
            "File uploaded"
        );

        let files = list_files(&state).await?;
        let page = state.pages.render_index(&files, Some(&receipt.message()))?;
        return Ok(Html(page).into_response());
    }

    tracing::debug!("Upload without a file part, redirecting to listing");
    Ok(Redirect::to("/").into_response())
}

/// Stream one multipart field into the store on the blocking pool.
async fn persist_field(
    state: &Arc<AppState>,
    filename: &str,
    mut field: Field<'_>,
) -> Result<StoreReceipt, ApiError> {
    let (tx, rx) = mpsc::channel(UPLOAD_CHANNEL_CAPACITY);
    let store = state.store.clone();
    let name = filename.to_string();
    let writer =
        tokio::task::spawn_blocking(move || store.store(&name, ChannelReader::new(rx)));

    let mut read_error = None;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                // A closed channel means the writer already failed; its result says why.
                if tx.send(Ok(chunk)).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                let abort = io::Error::new(io::ErrorKind::UnexpectedEof, e.to_string());
                let _ = tx.send(Err(abort)).await;
                read_error = Some(e);
                break;
            }
        }
    }
    drop(tx);

    let result = writer.await?;
    if let Some(e) = read_error {
        tracing::warn!(filename, error = %e, "Upload aborted");
        return Err(ApiError::bad_request("Failed to read upload"));
    }

    Ok(result?)
}

/// Blocking [`Read`] over body chunks sent from the async side.
struct ChannelReader {
    rx: mpsc::Receiver<io::Result<Bytes>>,
    pending: Bytes,
}

impl ChannelReader {
    fn new(rx: mpsc::Receiver<io::Result<Bytes>>) -> Self {
        Self {
            rx,
            pending: Bytes::new(),
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pending.is_empty() {
            match self.rx.blocking_recv() {
                Some(Ok(chunk)) => self.pending = chunk,
                Some(Err(e)) => return Err(e),
                None => return Ok(0),
            }
        }

        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending.split_to(n));
        Ok(n)
    }
}
