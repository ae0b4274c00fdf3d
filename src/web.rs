//! HTTP front end
//!
//! - `GET /` - upload form
//! - `POST /` - multipart upload (`file`, `size` in MB), renders the outcome
//! - `GET /download/{filename}` - stored artifact as an attachment, falling
//!   back to `{filename}.zip`
//! - `GET /static/...` - preview copies
//! - `GET /health` - liveness

use crate::config::ServerConfig;
use crate::constants::{ARCHIVE_EXTENSION, ERROR_PREFIX};
use crate::dispatch::dispatch;
use crate::error::CompressionError;
use crate::formats::AssetKind;
use crate::storage::{PreviewPair, StorageDirs};
use crate::target::{CompressionMethod, CompressionResult, CompressionTarget};
use crate::utils::format_file_size;
use askama::Template;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub dirs: Arc<StorageDirs>,
}

/// Errors that escape a handler instead of being rendered into the page
#[derive(Debug, Error)]
pub enum WebError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Compression(#[from] CompressionError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(name) => {
                info!(filename = %name, "download target missing");
                (StatusCode::NOT_FOUND, format!("File not found: {}", name)).into_response()
            }
            other => {
                error!("Internal service error: {:#}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

#[derive(Template, Default)]
#[template(path = "index.html")]
struct IndexTemplate {
    original: Option<String>,
    compressed: Option<String>,
    done: bool,
    download_url: Option<String>,
    summary: Option<String>,
    error: Option<String>,
}

impl IndexTemplate {
    fn completed(outcome: &UploadOutcome) -> Self {
        let download_url = format!(
            "/download/{}",
            urlencoding::encode(&outcome.result.file_name())
        );
        let (original, compressed) = match &outcome.preview {
            Some(pair) => (
                Some(format!("/static/{}", urlencoding::encode(&pair.original))),
                Some(format!("/static/{}", urlencoding::encode(&pair.compressed))),
            ),
            None => (None, None),
        };

        Self {
            original,
            compressed,
            done: true,
            download_url: Some(download_url),
            summary: Some(format!("{}: {}", outcome.filename, describe(&outcome.result))),
            error: None,
        }
    }

    fn failed(err: &CompressionError) -> Self {
        Self {
            error: Some(format!("{} Compression failed: {}", ERROR_PREFIX, err)),
            ..Self::default()
        }
    }
}

fn describe(result: &CompressionResult) -> String {
    match &result.method {
        CompressionMethod::Recompressed { quality, met, .. } => format!(
            "Re-encoded at quality {} ({}), target {}",
            quality,
            format_file_size(result.size),
            if *met { "met" } else { "not reached" }
        ),
        CompressionMethod::Archived { .. } => {
            format!("archived as zip ({})", format_file_size(result.size))
        }
    }
}

/// Everything produced for one successful upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub filename: String,
    pub result: CompressionResult,
    pub preview: Option<PreviewPair>,
}

/// Store, compress and (for images) publish previews for one upload.
///
/// Blocking; run it off the async executor.
pub fn handle_upload(
    dirs: &StorageDirs,
    declared_name: &str,
    bytes: &[u8],
    target: CompressionTarget,
) -> Result<UploadOutcome, CompressionError> {
    let asset = dirs.ingest(declared_name, bytes)?;
    info!(
        filename = %asset.filename,
        stored = %asset.stored_name,
        kind = %asset.kind,
        size = asset.size,
        target = target.bytes(),
        "processing upload"
    );

    let result = dispatch(&asset, target, &dirs.compressed)?;
    let preview = if asset.kind.is_image() {
        match dirs.publish_preview(&asset, &result) {
            Ok(pair) => Some(pair),
            Err(err) => {
                // no download link is rendered for a failed upload
                if let Err(cleanup) = std::fs::remove_file(&result.stored) {
                    warn!(error = %cleanup, stored = ?result.stored, "could not remove orphaned result");
                }
                return Err(err);
            }
        }
    } else {
        None
    };

    Ok(UploadOutcome {
        filename: asset.filename,
        result,
        preview,
    })
}

struct UploadForm {
    filename: String,
    bytes: Vec<u8>,
    target: CompressionTarget,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, CompressionError> {
    let mut file = None;
    let mut size = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        CompressionError::UnsupportedParameter(format!("invalid form data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    CompressionError::UnsupportedParameter(format!("failed to read upload: {}", e))
                })?;
                file = Some((filename, bytes.to_vec()));
            }
            "size" => {
                let text = field.text().await.map_err(|e| {
                    CompressionError::UnsupportedParameter(format!("invalid size field: {}", e))
                })?;
                size = Some(text);
            }
            _ => {}
        }
    }

    let size = size.ok_or_else(|| {
        CompressionError::UnsupportedParameter("missing target size".to_string())
    })?;
    let target = size.parse::<CompressionTarget>()?;
    let (filename, bytes) =
        file.ok_or_else(|| CompressionError::UnsupportedParameter("no file uploaded".to_string()))?;

    Ok(UploadForm {
        filename,
        bytes,
        target,
    })
}

async fn process_upload(
    state: &AppState,
    multipart: Multipart,
) -> Result<UploadOutcome, CompressionError> {
    let form = read_form(multipart).await?;
    let dirs = Arc::clone(&state.dirs);

    tokio::task::spawn_blocking(move || {
        handle_upload(&dirs, &form.filename, &form.bytes, form.target)
    })
    .await
    .map_err(|e| CompressionError::Io(std::io::Error::other(e)))?
}

fn render(template: IndexTemplate) -> Result<Html<String>, WebError> {
    Ok(Html(template.render()?))
}

async fn index() -> Result<Html<String>, WebError> {
    render(IndexTemplate::default())
}

async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, WebError> {
    let template = match process_upload(&state, multipart).await {
        Ok(outcome) => IndexTemplate::completed(&outcome),
        Err(err) if err.is_io() => {
            error!(error = %err, "storage failure while handling upload");
            IndexTemplate::failed(&err)
        }
        Err(err) => {
            warn!(error = %err, "compression failed");
            IndexTemplate::failed(&err)
        }
    };
    render(template)
}

async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, WebError> {
    let (path, attachment_name) = state
        .dirs
        .resolve_download(&filename)
        .ok_or_else(|| WebError::NotFound(filename.clone()))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| WebError::Compression(e.into()))?;

    info!(filename = %filename, served = ?path, size = bytes.len(), "serving download");

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(&attachment_name)),
        ),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&attachment_name),
        ),
    ];
    Ok((headers, bytes).into_response())
}

async fn health() -> &'static str {
    "ok"
}

fn content_type_for(name: &str) -> &'static str {
    if name
        .to_lowercase()
        .ends_with(&format!(".{}", ARCHIVE_EXTENSION))
    {
        return "application/zip";
    }
    match AssetKind::from_filename(name) {
        AssetKind::Image(kind) => kind.mime_type(),
        _ => "application/octet-stream",
    }
}

/// `attachment` disposition with an ASCII fallback name plus the RFC 5987 form.
fn content_disposition(name: &str) -> HeaderValue {
    let fallback: String = name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(name)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Build the application router around injected storage directories.
pub fn create_router(config: &ServerConfig) -> Router {
    let state = AppState {
        dirs: Arc::new(config.dirs.clone()),
    };

    Router::new()
        .route("/", get(index).post(upload))
        .route("/download/{filename}", get(download))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(&config.dirs.public))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the storage directories, bind and serve until the process ends.
pub async fn serve(config: ServerConfig) -> crate::error::Result<()> {
    config.dirs.ensure()?;
    let addr = config.socket_addr()?;
    let app = create_router(&config);

    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        uploads = ?config.dirs.uploads,
        compressed = ?config.dirs.compressed,
        public = ?config.dirs.public,
        "server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
