use crate::types::{PreviewError, PreviewResult};
use axum::{
    body::Body,
    extract::{Path as AxumPath, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use codecheck_core::ENTRY_POINT_FILE;
use std::{
    io::ErrorKind,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    fs::File,
    io::{AsyncReadExt, BufReader},
    net::TcpListener,
    sync::oneshot,
    task::JoinHandle,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};

/// Configuration for the static file server
#[derive(Debug, Clone)]
pub struct StaticServerConfig {
    pub root_path: PathBuf,
    pub port: u16,
    pub host: String,
}

impl StaticServerConfig {
    pub fn new(root_path: PathBuf, port: u16) -> Self {
        Self {
            root_path,
            port,
            host: "127.0.0.1".to_string(),
        }
    }
}

/// Static file server for serving HTML/CSS/JS files
pub struct StaticServer {
    config: StaticServerConfig,
}

/// A running static server; stopping it closes the listener
pub struct StaticServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl StaticServer {
    pub fn new(config: StaticServerConfig) -> Self {
        Self { config }
    }

    /// Bind the listener and serve in a background task.
    ///
    /// Binding happens before this returns, so an occupied port is reported here.
    pub async fn start(self) -> PreviewResult<StaticServerHandle> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let port = self.config.port;

        let listener = TcpListener::bind(addr.as_str()).await.map_err(|e| match e.kind() {
            ErrorKind::AddrInUse | ErrorKind::PermissionDenied => PreviewError::PortInUse { port },
            _ => PreviewError::Io(e),
        })?;
        let local_addr = listener.local_addr()?;

        info!(
            "Starting static file server on {} serving {}",
            local_addr,
            self.config.root_path.display()
        );

        let app = self.create_router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                error!("Static file server stopped with error: {}", e);
            }
        });

        Ok(StaticServerHandle {
            addr: local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    /// Create the Axum router for serving files
    fn create_router(self) -> Router {
        let state = Arc::new(self.config);

        Router::new()
            .route("/", get(serve_index))
            .route("/{*path}", get(serve_file))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state)
    }
}

impl StaticServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Signal graceful shutdown and wait for the server task to finish
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!("Static file server task ended abnormally: {}", e);
        }
        debug!("Static file server on {} stopped", self.addr);
    }
}

/// Serve the index.html file for the root path
async fn serve_index(
    State(config): State<Arc<StaticServerConfig>>,
) -> Result<impl IntoResponse, StaticServerError> {
    let index_path = config.root_path.join(ENTRY_POINT_FILE);
    if !index_path.is_file() {
        return Err(StaticServerError::NotFound(ENTRY_POINT_FILE.to_string()));
    }
    serve_file_from_path(&index_path).await
}

/// Serve a specific file based on the request path
async fn serve_file(
    AxumPath(path): AxumPath<String>,
    State(config): State<Arc<StaticServerConfig>>,
) -> Result<impl IntoResponse, StaticServerError> {
    let requested_path = config.root_path.join(&path);

    debug!("Serving file: {} -> {}", path, requested_path.display());

    // The resolved path must stay inside the served root
    let canonical_root = config
        .root_path
        .canonicalize()
        .map_err(|e| StaticServerError::IoError(format!("Failed to canonicalize root: {}", e)))?;

    let canonical_requested = match requested_path.canonicalize() {
        Ok(path) => path,
        Err(_) => {
            return Err(StaticServerError::NotFound(path));
        }
    };

    if !canonical_requested.starts_with(&canonical_root) {
        warn!(
            "Attempted directory traversal attack: {}",
            requested_path.display()
        );
        return Err(StaticServerError::Forbidden);
    }

    // If the path is a directory, try to serve index.html from it
    if canonical_requested.is_dir() {
        let index_path = canonical_requested.join(ENTRY_POINT_FILE);
        if index_path.exists() {
            return serve_file_from_path(&index_path).await;
        } else {
            return Err(StaticServerError::NotFound(path));
        }
    }

    serve_file_from_path(&canonical_requested).await
}

/// Serve a file from a specific filesystem path
async fn serve_file_from_path(file_path: &Path) -> Result<impl IntoResponse, StaticServerError> {
    let file = File::open(file_path)
        .await
        .map_err(|e| StaticServerError::IoError(format!("Failed to open file: {}", e)))?;

    let mut reader = BufReader::new(file);
    let mut contents = Vec::new();
    reader
        .read_to_end(&mut contents)
        .await
        .map_err(|e| StaticServerError::IoError(format!("Failed to read file: {}", e)))?;

    let content_type = determine_content_type(file_path);
    let mut headers = HeaderMap::new();
    if let Ok(ct) = content_type.parse() {
        headers.insert(header::CONTENT_TYPE, ct);
    }

    if let Ok(value) = "nosniff".parse() {
        headers.insert(
            header::HeaderName::from_static("x-content-type-options"),
            value,
        );
    }

    Ok((headers, contents))
}

/// Determine the MIME content type based on file extension
fn determine_content_type(file_path: &Path) -> &'static str {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Error types for static server operations
#[derive(Debug)]
pub enum StaticServerError {
    NotFound(String),
    Forbidden,
    IoError(String),
}

impl IntoResponse for StaticServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            StaticServerError::NotFound(path) => {
                (StatusCode::NOT_FOUND, format!("File not found: {}", path))
            }
            StaticServerError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Access denied: path outside root directory".to_string(),
            ),
            StaticServerError::IoError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        debug!("Static server error: {} - {}", status, message);

        let body = Body::from(format!(
            "<!DOCTYPE html>\n<html><head><title>Error {code}</title></head>\n<body><h1>Error {code}</h1><p>{message}</p></body></html>",
            code = status.as_u16(),
            message = message
        ));

        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(body)
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Failed to build error response"))
                    .unwrap_or_default()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.html"), "<h1>Widgets</h1>").unwrap();
        fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
        fs::write(temp_dir.path().join("docs/index.html"), "<h1>Docs</h1>").unwrap();
        fs::write(temp_dir.path().join("app.css"), "body{}").unwrap();
        temp_dir
    }

    fn router(root: &Path) -> Router {
        StaticServer::new(StaticServerConfig::new(root.to_path_buf(), 0)).create_router()
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[test]
    fn test_determine_content_type() {
        assert_eq!(
            determine_content_type(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            determine_content_type(Path::new("styles.CSS")),
            "text/css; charset=utf-8"
        );
        assert_eq!(determine_content_type(Path::new("image.png")), "image/png");
        assert_eq!(
            determine_content_type(Path::new("unknown.xyz")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_router_serves_index_and_assets() {
        let temp_dir = site();
        assert_eq!(get_status(router(temp_dir.path()), "/").await, StatusCode::OK);
        assert_eq!(get_status(router(temp_dir.path()), "/app.css").await, StatusCode::OK);
        assert_eq!(get_status(router(temp_dir.path()), "/docs").await, StatusCode::OK);
        assert_eq!(
            get_status(router(temp_dir.path()), "/missing.js").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_router_blocks_traversal() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("site");
        fs::create_dir_all(&root).unwrap();
        fs::write(outer.path().join("secret.txt"), "nope").unwrap();

        let status = get_status(router(&root), "/%2E%2E/secret.txt").await;
        assert!(status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_start_reports_port_in_use() {
        let temp_dir = site();
        let first = StaticServer::new(StaticServerConfig::new(temp_dir.path().to_path_buf(), 0))
            .start()
            .await
            .unwrap();
        let port = first.local_addr().port();

        let second = StaticServer::new(StaticServerConfig::new(temp_dir.path().to_path_buf(), port))
            .start()
            .await;
        assert!(matches!(second, Err(PreviewError::PortInUse { port: p }) if p == port));

        first.stop().await;
    }
}
