//! HTTP endpoint for the subcalc CIDR calculator
//!
//! Routes:
//!
//! - `GET|HEAD /<family>/<address>/<prefix>` - block summary as JSON
//! - `GET|HEAD /<family>/<address>/<prefix>/print` - summary plus a streamed
//!   `net_list` array of every address in the block
//! - `GET /healthz` - liveness probe
//!
//! Methods other than GET and HEAD get `405` on any path, before the path
//! is looked at. Malformed paths and unknown families get `404`, invalid
//! addresses and prefixes `400`.
//!
//! # Examples
//!
//! ```no_run
//! use subcalc_core::config::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! subcalc_http::serve(ServerConfig::from_env()?).await?;
//! # Ok(())
//! # }
//! ```

use axum::{
    body::Body,
    extract::Path,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use futures::stream;
use std::convert::Infallible;
use std::net::SocketAddr;
use subcalc_cidr::{compute_block, open_enumerator, ResponseChunks};
use subcalc_core::config::ServerConfig;
use subcalc_core::SubcalcError;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

pub mod request;

use request::{CalcPath, CalcRequest};

/// Content type of every successful response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Server loop failed
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Calculation error rendered as a plain-text response
#[derive(Debug)]
pub struct ApiError(SubcalcError);

impl ApiError {
    /// Status code for an error kind
    pub fn status(&self) -> StatusCode {
        match self.0 {
            SubcalcError::InvalidPath(_) => StatusCode::NOT_FOUND,
            SubcalcError::InvalidAddress(_)
            | SubcalcError::InvalidPrefix(_)
            | SubcalcError::InvalidMask(_)
            | SubcalcError::InvalidHostCount(_) => StatusCode::BAD_REQUEST,
            SubcalcError::EncodeFailure(_) | SubcalcError::SinkFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SubcalcError> for ApiError {
    fn from(err: SubcalcError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        (status, format!("{}\r\n", self.0)).into_response()
    }
}

/// Build the application router
pub fn router() -> Router {
    Router::new()
        .route("/healthz", get(healthz).fallback(method_not_allowed))
        .route(
            "/:family/:address/:prefix",
            get(calculate).fallback(method_not_allowed),
        )
        .route(
            "/:family/:address/:prefix/:mode",
            get(calculate).fallback(method_not_allowed),
        )
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn calculate(Path(path): Path<CalcPath>) -> std::result::Result<Response, ApiError> {
    let request = CalcRequest::try_from(path)?;
    let block = compute_block(request.family, &request.address, request.prefix_bits)?;

    let body = if request.print {
        let chunks = ResponseChunks::new(&block, Some(open_enumerator(&block)))?;
        let batches = chunks.map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk)));
        Body::from_stream(stream::iter(batches))
    } else {
        let mut chunks = ResponseChunks::new(&block, None)?;
        Body::from(chunks.next().unwrap_or_default())
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
        body,
    )
        .into_response())
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        "This method is not allowed\n",
    )
}

/// Unmatched requests: the method is checked before the path
async fn fallback(method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return method_not_allowed().await.into_response();
    }
    ApiError::from(SubcalcError::InvalidPath(format!("invalid uri {}", uri.path())))
        .into_response()
}

/// Serve the endpoint until interrupted
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(addr = %addr, "Starting HTTP server");
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down HTTP server"),
        Err(e) => {
            warn!(error = %e, "Unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
