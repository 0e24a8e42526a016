//! HTTP surface of the statement service.
//!
//! One service value routes every endpoint internally by path. Handlers run
//! the store lookup and the render pipeline sequentially on the connection
//! task; there is no cross-request state beyond the store itself.

use crate::model::{ReportDefinition, StatementRow};
use crate::pdf::StatementRenderer;
use crate::store::Store;
use crate::{Error, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// The statement API: document store plus the renderer configured at startup.
/// Cheap to clone, one clone per connection.
#[derive(Debug, Clone)]
pub struct Api {
    store: Store,
    renderer: StatementRenderer,
}

impl Api {
    pub fn new(store: Store, renderer: StatementRenderer) -> Self {
        Self { store, renderer }
    }

    /// Binds `addr` and serves connections until the process is stopped.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("cannot bind {addr}: {e}")))?;
        info!("listening on http://{addr}");
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("failed to accept connection: {e}");
                    continue;
                }
            };
            let api = self.clone();
            tokio::task::spawn(async move {
                let io = TokioIo::new(stream);
                let handler = service_fn(move |request| {
                    let api = api.clone();
                    async move { Ok::<_, Infallible>(api.handle(request).await) }
                });
                if let Err(e) = http1::Builder::new().serve_connection(io, handler).await {
                    warn!("connection from {peer} ended with error: {e}");
                }
            });
        }
    }

    /// Routes one request to its handler and maps errors onto HTTP statuses.
    ///
    /// Generic over the body type so tests can drive the full routing path
    /// without a live connection.
    pub async fn handle<B>(&self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        match self.route(&method, &path, request).await {
            Ok(response) => {
                info!("{method} {path} -> {}", response.status());
                response
            }
            Err(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    error!("{method} {path} failed: {err}");
                } else {
                    info!("{method} {path} -> {status}: {err}");
                }
                error_response(status, &err)
            }
        }
    }

    async fn route<B>(
        &self,
        method: &Method,
        path: &str,
        request: Request<B>,
    ) -> Result<Response<Full<Bytes>>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        if method != Method::POST {
            return Ok(empty_response(StatusCode::METHOD_NOT_ALLOWED));
        }
        let body = read_body(request).await?;
        match path {
            "/api/pdf/store" => self.store_row(&body).await,
            "/api/pdf/definition/store" => self.store_definition(&body).await,
            "/api/pdf/generate" => self.generate_self_contained(&body),
            "/api/pdf/all-generate" => self.generate_all(&body).await,
            _ => match path.strip_prefix("/api/pdf/generate/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    self.generate_by_id(id, &body).await
                }
                _ => Ok(empty_response(StatusCode::NOT_FOUND)),
            },
        }
    }

    /// `POST /api/pdf/store` — persists one statement row.
    async fn store_row(&self, body: &[u8]) -> Result<Response<Full<Bytes>>> {
        let row: StatementRow = decode(body)?;
        let stored = self.store.save_row(row).await?;
        json_response(&stored)
    }

    /// `POST /api/pdf/definition/store` — persists one report definition.
    async fn store_definition(&self, body: &[u8]) -> Result<Response<Full<Bytes>>> {
        let definition: ReportDefinition = decode(body)?;
        let stored = self.store.save_definition(definition).await?;
        json_response(&stored)
    }

    /// `POST /api/pdf/generate/{id}` — renders the single stored row under
    /// the definition given in the body.
    async fn generate_by_id(&self, id: &str, body: &[u8]) -> Result<Response<Full<Bytes>>> {
        let definition: ReportDefinition = decode(body)?;
        let row = self
            .store
            .find_row(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no statement row with id {id}")))?;
        self.render_pdf(&definition, &[row])
    }

    /// `POST /api/pdf/all-generate` — renders every stored row under the
    /// definition given in the body.
    async fn generate_all(&self, body: &[u8]) -> Result<Response<Full<Bytes>>> {
        let definition: ReportDefinition = decode(body)?;
        let rows = self.store.all_rows().await?;
        if rows.is_empty() {
            return Err(Error::NotFound("no statement rows stored".into()));
        }
        self.render_pdf(&definition, &rows)
    }

    /// `POST /api/pdf/generate` — renders a definition that embeds its own
    /// rows, with no store lookup.
    fn generate_self_contained(&self, body: &[u8]) -> Result<Response<Full<Bytes>>> {
        let mut definition: ReportDefinition = decode(body)?;
        let rows = std::mem::take(&mut definition.rows);
        self.render_pdf(&definition, &rows)
    }

    fn render_pdf(
        &self,
        definition: &ReportDefinition,
        rows: &[StatementRow],
    ) -> Result<Response<Full<Bytes>>> {
        let rendered = self.renderer.render(definition, rows)?;
        if let Some(warning) = &rendered.warning {
            warn!("statement rendered with partial content: {warning}");
        }
        Ok(pdf_response(rendered.bytes))
    }
}

async fn read_body<B>(request: Request<B>) -> Result<Bytes>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    request
        .into_body()
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| Error::InvalidRequest(format!("failed to read request body: {e}")))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| Error::InvalidRequest(format!("malformed JSON body: {e}")))
}

fn json_response<T: Serialize>(value: &T) -> Result<Response<Full<Bytes>>> {
    let body = serde_json::to_vec(value)
        .map_err(|e| Error::Store(format!("failed to encode response: {e}")))?;
    let mut response = Response::new(Full::new(Bytes::from(body)));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

fn pdf_response(bytes: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_static("form-data; filename=generated.pdf"),
    );
    response
}

fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Not-found and server failures carry no body; only client mistakes get a
/// plain-text reason.
fn error_response(status: StatusCode, err: &Error) -> Response<Full<Bytes>> {
    let body = if status == StatusCode::BAD_REQUEST {
        Full::new(Bytes::from(err.to_string()))
    } else {
        Full::new(Bytes::new())
    };
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        Error::Render(_) | Error::Store(_) | Error::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
