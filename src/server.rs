//! HTTP scrape endpoint.
//!
//! Every `GET`, whatever the path, polls the probe and answers with the
//! exposition text. Only [`Error::ProbeUnavailable`] is turned into a 500;
//! any other failure is returned to hyper, which drops the connection.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::ble::gatttool::ProbeTool;
use crate::error::{Error, Result};
use crate::metrics::format_metrics;
use crate::probe::ProbeReader;

/// Response produced by every request handler.
pub type HttpResponse = Response<Full<Bytes>>;

/// Accept connections until `shutdown` resolves.
///
/// Each connection is served on its own task.
pub async fn serve<T, F>(
    listener: TcpListener,
    reader: Arc<ProbeReader<T>>,
    shutdown: F,
) -> Result<()>
where
    T: ProbeTool + 'static,
    F: Future<Output = ()>,
{
    info!("Starting webserver on http://{}", listener.local_addr()?);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down webserver");
                return Ok(());
            }
            val = listener.accept() => {
                match val {
                    Ok((stream, addr)) => {
                        debug!("Accepted connection from {}", addr);
                        tokio::task::spawn(handle_connection(stream, reader.clone()));
                    }
                    Err(e) => {
                        warn!("failed to accept: {:?}", e);
                        continue;
                    }
                }
            }
        }
    }
}

async fn handle_connection<T: ProbeTool + 'static>(
    stream: TcpStream,
    reader: Arc<ProbeReader<T>>,
) {
    let io = TokioIo::new(stream);
    let service = service_fn(move |r| handle_request(r, reader.clone()));

    if let Err(e) = hyper::server::conn::http1::Builder::new()
        .serve_connection(io, service)
        .await
    {
        error!("connection error: {:?}", e);
    }
}

/// Answer one request.
///
/// # Errors
///
/// Every reader error except [`Error::ProbeUnavailable`] is passed through.
pub async fn handle_request<B, T: ProbeTool>(
    r: Request<B>,
    reader: Arc<ProbeReader<T>>,
) -> Result<HttpResponse> {
    if r.method() != Method::GET {
        return Ok(text_response(
            StatusCode::NOT_IMPLEMENTED,
            format!("Unsupported method ('{}')", r.method()),
        ));
    }
    debug!("GET {}", r.uri());

    match reader.read().await {
        Ok(reading) => Ok(text_response(StatusCode::OK, format_metrics(&reading))),
        Err(e @ Error::ProbeUnavailable { .. }) => {
            error!("Probe unavailable: {}", e);
            Ok(text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
        Err(e) => Err(e),
    }
}

/// Build a `text/plain` response.
pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    let mut r = Response::new(Full::new(body.into()));
    *r.status_mut() = status;
    r.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    r
}
