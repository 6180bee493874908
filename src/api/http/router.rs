//! HTTP router and server setup.
//!
//! Supports both HTTP/1.1 and HTTP/2 on the same port using hyper-util's
//! auto connection builder for automatic protocol detection.

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper::{body::Incoming, header, Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as AutoBuilder;
use log::*;
use std::{convert::Infallible, io, sync::Arc};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener as TokioTcpListener;

use crate::config::Config;
use crate::db::Database;

use super::handlers::{
    handle_document, handle_rebuild, handle_search, json_response, metrics_snapshot,
};
use super::templates::HOME;
use crate::api::metrics::METRICS;

fn text_response(
    body: impl Into<Bytes>,
    content_type: &'static str,
    status: StatusCode,
) -> Response<Full<Bytes>> {
    let mut r = Response::new(Full::new(body.into()));
    *r.status_mut() = status;
    r.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(content_type),
    );
    r
}

/// Route HTTP requests to appropriate handlers.
async fn router(
    cfg: Arc<Config>,
    db: Arc<Database>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    debug!("{} {}", method, path);

    let resp = match (&method, path.as_str()) {
        (&Method::GET, "/") => text_response(
            Bytes::from_static(HOME.as_bytes()),
            "text/html; charset=utf-8",
            StatusCode::OK,
        ),
        (&Method::GET, "/api/search") => handle_search(db, &cfg.search, req).await,
        (&Method::GET, "/api/docs") => handle_document(db, req).await,
        (&Method::POST, "/api/rebuild") => handle_rebuild(db).await,
        (&Method::GET, "/api/metrics") => json_response(&metrics_snapshot(), StatusCode::OK),
        (&Method::GET, "/metrics") => text_response(
            METRICS.render_prometheus(),
            "text/plain; version=0.0.4",
            StatusCode::OK,
        ),
        (_, "/api/rebuild") => text_response(
            Bytes::from_static(b"method not allowed"),
            "text/plain",
            StatusCode::METHOD_NOT_ALLOWED,
        ),
        _ => text_response(
            Bytes::from_static(b"not found"),
            "text/plain",
            StatusCode::NOT_FOUND,
        ),
    };

    Ok(resp)
}

/// Handle an HTTP connection with automatic HTTP/1.1 and HTTP/2 detection.
pub async fn handle_http_connection<S>(
    stream: S,
    cfg: Arc<Config>,
    db: Arc<Database>,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    AutoBuilder::new(TokioExecutor::new())
        .serve_connection(
            io,
            service_fn(move |req| router(cfg.clone(), db.clone(), req)),
        )
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("http error: {}", e)))
}

/// Accept connections on an already bound listener until the task is dropped.
pub async fn serve_listener(listener: TokioTcpListener, cfg: Arc<Config>, db: Arc<Database>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(x) => x,
            Err(e) => {
                error!("accept error: {}", e);
                continue;
            }
        };
        let cfg = cfg.clone();
        let db = db.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_http_connection(stream, cfg, db).await {
                debug!("http connection error from {}: {}", peer, e);
            }
        });
    }
}

/// Start the HTTP server if one is configured.
///
/// Serves HTTP/1.1 and HTTP/2 (h2c) on the configured address.
pub async fn serve_http(cfg: Arc<Config>, db: Arc<Database>) -> io::Result<()> {
    let Some(http) = &cfg.http else {
        info!("http server disabled");
        return Ok(());
    };
    let addr: std::net::SocketAddr = http.bind_addr.parse().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid http bind addr {:?}: {}", http.bind_addr, e),
        )
    })?;
    let listener = TokioTcpListener::bind(&addr).await?;
    info!("http listening on {} (HTTP/1.1 + HTTP/2 h2c)", addr);
    serve_listener(listener, cfg.clone(), db).await;
    Ok(())
}
