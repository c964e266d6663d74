use crate::server::Server as DetectorServer;
use axum::{
    extract::Extension, http::header::CONTENT_TYPE, response::IntoResponse, routing::get,
    AddExtensionLayer, Json, Router, Server,
};
use http::{HeaderMap, HeaderValue, StatusCode};
use std::net::{IpAddr, SocketAddr};
use vspd_common::error::Error;

pub mod exposition;

#[derive(Debug, Serialize)]
pub(crate) struct Status {
    reporting_stale: bool,
    samples: usize,
}

pub(crate) fn router(detector: DetectorServer) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/status", get(status))
        .layer(AddExtensionLayer::new(detector))
}

/// Binds the scrape endpoint and serves it in the background.
/// # Errors
/// Returns error if the address can't be bound.
pub(crate) fn spawn(detector: DetectorServer, address: IpAddr, port: u16) -> Result<(), Error> {
    let addr = SocketAddr::new(address, port);
    let server = Server::try_bind(&addr)
        .map_err(|e| Error::failed(format!("can't bind http api to {}: {}", addr, e)))?
        .serve(router(detector).into_make_service());

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("http api server stopped: {}", e);
        }
    });

    info!("API server started on {}", addr);
    Ok(())
}

async fn metrics(
    Extension(detector): Extension<DetectorServer>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let body = exposition::render(detector.registry()).map_err(|e| {
        error!("{}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&exposition::content_type())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    headers.insert(CONTENT_TYPE, content_type);
    Ok((headers, body))
}

async fn status(Extension(detector): Extension<DetectorServer>) -> Json<Status> {
    let (reporting_stale, generation) = detector.buffer().snapshot();
    Json(Status {
        reporting_stale,
        samples: generation.len(),
    })
}
