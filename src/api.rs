use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::error::WrappedError;
use crate::etherscan::EtherscanClient;
use crate::models::Insight;
use crate::wrapped;

#[derive(Deserialize)]
pub struct WrappedQuery {
    #[serde(default)]
    pub address: String,
}

#[derive(Serialize)]
pub struct WrappedResponse {
    pub address: String,
    pub slides: Vec<Insight>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

pub fn router(client: EtherscanClient, cancel: CancellationToken) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let client = Arc::new(client);

    Router::new()
        .route("/", get(|| async { "Wallet Wrapped API running" }))
        .route("/wrapped", get({
            let client = Arc::clone(&client);
            move |q: Query<WrappedQuery>| {
                let client = Arc::clone(&client);
                let cancel = cancel.child_token();
                async move { get_wrapped(client, &q.address, cancel).await }
            }
        }))
        .layer(cors)
}

pub async fn serve(cfg: Config, client: EtherscanClient, cancel: CancellationToken) -> eyre::Result<()> {
    let app = router(client, cancel.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], cfg.port));
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    Ok(())
}

async fn get_wrapped(
    client: Arc<EtherscanClient>,
    address: &str,
    cancel: CancellationToken,
) -> Response {
    match wrapped::get_wrapped(&client, address, &Local::now(), &cancel).await {
        Ok(slides) => Json(WrappedResponse {
            address: address.trim().to_string(),
            slides,
        })
        .into_response(),
        Err(e) => {
            error!("Wrapped failed for {:?}: {}", address, e);
            let status = match e {
                WrappedError::MissingAddress => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ErrorResponse { error: e.user_message() })).into_response()
        }
    }
}
