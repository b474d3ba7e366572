use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use engine::{LoanService, LoanStore};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::{health, loans};

#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<LoanService<LoanStore>>,
}

/// CORS policy for the given origins. An empty list allows any origin.
fn cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route("/loans", get(loans::list).post(loans::create))
        .route("/loans/summary", get(loans::summary))
        .route(
            "/loans/{loan_number}",
            get(loans::get).put(loans::update).delete(loans::delete),
        )
        .route("/health", get(health::get));

    Router::new().nest("/api/v1", api).with_state(state)
}

/// Builds the HTTP application around a loan service.
pub fn app(service: LoanService<LoanStore>, allowed_origins: &[String]) -> Router {
    let state = ServerState {
        service: Arc::new(service),
    };

    router(state)
        .layer(cors(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_with_listener(
    service: LoanService<LoanStore>,
    allowed_origins: Vec<String>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(service, &allowed_origins)).await
}
