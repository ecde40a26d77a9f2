// HTTP and WebSocket APIs

pub mod error;
pub mod query;
pub mod websocket;

pub use error::ApiError;
pub use query::{create_query_router, QueryAppState};
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::state::PlantStore;
use crate::subscription::BroadcastHub;
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

/// Full application router: REST reads, acknowledgement and the /ws stream
pub fn create_app(store: Arc<PlantStore>, hub: Arc<BroadcastHub>) -> Router {
    let query_state = Arc::new(QueryAppState { store });
    let ws_state = Arc::new(WsAppState { hub });

    Router::new()
        .merge(create_query_router(query_state))
        .merge(create_ws_router(ws_state))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(CorsLayer::permissive())
}
