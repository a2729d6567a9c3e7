use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use storefront_core::OrderId;
use storefront_infra::store::OrderStore;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_all_orders))
        .route("/get-all-own-orders", get(list_own_orders))
        .route("/:id", get(get_order))
}

/// Admin-only global listing.
pub async fn list_all_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&ctx) {
        return resp;
    }

    match services.store.all_orders().await {
        Ok(orders) => (
            StatusCode::OK,
            Json(serde_json::json!({ "items": orders })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_own_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    match services.store.orders_for_user(ctx.user_id()).await {
        Ok(orders) => (
            StatusCode::OK,
            Json(serde_json::json!({ "items": orders })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let order = match services.store.find_order(order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found")
        }
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(resp) = authz::require_owner_or_admin(&ctx, order.user_id()) {
        return resp;
    }

    (StatusCode::OK, Json(order)).into_response()
}
