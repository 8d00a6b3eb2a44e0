use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use serde_json::json;

use crate::api::auth::AuthData;
use crate::global::Global;
use crate::metrics;

/// Homepage payload, or a bounce to the dashboard for signed-in browsers.
pub async fn homepage(
    State(global): State<Arc<Global>>,
    auth: Option<Extension<AuthData>>,
) -> Response {
    if auth.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let metrics = metrics::current(global.database()).await;

    Json(json!({
        "metrics": metrics,
        "stripe_publishable_key": global.config().stripe.publishable_key,
    }))
    .into_response()
}
