use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::global::Global;
use crate::metrics::{self, PlatformMetrics};

pub async fn metrics(State(global): State<Arc<Global>>) -> Json<PlatformMetrics> {
    Json(metrics::current(global.database()).await)
}
