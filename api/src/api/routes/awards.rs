use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use bson::oid::ObjectId;
use chrono::Utc;

use crate::api::auth::AuthData;
use crate::api::error::{ApiError, Result};
use crate::database::Award;
use crate::global::Global;

#[derive(serde::Deserialize)]
pub struct TrackAwardRequest {
    #[serde(default)]
    pub opportunity_title: String,
    #[serde(default)]
    pub amount_awarded: i64,
    #[serde(default)]
    pub agency: String,
}

#[derive(serde::Serialize)]
pub struct TrackAwardResponse {
    pub success: bool,
    pub award_id: String,
}

pub async fn track_award(
    State(global): State<Arc<Global>>,
    auth: Option<Extension<AuthData>>,
    Json(request): Json<TrackAwardRequest>,
) -> Result<Json<TrackAwardResponse>> {
    let Some(Extension(auth)) = auth else {
        return Err(ApiError::Authentication("Authentication required"));
    };

    let award = Award {
        id: ObjectId::new(),
        user_id: auth.user.id,
        opportunity_title: request.opportunity_title,
        amount_awarded: request.amount_awarded,
        agency: request.agency,
        award_date: Utc::now(),
        verified: false,
    };

    Award::insert(global.database(), &award).await?;

    Ok(Json(TrackAwardResponse {
        success: true,
        award_id: award.id.to_hex(),
    }))
}
