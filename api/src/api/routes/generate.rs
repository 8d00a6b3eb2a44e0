use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use bson::oid::ObjectId;
use chrono::Utc;

use crate::api::auth::AuthData;
use crate::api::error::{ApiError, Result};
use crate::database::{Application, Subscription};
use crate::generator::{ApplicationGenerator, GeneratedApplication};
use crate::global::Global;

#[derive(serde::Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub opportunity_id: String,
}

#[derive(serde::Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub content: GeneratedApplication,
    pub message: &'static str,
}

pub async fn generate_application(
    State(global): State<Arc<Global>>,
    auth: Option<Extension<AuthData>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let Some(Extension(auth)) = auth else {
        return Err(ApiError::Authentication("Authentication required"));
    };

    let content = global
        .generator()
        .generate(&request.opportunity_id)
        .await
        .map_err(|err| {
            tracing::error!("generator failed: {err}");
            ApiError::Internal("application generation failed")
        })?;

    // Bookkeeping only; the response payload is the contract.
    if let Err(err) = record_generation(&global, &auth, &request.opportunity_id, &content).await {
        tracing::warn!("failed to record generated application: {err}");
    }

    Ok(Json(GenerateResponse {
        success: true,
        content,
        message: "Application generated successfully!",
    }))
}

async fn record_generation(
    global: &Arc<Global>,
    auth: &AuthData,
    opportunity_id: &str,
    content: &GeneratedApplication,
) -> Result<(), mongodb::error::Error> {
    Application::insert(
        global.database(),
        &Application {
            id: ObjectId::new(),
            user_id: auth.user.id,
            opportunity_id: opportunity_id.to_string(),
            content: content.clone(),
            created_at: Utc::now(),
        },
    )
    .await?;

    Subscription::increment_usage(global.database(), auth.user.id).await?;

    Ok(())
}
