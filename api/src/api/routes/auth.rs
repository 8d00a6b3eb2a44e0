use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::{Extension, Json};
use bson::oid::ObjectId;
use chrono::Utc;

use crate::api::auth::AuthData;
use crate::api::error::{ApiError, Result};
use crate::api::jwt::AuthJwtPayload;
use crate::config::PlanSource;
use crate::database::{PlanType, Session, Subscription, User};
use crate::global::Global;

#[derive(serde::Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub organization_name: String,
}

#[derive(serde::Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub redirect: &'static str,
    pub token: String,
    pub user_id: String,
}

fn session_response(session: &Session, global: &Arc<Global>) -> Result<SessionResponse> {
    let token = AuthJwtPayload::from(session)
        .serialize(&global.config().jwt)
        .ok_or(ApiError::Internal("failed to serialize session token"))?;

    Ok(SessionResponse {
        success: true,
        redirect: "/dashboard",
        token,
        user_id: session.user_id.to_hex(),
    })
}

pub async fn signup(
    State(global): State<Arc<Global>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SessionResponse>> {
    let email = request.email.trim().to_lowercase();

    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation("Email and password required"));
    }

    User::validate_email(&email).map_err(ApiError::Validation)?;

    let database = global.database();

    // Best-effort check; the unique index on email is the backstop for
    // concurrent signups racing past it.
    if User::find_by_email(database, &email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let trial = &global.config().trial;
    let now = Utc::now();

    let user = User {
        id: ObjectId::new(),
        email,
        password_hash: User::hash_password(&request.password),
        first_name: request.first_name,
        last_name: request.last_name,
        organization_name: request.organization_name,
        role: "admin".to_string(),
        created_at: now,
        is_active: true,
        trial_start: now,
        trial_end: now + chrono::Duration::days(trial.days),
    };

    User::insert(database, &user).await?;

    // Not transactional with the user insert; a crash here leaves a user
    // without a subscription.
    let subscription = Subscription::start_trial(user.id, trial.plan_type, trial.days);
    Subscription::insert(database, &subscription).await?;

    let session = Session::create(
        database,
        &user,
        trial.plan_type,
        global.config().auth.session_validity_secs,
    )
    .await?;

    tracing::info!(user_id = %user.id, "registered new user");

    Ok(Json(session_response(&session, &global)?))
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(global): State<Arc<Global>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let email = request.email.trim().to_lowercase();

    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation("Email and password required"));
    }

    let database = global.database();

    // Same error for an unknown email and a wrong password.
    let user = User::find_by_email(database, &email)
        .await?
        .ok_or(ApiError::Authentication("Invalid email or password"))?;

    if !user.verify_password(&request.password) {
        return Err(ApiError::Authentication("Invalid email or password"));
    }

    let plan_type = session_plan_type(&global, &user).await?;

    let session = Session::create(
        database,
        &user,
        plan_type,
        global.config().auth.session_validity_secs,
    )
    .await?;

    Ok(Json(session_response(&session, &global)?))
}

async fn session_plan_type(global: &Arc<Global>, user: &User) -> Result<PlanType> {
    match global.config().auth.plan_source {
        PlanSource::Fixed => Ok(global.config().trial.plan_type),
        PlanSource::Subscription => Ok(Subscription::find_by_user(global.database(), user.id)
            .await?
            .map(|subscription| subscription.plan_type)
            .unwrap_or(global.config().trial.plan_type)),
    }
}

/// Clears the presented session. Safe to call without one.
pub async fn logout(
    State(global): State<Arc<Global>>,
    auth: Option<Extension<AuthData>>,
) -> Result<Redirect> {
    if let Some(Extension(auth)) = auth {
        Session::delete(global.database(), auth.session.id).await?;
    }

    Ok(Redirect::to("/"))
}
