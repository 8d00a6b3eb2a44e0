use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};

use crate::api::auth::AuthData;
use crate::api::error::Result;
use crate::api::routes::opportunities::ListingQuery;
use crate::database::PlanType;
use crate::global::Global;
use crate::listing::{self, RatedOpportunity};

#[derive(serde::Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub organization_name: String,
    pub plan_type: PlanType,
    pub trial_end: DateTime<Utc>,
}

#[derive(serde::Serialize)]
pub struct DashboardResponse {
    pub user: UserSummary,
    pub opportunities: Vec<RatedOpportunity>,
}

pub async fn dashboard(
    State(global): State<Arc<Global>>,
    auth: Option<Extension<AuthData>>,
    Query(query): Query<ListingQuery>,
) -> Result<Response> {
    let Some(Extension(auth)) = auth else {
        return Ok(Redirect::to("/login").into_response());
    };

    let opportunities = listing::list(&global, query.difficulty).await?;

    Ok(Json(DashboardResponse {
        user: UserSummary {
            id: auth.user.id.to_hex(),
            email: auth.user.email,
            organization_name: auth.user.organization_name,
            plan_type: auth.session.plan_type,
            trial_end: auth.user.trial_end,
        },
        opportunities,
    })
    .into_response())
}
