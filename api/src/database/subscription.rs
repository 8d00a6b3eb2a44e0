use std::str::FromStr;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use mongodb::{Database, IndexModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Basic,
    Professional,
    Premium,
}

impl FromStr for PlanType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "professional" => Ok(Self::Professional),
            "premium" => Ok(Self::Premium),
            _ => Err(anyhow::anyhow!("unknown plan type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// The only status the signup flow ever writes. Paid statuses belong
    /// to the billing integration, which lives outside this service.
    Trial,
    Active,
    Canceled,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Subscription {
    #[serde(rename = "_id")]
    /// The unique identifier for the subscription.
    pub id: ObjectId,
    /// The owning user. A separate top-level document, correlated by id;
    /// the store does not enforce the reference.
    pub user_id: ObjectId,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    /// The time the trial window closes. Nothing enforces it yet.
    pub trial_end: DateTime<Utc>,
    /// How many applications have been generated under this subscription.
    pub applications_used: i64,
    /// The time the subscription was created.
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    fn collection(database: &Database) -> mongodb::Collection<Subscription> {
        database.collection("subscriptions")
    }

    pub async fn setup_collection(database: &Database) -> Result<(), mongodb::error::Error> {
        Self::collection(database)
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! {
                        "user_id": 1,
                    })
                    .build(),
                None,
            )
            .await?;

        Ok(())
    }

    /// Builds the trial subscription document written once per signup.
    pub fn start_trial(user_id: ObjectId, plan_type: PlanType, trial_days: i64) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: ObjectId::new(),
            user_id,
            plan_type,
            status: SubscriptionStatus::Trial,
            trial_end: now + chrono::Duration::days(trial_days),
            applications_used: 0,
            created_at: now,
        }
    }

    pub async fn insert(
        database: &Database,
        subscription: &Subscription,
    ) -> Result<(), mongodb::error::Error> {
        Self::collection(database)
            .insert_one(subscription, None)
            .await?;

        Ok(())
    }

    pub async fn find_by_user(
        database: &Database,
        user_id: ObjectId,
    ) -> Result<Option<Subscription>, mongodb::error::Error> {
        Self::collection(database)
            .find_one(bson::doc! { "user_id": user_id }, None)
            .await
    }

    /// Bumps the applications-used counter. Returns whether a subscription
    /// document was updated.
    pub async fn increment_usage(
        database: &Database,
        user_id: ObjectId,
    ) -> Result<bool, mongodb::error::Error> {
        let result = Self::collection(database)
            .update_one(
                bson::doc! {
                    "user_id": user_id,
                },
                bson::doc! {
                    "$inc": {
                        "applications_used": 1,
                    },
                },
                None,
            )
            .await?;

        Ok(result.modified_count == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_starts_clean() {
        let user_id = ObjectId::new();
        let subscription = Subscription::start_trial(user_id, PlanType::Professional, 7);

        assert_eq!(subscription.user_id, user_id);
        assert_eq!(subscription.status, SubscriptionStatus::Trial);
        assert_eq!(subscription.applications_used, 0);
        assert!(subscription.trial_end > subscription.created_at);
        assert!(
            subscription.trial_end - subscription.created_at <= chrono::Duration::days(7)
        );
    }
}
