use std::time::Duration;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Database, IndexModel};

use super::{PlanType, User};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    /// The unique identifier for the session.
    pub id: ObjectId,
    /// The user this session belongs to.
    pub user_id: ObjectId,
    /// Copied from the user at login time.
    pub email: String,
    /// The plan the session was established under.
    pub plan_type: PlanType,
    /// The time the session stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The time the session was last used.
    pub last_used_at: DateTime<Utc>,
}

impl Session {
    fn collection(database: &Database) -> mongodb::Collection<Session> {
        database.collection("sessions")
    }

    pub async fn setup_collection(database: &Database) -> Result<(), mongodb::error::Error> {
        let collection = Self::collection(database);

        collection
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! {
                        "user_id": 1,
                    })
                    .build(),
                None,
            )
            .await?;

        // Expired sessions are rejected by `is_valid` either way; the TTL
        // index only keeps the collection from growing forever.
        collection
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! {
                        "expires_at": 1,
                    })
                    .options(Some(
                        IndexOptions::builder()
                            .expire_after(Some(Duration::from_secs(0)))
                            .build(),
                    ))
                    .build(),
                None,
            )
            .await?;

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }

    /// Creates a new session for the user and returns it.
    pub async fn create(
        database: &Database,
        user: &User,
        plan_type: PlanType,
        validity_secs: i64,
    ) -> Result<Session, mongodb::error::Error> {
        let now = Utc::now();
        let session = Session {
            id: ObjectId::new(),
            user_id: user.id,
            email: user.email.clone(),
            plan_type,
            expires_at: now + chrono::Duration::seconds(validity_secs),
            last_used_at: now,
        };

        Self::collection(database).insert_one(&session, None).await?;

        Ok(session)
    }

    /// Fetches a session by id, bumping its last used time.
    pub async fn find_and_touch(
        database: &Database,
        id: ObjectId,
    ) -> Result<Option<Session>, mongodb::error::Error> {
        Self::collection(database)
            .find_one_and_update(
                bson::doc! {
                    "_id": id,
                },
                bson::doc! {
                    "$set": {
                        "last_used_at": Utc::now(),
                    },
                },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
    }

    /// Deletes the session. Returns whether a document was removed.
    pub async fn delete(database: &Database, id: ObjectId) -> Result<bool, mongodb::error::Error> {
        let result = Self::collection(database)
            .delete_one(
                bson::doc! {
                    "_id": id,
                },
                None,
            )
            .await?;

        Ok(result.deleted_count == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_follows_expiry() {
        let now = Utc::now();
        let mut session = Session {
            id: ObjectId::new(),
            user_id: ObjectId::new(),
            email: "a@b.com".to_string(),
            plan_type: PlanType::Professional,
            expires_at: now + chrono::Duration::hours(1),
            last_used_at: now,
        };

        assert!(session.is_valid());

        session.expires_at = now - chrono::Duration::seconds(1);
        assert!(!session.is_valid());
    }
}
