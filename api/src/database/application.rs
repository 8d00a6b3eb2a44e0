use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use mongodb::{Database, IndexModel};

use crate::generator::GeneratedApplication;

/// A generated grant application, kept for the user's records and for the
/// platform counters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    /// The identifier the client asked to generate for. Free-form; sample
    /// listings use short numeric strings.
    pub opportunity_id: String,
    pub content: GeneratedApplication,
    pub created_at: DateTime<Utc>,
}

impl Application {
    fn collection(database: &Database) -> mongodb::Collection<Application> {
        database.collection("applications")
    }

    pub async fn setup_collection(database: &Database) -> Result<(), mongodb::error::Error> {
        Self::collection(database)
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! {
                        "user_id": 1,
                        "created_at": -1,
                    })
                    .build(),
                None,
            )
            .await?;

        Ok(())
    }

    pub async fn insert(
        database: &Database,
        application: &Application,
    ) -> Result<(), mongodb::error::Error> {
        Self::collection(database)
            .insert_one(application, None)
            .await?;

        Ok(())
    }

    pub async fn count(database: &Database) -> Result<u64, mongodb::error::Error> {
        Self::collection(database).count_documents(None, None).await
    }
}
