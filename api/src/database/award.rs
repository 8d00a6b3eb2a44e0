use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use mongodb::{Database, IndexModel};

/// A user-reported award. Inserted unverified; verification is a manual
/// process that happens outside this service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Award {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub opportunity_title: String,
    /// Awarded amount in whole dollars, as reported by the user.
    pub amount_awarded: i64,
    pub agency: String,
    pub award_date: DateTime<Utc>,
    pub verified: bool,
}

impl Award {
    fn collection(database: &Database) -> mongodb::Collection<Award> {
        database.collection("awards")
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

    pub async fn insert(database: &Database, award: &Award) -> Result<(), mongodb::error::Error> {
        Self::collection(database).insert_one(award, None).await?;

        Ok(())
    }
}
