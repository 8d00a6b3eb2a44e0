use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Opportunity {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// The identifier the source registry knows this opportunity by.
    pub opportunity_id: String,
    pub title: String,
    pub agency: String,
    pub description: String,
    /// Maximum award amount in whole dollars.
    pub amount_max: i64,
    /// Human-readable deadline as published by the registry.
    pub deadline: String,
    pub url: String,
    pub is_active: bool,
}

impl Opportunity {
    fn collection(database: &Database) -> mongodb::Collection<Opportunity> {
        database.collection("opportunities")
    }

    pub async fn setup_collection(database: &Database) -> Result<(), mongodb::error::Error> {
        let collection = Self::collection(database);

        collection
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! {
                        "opportunity_id": 1,
                    })
                    .options(Some(IndexOptions::builder().unique(true).build()))
                    .build(),
                None,
            )
            .await?;

        collection
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! {
                        "agency": 1,
                    })
                    .build(),
                None,
            )
            .await?;

        Ok(())
    }

    pub async fn find_all(database: &Database) -> Result<Vec<Opportunity>, mongodb::error::Error> {
        Self::collection(database)
            .find(bson::doc! { "is_active": true }, None)
            .await?
            .try_collect()
            .await
    }

    /// Inserts the sample records into an empty collection.
    pub async fn seed_samples(database: &Database) -> Result<(), mongodb::error::Error> {
        let collection = Self::collection(database);

        if collection.count_documents(None, None).await? > 0 {
            return Ok(());
        }

        tracing::info!("seeding sample opportunities");
        collection.insert_many(Self::samples(), None).await?;

        Ok(())
    }

    /// The fixed records served when the sample listing source is selected.
    pub fn samples() -> Vec<Opportunity> {
        vec![
            Opportunity {
                id: ObjectId::new(),
                opportunity_id: "1".to_string(),
                title: "NSF SBIR Phase II: Machine Learning Platform".to_string(),
                agency: "National Science Foundation".to_string(),
                description: "Develop advanced machine learning platform for scientific research \
                              requiring university partnership, IRB approval, and prior federal \
                              grant experience."
                    .to_string(),
                amount_max: 5_000_000,
                deadline: "November 15, 2025".to_string(),
                url: "https://grants.gov/example1".to_string(),
                is_active: true,
            },
            Opportunity {
                id: ObjectId::new(),
                opportunity_id: "2".to_string(),
                title: "Rural Community Development Initiative".to_string(),
                agency: "Department of Agriculture".to_string(),
                description: "Support rural community development projects with local economic \
                              impact including detailed budget and work plan requirements."
                    .to_string(),
                amount_max: 250_000,
                deadline: "October 30, 2025".to_string(),
                url: "https://grants.gov/example2".to_string(),
                is_active: true,
            },
            Opportunity {
                id: ObjectId::new(),
                opportunity_id: "3".to_string(),
                title: "DOD Cybersecurity Research Consortium".to_string(),
                agency: "Department of Defense".to_string(),
                description: "Multi-organization consortium for cybersecurity research requiring \
                              security clearance, specialized expertise, and demonstrated track \
                              record."
                    .to_string(),
                amount_max: 15_000_000,
                deadline: "December 1, 2025".to_string(),
                url: "https://grants.gov/example3".to_string(),
                is_active: true,
            },
            Opportunity {
                id: ObjectId::new(),
                opportunity_id: "4".to_string(),
                title: "EPA Environmental Justice Community Grants".to_string(),
                agency: "Environmental Protection Agency".to_string(),
                description: "Small grants for community-based environmental justice initiatives \
                              requiring letters of support from community leaders."
                    .to_string(),
                amount_max: 50_000,
                deadline: "September 30, 2025".to_string(),
                url: "https://grants.gov/example4".to_string(),
                is_active: true,
            },
            Opportunity {
                id: ObjectId::new(),
                opportunity_id: "5".to_string(),
                title: "NIH Health Disparities Research".to_string(),
                agency: "National Institutes of Health".to_string(),
                description: "Research to address health disparities requiring university \
                              partnership, HIPAA compliance, IRB approval, and extensive data \
                              collection protocols."
                    .to_string(),
                amount_max: 3_500_000,
                deadline: "January 15, 2026".to_string(),
                url: "https://grants.gov/example5".to_string(),
                is_active: true,
            },
        ]
    }
}
