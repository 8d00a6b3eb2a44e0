use mongodb::Database;

use crate::config::{AppConfig, OpportunitySource};

mod application;
mod award;
mod opportunity;
mod session;
mod subscription;
mod user;

pub use application::Application;
pub use award::Award;
pub use opportunity::Opportunity;
pub use session::Session;
pub use subscription::{PlanType, Subscription, SubscriptionStatus};
pub use user::User;

/// Creates the indexes for every collection and, when the database listing
/// source is selected, seeds the sample opportunities into an empty
/// collection.
pub async fn setup_collections(
    database: &Database,
    config: &AppConfig,
) -> Result<(), mongodb::error::Error> {
    User::setup_collection(database).await?;
    Session::setup_collection(database).await?;
    Subscription::setup_collection(database).await?;
    Opportunity::setup_collection(database).await?;
    Application::setup_collection(database).await?;
    Award::setup_collection(database).await?;

    if config.opportunities.source == OpportunitySource::Database && config.opportunities.seed_samples
    {
        Opportunity::seed_samples(database).await?;
    }

    Ok(())
}
