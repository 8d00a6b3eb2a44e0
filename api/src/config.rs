use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::database::PlanType;

#[derive(Debug, Clone, PartialEq)]
/// The API is the backend for the GrantAI Pro service
pub struct AppConfig {
    /// Name of this instance
    pub name: String,

    /// The logging config
    pub logging: LoggingConfig,

    /// API Config
    pub api: ApiConfig,

    /// Database Config
    pub database: DatabaseConfig,

    /// JWT Config
    pub jwt: JwtConfig,

    /// Session / login config
    pub auth: AuthConfig,

    /// Trial subscription config
    pub trial: TrialConfig,

    /// Opportunity listing config
    pub opportunities: OpportunitiesConfig,

    /// Application generator strategy
    pub generator: GeneratorKind,

    /// Stripe keys, pass-through only
    pub stripe: StripeConfig,

    /// grants.gov registry key, pass-through only
    pub grants_gov_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// The log level to use, this is a tracing env filter
    pub level: String,

    /// If we should use JSON output for the logs
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Bind address for the API
    pub bind_address: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// The database URL to use
    pub uri: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017/grantai".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JwtConfig {
    /// JWT secret
    pub secret: String,

    /// JWT issuer
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "dev-key-change-in-production".to_string(),
            issuer: "grantai".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    /// How long a session stays valid, in seconds
    pub session_validity_secs: i64,

    /// Where the plan type on a fresh login session comes from
    pub plan_source: PlanSource,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_validity_secs: 60 * 60 * 24 * 7, // 7 days
            plan_source: PlanSource::Fixed,
        }
    }
}

/// The deployed version hardcodes "professional" on login, the setup-guide
/// version reads the subscription record. Both behaviors are kept behind
/// this switch until product picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    Fixed,
    Subscription,
}

impl FromStr for PlanSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "subscription" => Ok(Self::Subscription),
            _ => Err(anyhow!("unknown plan source: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialConfig {
    /// Length of the trial window in days
    pub days: i64,

    /// Plan type granted for the trial
    pub plan_type: PlanType,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            days: 7,
            plan_type: PlanType::Professional,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpportunitiesConfig {
    /// Where listings come from
    pub source: OpportunitySource,

    /// Seed the sample records into an empty collection at startup when
    /// the database source is selected
    pub seed_samples: bool,
}

impl Default for OpportunitiesConfig {
    fn default() -> Self {
        Self {
            source: OpportunitySource::Sample,
            seed_samples: true,
        }
    }
}

/// The two observed versions of the listing disagree: one serves a fixed
/// sample list, the other queries the opportunities collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpportunitySource {
    Sample,
    Database,
}

impl FromStr for OpportunitySource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sample" => Ok(Self::Sample),
            "database" => Ok(Self::Database),
            _ => Err(anyhow!("unknown opportunity source: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Constant-returning placeholder
    Static,
}

impl FromStr for GeneratorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "static" => Ok(Self::Static),
            _ => Err(anyhow!("unknown generator kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub publishable_key: Option<String>,
}

impl StripeConfig {
    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "grantai-api".to_string(),
            logging: LoggingConfig::default(),
            api: ApiConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            auth: AuthConfig::default(),
            trial: TrialConfig::default(),
            opportunities: OpportunitiesConfig::default(),
            generator: GeneratorKind::Static,
            stripe: StripeConfig::default(),
            grants_gov_api_key: None,
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Builds the config from the environment on top of the defaults.
    pub fn parse() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_var("GRANTAI_NAME") {
            config.name = v;
        }
        if let Some(v) = env_var("LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = env_var("LOG_JSON") {
            config.logging.json = v.parse().context("LOG_JSON")?;
        }
        if let Some(v) = env_var("BIND_ADDRESS") {
            config.api.bind_address = v.parse().context("BIND_ADDRESS")?;
        }
        if let Some(v) = env_var("PORT") {
            let port: u16 = v.parse().context("PORT")?;
            config.api.bind_address.set_port(port);
        }
        if let Some(v) = env_var("MONGO_URI") {
            config.database.uri = v;
        }
        if let Some(v) = env_var("SECRET_KEY") {
            config.jwt.secret = v;
        }
        if let Some(v) = env_var("JWT_ISSUER") {
            config.jwt.issuer = v;
        }
        if let Some(v) = env_var("SESSION_VALIDITY_SECS") {
            config.auth.session_validity_secs = v.parse().context("SESSION_VALIDITY_SECS")?;
        }
        if let Some(v) = env_var("LOGIN_PLAN_SOURCE") {
            config.auth.plan_source = v.parse().context("LOGIN_PLAN_SOURCE")?;
        }
        if let Some(v) = env_var("TRIAL_DAYS") {
            config.trial.days = v.parse().context("TRIAL_DAYS")?;
        }
        if let Some(v) = env_var("TRIAL_PLAN_TYPE") {
            config.trial.plan_type = v.parse().context("TRIAL_PLAN_TYPE")?;
        }
        if let Some(v) = env_var("OPPORTUNITY_SOURCE") {
            config.opportunities.source = v.parse().context("OPPORTUNITY_SOURCE")?;
        }
        if let Some(v) = env_var("SEED_SAMPLE_OPPORTUNITIES") {
            config.opportunities.seed_samples = v.parse().context("SEED_SAMPLE_OPPORTUNITIES")?;
        }
        if let Some(v) = env_var("GENERATOR") {
            config.generator = v.parse().context("GENERATOR")?;
        }
        config.stripe.secret_key = env_var("STRIPE_SECRET_KEY");
        config.stripe.publishable_key = env_var("STRIPE_PUBLISHABLE_KEY");
        config.grants_gov_api_key = env_var("GRANTS_GOV_API_KEY");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();

        assert_eq!(config.api.bind_address.port(), 5000);
        assert_eq!(config.database.uri, "mongodb://localhost:27017/grantai");
        assert_eq!(config.trial.days, 7);
        assert_eq!(config.trial.plan_type, PlanType::Professional);
        assert_eq!(config.auth.plan_source, PlanSource::Fixed);
        assert_eq!(config.opportunities.source, OpportunitySource::Sample);
        assert!(!config.stripe.is_configured());
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!(
            "database".parse::<OpportunitySource>().unwrap(),
            OpportunitySource::Database
        );
        assert_eq!(
            "subscription".parse::<PlanSource>().unwrap(),
            PlanSource::Subscription
        );
        assert_eq!("static".parse::<GeneratorKind>().unwrap(), GeneratorKind::Static);
        assert!("magic".parse::<OpportunitySource>().is_err());
        assert!("magic".parse::<PlanSource>().is_err());
    }

    #[serial]
    #[test]
    fn environment_overrides() {
        std::env::set_var("PORT", "8080");
        std::env::set_var("MONGO_URI", "mongodb://db:27017/grantai_test");
        std::env::set_var("OPPORTUNITY_SOURCE", "database");

        let config = AppConfig::parse().unwrap();

        std::env::remove_var("PORT");
        std::env::remove_var("MONGO_URI");
        std::env::remove_var("OPPORTUNITY_SOURCE");

        assert_eq!(config.api.bind_address.port(), 8080);
        assert_eq!(config.database.uri, "mongodb://db:27017/grantai_test");
        assert_eq!(config.opportunities.source, OpportunitySource::Database);
    }

    #[serial]
    #[test]
    fn invalid_environment_is_an_error() {
        std::env::set_var("PORT", "not-a-port");

        let result = AppConfig::parse();

        std::env::remove_var("PORT");

        assert!(result.is_err());
    }
}
