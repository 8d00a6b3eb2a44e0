use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    /// The unique identifier for the user.
    pub id: ObjectId,
    /// The email of the user, lowercased. Unique across the collection.
    pub email: String,
    /// The hashed password of the user. (argon2)
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_name: String,
    /// The role of the user within their organization.
    pub role: String,
    /// The time the user was created.
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    /// The trial window granted at signup.
    pub trial_start: DateTime<Utc>,
    pub trial_end: DateTime<Utc>,
}

impl User {
    fn collection(database: &Database) -> mongodb::Collection<User> {
        database.collection("users")
    }

    pub async fn setup_collection(database: &Database) -> Result<(), mongodb::error::Error> {
        // The registration flow also checks for an existing email before
        // inserting, but that check is not atomic. The unique index is what
        // actually holds the invariant.
        Self::collection(database)
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! {
                        "email": 1,
                    })
                    .options(Some(IndexOptions::builder().unique(true).build()))
                    .build(),
                None,
            )
            .await?;

        Ok(())
    }

    pub async fn insert(database: &Database, user: &User) -> Result<(), mongodb::error::Error> {
        Self::collection(database).insert_one(user, None).await?;

        Ok(())
    }

    pub async fn find_by_email(
        database: &Database,
        email: &str,
    ) -> Result<Option<User>, mongodb::error::Error> {
        Self::collection(database)
            .find_one(bson::doc! { "email": email }, None)
            .await
    }

    pub async fn find_by_id(
        database: &Database,
        id: ObjectId,
    ) -> Result<Option<User>, mongodb::error::Error> {
        Self::collection(database)
            .find_one(bson::doc! { "_id": id }, None)
            .await
    }

    pub async fn count_active(database: &Database) -> Result<u64, mongodb::error::Error> {
        Self::collection(database)
            .count_documents(bson::doc! { "is_active": true }, None)
            .await
    }

    /// Uses argon2 to verify the password hash against the provided password.
    pub fn verify_password(&self, password: &str) -> bool {
        let hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!("failed to parse password hash: {}", err);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    }

    /// Generates a new password hash using argon2.
    pub fn hash_password(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("failed to hash password");

        hash.to_string()
    }

    /// Validates an email.
    pub fn validate_email(email: &str) -> Result<(), &'static str> {
        if email.len() < 5 {
            return Err("Email must be at least 5 characters long");
        }

        if email.len() > 100 {
            return Err("Email must be at most 100 characters long");
        }

        if !email_address::EmailAddress::is_valid(email) {
            return Err("Email is not a valid email address");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_password(password: &str) -> User {
        let now = Utc::now();
        User {
            id: ObjectId::new(),
            email: "a@b.com".to_string(),
            password_hash: User::hash_password(password),
            first_name: String::new(),
            last_name: String::new(),
            organization_name: "Org".to_string(),
            role: "admin".to_string(),
            created_at: now,
            is_active: true,
            trial_start: now,
            trial_end: now + chrono::Duration::days(7),
        }
    }

    #[test]
    fn password_hash_verifies() {
        let user = user_with_password("hunter2");

        assert_ne!(user.password_hash, "hunter2");
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let mut user = user_with_password("hunter2");
        user.password_hash = "not-a-phc-string".to_string();

        assert!(!user.verify_password("hunter2"));
    }

    #[test]
    fn email_validation() {
        assert!(User::validate_email("a@b.com").is_ok());
        assert!(User::validate_email("grants@example.org").is_ok());
        assert!(User::validate_email("").is_err());
        assert!(User::validate_email("a@b").is_err());
        assert!(User::validate_email("no-at-sign.com").is_err());
    }
}
