//! Authentication test helpers
//!
//! Seeds accounts directly into the store and issues their tokens.

use chrono::{Duration, Utc};
use church_admin::backend::auth::{AdminStore, NewAdmin, TokenIssuer};
use church_admin::shared::Role;

pub const TEST_SECRET: &str = "test-access-secret";

/// A seeded account and a token for it
pub struct TestAdmin {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Create an account with `role` and issue it a token valid for an hour
pub async fn create_test_admin(
    admins: &dyn AdminStore,
    issuer: &TokenIssuer,
    username: &str,
    role: Role,
) -> TestAdmin {
    let password = format!("{}-password", username);
    // Minimum cost keeps the suite fast; verification works at any cost.
    let password_hash = bcrypt::hash(&password, 4).expect("Failed to hash test password");
    let record = admins
        .create(NewAdmin {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash,
            first_name: None,
            last_name: None,
            role,
        })
        .await
        .expect("Failed to create test admin");

    let token = issuer.issue(record.id, Utc::now()).expect("Failed to create test token");
    TestAdmin {
        id: record.id,
        username: record.username,
        password,
        token,
    }
}

/// A correctly signed token for `subject_id` whose expiry has already passed
pub fn expired_token(subject_id: i64) -> String {
    TokenIssuer::new(TEST_SECRET, Duration::hours(1))
        .issue(subject_id, Utc::now() - Duration::hours(2))
        .expect("Failed to create expired token")
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
