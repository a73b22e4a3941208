/**
 * Admin Accounts and Database Operations
 *
 * This module is the account store the role gate consults on every
 * protected request. It has a PostgreSQL implementation and an in-memory one
 * used in tests and when no database is configured.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::backend::error::StoreError;
use crate::shared::{AdminProfile, Role};

/// Admin account row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Stored role name, compared case-insensitively
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminRecord {
    /// Public view of the account, without the password hash
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields for an account that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

/// Replacement fields for an existing account
///
/// Names are replaced wholesale. `role` and `password_hash` keep the stored
/// value when `None`.
#[derive(Debug, Clone)]
pub struct AdminUpdate {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

/// Account store
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn create(&self, admin: NewAdmin) -> Result<AdminRecord, StoreError>;
    /// Every account, in ID order
    async fn list(&self) -> Result<Vec<AdminRecord>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<AdminRecord>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminRecord>, StoreError>;
    async fn update(&self, id: i64, update: AdminUpdate) -> Result<Option<AdminRecord>, StoreError>;
    async fn set_role(&self, id: i64, role: Role) -> Result<Option<AdminRecord>, StoreError>;
    async fn set_password(&self, id: i64, password_hash: String) -> Result<Option<AdminRecord>, StoreError>;
    /// Returns `false` if no account had that ID
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

const ADMIN_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, role, created_at, updated_at";

/// PostgreSQL account store
#[derive(Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn create(&self, admin: NewAdmin) -> Result<AdminRecord, StoreError> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO church_admins (username, email, password_hash, first_name, last_name, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {ADMIN_COLUMNS}"
        );
        sqlx::query_as::<_, AdminRecord>(&query)
            .bind(&admin.username)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(&admin.first_name)
            .bind(&admin.last_name)
            .bind(admin.role.as_str())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Username or email"))
    }

    async fn list(&self) -> Result<Vec<AdminRecord>, StoreError> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM church_admins ORDER BY id");
        let admins = sqlx::query_as::<_, AdminRecord>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(admins)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AdminRecord>, StoreError> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM church_admins WHERE id = $1");
        let admin = sqlx::query_as::<_, AdminRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AdminRecord>, StoreError> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM church_admins WHERE username = $1");
        let admin = sqlx::query_as::<_, AdminRecord>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn update(&self, id: i64, update: AdminUpdate) -> Result<Option<AdminRecord>, StoreError> {
        let query = format!(
            "UPDATE church_admins
             SET username = $2, email = $3, first_name = $4, last_name = $5,
                 role = COALESCE($6, role), password_hash = COALESCE($7, password_hash), updated_at = $8
             WHERE id = $1
             RETURNING {ADMIN_COLUMNS}"
        );
        sqlx::query_as::<_, AdminRecord>(&query)
            .bind(id)
            .bind(&update.username)
            .bind(&update.email)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(update.role.map(|role| role.as_str()))
            .bind(&update.password_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Username or email"))
    }

    async fn set_role(&self, id: i64, role: Role) -> Result<Option<AdminRecord>, StoreError> {
        let query = format!(
            "UPDATE church_admins SET role = $2, updated_at = $3 WHERE id = $1 RETURNING {ADMIN_COLUMNS}"
        );
        let admin = sqlx::query_as::<_, AdminRecord>(&query)
            .bind(id)
            .bind(role.as_str())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn set_password(&self, id: i64, password_hash: String) -> Result<Option<AdminRecord>, StoreError> {
        let query = format!(
            "UPDATE church_admins SET password_hash = $2, updated_at = $3 WHERE id = $1 RETURNING {ADMIN_COLUMNS}"
        );
        let admin = sqlx::query_as::<_, AdminRecord>(&query)
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM church_admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory account store
#[derive(Default)]
pub struct MemoryAdminStore {
    inner: RwLock<MemoryAdmins>,
}

#[derive(Default)]
struct MemoryAdmins {
    next_id: i64,
    rows: BTreeMap<i64, AdminRecord>,
}

impl MemoryAdminStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminStore for MemoryAdminStore {
    async fn create(&self, admin: NewAdmin) -> Result<AdminRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .rows
            .values()
            .any(|row| row.username == admin.username || row.email == admin.email);
        if taken {
            return Err(StoreError::Conflict("Username or email".to_string()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = AdminRecord {
            id: inner.next_id,
            username: admin.username,
            email: admin.email,
            password_hash: admin.password_hash,
            first_name: admin.first_name,
            last_name: admin.last_name,
            role: admin.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<AdminRecord>, StoreError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AdminRecord>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AdminRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .find(|row| row.username == username)
            .cloned())
    }

    async fn update(&self, id: i64, update: AdminUpdate) -> Result<Option<AdminRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .rows
            .values()
            .any(|row| row.id != id && (row.username == update.username || row.email == update.email));
        if taken {
            return Err(StoreError::Conflict("Username or email".to_string()));
        }

        Ok(inner.rows.get_mut(&id).map(|row| {
            row.username = update.username;
            row.email = update.email;
            row.first_name = update.first_name;
            row.last_name = update.last_name;
            if let Some(role) = update.role {
                row.role = role.as_str().to_string();
            }
            if let Some(password_hash) = update.password_hash {
                row.password_hash = password_hash;
            }
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn set_role(&self, id: i64, role: Role) -> Result<Option<AdminRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.get_mut(&id).map(|row| {
            row.role = role.as_str().to_string();
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn set_password(&self, id: i64, password_hash: String) -> Result<Option<AdminRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.get_mut(&id).map(|row| {
            row.password_hash = password_hash;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_admin(username: &str) -> NewAdmin {
        NewAdmin {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryAdminStore::new();
        let created = store.create(new_admin("pastor")).await.unwrap();
        assert_eq!(created.role, "Admin");

        let found = store.find_by_username("pastor").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(store.find_by_id(created.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicate_username() {
        let store = MemoryAdminStore::new();
        store.create(new_admin("pastor")).await.unwrap();
        let err = store.create(new_admin("pastor")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_memory_store_set_role_and_delete() {
        let store = MemoryAdminStore::new();
        let created = store.create(new_admin("deacon")).await.unwrap();

        let updated = store.set_role(created.id, Role::Moderator).await.unwrap().unwrap();
        assert_eq!(updated.role, "Moderator");

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
    }

    fn rename(username: &str) -> AdminUpdate {
        AdminUpdate {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: Some("Grace".to_string()),
            last_name: None,
            role: None,
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_update_keeps_role_and_hash_when_absent() {
        let store = MemoryAdminStore::new();
        let created = store.create(new_admin("deacon")).await.unwrap();

        let updated = store.update(created.id, rename("elder")).await.unwrap().unwrap();
        assert_eq!(updated.username, "elder");
        assert_eq!(updated.first_name.as_deref(), Some("Grace"));
        assert_eq!(updated.role, "Admin");
        assert_eq!(updated.password_hash, "hash");
        assert!(store.find_by_username("deacon").await.unwrap().is_none());

        assert!(store.update(created.id + 1, rename("ghost")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_update_rejects_taken_username() {
        let store = MemoryAdminStore::new();
        store.create(new_admin("pastor")).await.unwrap();
        let deacon = store.create(new_admin("deacon")).await.unwrap();

        let err = store.update(deacon.id, rename("pastor")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        // Keeping its own username is not a conflict
        assert!(store.update(deacon.id, rename("deacon")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_memory_store_list_and_set_password() {
        let store = MemoryAdminStore::new();
        let first = store.create(new_admin("pastor")).await.unwrap();
        store.create(new_admin("deacon")).await.unwrap();

        let usernames: Vec<_> = store.list().await.unwrap().into_iter().map(|a| a.username).collect();
        assert_eq!(usernames, vec!["pastor", "deacon"]);

        let reset = store.set_password(first.id, "new-hash".to_string()).await.unwrap().unwrap();
        assert_eq!(reset.password_hash, "new-hash");
        assert!(store.set_password(99, "x".to_string()).await.unwrap().is_none());
    }

    #[test]
    fn test_profile_omits_hash() {
        let now = Utc::now();
        let record = AdminRecord {
            id: 1,
            username: "pastor".to_string(),
            email: "pastor@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            first_name: None,
            last_name: None,
            role: "Admin".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&record.profile()).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
