//! PostgreSQL Repository Implementations

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PermissionId, RoleId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::entity::role::{Permission, Role};
use crate::domain::repository::{AccountRepository, RoleRepository};
use crate::domain::value_object::{email::Email, totp_secret::TotpSecret};
use crate::error::{AuthError, AuthResult};
use platform::password::HashedPassword;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete accounts whose activation token expired without being used
    pub async fn cleanup_unactivated(&self) -> AuthResult<u64> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM accounts
            WHERE is_active = FALSE AND activation_token_expires_at < $1
            "#,
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(accounts_deleted = deleted, "Cleaned up unactivated accounts");

        Ok(deleted)
    }

    async fn load_roles(&self, account_id: &AccountId) -> AuthResult<BTreeSet<RoleId>> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            "SELECT role_id FROM account_roles WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RoleId::from_uuid).collect())
    }

    async fn hydrate(&self, row: AccountRow) -> AuthResult<Account> {
        let roles = self.load_roles(&AccountId::from_uuid(row.account_id)).await?;
        row.into_account(roles)
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                password_hash,
                totp_secret,
                two_factor_enabled,
                is_active,
                activation_token_hash,
                activation_token_expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.totp_secret.as_base32())
        .bind(account.two_factor_enabled)
        .bind(account.is_active)
        .bind(account.activation_token_hash.as_ref().map(|h| h.to_vec()))
        .bind(account.activation_token_expires_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        for role_id in &account.roles {
            sqlx::query("INSERT INTO account_roles (account_id, role_id) VALUES ($1, $2)")
                .bind(account.account_id.as_uuid())
                .bind(role_id.as_uuid())
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                password_hash,
                totp_secret,
                two_factor_enabled,
                is_active,
                activation_token_hash,
                activation_token_expires_at,
                created_at,
                updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                password_hash,
                totp_secret,
                two_factor_enabled,
                is_active,
                activation_token_hash,
                activation_token_expires_at,
                created_at,
                updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_activation_hash(&self, hash: &[u8; 32]) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                password_hash,
                totp_secret,
                two_factor_enabled,
                is_active,
                activation_token_hash,
                activation_token_expires_at,
                created_at,
                updated_at
            FROM accounts
            WHERE activation_token_hash = $1
            "#,
        )
        .bind(hash.to_vec())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                email = $2,
                password_hash = $3,
                totp_secret = $4,
                two_factor_enabled = $5,
                is_active = $6,
                activation_token_hash = $7,
                activation_token_expires_at = $8,
                updated_at = $9
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.totp_secret.as_base32())
        .bind(account.two_factor_enabled)
        .bind(account.is_active)
        .bind(account.activation_token_hash.as_ref().map(|h| h.to_vec()))
        .bind(account.activation_token_expires_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        // Re-sync role membership
        sqlx::query("DELETE FROM account_roles WHERE account_id = $1")
            .bind(account.account_id.as_uuid())
            .execute(&self.pool)
            .await?;

        for role_id in &account.roles {
            sqlx::query("INSERT INTO account_roles (account_id, role_id) VALUES ($1, $2)")
                .bind(account.account_id.as_uuid())
                .bind(role_id.as_uuid())
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgAuthRepository {
    async fn find_role_by_name(&self, name: &str) -> AuthResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, name FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let permissions = self.role_permissions(row.role_id).await?;
                Ok(Some(row.into_role(permissions)))
            }
            None => Ok(None),
        }
    }

    async fn create_role(&self, role: &Role) -> AuthResult<()> {
        sqlx::query("INSERT INTO roles (role_id, name) VALUES ($1, $2)")
            .bind(role.role_id.as_uuid())
            .bind(&role.name)
            .execute(&self.pool)
            .await?;

        for permission_id in &role.permissions {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)",
            )
            .bind(role.role_id.as_uuid())
            .bind(permission_id.as_uuid())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn create_permission(&self, permission: &Permission) -> AuthResult<()> {
        sqlx::query("INSERT INTO permissions (permission_id, name) VALUES ($1, $2)")
            .bind(permission.permission_id.as_uuid())
            .bind(&permission.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_roles(&self, ids: &BTreeSet<RoleId>) -> AuthResult<Vec<Role>> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, name FROM roles WHERE role_id = ANY($1)",
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;

        let mut roles = Vec::with_capacity(rows.len());
        for row in rows {
            let permissions = self.role_permissions(row.role_id).await?;
            roles.push(row.into_role(permissions));
        }

        Ok(roles)
    }

    async fn find_permissions(&self, ids: &BTreeSet<PermissionId>) -> AuthResult<Vec<Permission>> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT permission_id, name FROM permissions WHERE permission_id = ANY($1)",
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PermissionRow::into_permission).collect())
    }
}

impl PgAuthRepository {
    async fn role_permissions(&self, role_id: Uuid) -> AuthResult<BTreeSet<PermissionId>> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            "SELECT permission_id FROM role_permissions WHERE role_id = $1",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PermissionId::from_uuid).collect())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    password_hash: String,
    totp_secret: String,
    two_factor_enabled: bool,
    is_active: bool,
    activation_token_hash: Option<Vec<u8>>,
    activation_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self, roles: BTreeSet<RoleId>) -> AuthResult<Account> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        let activation_token_hash = self
            .activation_token_hash
            .map(|bytes| {
                <[u8; 32]>::try_from(bytes)
                    .map_err(|_| AuthError::Internal("Invalid activation hash length".to_string()))
            })
            .transpose()?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            password_hash,
            totp_secret: TotpSecret::from_base32(self.totp_secret)?,
            two_factor_enabled: self.two_factor_enabled,
            is_active: self.is_active,
            activation_token_hash,
            activation_token_expires_at: self.activation_token_expires_at,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    role_id: Uuid,
    name: String,
}

impl RoleRow {
    fn into_role(self, permissions: BTreeSet<PermissionId>) -> Role {
        Role {
            role_id: RoleId::from_uuid(self.role_id),
            name: self.name,
            permissions,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PermissionRow {
    permission_id: Uuid,
    name: String,
}

impl PermissionRow {
    fn into_permission(self) -> Permission {
        Permission {
            permission_id: PermissionId::from_uuid(self.permission_id),
            name: self.name,
        }
    }
}
