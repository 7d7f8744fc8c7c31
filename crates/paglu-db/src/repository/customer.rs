//! # Customer Repository
//!
//! Registered customers, their saved shipping addresses, admin roles and
//! password-reset tokens.
//!
//! Customers are written when signup is finalized. Emails are unique;
//! a second registration for the same email surfaces as
//! [`DbError::UniqueViolation`]. Deleting a customer removes their saved
//! addresses and leaves their products without an owner.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use paglu_core::{
    Address, AddressBook, Customer, CustomerAccount, CustomerRole, ResetToken, SavedAddress,
};

const CUSTOMER_COLUMNS: &str = "id, user_name, email, password_hash, is_verified, role, created_at";

#[derive(Debug, Clone, sqlx::FromRow)]
struct CustomerRecord {
    id: String,
    user_name: String,
    email: String,
    password_hash: String,
    is_verified: bool,
    role: CustomerRole,
    created_at: DateTime<Utc>,
}

impl From<CustomerRecord> for Customer {
    fn from(r: CustomerRecord) -> Self {
        Customer {
            id: r.id,
            user_name: r.user_name,
            email: r.email,
            password_hash: r.password_hash,
            is_verified: r.is_verified,
            role: r.role,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct AccountRecord {
    #[sqlx(flatten)]
    customer: CustomerRecord,
    is_active: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ResetRecord {
    #[sqlx(flatten)]
    customer: CustomerRecord,
    reset_token: String,
    reset_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct AddressRecord {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    address: String,
    city: String,
    state: String,
    zip_code: String,
}

impl From<AddressRecord> for SavedAddress {
    fn from(r: AddressRecord) -> Self {
        SavedAddress {
            id: r.id,
            address: Address {
                first_name: r.first_name,
                last_name: r.last_name,
                email: r.email,
                phone: r.phone,
                address: r.address,
                city: r.city,
                state: r.state,
                zip_code: r.zip_code,
            },
        }
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, email = %customer.email, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, user_name, email, password_hash, is_verified, role, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.user_name)
        .bind(&customer.email)
        .bind(&customer.password_hash)
        .bind(customer.is_verified)
        .bind(customer.role)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &customer.email),
            other => other,
        })?;

        Ok(())
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE id = ?1", CUSTOMER_COLUMNS);
        let record = sqlx::query_as::<_, CustomerRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Customer::from))
    }

    /// Finds a customer by email (exact match).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE email = ?1", CUSTOMER_COLUMNS);
        let record = sqlx::query_as::<_, CustomerRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Customer::from))
    }

    pub async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE email = ?1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    // =========================================================================
    // Admin Console
    // =========================================================================

    /// Lists every customer with whether they own a product, oldest first.
    pub async fn list_accounts(&self) -> DbResult<Vec<CustomerAccount>> {
        let records = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT c.id, c.user_name, c.email, c.password_hash, c.is_verified, c.role,
                   c.created_at,
                   EXISTS(SELECT 1 FROM products p WHERE p.owner_id = c.id) AS is_active
            FROM customers c
            ORDER BY c.created_at, c.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| CustomerAccount {
                customer: r.customer.into(),
                is_active: r.is_active,
            })
            .collect())
    }

    pub async fn update_role(&self, id: &str, role: CustomerRole) -> DbResult<()> {
        debug!(id = %id, role = %role, "Updating customer role");

        let result = sqlx::query("UPDATE customers SET role = ?2 WHERE id = ?1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Deletes a customer. Returns `false` if absent.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Stores a reset token, replacing any earlier one.
    pub async fn set_reset_token(&self, customer_id: &str, token: &ResetToken) -> DbResult<()> {
        debug!(customer_id = %customer_id, expires_at = %token.expires_at, "Storing reset token");

        let result = sqlx::query(
            "UPDATE customers SET reset_token = ?2, reset_token_expires_at = ?3 WHERE id = ?1",
        )
        .bind(customer_id)
        .bind(&token.token)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", customer_id));
        }

        Ok(())
    }

    /// Finds the customer holding `token`, expired or not.
    pub async fn find_by_reset_token(
        &self,
        token: &str,
    ) -> DbResult<Option<(Customer, ResetToken)>> {
        let sql = format!(
            r#"
            SELECT {}, reset_token, reset_token_expires_at
            FROM customers
            WHERE reset_token = ?1 AND reset_token_expires_at IS NOT NULL
            "#,
            CUSTOMER_COLUMNS
        );
        let record = sqlx::query_as::<_, ResetRecord>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(|r| {
            (
                r.customer.into(),
                ResetToken {
                    token: r.reset_token,
                    expires_at: r.reset_token_expires_at,
                },
            )
        }))
    }

    /// Stores a new password hash and clears any reset token.
    pub async fn update_password(&self, customer_id: &str, password_hash: &str) -> DbResult<()> {
        debug!(customer_id = %customer_id, "Updating password");

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET password_hash = ?2, reset_token = NULL, reset_token_expires_at = NULL
            WHERE id = ?1
            "#,
        )
        .bind(customer_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", customer_id));
        }

        Ok(())
    }

    // =========================================================================
    // Saved Addresses
    // =========================================================================

    /// Stores an address in the customer's book.
    ///
    /// Duplicate detection happens in `AddressBook::save_if_new` before this.
    pub async fn add_address(&self, customer_id: &str, saved: &SavedAddress) -> DbResult<()> {
        debug!(customer_id = %customer_id, id = %saved.id, "Saving address");

        let a = &saved.address;
        sqlx::query(
            r#"
            INSERT INTO customer_addresses (
                id, customer_id, first_name, last_name, email, phone,
                address, city, state, zip_code, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&saved.id)
        .bind(customer_id)
        .bind(&a.first_name)
        .bind(&a.last_name)
        .bind(&a.email)
        .bind(&a.phone)
        .bind(&a.address)
        .bind(&a.city)
        .bind(&a.state)
        .bind(&a.zip_code)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists saved addresses in the order they were added.
    pub async fn list_addresses(&self, customer_id: &str) -> DbResult<Vec<SavedAddress>> {
        let records = sqlx::query_as::<_, AddressRecord>(
            r#"
            SELECT id, first_name, last_name, email, phone, address, city, state, zip_code
            FROM customer_addresses
            WHERE customer_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(SavedAddress::from).collect())
    }

    /// Loads the customer's address book.
    pub async fn address_book(&self, customer_id: &str) -> DbResult<AddressBook> {
        Ok(AddressBook::new(self.list_addresses(customer_id).await?))
    }

    /// Deletes one of the customer's addresses. Returns `false` if not found.
    pub async fn delete_address(&self, customer_id: &str, id: &str) -> DbResult<bool> {
        let result =
            sqlx::query("DELETE FROM customer_addresses WHERE id = ?1 AND customer_id = ?2")
                .bind(id)
                .bind(customer_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
