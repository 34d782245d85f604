use chrono::NaiveDate;
use sqlx::SqliteConnection;
use thiserror::Error;

use esales_core::Customer;

use crate::is_foreign_key_violation;

/// Repository for the `customers` table, bound to a unit of work.
pub struct CustomerRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> CustomerRepository<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Lists every customer ordered by id.
    pub async fn list(&mut self) -> Result<Vec<Customer>, CustomerError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT customer_id, name, email, phone, registration_date \
             FROM customers ORDER BY customer_id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(CustomerRow::into_domain).collect())
    }

    pub async fn find(&mut self, customer_id: i64) -> Result<Option<Customer>, CustomerError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT customer_id, name, email, phone, registration_date \
             FROM customers WHERE customer_id = ?",
        )
        .bind(customer_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(CustomerRow::into_domain))
    }

    pub async fn exists(&mut self, customer_id: i64) -> Result<bool, CustomerError> {
        let found: Option<(i64,)> =
            sqlx::query_as("SELECT customer_id FROM customers WHERE customer_id = ?")
                .bind(customer_id)
                .fetch_optional(&mut *self.conn)
                .await?;
        Ok(found.is_some())
    }

    /// Returns up to two ids whose name matches exactly, enough to tell
    /// "none", "one" and "ambiguous" apart.
    pub async fn ids_by_name(&mut self, name: &str) -> Result<Vec<i64>, CustomerError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT customer_id FROM customers WHERE name = ? ORDER BY customer_id LIMIT 2",
        )
        .bind(name)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Inserts the customer and returns it with the assigned id.
    pub async fn add(&mut self, customer: &Customer) -> Result<Customer, CustomerError> {
        let result = sqlx::query(
            "INSERT INTO customers (name, email, phone, registration_date) VALUES (?, ?, ?, ?)",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.registration_date)
        .execute(&mut *self.conn)
        .await?;

        Ok(Customer {
            customer_id: result.last_insert_rowid(),
            ..customer.clone()
        })
    }

    /// Overwrites every mutable column. Returns `false` when the id is unknown.
    pub async fn save(&mut self, customer: &Customer) -> Result<bool, CustomerError> {
        let result = sqlx::query(
            "UPDATE customers \
             SET name = ?, email = ?, phone = ?, registration_date = ? \
             WHERE customer_id = ?",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.registration_date)
        .bind(customer.customer_id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the customer. Returns `false` when the id is unknown.
    pub async fn remove(&mut self, customer_id: i64) -> Result<bool, CustomerError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?")
            .bind(customer_id)
            .execute(&mut *self.conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    CustomerError::StillReferenced
                } else {
                    CustomerError::Database(err)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_id: i64,
    name: String,
    email: String,
    phone: String,
    registration_date: NaiveDate,
}

impl CustomerRow {
    fn into_domain(self) -> Customer {
        Customer {
            customer_id: self.customer_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            registration_date: self.registration_date,
        }
    }
}

/// Errors that can occur while reading or mutating customers.
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("customer is still referenced by existing orders")]
    StillReferenced,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
