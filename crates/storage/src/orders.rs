use chrono::NaiveDate;
use sqlx::SqliteConnection;
use thiserror::Error;

use esales_core::{CustomerSummary, Order, OrderDto, OrderWithCustomer};

use crate::is_foreign_key_violation;

const ORDER_VIEW_SELECT: &str = r#"
SELECT o.order_id,
       p.name AS product,
       c.name AS customer,
       o.quantity,
       o.order_date
  FROM orders AS o
  JOIN products AS p ON p.product_id = o.product_id
  JOIN customers AS c ON c.customer_id = o.customer_id
"#;

/// Repository for the `orders` table, including the joined read models.
pub struct OrderRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> OrderRepository<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, order_id: i64) -> Result<Option<Order>, OrderError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT order_id, product_id, customer_id, quantity, order_date \
             FROM orders WHERE order_id = ?",
        )
        .bind(order_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(OrderRow::into_domain))
    }

    /// Inserts the order and returns it with the assigned id.
    pub async fn add(&mut self, order: &Order) -> Result<Order, OrderError> {
        let result = sqlx::query(
            "INSERT INTO orders (product_id, customer_id, quantity, order_date) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(order.product_id)
        .bind(order.customer_id)
        .bind(order.quantity)
        .bind(order.order_date)
        .execute(&mut *self.conn)
        .await
        .map_err(OrderError::from_write)?;

        Ok(Order {
            order_id: result.last_insert_rowid(),
            ..order.clone()
        })
    }

    /// Overwrites product, customer, quantity and date. Returns `false` when
    /// the id is unknown.
    pub async fn save(&mut self, order: &Order) -> Result<bool, OrderError> {
        let result = sqlx::query(
            "UPDATE orders \
             SET product_id = ?, customer_id = ?, quantity = ?, order_date = ? \
             WHERE order_id = ?",
        )
        .bind(order.product_id)
        .bind(order.customer_id)
        .bind(order.quantity)
        .bind(order.order_date)
        .bind(order.order_id)
        .execute(&mut *self.conn)
        .await
        .map_err(OrderError::from_write)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove(&mut self, order_id: i64) -> Result<bool, OrderError> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = ?")
            .bind(order_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lists every order with product and customer names resolved.
    pub async fn list_views(&mut self) -> Result<Vec<OrderDto>, OrderError> {
        let sql = format!("{ORDER_VIEW_SELECT} ORDER BY o.order_id");
        let rows = sqlx::query_as::<_, OrderViewRow>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows.into_iter().map(OrderViewRow::into_domain).collect())
    }

    pub async fn find_view(&mut self, order_id: i64) -> Result<Option<OrderDto>, OrderError> {
        let sql = format!("{ORDER_VIEW_SELECT} WHERE o.order_id = ?");
        let row = sqlx::query_as::<_, OrderViewRow>(&sql)
            .bind(order_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(OrderViewRow::into_domain))
    }

    /// Lists every order with the product name and the customer's contact details.
    pub async fn list_with_customer(&mut self) -> Result<Vec<OrderWithCustomer>, OrderError> {
        let rows = sqlx::query_as::<_, OrderWithCustomerRow>(
            r#"
SELECT o.order_id,
       o.quantity,
       o.order_date,
       p.name AS product,
       c.customer_id,
       c.name AS customer_name,
       c.phone AS customer_phone
  FROM orders AS o
  JOIN products AS p ON p.product_id = o.product_id
  JOIN customers AS c ON c.customer_id = o.customer_id
 ORDER BY o.order_id
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(OrderWithCustomerRow::into_domain)
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: i64,
    product_id: i64,
    customer_id: i64,
    quantity: i32,
    order_date: NaiveDate,
}

impl OrderRow {
    fn into_domain(self) -> Order {
        Order {
            order_id: self.order_id,
            product_id: self.product_id,
            customer_id: self.customer_id,
            quantity: self.quantity,
            order_date: self.order_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderViewRow {
    order_id: i64,
    product: String,
    customer: String,
    quantity: i32,
    order_date: NaiveDate,
}

impl OrderViewRow {
    fn into_domain(self) -> OrderDto {
        OrderDto {
            order_id: self.order_id,
            product: self.product,
            customer: self.customer,
            quantity: self.quantity,
            order_date: self.order_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderWithCustomerRow {
    order_id: i64,
    quantity: i32,
    order_date: NaiveDate,
    product: String,
    customer_id: i64,
    customer_name: String,
    customer_phone: String,
}

impl OrderWithCustomerRow {
    fn into_domain(self) -> OrderWithCustomer {
        OrderWithCustomer {
            order_id: self.order_id,
            quantity: self.quantity,
            order_date: self.order_date,
            product: self.product,
            customer: CustomerSummary {
                customer_id: self.customer_id,
                name: self.customer_name,
                phone: self.customer_phone,
            },
        }
    }
}

/// Errors that can occur while reading or mutating orders.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order references a product or customer that does not exist")]
    MissingReference,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl OrderError {
    fn from_write(err: sqlx::Error) -> Self {
        if is_foreign_key_violation(&err) {
            Self::MissingReference
        } else {
            Self::Database(err)
        }
    }
}
