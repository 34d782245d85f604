use sqlx::SqliteConnection;

use esales_core::Product;

use crate::StorageError;

/// Repository for the `products` table. The API only reads products;
/// [`ProductRepository::add`] exists for seeding.
pub struct ProductRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ProductRepository<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&mut self) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT product_id, name, description FROM products ORDER BY product_id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_domain).collect())
    }

    pub async fn exists(&mut self, product_id: i64) -> Result<bool, StorageError> {
        let found: Option<(i64,)> =
            sqlx::query_as("SELECT product_id FROM products WHERE product_id = ?")
                .bind(product_id)
                .fetch_optional(&mut *self.conn)
                .await?;
        Ok(found.is_some())
    }

    /// Returns up to two ids whose name matches exactly.
    pub async fn ids_by_name(&mut self, name: &str) -> Result<Vec<i64>, StorageError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT product_id FROM products WHERE name = ? ORDER BY product_id LIMIT 2",
        )
        .bind(name)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn add(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Product, StorageError> {
        let result = sqlx::query("INSERT INTO products (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&mut *self.conn)
            .await?;

        Ok(Product {
            product_id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    pub async fn count(&mut self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: i64,
    name: String,
    description: Option<String>,
}

impl ProductRow {
    fn into_domain(self) -> Product {
        Product {
            product_id: self.product_id,
            name: self.name,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::setup_db;

    #[tokio::test]
    async fn list_returns_products_in_id_order() {
        let (db, _dir) = setup_db().await;
        let mut uow = db.begin().await.expect("begin");

        let widget = uow
            .products()
            .add("Widget", Some("Standard widget"))
            .await
            .expect("add widget");
        let gadget = uow.products().add("Gadget", None).await.expect("add gadget");

        let listed = uow.products().list().await.expect("list");
        assert_eq!(listed, vec![widget.clone(), gadget]);
        assert!(uow.products().exists(widget.product_id).await.expect("exists"));
        assert!(!uow.products().exists(999).await.expect("exists"));
        assert_eq!(uow.products().count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn ids_by_name_distinguishes_ambiguous_names() {
        let (db, _dir) = setup_db().await;
        let mut uow = db.begin().await.expect("begin");
        uow.products().add("Bolt", None).await.expect("add");
        uow.products().add("Bolt", None).await.expect("add");
        let nut = uow.products().add("Nut", None).await.expect("add");

        assert_eq!(uow.products().ids_by_name("Bolt").await.expect("ids").len(), 2);
        assert_eq!(
            uow.products().ids_by_name("Nut").await.expect("ids"),
            vec![nut.product_id]
        );
    }
}
