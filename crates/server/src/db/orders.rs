//! Order repository: headers in `orders`, glass specs in `order_details`.

use std::collections::HashMap;

use sqlx::PgPool;

use glassspire_core::aggregate::OrderAggregate;
use glassspire_core::models::{Order, OrderDetails};
use glassspire_core::validation::OrderSpec;
use glassspire_core::{OrderId, UserId};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, customer_id, retailer_id, status, created_at, updated_at";

const DETAILS_COLUMNS: &str = "id, order_id, glass_thickness, glass_finish, tempering, \
     dfi_coating, width, height, quantity, notes, image_url";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its details together.
    ///
    /// The order starts `received` with no retailer. Both rows commit or
    /// neither does.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either insert fails.
    pub async fn create(
        &self,
        customer_id: UserId,
        spec: &OrderSpec,
    ) -> Result<OrderAggregate, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO glassspire.orders (customer_id) VALUES ($1) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;

        let details = sqlx::query_as::<_, OrderDetails>(&format!(
            "INSERT INTO glassspire.order_details \
                 (order_id, glass_thickness, glass_finish, tempering, dfi_coating, \
                  width, height, quantity, notes, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {DETAILS_COLUMNS}"
        ))
        .bind(order.id)
        .bind(spec.glass_thickness)
        .bind(spec.glass_finish)
        .bind(spec.tempering)
        .bind(spec.dfi_coating)
        .bind(spec.width)
        .bind(spec.height)
        .bind(spec.quantity)
        .bind(spec.notes.as_deref())
        .bind(spec.image_url.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrderAggregate {
            order,
            details: Some(details),
        })
    }

    /// Get an order header by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM glassspire.orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// The details row for one order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn details_for(&self, id: OrderId) -> Result<Option<OrderDetails>, RepositoryError> {
        let details = sqlx::query_as::<_, OrderDetails>(&format!(
            "SELECT {DETAILS_COLUMNS} FROM glassspire.order_details WHERE order_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(details)
    }

    /// Details rows for many orders, keyed by order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn details_for_orders(
        &self,
        ids: &[OrderId],
    ) -> Result<HashMap<OrderId, OrderDetails>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(OrderId::as_i32).collect();
        let rows = sqlx::query_as::<_, OrderDetails>(&format!(
            "SELECT {DETAILS_COLUMNS} FROM glassspire.order_details WHERE order_id = ANY($1)"
        ))
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|d| (d.order_id, d)).collect())
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(&self, customer_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM glassspire.orders \
             WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM glassspire.orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Persist the status, retailer and timestamp of an advanced order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order no longer exists.
    pub async fn save_transition(&self, order: &Order) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(&format!(
            "UPDATE glassspire.orders SET status = $2, retailer_id = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.id)
        .bind(order.status)
        .bind(order.retailer_id)
        .bind(order.updated_at)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
