use super::super::models::{Payment, PaymentRow, PaymentStatus};
use crate::core::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

/// Storage for payment records
///
/// Update methods return the number of rows touched; zero means no record
/// carried the given checkout id, which callers treat as a no-op.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a new payment; status is left to the column default
    async fn create(&self, payment: &Payment) -> Result<()>;

    /// Swap the checkout id for the receipt number and mark the payment completed
    async fn mark_completed(&self, checkout_request_id: &str, receipt_number: &str)
        -> Result<u64>;

    /// Mark the payment failed, keeping its transaction_id
    async fn mark_failed(&self, checkout_request_id: &str) -> Result<u64>;

    async fn find_by_id(&self, payment_id: &str) -> Result<Option<Payment>>;
}

/// MySQL-backed payment repository
pub struct MySqlPaymentRepository {
    pool: MySqlPool,
}

impl MySqlPaymentRepository {
    /// Create a new MySqlPaymentRepository
    ///
    /// # Arguments
    /// * `pool` - Database connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for MySqlPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (payment_id, number, amount, transaction_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&payment.payment_id)
        .bind(&payment.number)
        .bind(payment.amount)
        .bind(&payment.transaction_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_completed(
        &self,
        checkout_request_id: &str,
        receipt_number: &str,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET transaction_id = ?, status = ?
            WHERE transaction_id = ?
            "#,
        )
        .bind(receipt_number)
        .bind(PaymentStatus::Completed.as_str())
        .bind(checkout_request_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn mark_failed(&self, checkout_request_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = ?
            WHERE transaction_id = ?
            "#,
        )
        .bind(PaymentStatus::Failed.as_str())
        .bind(checkout_request_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_by_id(&self, payment_id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT payment_id, number, amount, transaction_id, status
            FROM payments
            WHERE payment_id = ?
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Payment::try_from).transpose()
    }
}
