use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use uuid::Uuid;

/// Store one received call event.
///
/// `received_at` is filled in by the database.
#[derive(Debug, Clone)]
pub struct InsertCallEvent {
    pub id: Uuid,
    pub event_type: &'static str,
    pub call_id: String,
    pub payload: serde_json::Value,
}

impl Processor<InsertCallEvent> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertCallEvent")]
    async fn process(&self, insert: InsertCallEvent) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO call_events (id, event_type, call_id, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(insert.id)
        .bind(insert.event_type)
        .bind(insert.call_id)
        .bind(insert.payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
