// file: src/database/schema.rs
// description: LanceDB schema management for vector storage
// reference: https://docs.rs/lancedb

use crate::config::ReindexPolicy;
use crate::database::client::LanceDbStore;
use crate::error::{QaError, Result};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;
use tracing::{info, warn};

pub struct SchemaManager<'a> {
    store: &'a LanceDbStore,
}

impl<'a> SchemaManager<'a> {
    pub fn new(store: &'a LanceDbStore) -> Self {
        Self { store }
    }

    /// The table itself is created lazily on first upsert, once the
    /// embedding dimension is known.
    pub async fn apply_reindex_policy(&self, policy: ReindexPolicy) -> Result<()> {
        let table_name = self.store.table_name();

        if !self.store.table_exists(table_name).await? {
            info!("Table '{}' does not exist yet", table_name);
            return Ok(());
        }

        match policy {
            ReindexPolicy::Append => {
                info!("Appending to existing table '{}'", table_name);
                Ok(())
            }
            ReindexPolicy::Overwrite => self.drop_table().await,
            ReindexPolicy::Fail => {
                let rows = self.store.row_count().await?;
                if rows > 0 {
                    return Err(QaError::Indexing(format!(
                        "Table '{}' already holds {} records and reindex policy is 'fail'",
                        table_name, rows
                    )));
                }
                Ok(())
            }
        }
    }

    /// Returns the Arrow schema for the records table
    pub fn get_records_schema(embedding_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("page", DataType::UInt32, false),
            Field::new("indexed_at", DataType::Int64, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    embedding_dim as i32,
                ),
                false,
            ),
        ]))
    }

    pub async fn drop_table(&self) -> Result<()> {
        let table_name = self.store.table_name();
        warn!("Dropping table '{}'", table_name);

        self.store
            .get_connection()
            .drop_table(table_name)
            .await
            .map_err(|e| {
                QaError::Indexing(format!("Failed to drop table {}: {}", table_name, e))
            })?;

        info!("Dropped table: {}", table_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema = SchemaManager::get_records_schema(384);
        assert_eq!(schema.fields().len(), 6);

        let vector_field = schema.field_with_name("vector").unwrap();
        assert!(matches!(vector_field.data_type(), DataType::FixedSizeList(_, 384)));
    }
}
