// file: src/database/client.rs
// description: LanceDB-backed vector store with connection management
// reference: https://docs.rs/lancedb

use crate::config::VectorStoreConfig;
use crate::database::insert::create_record_batch;
use crate::database::schema::SchemaManager;
use crate::database::store::VectorStore;
use crate::error::{QaError, Result};
use crate::models::{SearchResult, VectorRecord};
use arrow_array::{Array, Float32Array, RecordBatch, RecordBatchIterator, StringArray, UInt32Array};
use async_trait::async_trait;
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct LanceDbStore {
    connection: Connection,
    table_name: String,
}

impl LanceDbStore {
    /// Connects and applies the configured reindex policy.
    pub async fn open(config: &VectorStoreConfig) -> Result<Self> {
        info!("Connecting to LanceDB at {}", config.uri);

        let connection = connect(&config.uri).execute().await.map_err(|e| {
            QaError::Indexing(format!("Failed to connect to LanceDB: {}", e))
        })?;

        let store = Self {
            connection,
            table_name: config.table_name.clone(),
        };

        SchemaManager::new(&store)
            .apply_reindex_policy(config.reindex)
            .await?;

        Ok(store)
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| QaError::Indexing(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == table_name))
    }

    pub async fn get_table(&self) -> Result<Table> {
        self.connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| {
                QaError::Indexing(format!("Failed to open table {}: {}", self.table_name, e))
            })
    }

    pub async fn row_count(&self) -> Result<usize> {
        if !self.table_exists(&self.table_name).await? {
            return Ok(0);
        }

        let table = self.get_table().await?;
        table
            .count_rows(None)
            .await
            .map_err(|e| QaError::Indexing(format!("Failed to count rows: {}", e)))
    }

    fn read_batch(batch: &RecordBatch, results: &mut Vec<SearchResult>) -> Result<()> {
        let ids = string_column(batch, "id")?;
        let contents = string_column(batch, "content")?;
        let sources = string_column(batch, "source")?;

        let pages = batch
            .column_by_name("page")
            .ok_or_else(|| QaError::Runtime("Missing 'page' column".to_string()))?
            .as_any()
            .downcast_ref::<UInt32Array>()
            .ok_or_else(|| QaError::Runtime("Invalid 'page' column type".to_string()))?;

        // LanceDB returns distance score in a special column
        let distances = batch
            .column_by_name("_distance")
            .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

        for i in 0..batch.num_rows() {
            let distance = distances
                .filter(|d| d.is_valid(i))
                .map(|d| d.value(i));

            results.push(SearchResult::new(
                ids.value(i).to_string(),
                contents.value(i).to_string(),
                sources.value(i).to_string(),
                pages.value(i),
                distance,
            ));
        }

        Ok(())
    }
}

fn string_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| QaError::Runtime(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| QaError::Runtime(format!("Invalid '{}' column type", name)))
}

#[async_trait]
impl VectorStore for LanceDbStore {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let (schema, batch) = create_record_batch(&records)?;
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        if !self.table_exists(&self.table_name).await? {
            self.connection
                .create_table(&self.table_name, reader)
                .execute()
                .await
                .map_err(|e| QaError::Indexing(format!("Failed to create table: {}", e)))?;
            info!("Created new table: {}", self.table_name);
        } else {
            let table = self.get_table().await?;
            table
                .add(reader)
                .execute()
                .await
                .map_err(|e| QaError::Indexing(format!("Failed to insert records: {}", e)))?;
        }

        debug!("Stored {} records in {}", records.len(), self.table_name);
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if !self.table_exists(&self.table_name).await? {
            warn!("Table does not exist, returning empty results");
            return Ok(Vec::new());
        }

        let table = self.get_table().await?;

        debug!("Performing vector search with limit {}", k);

        let mut results_stream = table
            .vector_search(vector.to_vec())
            .map_err(|e| QaError::Runtime(format!("Failed to create vector search: {}", e)))?
            .limit(k)
            .execute()
            .await
            .map_err(|e| QaError::Runtime(format!("Vector search failed: {}", e)))?;

        let mut results = Vec::new();
        while let Some(batch) = results_stream.next().await {
            let batch = batch
                .map_err(|e| QaError::Runtime(format!("Failed to read result batch: {}", e)))?;
            Self::read_batch(&batch, &mut results)?;
        }

        debug!("Vector search returned {} results", results.len());
        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        self.row_count().await
    }
}
