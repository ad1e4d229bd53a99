// file: src/database/insert.rs
// description: Arrow record batch construction for vector records
// reference: https://docs.rs/arrow-array

use crate::database::schema::SchemaManager;
use crate::error::{QaError, Result};
use crate::models::VectorRecord;
use arrow_array::{
    FixedSizeListArray, Float32Array, Int64Array, RecordBatch, StringArray, UInt32Array,
};
use arrow_schema::Schema;
use std::sync::Arc;

/// Builds a batch and its schema. All vectors must share one dimension.
pub fn create_record_batch(records: &[VectorRecord]) -> Result<(Arc<Schema>, RecordBatch)> {
    let dim = records
        .first()
        .map(|r| r.vector.len())
        .ok_or_else(|| QaError::Indexing("Cannot build an empty record batch".to_string()))?;

    if dim == 0 {
        return Err(QaError::Indexing("Embedding vector is empty".to_string()));
    }

    if let Some(bad) = records.iter().find(|r| r.vector.len() != dim) {
        return Err(QaError::Indexing(format!(
            "Embedding dimension mismatch on page {}: expected {}, got {}",
            bad.page,
            dim,
            bad.vector.len()
        )));
    }

    let schema = SchemaManager::get_records_schema(dim);

    let ids: StringArray = records.iter().map(|r| Some(r.id.as_str())).collect();
    let contents: StringArray = records.iter().map(|r| Some(r.content.as_str())).collect();
    let sources: StringArray = records.iter().map(|r| Some(r.source.as_str())).collect();
    let pages: UInt32Array = records.iter().map(|r| Some(r.page)).collect();
    let indexed_ats: Int64Array = records.iter().map(|r| Some(r.indexed_at)).collect();

    let vector_values: Float32Array = records
        .iter()
        .flat_map(|r| r.vector.iter().copied())
        .collect();

    let vectors = FixedSizeListArray::try_new_from_values(vector_values, dim as i32)
        .map_err(|e| QaError::Indexing(format!("Failed to create vector array: {}", e)))?;

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(ids),
            Arc::new(contents),
            Arc::new(sources),
            Arc::new(pages),
            Arc::new(indexed_ats),
            Arc::new(vectors),
        ],
    )
    .map_err(|e| QaError::Indexing(format!("Failed to create record batch: {}", e)))?;

    Ok((schema, batch))
}
