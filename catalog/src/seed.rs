//! Startup seeding: load the bundled dataset and upsert it into the store.
//! Runs once before the server starts taking traffic; any failure here is
//! fatal and the process never serves.

use crate::model::CourseRecord;
use crate::store::CourseStore;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read the dataset file: a JSON array of course records. A missing or
/// malformed file is an error, never an empty catalog.
pub fn load_dataset(path: &Path) -> Result<Vec<CourseRecord>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open course dataset {}", path.display()))?;
    let records: Vec<CourseRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed course dataset {}", path.display()))?;
    Ok(records)
}

/// Upsert every record keyed by course name, then ensure the listing indexes.
/// Reseeding the same dataset changes nothing: names match existing courses,
/// and the upsert leaves identifiers and rating counters alone.
pub async fn seed(store: &dyn CourseStore, records: &[CourseRecord]) -> Result<usize> {
    for record in records {
        store
            .upsert_course(record)
            .await
            .with_context(|| format!("seeding course {:?}", record.name))?;
        tracing::debug!(course = %record.name, "upserted course");
    }
    store.ensure_indexes().await.context("creating catalog indexes")?;
    Ok(records.len())
}
