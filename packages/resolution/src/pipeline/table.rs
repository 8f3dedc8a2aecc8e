//! Tabular views and CSV export.
//!
//! Two views: "raw" flattens every entity's hit list into one row per hit;
//! "processed" is one validated extraction record per entity. Both export
//! as CSV with a header row.

use std::io;

use serde::Serialize;

use crate::types::{EntitySearchResult, ExtractionRecord};

/// One row of the raw-results view: a single hit plus the entity and the
/// query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRow {
    pub entity: String,
    pub query: String,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub position: u32,
    pub displayed_link: String,
}

/// Flatten per-entity results into one row per hit, preserving entity
/// order and, within an entity, hit order. Entities with zero hits
/// contribute zero rows.
pub fn flatten_rows(results: &[EntitySearchResult]) -> Vec<SearchRow> {
    results
        .iter()
        .flat_map(|result| {
            result.results.iter().map(|hit| SearchRow {
                entity: result.entity.clone(),
                query: result.query.clone(),
                title: hit.title.clone(),
                link: hit.link.clone(),
                snippet: hit.snippet.clone(),
                position: hit.position,
                displayed_link: hit.displayed_link.clone(),
            })
        })
        .collect()
}

/// Write the raw view as CSV with a header row.
pub fn write_raw_csv<W: io::Write>(rows: &[SearchRow], writer: W) -> Result<(), csv::Error> {
    write_csv(rows, writer)
}

/// Write the processed view as CSV with a header row.
pub fn write_processed_csv<W: io::Write>(
    records: &[ExtractionRecord],
    writer: W,
) -> Result<(), csv::Error> {
    write_csv(records, writer)
}

fn write_csv<T: Serialize, W: io::Write>(rows: &[T], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
