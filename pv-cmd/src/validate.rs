//! Catalog validation.

use crate::source::read_source;
use log::info;
use pv_parcel::catalog::CatalogStore;
use pv_parcel::editor::ParcelSubmission;
use pv_parcel::parcel::normalize_kml_id;
use std::collections::HashMap;
use std::fmt;

/// One thing wrong with a catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Record position in the source document (1-based)
    pub record: usize,
    pub id: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {} ({}): {}: {}",
            self.record, self.id, self.field, self.message
        )
    }
}

/// Check every record in `source`.
///
/// Each record is run through the editor's validation, then ids and kmlIds
/// are checked for repeats. Only a document that does not parse at all is
/// an error.
pub fn validate_catalog(source: &str) -> anyhow::Result<Vec<Problem>> {
    let parcels = CatalogStore::parse_document(source)?;
    let mut problems = Vec::new();
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut kml_ids: HashMap<String, usize> = HashMap::new();

    for (i, parcel) in parcels.iter().enumerate() {
        let record = i + 1;
        if let Err(e) = ParcelSubmission::from_parcel(parcel).validate() {
            problems.push(Problem {
                record,
                id: parcel.id.clone(),
                field: e.field(),
                message: e.to_string(),
            });
        }
        if let Some(first) = ids.insert(parcel.id.as_str(), record) {
            problems.push(Problem {
                record,
                id: parcel.id.clone(),
                field: "id".to_string(),
                message: format!("repeats the id of record {}", first),
            });
        }
        let kml_key = normalize_kml_id(&parcel.kml_id);
        if let Some(first) = kml_ids.insert(kml_key, record) {
            problems.push(Problem {
                record,
                id: parcel.id.clone(),
                field: "kmlId".to_string(),
                message: format!("repeats the kmlId of record {}", first),
            });
        }
    }
    Ok(problems)
}

pub async fn run_validate(catalog: &str) -> anyhow::Result<()> {
    let source = read_source(catalog).await?;
    let problems = validate_catalog(&source)?;
    if problems.is_empty() {
        info!("Catalog {} is valid", catalog);
        println!("OK");
        return Ok(());
    }
    for problem in &problems {
        println!("{}", problem);
    }
    anyhow::bail!("{} problem(s) in {}", problems.len(), catalog)
}
