//! Catalog export.

use crate::source::read_source;
use log::info;
use pv_parcel::catalog::CatalogStore;

/// The export document for `source`: records sorted by location then name,
/// pretty-printed.
pub fn export_document(source: &str) -> anyhow::Result<String> {
    let mut store = CatalogStore::new();
    let count = store.load(source)?.len();
    info!("Exporting {} parcels", count);
    Ok(store.to_document()?)
}

pub async fn run_export(catalog: &str, output: &str) -> anyhow::Result<()> {
    let source = read_source(catalog).await?;
    let document = export_document(&source)?;
    std::fs::write(output, document)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", output, e))?;
    info!("Export complete. Output: {}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_sorts_and_drops_blank_grid_base() {
        let source = r#"[
            {"id":"b","kmlId":"2","name":"Zeta","location":"Bademli","gridBaseUrl":"  ","layers":{}},
            {"id":"a","kmlId":"1","name":"Alfa","location":"Bademli","layers":{}},
            {"id":"c","kmlId":"3","name":"Beta","location":"Ayvalı","layers":{}}
        ]"#;
        let document = export_document(source).unwrap();
        let a = document.find("\"id\": \"a\"").unwrap();
        let b = document.find("\"id\": \"b\"").unwrap();
        let c = document.find("\"id\": \"c\"").unwrap();
        assert!(c < a && a < b);
        assert!(!document.contains("gridBaseUrl"));
        assert!(CatalogStore::parse_document(&document).is_ok());
    }

    #[test]
    fn export_of_broken_catalog_fails() {
        assert!(export_document("[{\"id\":1}]").is_err());
    }
}
