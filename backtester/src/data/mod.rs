pub mod loader;
pub mod synthetic;

pub use loader::{load_csv, load_json, read_csv_bars};
pub use synthetic::{generate_bars, generate_trending_bars};

use std::path::Path;

use common::{BacktestError, Bar, Result};

/// Load bars from a file, picking the parser from the extension
pub fn load_file(path: &Path) -> Result<Vec<Bar>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(BacktestError::DataLoadError(format!(
            "Unsupported file format: {:?}",
            path
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_file_rejects_unknown_extension() {
        let err = load_file(Path::new("prices.parquet")).unwrap_err();
        assert!(matches!(err, BacktestError::DataLoadError(_)));
    }
}
