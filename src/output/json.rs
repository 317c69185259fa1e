//! JSON artifact writer

use crate::PodiumError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `value` as pretty-printed UTF-8 JSON to `path`
///
/// Missing parent directories are created. Non-ASCII text is written as is.
///
/// # Returns
///
/// * `Ok(())` - The file was written and flushed
/// * `Err(PodiumError)` - The file could not be created or serialized
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PodiumError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{MedalTally, NationTotals};
    use tempfile::tempdir;

    #[test]
    fn test_write_nested_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("nations.json");

        let totals = vec![NationTotals {
            country: "Côte d'Ivoire".to_string(),
            medals: MedalTally::new(1, 1, 2),
        }];
        write_json(&path, &totals).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Côte d'Ivoire"));

        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"country": "Côte d'Ivoire", "gold": 1, "silver": 1, "bronze": 2}
            ])
        );
    }

    #[test]
    fn test_write_to_directory_path_fails() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened as a file
        let result = write_json(dir.path(), &Vec::<u32>::new());
        assert!(matches!(result, Err(PodiumError::Io(_))));
    }
}
