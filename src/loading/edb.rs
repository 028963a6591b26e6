//! Initial-fact loading. Two sources are supported: a directory of CSV
//! files (one per predicate, file stem = predicate name, one row = one
//! tuple, arity = column count) and a line-oriented configuration mapping
//! predicates to CSV files (`predicate = path.csv`, `#` comments).

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::engine::storage::RelationStorage;
use crate::error::{ReasonerError, Result};
use crate::interning::dictionary::Dictionary;

pub fn load_csv_directory(
    directory: &Path,
    dictionary: &mut Dictionary,
    storage: &mut RelationStorage,
) -> Result<usize> {
    let mut csv_files: Vec<PathBuf> = vec![];
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            csv_files.push(path);
        }
    }
    // Directory read order is unspecified; sorting keeps id assignment
    // deterministic across runs.
    csv_files.sort();

    let mut loaded = 0;
    for path in csv_files {
        let predicate = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        loaded += load_csv_file(&path, &predicate, dictionary, storage)?;
    }

    info!("loaded {} facts from {}", loaded, directory.display());

    Ok(loaded)
}

pub fn load_csv_file(
    path: &Path,
    predicate: &str,
    dictionary: &mut Dictionary,
    storage: &mut RelationStorage,
) -> Result<usize> {
    let symbol = dictionary.intern_predicate(predicate);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| ReasonerError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut loaded = 0;
    for record in reader.records() {
        let record = record.map_err(|source| ReasonerError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let tuple = record
            .iter()
            .map(|field| dictionary.intern_constant(field))
            .collect();
        storage
            .insert(symbol, tuple)
            .map_err(|violation| ReasonerError::ArityMismatch {
                predicate: predicate.to_string(),
                expected: violation.expected,
                actual: violation.actual,
            })?;
        loaded += 1;
    }

    debug!("{}: {} rows from {}", predicate, loaded, path.display());

    Ok(loaded)
}

/// Parses an EDB configuration into (predicate, csv path) pairs.
pub fn parse_config(text: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut sources = vec![];

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (predicate, path) = line.split_once('=').ok_or(ReasonerError::EdbConfig {
            line: index + 1,
            text: raw_line.to_string(),
        })?;
        let predicate = predicate.trim();
        let path = path.trim();
        if predicate.is_empty() || path.is_empty() {
            return Err(ReasonerError::EdbConfig {
                line: index + 1,
                text: raw_line.to_string(),
            });
        }

        sources.push((predicate.to_string(), PathBuf::from(path)));
    }

    Ok(sources)
}

/// Loads every source named by a configuration string. Relative paths are
/// resolved against `base`, which is the config file's directory (or the
/// working directory for inline configuration).
pub fn load_config(
    text: &str,
    base: Option<&Path>,
    dictionary: &mut Dictionary,
    storage: &mut RelationStorage,
) -> Result<usize> {
    let mut loaded = 0;
    for (predicate, path) in parse_config(text)? {
        let resolved = match base {
            Some(base) if path.is_relative() => base.join(&path),
            _ => path,
        };
        loaded += load_csv_file(&resolved, &predicate, dictionary, storage)?;
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("prescription.csv")).unwrap();
        writeln!(file, "1,alice,186,x").unwrap();
        writeln!(file, "2,bob,72,y").unwrap();
        drop(file);

        let mut dictionary = Dictionary::new();
        let mut storage = RelationStorage::new();
        let loaded =
            load_csv_directory(dir.path(), &mut dictionary, &mut storage).unwrap();

        assert_eq!(loaded, 2);
        let prescription = dictionary.predicate_id("prescription").unwrap();
        assert_eq!(storage.arity(prescription), Some(4));
        assert!(dictionary.constant_id("alice").is_some());
        assert!(dictionary.constant_id("186").is_some());
    }

    #[test]
    fn test_non_csv_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::write(dir.path().join("edge.csv"), "1,2\n").unwrap();

        let mut dictionary = Dictionary::new();
        let mut storage = RelationStorage::new();
        let loaded =
            load_csv_directory(dir.path(), &mut dictionary, &mut storage).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(dictionary.predicate_id("notes"), None);
    }

    #[test]
    fn test_ragged_csv_is_an_arity_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("edge.csv"), "1,2\n3,4,5\n").unwrap();

        let mut dictionary = Dictionary::new();
        let mut storage = RelationStorage::new();
        let result = load_csv_directory(dir.path(), &mut dictionary, &mut storage);

        // The csv reader itself may flag the ragged row, otherwise the
        // relation's fixed arity does.
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config() {
        let sources = parse_config(
            "# comment\n\nedge = data/edge.csv\nperson= people.csv\n",
        )
        .unwrap();

        assert_eq!(
            sources,
            vec![
                ("edge".to_string(), PathBuf::from("data/edge.csv")),
                ("person".to_string(), PathBuf::from("people.csv")),
            ]
        );
    }

    #[test]
    fn test_parse_config_rejects_unmapped_lines() {
        let err = parse_config("edge data/edge.csv").unwrap_err();

        match err {
            ReasonerError::EdbConfig { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
