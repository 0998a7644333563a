//! JSON output of harvested records.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::models::Record;

/// Indentation used for the results file.
const INDENT: &[u8] = b"    ";

/// Serialize `value` as indented JSON. Non-ASCII text is written as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write records to `path` as a UTF-8 JSON array, creating parent directories.
pub fn write_records(path: &Path, records: &[Record]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = to_pretty_json(records)?;
    let mut file = fs::File::create(path)?;
    file.write_all(&json)?;
    file.flush()
}

/// Read records back from a results file.
pub fn read_records(path: &Path) -> io::Result<Vec<Record>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            title: "Avaliação de políticas públicas".to_string(),
            year: "2021-03".to_string(),
            doi: "10.1000/xyz".to_string(),
            r#abstract: "Resumo".to_string(),
            authors: vec!["Gonçalves, João".to_string()],
        }
    }

    #[test]
    fn test_write_records_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");

        write_records(&path, &[sample()]).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.contains("Avaliação de políticas públicas"));
        assert!(text.contains("Gonçalves, João"));
        assert!(!text.contains("\\u"));
        assert!(text.starts_with("[\n    {\n        \"title\""));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn test_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_records(&path, &[sample(), Record::default()]).unwrap();
        assert_eq!(read_records(&path).unwrap(), vec![sample(), Record::default()]);
    }

    #[test]
    fn test_empty_result_set() {
        let json = to_pretty_json::<[Record]>(&[]).unwrap();
        assert_eq!(json, b"[]\n");
    }
}
