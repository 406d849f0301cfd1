//! JSON persistence helpers.
//!
//! Files are written with 4-space indentation and keys sorted at every level,
//! so repeated runs produce byte-identical output for equal data. Reading
//! accepts any JSON; callers pick the target type.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::CoreResult;

const INDENT: &[u8] = b"    ";

/// Serializes `value` into `writer` as sorted, 4-space indented JSON.
pub fn write_sorted<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> CoreResult<()> {
    // Going through `Value` sorts object keys: its map is a BTreeMap.
    let value = serde_json::to_value(value)?;
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(())
}

/// Renders `value` as sorted, 4-space indented JSON text.
pub fn to_sorted_string<T: Serialize + ?Sized>(value: &T) -> CoreResult<String> {
    let mut buf = Vec::new();
    write_sorted(&mut buf, value)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `value` to `path`, replacing any existing file.
pub fn json_store<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> CoreResult<()> {
    let path = path.as_ref();
    log::debug!("Storing JSON to {}", path.display());

    let mut writer = BufWriter::new(File::create(path)?);
    write_sorted(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Reads a JSON document from `path`.
///
/// Use `serde_json::Value` as `T` to accept arbitrary structure.
pub fn json_load<T: DeserializeOwned>(path: impl AsRef<Path>) -> CoreResult<T> {
    let path = path.as_ref();
    log::debug!("Loading JSON from {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_output_is_sorted_and_indented() {
        let mut value = HashMap::new();
        value.insert("zeta", json!(1));
        value.insert("alpha", json!({"y": true, "b": [1, 2]}));

        let text = to_sorted_string(&value).unwrap();
        let expected = "{\n    \"alpha\": {\n        \"b\": [\n            1,\n            2\n        ],\n        \"y\": true\n    },\n    \"zeta\": 1\n}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let value = json!({
            "per_sequence": 3.82,
            "video": {"codec": "hevc", "width": 3840, "tags": ["hdr", null]},
            "empty": {},
        });

        json_store(&path, &value).unwrap();
        let loaded: Value = json_load(&path).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_load_typed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counts.json");
        std::fs::write(&path, r#"{"a": 1, "b": 2}"#).unwrap();

        let loaded: HashMap<String, u32> = json_load(&path).unwrap();
        assert_eq!(loaded["b"], 2);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = json_load::<Value>(&path).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Json(_)));
    }
}
