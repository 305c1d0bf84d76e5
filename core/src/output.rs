use std::{
    io::{self, Write},
    path::Path,
};

use log::debug;
use serde::Serialize;
use tempfile::NamedTempFile;

/// Serialize `value` as compact UTF-8 JSON (non-ASCII left unescaped) and
/// replace whatever is at `path` with it.
///
/// The JSON goes to a temporary file next to `path` first, which is then
/// renamed over it, so `path` either keeps its old contents or gets the new
/// ones in full.
pub fn write_json(path: &Path, value: &impl Serialize) -> io::Result<()> {
    let bytes = serde_json::to_vec(value)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".refdata-")
        .suffix(".json.tmp")
        .tempfile_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    persist(tmp, path)?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn persist(tmp: NamedTempFile, path: &Path) -> io::Result<()> {
    tmp.persist(path).map(drop).map_err(|err| err.error)
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, fs};

    use super::*;

    #[test]
    fn compact_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let value = BTreeMap::from([
            ("AX", "Åland Islands"),
            ("CI", "Côte d'Ivoire"),
        ]);
        write_json(&path, &value).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"AX":"Åland Islands","CI":"Côte d'Ivoire"}"#,
        );
    }

    #[test]
    fn overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "old contents, much longer than the new").unwrap();
        write_json(&path, &["a", "b"]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"["a","b"]"#);

        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path() != path)
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.json");
        assert!(write_json(&path, &["a"]).is_err());
        assert!(!path.exists());
    }
}
