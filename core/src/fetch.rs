//! Downloading packages and pulling files out of zip archives.
use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{self, Read, Seek},
    path::{Component, Path, PathBuf},
};

use log::debug;
use zip::ZipArchive;

use crate::errors::{ArchiveError, DownloadError, MinreqError};

/// Fetch `url` into memory.
///
/// Anything other than `200 OK` is an error. There is no timeout and no retry.
pub fn download(url: &str) -> Result<Vec<u8>, DownloadError> {
    debug!("downloading {url}");
    let response = minreq::get(url).send().map_err(|err| {
        DownloadError::Request(url.to_owned(), MinreqError(err))
    })?;
    if response.status_code != 200 {
        return Err(DownloadError::Status {
            url: url.to_owned(),
            status: response.status_code,
            reason: response.reason_phrase,
        });
    }
    let bytes = response.into_bytes();
    debug!("downloaded {} bytes from {url}", bytes.len());
    Ok(bytes)
}

/// Read the contents of the first file in the archive whose path ends with
/// `suffix` (compared component-wise, so `"a/b.json"` doesn't match
/// `"xa/b.json"`).
pub fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    suffix: &str,
) -> Result<Vec<u8>, ArchiveError> {
    let wanted = Path::new(suffix);
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if !entry.is_file() {
            continue;
        }
        let Some(file_name) = entry.enclosed_name() else {
            continue;
        };
        if !file_name.ends_with(wanted) {
            continue;
        }

        // Now we know we want it, decompress it
        drop(entry);
        let mut entry = archive.by_index(index)?;
        // The declared size comes from the archive, don't allocate on it
        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|err| ArchiveError::Io(file_name.clone(), err))?;
        debug!("read {} from archive", file_name.display());
        return Ok(buf);
    }
    Err(ArchiveError::MissingEntry(suffix.to_owned()))
}

/// Unpack every file below the top-level directory `prefix` into `dest`,
/// keeping paths relative to the archive root (so `prefix/x` lands at
/// `dest/prefix/x`).
///
/// Returns how many files were unpacked. Entries that would escape `dest` are
/// ignored.
pub fn unpack_tree<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    prefix: &str,
    dest: &Path,
) -> Result<usize, ArchiveError> {
    let mut unpacked = 0;
    for index in 0..archive.len() {
        let compressed_entry = archive.by_index_raw(index)?;
        if !compressed_entry.is_file() {
            continue;
        }
        let Some(file_name) = compressed_entry.enclosed_name() else {
            continue;
        };

        // Check path is relevant
        let mut components = file_name.components();
        if components.next() != Some(Component::Normal(OsStr::new(prefix))) {
            continue;
        }

        drop(compressed_entry);
        let mut decompressed_entry = archive.by_index(index)?;

        let final_path = dest.join(&file_name);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| ArchiveError::Io(parent.to_owned(), err))?;
        }
        let mut out_file = File::create(&final_path)
            .map_err(|err| ArchiveError::Io(final_path.clone(), err))?;
        io::copy(&mut decompressed_entry, &mut out_file)
            .map_err(|err| ArchiveError::Io(final_path.clone(), err))?;
        unpacked += 1;
    }
    debug!("unpacked {unpacked} files under {prefix}/ to {}", dest.display());
    Ok(unpacked)
}

/// Open a zip archive on disk.
pub fn open_archive(
    path: impl AsRef<Path>,
) -> Result<ZipArchive<File>, ArchiveError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|err| ArchiveError::Io(PathBuf::from(path), err))?;
    Ok(ZipArchive::new(file)?)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

    use super::*;

    /// Build an in-memory zip with the given `(path, contents)` files.
    fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);
        for (path, contents) in files {
            writer.start_file(*path, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn read_entry_matches_whole_components() {
        let bytes = zip_bytes(&[
            ("repo-abc/src/xpycountry/databases/iso3166-1.json", "wrong"),
            ("repo-abc/src/pycountry/databases/iso3166-1.json", "right"),
        ]);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let contents =
            read_entry(&mut archive, "pycountry/databases/iso3166-1.json")
                .unwrap();
        assert_eq!(contents, b"right");
    }

    #[test]
    fn read_entry_ignores_declared_size() {
        let mut bytes = zip_bytes(&[("a/b.txt", "hello")]);
        // Claim a ~2 GiB uncompressed size in the central directory header
        let header = bytes
            .windows(4)
            .position(|window| window == b"PK\x01\x02")
            .unwrap();
        bytes[header + 24..header + 28]
            .copy_from_slice(&0x7fff_fff0_u32.to_le_bytes());

        // A mismatch may be reported, but nothing is sized on the header
        let contents = ZipArchive::new(Cursor::new(bytes))
            .map_err(ArchiveError::from)
            .and_then(|mut archive| read_entry(&mut archive, "b.txt"));
        if let Ok(contents) = contents {
            assert_eq!(contents, b"hello");
        }
    }

    #[test]
    fn read_entry_reports_missing() {
        let bytes = zip_bytes(&[("a/b.txt", "hello")]);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let err = read_entry(&mut archive, "c.txt").unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::MissingEntry(name) if name == "c.txt",
        ));
    }

    #[test]
    fn unpack_tree_only_takes_prefix() {
        let bytes = zip_bytes(&[
            ("stopwords/english", "a\nthe\n"),
            ("stopwords/README", "readme"),
            ("other/english", "nope"),
        ]);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let dest = tempfile::tempdir().unwrap();
        let count =
            unpack_tree(&mut archive, "stopwords", dest.path()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(dest.path().join("stopwords/english")).unwrap(),
            "a\nthe\n",
        );
        assert!(!dest.path().join("other").exists());
    }

    #[test]
    fn garbage_is_not_an_archive() {
        let err = ZipArchive::new(Cursor::new(b"not a zip".to_vec()))
            .map_err(ArchiveError::from)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Zip(_)));
    }
}
