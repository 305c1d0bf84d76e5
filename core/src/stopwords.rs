//! Per-language stopword lists from NLTK's stopwords corpus, keyed by ISO 639-1
//! code.
use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::{
    Exporter,
    errors::{ArchiveError, CorpusError, ExtractionError},
    fetch,
    sandbox::{Installed, Package, Source},
};

/// Where the stopwords corpus is downloaded from by default.
pub const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages/corpora/stopwords.zip";

/// NLTK's names for the languages we export, and their ISO 639-1 codes.
///
/// Languages are attempted, and appear in the output, in this order.
pub static LANGUAGES: &[(&str, &str)] = &[
    ("albanian", "sq"),
    ("arabic", "ar"),
    ("azerbaijani", "az"),
    ("basque", "eu"),
    ("belarusian", "be"),
    ("bengali", "bn"),
    ("catalan", "ca"),
    ("chinese", "zh"),
    ("danish", "da"),
    ("dutch", "nl"),
    ("english", "en"),
    ("finnish", "fi"),
    ("french", "fr"),
    ("german", "de"),
    ("greek", "el"),
    ("hebrew", "he"),
    ("hungarian", "hu"),
    ("indonesian", "id"),
    ("italian", "it"),
    ("kazakh", "kk"),
    ("nepali", "ne"),
    ("norwegian", "no"),
    ("portuguese", "pt"),
    ("romanian", "ro"),
    ("russian", "ru"),
    ("slovene", "sl"),
    ("spanish", "es"),
    ("swedish", "sv"),
    ("tajik", "tg"),
    ("tamil", "ta"),
    ("turkish", "tr"),
];

/// Something that can hand out a raw stopword list per language.
pub trait StopwordCorpus {
    /// Get the words listed for `language` (an NLTK language name), as-is.
    fn words(&self, language: &str) -> Result<Vec<String>, CorpusError>;
}

/// An unpacked NLTK corpus: one file per language in `<root>/stopwords/`, one
/// word per line.
///
/// Only `root` is searched, there's no fallback to a system-wide corpus.
#[derive(Debug, Clone)]
pub struct CorpusDir {
    root: PathBuf,
}

impl CorpusDir {
    /// Read the corpus found below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CorpusDir { root: root.into() }
    }

    fn path_for(&self, language: &str) -> Option<PathBuf> {
        // Language names are bare file names, never paths
        if language.is_empty()
            || language.contains(['/', '\\'])
            || language.starts_with('.')
        {
            return None;
        }
        Some(self.root.join("stopwords").join(language))
    }
}

impl StopwordCorpus for CorpusDir {
    fn words(&self, language: &str) -> Result<Vec<String>, CorpusError> {
        let path = self
            .path_for(language)
            .ok_or_else(|| CorpusError::UnknownLanguage(language.to_owned()))?;
        let bytes = fs::read(&path).map_err(|io_err| match io_err.kind() {
            io::ErrorKind::NotFound => {
                CorpusError::UnknownLanguage(language.to_owned())
            },
            _ => CorpusError::FailedToRead(path.clone(), io_err),
        })?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| CorpusError::NotUtf8(path.clone()))?;
        Ok(corpus_lines(&raw))
    }
}

/// Split a corpus file into entries. Whitespace-only lines are dropped, other
/// lines are kept verbatim (minus the line ending).
fn corpus_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim_end().is_empty())
        .map(String::from)
        .collect()
}

/// Drop every word containing a space, then deduplicate and sort.
///
/// Nothing is trimmed or case-folded: `"The"` and `"the"` are both kept,
/// `"an "` is dropped.
pub fn normalize(words: impl IntoIterator<Item = String>) -> Vec<String> {
    words
        .into_iter()
        .filter(|word| !word.contains(' '))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Look up every `(language, iso)` pair in `corpus`, keyed by `iso` in table
/// order.
///
/// A language that can't be read is logged and skipped, as is one left empty
/// after [`normalize`]. It's an error for no language at all to make it.
pub fn collect_stopwords(
    corpus: &impl StopwordCorpus,
    languages: &[(&str, &str)],
) -> Result<IndexMap<String, Vec<String>>, ExtractionError> {
    let mut data = IndexMap::with_capacity(languages.len());
    for &(language, iso) in languages {
        let words = match corpus.words(language) {
            Ok(words) => normalize(words),
            Err(err) => {
                warn!("{iso} ({language}): {err}");
                continue;
            },
        };
        if words.is_empty() {
            debug!("{iso} ({language}) has no usable words, skipping");
            continue;
        }
        debug!("{iso} ({language}): {} words", words.len());
        data.insert(iso.to_owned(), words);
    }
    if data.is_empty() {
        return Err(ExtractionError::NoStopwords);
    }
    Ok(data)
}

/// Unpack the corpus archive's `stopwords/` tree into `<data_dir>/corpora`.
fn stage_corpus(
    installed: &Installed<'_>,
    data_dir: &Path,
) -> Result<CorpusDir, ArchiveError> {
    let corpora = data_dir.join("corpora");
    let mut archive = installed.archive()?;
    let unpacked = fetch::unpack_tree(&mut archive, "stopwords", &corpora)?;
    if unpacked == 0 {
        return Err(ArchiveError::MissingEntry(String::from("stopwords/")));
    }
    Ok(CorpusDir::new(corpora))
}

/// Exports `stopwords.json`.
#[derive(Debug, Clone)]
pub struct Stopwords {
    package: Package,
    languages: &'static [(&'static str, &'static str)],
}

impl Stopwords {
    /// The file name written to the output directory.
    pub const OUT_FILE: &str = "stopwords.json";

    /// Install the corpus from `source` instead of [`DEFAULT_URL`].
    #[must_use]
    pub fn with_source(self, source: Source) -> Self {
        Stopwords {
            package: self.package.with_source(source),
            ..self
        }
    }

    /// The languages that will be attempted.
    #[inline]
    #[must_use]
    pub const fn languages(&self) -> &'static [(&'static str, &'static str)] {
        self.languages
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Stopwords {
            package: Package::new(
                "nltk_stopwords",
                Source::Remote(DEFAULT_URL.to_owned()),
            ),
            languages: LANGUAGES,
        }
    }
}

impl Exporter for Stopwords {
    type Output = IndexMap<String, Vec<String>>;

    fn sandbox_prefix(&self) -> &str {
        "nltk_sandbox_"
    }

    fn package(&self) -> &Package {
        &self.package
    }

    fn out_file(&self) -> &str {
        Self::OUT_FILE
    }

    fn extract(
        &self,
        installed: &Installed<'_>,
    ) -> Result<Self::Output, ExtractionError> {
        let scratch = tempfile::Builder::new()
            .prefix("nltk_data_")
            .tempdir()
            .map_err(|err| {
                ExtractionError::CorpusDownload(ArchiveError::Io(
                    std::env::temp_dir(),
                    err,
                ))
            })?;
        let corpus = stage_corpus(installed, scratch.path())
            .map_err(ExtractionError::CorpusDownload)?;
        info!("staged stopwords corpus in {}", scratch.path().display());

        let data = collect_stopwords(&corpus, self.languages)?;
        info!(
            "collected stopwords for {} of {} languages",
            data.len(),
            self.languages.len(),
        );
        if let Err(err) = scratch.close() {
            warn!("failed to remove corpus scratch directory: {err}");
        }
        Ok(data)
    }
}
