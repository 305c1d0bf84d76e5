//! Named colors from the `color-name-list` dataset.
use std::collections::HashSet;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::{
    Exporter,
    errors::ExtractionError,
    sandbox::{Installed, Package, Source},
};

/// Where the color list is downloaded from by default.
pub const DEFAULT_URL: &str =
    "https://unpkg.com/color-name-list/dist/colornames.json";

/// Names longer than this are dropped. Measured in UTF-16 code units, which is
/// what the dataset's consumers count in.
pub const MAX_NAME_LENGTH: usize = 100;

/// A named color, as written to `color_names.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Color {
    /// The color's name, unique across the output.
    pub name: String,
    /// Six lower-case hex digits, no leading `#`, unique across the output.
    pub hex: String,
}

/// Parse and clean up the raw dataset: a JSON array of
/// `{"name": .., "hex": ..}` objects.
///
/// Entries are kept in order. Ones that aren't objects, have a missing, empty
/// or over-long name, or have a hex that isn't six hex digits (after dropping
/// a leading `#`) are skipped. So are repeated names and repeated hexes (case
/// insensitive), the first occurrence wins.
pub fn parse_colors(bytes: &[u8]) -> Result<Vec<Color>, ExtractionError> {
    let json: Value = serde_json::from_slice(bytes)?;
    let Value::Array(entries) = json else {
        return Err(ExtractionError::Invalid("not an array"));
    };
    if entries.is_empty() {
        return Err(ExtractionError::Invalid("empty array"));
    }

    let mut colors = Vec::new();
    let mut seen_names = HashSet::new();
    let mut seen_hexes = HashSet::new();
    for entry in &entries {
        let Some(name) = string_field(entry, "name") else {
            continue;
        };
        let Some(hex) = string_field(entry, "hex") else {
            continue;
        };
        if name.encode_utf16().count() > MAX_NAME_LENGTH
            || seen_names.contains(name)
        {
            continue;
        }
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            continue;
        }
        let hex = hex.to_ascii_lowercase();
        if seen_hexes.contains(&hex) {
            continue;
        }
        seen_names.insert(name);
        seen_hexes.insert(hex.clone());
        colors.push(Color {
            name: name.to_owned(),
            hex,
        });
    }
    debug!("kept {} of {} colors", colors.len(), entries.len());

    if colors.is_empty() {
        return Err(ExtractionError::NoColors);
    }
    Ok(colors)
}

fn string_field<'v>(entry: &'v Value, key: &str) -> Option<&'v str> {
    entry
        .as_object()?
        .get(key)?
        .as_str()
        .filter(|value| !value.is_empty())
}

/// Exports `color_names.json`.
#[derive(Debug, Clone)]
pub struct ColorNames {
    package: Package,
}

impl ColorNames {
    /// The file name written to the output directory.
    pub const OUT_FILE: &str = "color_names.json";

    /// Fetch the color list from `source` instead of [`DEFAULT_URL`].
    #[must_use]
    pub fn with_source(self, source: Source) -> Self {
        ColorNames {
            package: self.package.with_source(source),
        }
    }
}

impl Default for ColorNames {
    fn default() -> Self {
        ColorNames {
            package: Package::new(
                "color-name-list",
                Source::Remote(DEFAULT_URL.to_owned()),
            ),
        }
    }
}

impl Exporter for ColorNames {
    type Output = Vec<Color>;

    fn sandbox_prefix(&self) -> &str {
        "color_names_sandbox_"
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
        parse_colors(&installed.read()?)
    }
}
