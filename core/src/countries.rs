//! ISO 3166-1 alpha-2 codes to country names, from pycountry's bundled copy of
//! the Debian `iso-codes` database.
use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;

use crate::{
    Exporter,
    errors::ExtractionError,
    fetch,
    sandbox::{Installed, Package, Source},
};

/// Where pycountry's source archive is downloaded from by default.
pub const DEFAULT_URL: &str =
    "https://github.com/pycountry/pycountry/zipball/main";

/// The path (suffix) of the ISO 3166-1 database inside the pycountry archive.
pub const DATABASE_ENTRY: &str = "pycountry/databases/iso3166-1.json";

/// One record of the ISO 3166-1 database. Every attribute is optional; records
/// missing what we need are skipped, not rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Country {
    /// The two-letter code, e.g. `"DE"`.
    pub alpha_2: Option<String>,
    /// The short name, e.g. `"Germany"`.
    pub name: Option<String>,
    /// The official name, e.g. `"Federal Republic of Germany"`.
    pub official_name: Option<String>,
    /// A common name, only present for a handful of countries.
    pub common_name: Option<String>,
}

impl Country {
    /// The two-letter code, if present and non-empty.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        non_empty(&self.alpha_2)
    }

    /// The name to publish: the official name, falling back to the short
    /// name, then the common name.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        non_empty(&self.official_name)
            .or_else(|| non_empty(&self.name))
            .or_else(|| non_empty(&self.common_name))
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

#[derive(Debug, Deserialize)]
struct Database {
    #[serde(rename = "3166-1")]
    countries: Vec<Country>,
}

/// Parse the contents of `iso3166-1.json`.
pub fn parse_database(bytes: &[u8]) -> Result<Vec<Country>, ExtractionError> {
    let database: Database = serde_json::from_slice(bytes)?;
    Ok(database.countries)
}

/// Map upper-cased two-letter codes to display names, sorted by code.
///
/// Countries without a code or a name are left out. If two records share a
/// code, the later one wins.
pub fn country_codes<'a>(
    countries: impl IntoIterator<Item = &'a Country>,
) -> BTreeMap<String, String> {
    let mut codes = BTreeMap::new();
    for country in countries {
        let Some(code) = country.code() else {
            debug!("skipping country without a code: {country:?}");
            continue;
        };
        let Some(name) = country.display_name() else {
            debug!("skipping {code}, it has no name");
            continue;
        };
        codes.insert(code.to_uppercase(), name.to_owned());
    }
    codes
}

/// Exports `country_codes.json`.
#[derive(Debug, Clone)]
pub struct CountryCodes {
    package: Package,
}

impl CountryCodes {
    /// The file name written to the output directory.
    pub const OUT_FILE: &str = "country_codes.json";

    /// Install pycountry from `source` instead of [`DEFAULT_URL`].
    #[must_use]
    pub fn with_source(self, source: Source) -> Self {
        CountryCodes {
            package: self.package.with_source(source),
        }
    }
}

impl Default for CountryCodes {
    fn default() -> Self {
        CountryCodes {
            package: Package::new(
                "pycountry",
                Source::Remote(DEFAULT_URL.to_owned()),
            ),
        }
    }
}

impl Exporter for CountryCodes {
    type Output = BTreeMap<String, String>;

    fn sandbox_prefix(&self) -> &str {
        "pycountry_sandbox_"
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
        let mut archive = installed.archive()?;
        let bytes = fetch::read_entry(&mut archive, DATABASE_ENTRY)?;
        let countries = parse_database(&bytes)?;
        let codes = country_codes(&countries);
        debug!(
            "kept {} of {} countries from {}",
            codes.len(),
            countries.len(),
            installed.name(),
        );
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(
        alpha_2: Option<&str>,
        name: Option<&str>,
        official_name: Option<&str>,
        common_name: Option<&str>,
    ) -> Country {
        Country {
            alpha_2: alpha_2.map(String::from),
            name: name.map(String::from),
            official_name: official_name.map(String::from),
            common_name: common_name.map(String::from),
        }
    }

    #[test]
    fn display_name_preference() {
        let all = country(
            Some("TW"),
            Some("Taiwan, Province of China"),
            Some("Taiwan, Province of China"),
            Some("Taiwan"),
        );
        assert_eq!(all.display_name(), Some("Taiwan, Province of China"));

        let no_official =
            country(Some("BO"), Some("Bolivia"), None, Some("Bo"));
        assert_eq!(no_official.display_name(), Some("Bolivia"));

        let only_common = country(Some("XX"), None, Some(""), Some("Common"));
        assert_eq!(only_common.display_name(), Some("Common"));

        assert_eq!(country(Some("XX"), None, None, None).display_name(), None);
    }

    #[test]
    fn skips_unusable_records() {
        let countries = [
            country(None, Some("Nowhere"), None, None),
            country(Some(""), Some("Empty code"), None, None),
            country(Some("ZZ"), None, None, None),
            country(
                Some("de"),
                Some("Germany"),
                Some("Federal Republic of Germany"),
                None,
            ),
        ];
        let codes = country_codes(&countries);
        assert_eq!(
            codes,
            BTreeMap::from([(
                String::from("DE"),
                String::from("Federal Republic of Germany"),
            )]),
        );
    }

    #[test]
    fn sorted_and_last_wins() {
        let countries = [
            country(Some("ZW"), Some("Zimbabwe"), None, None),
            country(Some("AD"), Some("Andorra"), None, None),
            country(Some("FR"), Some("France"), None, None),
            country(Some("AD"), Some("Andorra (again)"), None, None),
        ];
        let codes = country_codes(&countries);
        let keys = codes.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, ["AD", "FR", "ZW"]);
        assert_eq!(codes["AD"], "Andorra (again)");
    }

    #[test]
    fn parses_database_ignoring_extra_fields() {
        let json = r#"{"3166-1": [
            {"alpha_2": "AW", "alpha_3": "ABW", "flag": "🇦🇼", "name": "Aruba", "numeric": "533"},
            {"alpha_2": "AX", "alpha_3": "ALA", "name": "Åland Islands", "numeric": "248"},
            {"alpha_3": "XXX", "name": "No alpha-2"}
        ]}"#;
        let countries = parse_database(json.as_bytes()).unwrap();
        assert_eq!(countries.len(), 3);
        let codes = country_codes(&countries);
        assert_eq!(codes.len(), 2);
        assert_eq!(codes["AX"], "Åland Islands");
        assert!(codes.keys().all(|key| {
            key.len() == 2 && key.bytes().all(|b| b.is_ascii_uppercase())
        }));
    }

    #[test]
    fn malformed_database() {
        let err = parse_database(br#"{"3166-2": []}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }
}
