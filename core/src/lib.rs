#![cfg_attr(docsrs, feature(doc_cfg))]
//! `refdata` regenerates small reference datasets from their upstream
//! sources and writes them out as compact JSON:
//!
//! | Exporter         | Upstream                         | Output               |
//! |------------------|----------------------------------|----------------------|
//! | [`CountryCodes`] | pycountry's ISO 3166-1 database  | `country_codes.json` |
//! | [`Stopwords`]    | NLTK's stopwords corpus          | `stopwords.json`     |
//! | [`ColorNames`]   | the `color-name-list` dataset    | `color_names.json`   |
//!
//! Every exporter runs the same way through [`export`]: a throwaway
//! [`Sandbox`] is created, the exporter's one [`Package`] is installed into
//! it, the exporter extracts its output from that package, and the output
//! replaces the previous file in one go. The sandbox is deleted afterwards,
//! also when anything fails.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use refdata::{CountryCodes, export};
//!
//! let written = export(&CountryCodes::default(), Path::new("data"))?;
//! println!("wrote {}", written.display());
//! # Ok::<(), refdata::errors::ExportError>(())
//! ```

pub use colors::{Color, ColorNames};
pub use countries::{Country, CountryCodes};
pub use pipeline::{Exporter, export};
pub use sandbox::{Installed, Package, Sandbox, Source};
pub use stopwords::{CorpusDir, StopwordCorpus, Stopwords};

pub mod colors;
pub mod countries;
pub mod errors;
pub mod fetch;
mod output;
mod pipeline;
mod sandbox;
pub mod stopwords;
