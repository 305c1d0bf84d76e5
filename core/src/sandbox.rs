use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tempfile::TempDir;

use crate::{
    errors::{ArchiveError, ExtractionError, InstallError},
    fetch,
};

/// Where a [`Package`] comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Download it over HTTP(S).
    Remote(String),
    /// Copy it from the local filesystem.
    Local(PathBuf),
}

/// A single named package an exporter needs installed before it can extract
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    source: Source,
}

impl Package {
    /// Create a new package description.
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Package {
            name: name.into(),
            source,
        }
    }

    /// Get the name of the package.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get where the package will be installed from.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    /// Replace where the package will be installed from.
    #[must_use]
    pub fn with_source(self, source: Source) -> Self {
        Package { source, ..self }
    }
}

/// A disposable, uniquely named directory to install a package into.
///
/// The directory and everything in it is deleted when the sandbox is
/// [released](Sandbox::release) or dropped, whichever comes first.
#[derive(Debug)]
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// Create a new, empty sandbox in the system temporary directory. Its name
    /// starts with `prefix`.
    pub fn acquire(prefix: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        debug!("acquired sandbox {}", dir.path().display());
        Ok(Sandbox { dir })
    }

    /// The sandbox directory.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Install `package` into the sandbox.
    pub fn install(
        &self,
        package: &Package,
    ) -> Result<Installed<'_>, InstallError> {
        let path = self.path().join(package.name());
        match package.source() {
            Source::Remote(url) => {
                info!("installing {} from {url}", package.name());
                let bytes = fetch::download(url)?;
                fs::write(&path, bytes)
                    .map_err(|err| InstallError::Save(path.clone(), err))?;
            },
            Source::Local(local) => {
                info!(
                    "installing {} from {}",
                    package.name(),
                    local.display(),
                );
                fs::copy(local, &path)
                    .map_err(|err| InstallError::Copy(local.clone(), err))?;
            },
        }
        Ok(Installed {
            name: package.name().to_owned(),
            path,
            _sandbox: self,
        })
    }

    /// Delete the sandbox now, reporting whether that worked.
    ///
    /// Dropping the sandbox does the same but swallows the error.
    pub fn release(self) -> io::Result<()> {
        let path = self.path().to_owned();
        self.dir.close()?;
        debug!("released sandbox {}", path.display());
        Ok(())
    }
}

/// A package installed in a [`Sandbox`]. Can't outlive it.
#[derive(Debug)]
pub struct Installed<'s> {
    name: String,
    path: PathBuf,
    _sandbox: &'s Sandbox,
}

impl Installed<'_> {
    /// The name of the installed package.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the package file lives in the sandbox.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole package file.
    pub fn read(&self) -> Result<Vec<u8>, ExtractionError> {
        fs::read(&self.path)
            .map_err(|err| ExtractionError::Read(self.path.clone(), err))
    }

    /// Open the package as a zip archive.
    pub fn archive(&self) -> Result<zip::ZipArchive<fs::File>, ArchiveError> {
        fetch::open_archive(&self.path)
    }
}
