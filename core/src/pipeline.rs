use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::{
    errors::{ExportError, ExtractionError},
    output,
    sandbox::{Installed, Package, Sandbox},
};

/// A dataset that can be exported with [`export`].
///
/// An exporter only sees its own configuration and the package installed for
/// it; everything else (sandboxing, cleanup, writing) is handled by
/// [`export`].
pub trait Exporter {
    /// What [`extract`](Exporter::extract) produces, serialized as-is.
    type Output: Serialize;

    /// Prefix for the sandbox directory's name.
    fn sandbox_prefix(&self) -> &str;

    /// The one package to install into the sandbox.
    fn package(&self) -> &Package;

    /// File name of the output, relative to the output directory.
    fn out_file(&self) -> &str;

    /// Turn the installed package into the output.
    fn extract(
        &self,
        installed: &Installed<'_>,
    ) -> Result<Self::Output, ExtractionError>;
}

/// Run `exporter` from start to finish, writing its output into `out_dir`.
///
/// Returns the path written. On error the output file is left as it was, and
/// in every case the sandbox is gone by the time this returns.
pub fn export<E: Exporter>(
    exporter: &E,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let sandbox = Sandbox::acquire(exporter.sandbox_prefix())
        .map_err(ExportError::Sandbox)?;

    let output = {
        let package = exporter.package();
        let installed = sandbox.install(package).map_err(|source| {
            ExportError::Install {
                package: package.name().to_owned(),
                source,
            }
        })?;
        exporter.extract(&installed)?
    };

    let out_path = out_dir.join(exporter.out_file());
    output::write_json(&out_path, &output)
        .map_err(|err| ExportError::Write(out_path.clone(), err))?;
    info!("wrote {}", out_path.display());

    if let Err(err) = sandbox.release() {
        warn!("failed to remove sandbox: {err}");
    }
    Ok(out_path)
}
