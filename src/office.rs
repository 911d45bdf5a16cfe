use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::automation::Automation;
use crate::error::Error;
use crate::format::SaveFormat;
use crate::sniff::{self, DocumentKind};

pub const PROGRAM_ENV: &str = "OFFICEPDF_PROGRAM";

const PROGRAM_NAMES: &[&str] = &["soffice", "libreoffice"];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &["/Applications/LibreOffice.app/Contents/MacOS/soffice"];
#[cfg(windows)]
const INSTALL_LOCATIONS: &[&str] = &[
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
];
#[cfg(not(any(target_os = "macos", windows)))]
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/lib/libreoffice/program/soffice",
    "/opt/libreoffice/program/soffice",
    "/snap/bin/libreoffice",
];

#[derive(Clone, Debug, Default)]
pub struct OfficeConfig {
    /// Office executable. Searched for on `PATH` and in the usual install
    /// locations when unset.
    pub program: Option<PathBuf>,
}

impl OfficeConfig {
    pub fn from_env() -> Self {
        OfficeConfig {
            program: env::var_os(PROGRAM_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// A document opened through [`Office`].
#[derive(Debug)]
pub struct OfficeDocument {
    path: PathBuf,
    kind: DocumentKind,
}

/// LibreOffice driven headless, with a private user profile per instance.
pub struct Office {
    program: PathBuf,
    profile: Option<TempDir>,
}

impl Office {
    pub fn launch(config: OfficeConfig) -> Result<Self, Error> {
        let program = match config.program {
            Some(program) => program,
            None => find_program().ok_or_else(|| {
                Error::ApplicationUnavailable(format!(
                    "no soffice or libreoffice executable found (set {PROGRAM_ENV})"
                ))
            })?,
        };

        let probe = Command::new(&program)
            .arg("--version")
            .output()
            .map_err(|e| {
                Error::ApplicationUnavailable(format!("failed to run {}: {e}", program.display()))
            })?;
        if !probe.status.success() {
            return Err(Error::ApplicationUnavailable(format!(
                "{} --version exited with {}",
                program.display(),
                probe.status
            )));
        }
        log::info!(
            "Using {} ({})",
            program.display(),
            String::from_utf8_lossy(&probe.stdout).trim()
        );

        let profile = tempfile::Builder::new()
            .prefix("officepdf-profile-")
            .tempdir()
            .map_err(|e| Error::ApplicationUnavailable(format!("cannot create profile: {e}")))?;

        Ok(Office {
            program,
            profile: Some(profile),
        })
    }

    fn profile_url(&self) -> Result<String, Error> {
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| Error::ApplicationUnavailable("application has quit".into()))?;
        url::Url::from_directory_path(profile.path())
            .map(String::from)
            .map_err(|()| {
                Error::ApplicationUnavailable(format!(
                    "profile path is not absolute: {}",
                    profile.path().display()
                ))
            })
    }
}

impl Automation for Office {
    type Document = OfficeDocument;

    fn open_document(&mut self, path: &Path) -> Result<OfficeDocument, Error> {
        let meta = fs::metadata(path).map_err(|e| Error::open_failed(path, e))?;
        if !meta.is_file() {
            return Err(Error::open_failed(path, "not a file"));
        }
        let kind = sniff::sniff(path).unwrap_or_else(|e| {
            log::warn!("Could not inspect {}: {e}", path.display());
            DocumentKind::Unrecognized
        });
        if kind == DocumentKind::Unrecognized {
            log::warn!(
                "{} is not a recognized word-processing container; leaving it to the application",
                path.display()
            );
        } else {
            log::debug!("{} detected as {kind:?}", path.display());
        }
        let path = path
            .canonicalize()
            .map_err(|e| Error::open_failed(path, e))?;
        Ok(OfficeDocument { path, kind })
    }

    fn save_document_as(
        &mut self,
        document: &OfficeDocument,
        path: &Path,
        format: SaveFormat,
    ) -> Result<(), Error> {
        let profile_url = self.profile_url()?;
        let scratch = tempfile::Builder::new()
            .prefix("officepdf-out-")
            .tempdir()
            .map_err(|e| Error::export_failed(path, e))?;

        let mut user_installation = OsString::from("-env:UserInstallation=");
        user_installation.push(&profile_url);

        let output = Command::new(&self.program)
            .args(["--headless", "--norestore", "--nologo", "--nodefault", "--nolockcheck"])
            .arg(user_installation)
            .args(["--convert-to", format.export_filter(), "--outdir"])
            .arg(scratch.path())
            .arg(&document.path)
            .output()
            .map_err(|e| Error::export_failed(path, format!("failed to run office: {e}")))?;

        if !output.status.success() {
            return Err(Error::export_failed(
                path,
                format!(
                    "office exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let stem = document
            .path
            .file_stem()
            .ok_or_else(|| Error::export_failed(path, "input has no file name"))?;
        let mut produced_name = stem.to_os_string();
        produced_name.push(".");
        produced_name.push(format.extension());
        let produced = scratch.path().join(produced_name);
        if !produced.is_file() {
            // soffice exits 0 when the source cannot be loaded.
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("office produced no output from {:?} input", document.kind),
                msg => format!("office produced no output from {:?} input: {msg}", document.kind),
            };
            return Err(Error::export_failed(path, reason));
        }

        fs::copy(&produced, path).map_err(|e| Error::export_failed(path, e))?;
        if let Err(e) = scratch.close() {
            log::warn!("Removing scratch directory: {e}");
        }
        Ok(())
    }

    fn close_document(&mut self, document: OfficeDocument) -> Result<(), Error> {
        log::debug!("Closed {}", document.path.display());
        Ok(())
    }

    fn quit(&mut self) -> Result<(), Error> {
        let Some(profile) = self.profile.take() else {
            return Ok(());
        };
        profile
            .close()
            .map_err(|e| Error::ResourceCleanupFailed(format!("removing office profile: {e}")))
    }
}

fn find_program() -> Option<PathBuf> {
    let suffix = env::consts::EXE_SUFFIX;
    if let Some(paths) = env::var_os("PATH") {
        for dir in env::split_paths(&paths) {
            for name in PROGRAM_NAMES {
                let candidate = dir.join(format!("{name}{suffix}"));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }
    INSTALL_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}
