mod automation;
mod error;
mod format;
mod office;
mod session;
mod sniff;

pub use automation::Automation;
pub use error::Error;
pub use format::SaveFormat;
pub use office::{Office, OfficeConfig, OfficeDocument, PROGRAM_ENV};
pub use session::Session;
pub use sniff::{DocumentKind, sniff, sniff_bytes};

use std::path::Path;
use std::time::Instant;

/// Exports `input` as PDF to `output` using the office application found
/// through [`OfficeConfig::from_env`].
pub fn convert(input: &Path, output: &Path) -> Result<(), Error> {
    let office = Office::launch(OfficeConfig::from_env())?;
    convert_with(office, input, output)
}

/// Exports `input` as PDF to `output` through an already launched application.
/// The application is quit before returning, whether or not the export worked.
pub fn convert_with<A: Automation>(app: A, input: &Path, output: &Path) -> Result<(), Error> {
    convert_to(app, input, output, SaveFormat::Pdf)
}

pub fn convert_to<A: Automation>(
    app: A,
    input: &Path,
    output: &Path,
    format: SaveFormat,
) -> Result<(), Error> {
    let t0 = Instant::now();
    let mut session = Session::new(app);

    let exported = session
        .open(input)
        .and_then(|()| session.save_as(output, format));
    let t_export = t0.elapsed();

    let released = session.release();
    let t_total = t0.elapsed();

    match (exported, released) {
        (Err(e), Err(cleanup)) => {
            log::warn!("{cleanup}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), released) => {
            log::info!(
                "Timing: export={:.1}ms, release={:.1}ms, total={:.1}ms ({} -> {})",
                t_export.as_secs_f64() * 1000.0,
                (t_total - t_export).as_secs_f64() * 1000.0,
                t_total.as_secs_f64() * 1000.0,
                input.display(),
                output.display(),
            );
            released
        }
    }
}
