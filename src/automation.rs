use std::path::Path;

use crate::error::Error;
use crate::format::SaveFormat;

/// The automation surface of a running word-processing application.
///
/// Implementations own one application instance. Callers are expected to go
/// through [`Session`](crate::Session), which guarantees that every opened
/// document is closed and the application is quit exactly once.
pub trait Automation {
    /// Handle to a document the application has open.
    type Document;

    fn open_document(&mut self, path: &Path) -> Result<Self::Document, Error>;

    fn save_document_as(
        &mut self,
        document: &Self::Document,
        path: &Path,
        format: SaveFormat,
    ) -> Result<(), Error>;

    fn close_document(&mut self, document: Self::Document) -> Result<(), Error>;

    fn quit(&mut self) -> Result<(), Error>;
}
