use std::path::Path;

use crate::automation::Automation;
use crate::error::Error;
use crate::format::SaveFormat;

/// Scoped ownership of an application instance and its open document.
///
/// Dropping a session closes the document and quits the application if
/// [`Session::release`] was not called. Each handle is released at most once.
pub struct Session<A: Automation> {
    app: Option<A>,
    document: Option<A::Document>,
}

impl<A: Automation> Session<A> {
    pub fn new(app: A) -> Self {
        Session {
            app: Some(app),
            document: None,
        }
    }

    pub fn open(&mut self, path: &Path) -> Result<(), Error> {
        self.close()?;
        let app = self.app_mut()?;
        let document = app.open_document(path)?;
        log::debug!("Opened {}", path.display());
        self.document = Some(document);
        Ok(())
    }

    pub fn save_as(&mut self, path: &Path, format: SaveFormat) -> Result<(), Error> {
        let (Some(app), Some(document)) = (self.app.as_mut(), self.document.as_ref()) else {
            return Err(Error::export_failed(path, "no document is open"));
        };
        app.save_document_as(document, path, format)?;
        log::debug!("Saved {} as {format} (code {})", path.display(), format.code());
        Ok(())
    }

    /// Closes the open document, if any.
    pub fn close(&mut self) -> Result<(), Error> {
        let Some(document) = self.document.take() else {
            return Ok(());
        };
        self.app_mut()?.close_document(document).map_err(cleanup_error)
    }

    /// Closes any open document, then quits the application even if closing
    /// failed. The first failure is returned.
    pub fn release(mut self) -> Result<(), Error> {
        self.release_handles()
    }

    fn release_handles(&mut self) -> Result<(), Error> {
        let closed = self.close();
        let quit = match self.app.take() {
            Some(mut app) => app.quit().map_err(cleanup_error),
            None => Ok(()),
        };
        if closed.is_ok() && quit.is_ok() {
            log::debug!("Application released");
        }
        closed.and(quit)
    }

    fn app_mut(&mut self) -> Result<&mut A, Error> {
        self.app
            .as_mut()
            .ok_or_else(|| Error::ResourceCleanupFailed("application already quit".into()))
    }
}

impl<A: Automation> Drop for Session<A> {
    fn drop(&mut self) {
        if self.app.is_none() && self.document.is_none() {
            return;
        }
        if let Err(e) = self.release_handles() {
            log::warn!("Releasing office application on drop: {e}");
        }
    }
}

fn cleanup_error(e: Error) -> Error {
    match e {
        Error::ResourceCleanupFailed(_) => e,
        other => Error::ResourceCleanupFailed(other.to_string()),
    }
}
