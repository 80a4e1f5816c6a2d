use thiserror::Error;

use crate::overlay::OverlayId;

/// Errors surfaced by document loading and overlay control.
///
/// Formatting never appears here: missing or malformed metadata degrades to
/// placeholder display instead of failing the dialog.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to parse PDF: {0}")]
    PdfParse(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("page {0} not found in document")]
    PageNotFound(u32),

    #[error("overlay '{0}' is already active")]
    OverlayActive(OverlayId),

    #[error("overlay '{0}' is not the active overlay")]
    OverlayNotActive(OverlayId),

    #[error("document was closed before its data became available")]
    DocumentClosed,
}

pub type Result<T> = std::result::Result<T, ViewerError>;
