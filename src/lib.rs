//! Document properties support for a PDF viewer.
//!
//! [`properties::DocumentProperties`] drives the properties dialog: it reads
//! metadata through [`document::DocumentProxy`], formats every value into
//! localized display text and pushes the result into bound [`ui::FieldView`]s.

rust_i18n::i18n!("locales", fallback = "en");

pub mod document;
pub mod error;
pub mod events;
pub mod format;
pub mod i18n;
pub mod overlay;
pub mod pdf_date;
pub mod properties;
pub mod ui;


pub use document::{
    DocumentInfo, DocumentMetadata, DocumentProxy, DownloadInfo, LopdfDocument, PageSizeInches,
};
pub use error::{Result, ViewerError};
pub use events::{EventBus, ViewerEvent};
pub use i18n::L10n;
pub use overlay::{OverlayId, OverlayManager};
pub use properties::{DocumentProperties, FieldData, DOCUMENT_PROPERTIES_OVERLAY};
pub use ui::{Field, FieldView, FieldViews, TextField, DEFAULT_FIELD_CONTENT};
