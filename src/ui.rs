//! Display-field plumbing between the properties controller and the host UI.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rust_i18n::t;
use serde::Serialize;

use crate::i18n::L10n;

/// Placeholder shown for fields with no usable value.
pub const DEFAULT_FIELD_CONTENT: &str = "-";

/// The fields of the document-properties dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FileName,
    FileSize,
    Title,
    Author,
    Subject,
    Keywords,
    CreationDate,
    ModificationDate,
    Creator,
    Producer,
    Version,
    PageCount,
    PageSize,
    Linearized,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::FileName,
        Field::FileSize,
        Field::Title,
        Field::Author,
        Field::Subject,
        Field::Keywords,
        Field::CreationDate,
        Field::ModificationDate,
        Field::Creator,
        Field::Producer,
        Field::Version,
        Field::PageCount,
        Field::PageSize,
        Field::Linearized,
    ];

    /// Localized label shown next to the field's value.
    pub fn label(self, l10n: &L10n) -> String {
        let locale = l10n.language();
        match self {
            Field::FileName => t!("properties.label_file_name", locale = locale),
            Field::FileSize => t!("properties.label_file_size", locale = locale),
            Field::Title => t!("properties.label_title", locale = locale),
            Field::Author => t!("properties.label_author", locale = locale),
            Field::Subject => t!("properties.label_subject", locale = locale),
            Field::Keywords => t!("properties.label_keywords", locale = locale),
            Field::CreationDate => t!("properties.label_creation_date", locale = locale),
            Field::ModificationDate => t!("properties.label_modification_date", locale = locale),
            Field::Creator => t!("properties.label_creator", locale = locale),
            Field::Producer => t!("properties.label_producer", locale = locale),
            Field::Version => t!("properties.label_version", locale = locale),
            Field::PageCount => t!("properties.label_page_count", locale = locale),
            Field::PageSize => t!("properties.label_page_size", locale = locale),
            Field::Linearized => t!("properties.label_linearized", locale = locale),
        }
        .to_string()
    }
}

/// Localized title of the properties dialog itself.
pub fn dialog_title(l10n: &L10n) -> String {
    t!("properties.dialog_title", locale = l10n.language()).to_string()
}

/// Write-only handle to one display target owned by the host.
pub trait FieldView: Send + Sync {
    fn set_text(&self, text: &str);
}

/// Binding of dialog fields to their display targets.
pub type FieldViews = HashMap<Field, Arc<dyn FieldView>>;

/// Plain shared text slot, for hosts that render from strings and for tests.
/// Starts out showing the placeholder, like the dialog markup does.
#[derive(Debug)]
pub struct TextField {
    text: Mutex<String>,
}

impl TextField {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            text: Mutex::new(DEFAULT_FIELD_CONTENT.to_string()),
        })
    }

    pub fn text(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FieldView for TextField {
    fn set_text(&self, text: &str) {
        *self.lock() = text.to_string();
    }
}

/// Build text-slot views for every dialog field, returning the bindings for
/// the controller plus the readable handles.
pub fn text_field_views() -> (FieldViews, HashMap<Field, Arc<TextField>>) {
    let mut views: FieldViews = HashMap::new();
    let mut slots = HashMap::new();
    for field in Field::ALL {
        let slot = TextField::new();
        let view: Arc<dyn FieldView> = slot.clone();
        views.insert(field, view);
        slots.insert(field, slot);
    }
    (views, slots)
}

/// Whether a page with the given dimensions displays as portrait.
pub fn is_portrait(width: f64, height: f64) -> bool {
    width <= height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_stores_the_last_write() {
        let field = TextField::new();
        assert_eq!(field.text(), DEFAULT_FIELD_CONTENT);

        field.set_text("612 KB");
        field.set_text("1.02 MB");
        assert_eq!(field.text(), "1.02 MB");
    }

    #[test]
    fn text_field_views_cover_every_field() {
        let (views, slots) = text_field_views();
        assert_eq!(views.len(), Field::ALL.len());
        assert_eq!(slots.len(), Field::ALL.len());

        views[&Field::Title].set_text("annual report");
        assert_eq!(slots[&Field::Title].text(), "annual report");
    }

    #[test]
    fn square_pages_count_as_portrait() {
        assert!(is_portrait(500.0, 500.0));
        assert!(is_portrait(8.5, 11.0));
        assert!(!is_portrait(11.0, 8.5));
    }

    #[test]
    fn fields_serialize_with_dialog_identifiers() {
        let json = serde_json::to_string(&Field::FileName).unwrap();
        assert_eq!(json, "\"fileName\"");
        let json = serde_json::to_string(&Field::ModificationDate).unwrap();
        assert_eq!(json, "\"modificationDate\"");
    }

    #[test]
    fn labels_resolve_in_both_locales() {
        assert_eq!(Field::Author.label(&L10n::new("en-US")), "Author");
        assert_eq!(Field::Author.label(&L10n::new("is")), "Höfundur");
        assert_eq!(dialog_title(&L10n::new("en")), "Document properties");
        assert_eq!(dialog_title(&L10n::new("is")), "Eiginleikar skjals");
    }
}
