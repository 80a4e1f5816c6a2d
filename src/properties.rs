//! Controller for the document properties dialog.
//!
//! Owns the formatted snapshot of the current document's properties and keeps
//! the bound views in sync with it. Fetching is lazy: nothing is read from the
//! document until the dialog is opened, and an unchanged snapshot is reused on
//! the next open.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::document::DocumentProxy;
use crate::error::{Result, ViewerError};
use crate::events::{EventBus, ViewerEvent};
use crate::format;
use crate::i18n::L10n;
use crate::overlay::{OverlayId, OverlayManager};
use crate::ui::{Field, FieldViews, DEFAULT_FIELD_CONTENT};

pub const DOCUMENT_PROPERTIES_OVERLAY: OverlayId = OverlayId("document-properties");

/// One fully formatted snapshot of the dialog contents.
///
/// Every field is display-ready text; absent values render as the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linearized: Option<String>,
    /// Page the size field was computed for.
    #[serde(skip)]
    pub page_number: u32,
    /// Rotation the size field was computed for.
    #[serde(skip)]
    pub rotation: u32,
}

impl FieldData {
    /// Display text for one field. `None` means the placeholder.
    fn text(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::FileName => self.file_name.clone(),
            Field::FileSize => self.file_size.clone(),
            Field::Title => self.title.clone(),
            Field::Author => self.author.clone(),
            Field::Subject => self.subject.clone(),
            Field::Keywords => self.keywords.clone(),
            Field::CreationDate => self.creation_date.clone(),
            Field::ModificationDate => self.modification_date.clone(),
            Field::Creator => self.creator.clone(),
            Field::Producer => self.producer.clone(),
            Field::Version => self.version.clone(),
            Field::PageCount => self.page_count.map(|count| count.to_string()),
            Field::PageSize => self.page_size.clone(),
            Field::Linearized => self.linearized.clone(),
        };
        value.filter(|text| !text.is_empty())
    }
}

/// Latch that opens once document data may be fetched.
///
/// Replacing the latch wakes pending waiters with an error, which is how an
/// open call in flight learns the document went away.
struct ReadySignal {
    tx: watch::Sender<bool>,
}

impl ReadySignal {
    fn new() -> Self {
        Self {
            tx: watch::channel(false).0,
        }
    }

    fn resolve(&self) {
        self.tx.send_replace(true);
    }

    fn waiter(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

struct PropsState {
    document: Option<Arc<dyn DocumentProxy>>,
    data: Option<FieldData>,
    page_number: u32,
    rotation: u32,
}

impl PropsState {
    const fn new() -> Self {
        Self {
            document: None,
            data: None,
            page_number: 1,
            rotation: 0,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// The dialog controller. Create once per viewer, then feed it documents
/// through [`set_document`](Self::set_document).
pub struct DocumentProperties {
    overlay_id: OverlayId,
    overlays: Arc<OverlayManager>,
    fields: FieldViews,
    l10n: L10n,
    file_name_lookup: Box<dyn Fn() -> String + Send + Sync>,
    state: Mutex<PropsState>,
    ready: Mutex<ReadySignal>,
}

impl DocumentProperties {
    /// Wire up the controller and start listening for page and rotation
    /// changes. Must be called on a Tokio runtime.
    pub fn new(
        overlays: Arc<OverlayManager>,
        events: &EventBus,
        fields: FieldViews,
        l10n: L10n,
        file_name_lookup: Box<dyn Fn() -> String + Send + Sync>,
    ) -> Arc<Self> {
        let controller = Arc::new(Self {
            overlay_id: DOCUMENT_PROPERTIES_OVERLAY,
            overlays,
            fields,
            l10n,
            file_name_lookup,
            state: Mutex::new(PropsState::new()),
            ready: Mutex::new(ReadySignal::new()),
        });
        Self::spawn_event_listener(&controller, events.subscribe());
        controller
    }

    fn spawn_event_listener(
        controller: &Arc<Self>,
        mut events: broadcast::Receiver<ViewerEvent>,
    ) {
        let weak = Arc::downgrade(controller);
        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                controller.handle_event(event);
            }
        });
    }

    /// Tracked even while no document is set, so the size field is right
    /// the moment the dialog opens.
    fn handle_event(&self, event: ViewerEvent) {
        let mut state = self.state();
        match event {
            ViewerEvent::PageChanging { page_number } => state.page_number = page_number,
            ViewerEvent::RotationChanging { rotation } => state.rotation = rotation,
        }
    }

    /// Open the dialog: claim the overlay slot, wait for a document, then
    /// fetch, format and display its properties.
    ///
    /// A snapshot taken for the same page and rotation is shown again
    /// without touching the document.
    pub async fn open(&self) -> Result<()> {
        self.overlays.open(self.overlay_id)?;

        let mut waiter = self.ready_signal().waiter();
        if waiter.wait_for(|ready| *ready).await.is_err() {
            return Err(ViewerError::DocumentClosed);
        }

        let (document, page_number, rotation) = {
            let state = self.state();
            let Some(document) = state.document.clone() else {
                return Err(ViewerError::DocumentClosed);
            };
            if let Some(data) = &state.data {
                if data.page_number == state.page_number && data.rotation == state.rotation {
                    let data = data.clone();
                    drop(state);
                    debug!("reusing properties snapshot");
                    self.refresh(Some(&data));
                    return Ok(());
                }
            }
            (document, state.page_number, state.rotation)
        };

        let (metadata, page_size) = tokio::join!(
            document.metadata(),
            document.page_size_inches(page_number)
        );
        let metadata = metadata?;
        let page_size = page_size?;
        let data = FieldData {
            file_name: Some((self.file_name_lookup)()),
            file_size: metadata
                .content_length
                .and_then(|bytes| format::file_size(bytes, &self.l10n)),
            title: metadata.info.title,
            author: metadata.info.author,
            subject: metadata.info.subject,
            keywords: metadata.info.keywords,
            creation_date: format::date_time(metadata.info.creation_date.as_deref(), &self.l10n),
            modification_date: format::date_time(
                metadata.info.modification_date.as_deref(),
                &self.l10n,
            ),
            creator: metadata.info.creator,
            producer: metadata.info.producer,
            version: metadata.version,
            page_count: Some(metadata.page_count),
            page_size: page_size.and_then(|size| format::page_size(size, rotation, &self.l10n)),
            linearized: Some(format::linearized(metadata.linearized, &self.l10n)),
            page_number,
            rotation,
        };

        {
            let mut state = self.state();
            if !same_document(&state, &document) {
                return Ok(());
            }
            state.data = Some(data.clone());
        }
        self.refresh(Some(&data));

        // The linearization dictionary's length claim may be absent or
        // wrong; the transfer size is authoritative once known.
        let download = document.download_info().await?;
        let corrected = format::file_size(download.length, &self.l10n);
        if corrected == data.file_size {
            return Ok(());
        }
        let updated = {
            let mut state = self.state();
            if !same_document(&state, &document) {
                return Ok(());
            }
            match state.data.as_mut() {
                Some(data) => {
                    data.file_size = corrected;
                    Some(data.clone())
                }
                None => None,
            }
        };
        if let Some(updated) = &updated {
            self.refresh(Some(updated));
        }
        Ok(())
    }

    /// Close the dialog and release the overlay slot.
    pub fn close(&self) -> Result<()> {
        self.overlays.close(self.overlay_id)
    }

    /// Install a new document, or clear with `None`.
    ///
    /// Clearing resets every bound field immediately. A replacement is
    /// installed only once that clear has finished; a concurrent open sees
    /// either the closed state or the new document. Nothing is fetched until
    /// the next open.
    pub fn set_document(&self, document: Option<Arc<dyn DocumentProxy>>) {
        let cleared = {
            let mut state = self.state();
            let had_document = state.document.is_some();
            if had_document {
                state.reset();
            }
            had_document
        };
        if cleared {
            *self.ready_signal() = ReadySignal::new();
            self.refresh(None);
        }
        let Some(document) = document else {
            return;
        };
        self.state().document = Some(document);
        self.ready_signal().resolve();
    }

    /// The last formatted snapshot, if a fetch has completed.
    pub fn field_data(&self) -> Option<FieldData> {
        self.state().data.clone()
    }

    /// Push a snapshot into the bound views. `None` resets every field to
    /// the placeholder whether or not the dialog is shown; real data only
    /// lands while this dialog is the active overlay.
    fn refresh(&self, data: Option<&FieldData>) {
        match data {
            None => {
                for field in Field::ALL {
                    self.set_field(field, None);
                }
            }
            Some(data) => {
                if !self.overlays.is_active(self.overlay_id) {
                    return;
                }
                for field in Field::ALL {
                    self.set_field(field, data.text(field));
                }
            }
        }
    }

    fn set_field(&self, field: Field, text: Option<String>) {
        if let Some(view) = self.fields.get(&field) {
            view.set_text(text.as_deref().unwrap_or(DEFAULT_FIELD_CONTENT));
        }
    }

    fn state(&self) -> MutexGuard<'_, PropsState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ready_signal(&self) -> MutexGuard<'_, ReadySignal> {
        self.ready
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fetch results are only applied to the document they were read from.
fn same_document(state: &PropsState, document: &Arc<dyn DocumentProxy>) -> bool {
    state.document.as_ref().is_some_and(|current| {
        Arc::as_ptr(current) as *const () == Arc::as_ptr(document) as *const ()
    })
}
