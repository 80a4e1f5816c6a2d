//! Document access behind an async proxy trait.
//!
//! The dialog controller only sees [`DocumentProxy`]. [`LopdfDocument`] is the
//! in-process implementation; a remote or worker-backed engine can stand in
//! for it without touching the controller.

use std::path::Path;

use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::{Result, ViewerError};

const POINTS_PER_INCH: f64 = 72.0;

/// Parent chains longer than this are treated as malformed.
const PAGE_TREE_DEPTH_LIMIT: usize = 64;

/// Strings from the document information dictionary, already decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    /// Raw PDF date string, e.g. `D:20240615142312+02'00'`.
    pub creation_date: Option<String>,
    /// Raw PDF date string.
    pub modification_date: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

/// Everything the properties dialog needs in one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub info: DocumentInfo,
    pub version: Option<String>,
    pub page_count: u32,
    pub linearized: bool,
    /// Byte length claimed by the linearization dictionary, when present.
    pub content_length: Option<u64>,
}

/// Physical page dimensions, already divided by 72 points per inch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSizeInches {
    pub width: f64,
    pub height: f64,
}

/// Authoritative transfer size, known once the full data has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadInfo {
    pub length: u64,
}

/// Read access to an open document.
#[async_trait]
pub trait DocumentProxy: Send + Sync {
    async fn metadata(&self) -> Result<DocumentMetadata>;

    /// Size of a page, `Ok(None)` when its media box is unusable.
    /// Page numbers start at 1.
    async fn page_size_inches(&self, page_number: u32) -> Result<Option<PageSizeInches>>;

    async fn download_info(&self) -> Result<DownloadInfo>;
}

/// A fully loaded document parsed by `lopdf`.
pub struct LopdfDocument {
    doc: Document,
    byte_length: u64,
}

impl LopdfDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let byte_length = bytes.len() as u64;
        let doc = Document::load_mem(&bytes)?;
        Ok(Self { doc, byte_length })
    }

    fn info_dictionary(&self) -> Option<&Dictionary> {
        let object = self.doc.trailer.get(b"Info").ok()?;
        let object = match object {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        object.as_dict().ok()
    }

    /// Linearization parameter dictionary.
    ///
    /// The genuine dictionary is the file's first object, an order `lopdf`
    /// does not keep. Candidates are screened by the mandatory `L` and `N`
    /// entries alongside the `Linearized` marker and scanned in ascending
    /// object id order.
    fn linearization_dictionary(&self) -> Option<&Dictionary> {
        self.doc.objects.values().find_map(|object| {
            let dict = object.as_dict().ok()?;
            let marker = dict.get(b"Linearized").ok()?;
            let complete = object_to_f64(marker)? > 0.0
                && content_length(dict).is_some()
                && matches!(dict.get(b"N"), Ok(Object::Integer(count)) if *count > 0);
            complete.then_some(dict)
        })
    }

    /// Catalog `/Version` overrides the header version.
    fn version(&self) -> Option<String> {
        let catalog_version = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Version").ok())
            .and_then(|object| object.as_name_str().ok())
            .map(str::to_string);
        catalog_version.or_else(|| {
            let header = self.doc.version.trim();
            (!header.is_empty()).then(|| header.to_string())
        })
    }

    /// `/MediaBox` is inheritable, so walk the parent chain until it shows up.
    fn inherited_media_box(&self, page_id: ObjectId) -> Option<[f64; 4]> {
        let mut current = Some(page_id);
        for _ in 0..PAGE_TREE_DEPTH_LIMIT {
            let id = current?;
            let dict = self.doc.get_object(id).ok()?.as_dict().ok()?;
            if let Some(media_box) = self.media_box_of(dict) {
                return Some(media_box);
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        None
    }

    fn media_box_of(&self, dict: &Dictionary) -> Option<[f64; 4]> {
        let object = dict.get(b"MediaBox").ok()?;
        let object = match object {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        let array = object.as_array().ok()?;
        if array.len() != 4 {
            return None;
        }
        let mut edges = [0.0f64; 4];
        for (slot, element) in edges.iter_mut().zip(array) {
            let element = match element {
                Object::Reference(id) => self.doc.get_object(*id).ok()?,
                other => other,
            };
            *slot = object_to_f64(element)?;
        }
        Some(edges)
    }
}

#[async_trait]
impl DocumentProxy for LopdfDocument {
    async fn metadata(&self) -> Result<DocumentMetadata> {
        let info = self.info_dictionary();
        let linearization = self.linearization_dictionary();
        Ok(DocumentMetadata {
            info: DocumentInfo {
                title: info.and_then(|dict| info_string(dict, b"Title")),
                author: info.and_then(|dict| info_string(dict, b"Author")),
                subject: info.and_then(|dict| info_string(dict, b"Subject")),
                keywords: info.and_then(|dict| info_string(dict, b"Keywords")),
                creation_date: info.and_then(|dict| info_string(dict, b"CreationDate")),
                modification_date: info.and_then(|dict| info_string(dict, b"ModDate")),
                creator: info.and_then(|dict| info_string(dict, b"Creator")),
                producer: info.and_then(|dict| info_string(dict, b"Producer")),
            },
            version: self.version(),
            page_count: self.doc.get_pages().len() as u32,
            linearized: linearization.is_some(),
            content_length: linearization.and_then(content_length),
        })
    }

    async fn page_size_inches(&self, page_number: u32) -> Result<Option<PageSizeInches>> {
        let pages = self.doc.get_pages();
        let page_id = *pages
            .get(&page_number)
            .ok_or(ViewerError::PageNotFound(page_number))?;
        let page = self.doc.get_object(page_id)?.as_dict()?;
        let user_unit = match page.get(b"UserUnit").ok().and_then(object_to_f64) {
            Some(unit) if unit > 0.0 => unit,
            _ => 1.0,
        };
        let Some(media_box) = self.inherited_media_box(page_id) else {
            debug!(page_number, "page has no usable media box");
            return Ok(None);
        };
        let width_pts = (media_box[2] - media_box[0]).abs() * user_unit;
        let height_pts = (media_box[3] - media_box[1]).abs() * user_unit;
        if width_pts <= 0.0 || height_pts <= 0.0 {
            debug!(page_number, "degenerate media box");
            return Ok(None);
        }
        Ok(Some(PageSizeInches {
            width: width_pts / POINTS_PER_INCH,
            height: height_pts / POINTS_PER_INCH,
        }))
    }

    async fn download_info(&self) -> Result<DownloadInfo> {
        Ok(DownloadInfo {
            length: self.byte_length,
        })
    }
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    match info.get(key) {
        Ok(Object::String(bytes, _)) => Some(decode_text(bytes)),
        _ => None,
    }
}

/// PDF text strings are UTF-16BE when they carry a BOM, PDFDocEncoding
/// otherwise. The latter is close enough to Latin-1 for metadata display.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&byte| byte as char).collect(),
    }
}

fn content_length(dict: &Dictionary) -> Option<u64> {
    match dict.get(b"L") {
        Ok(Object::Integer(length)) if *length > 0 => Some(*length as u64),
        _ => None,
    }
}

fn object_to_f64(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}
