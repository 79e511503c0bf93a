//! Attachment classification and image extraction.

use crate::message::{File, ImageRef};

/// Closed classification of an attachment by mime type.
///
/// The mime-type string match lives here and nowhere else; a future category
/// (audio, video) is an additive variant plus its own extraction helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Anything in the `image/*` family.
    Image,
    /// Everything else, including files with a missing or unrecognized
    /// mime type.
    Other,
}

impl FileKind {
    #[must_use]
    pub fn of(file: &File) -> Self {
        if file.mimetype.starts_with("image/") {
            Self::Image
        } else {
            Self::Other
        }
    }
}

/// Extract image references from a message's attachments, preserving
/// attachment order.
///
/// The title falls back to the file name when empty, and the download URL is
/// preferred over the plain private URL. A field empty on both sides stays
/// the empty string; it is never omitted or synthesized.
#[must_use]
pub fn image_refs(files: &[File]) -> Vec<ImageRef> {
    files
        .iter()
        .filter(|f| FileKind::of(f) == FileKind::Image)
        .map(|f| ImageRef {
            id: f.id.clone(),
            title: if f.title.is_empty() {
                f.name.clone()
            } else {
                f.title.clone()
            },
            url: if f.url_private_download.is_empty() {
                f.url_private.clone()
            } else {
                f.url_private_download.clone()
            },
        })
        .collect()
}
