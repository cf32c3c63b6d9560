//! Selected-image batch held client-side before submission.

use uuid::Uuid;

/// A single image selected for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Ordered batch of selected images.
///
/// Entries carry a stable identifier so removal survives concurrent
/// re-rendering of the selection; entries are not deduplicated (labels are,
/// server-side).
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    items: Vec<ImageUpload>,
}

impl UploadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image and return its stable identifier.
    pub fn push(
        &mut self,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push(ImageUpload {
            id,
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        });
        id
    }

    /// Remove the image with the given identifier. Returns false when no such
    /// image exists (e.g. it was already removed).
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageUpload> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
