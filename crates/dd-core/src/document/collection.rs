use std::sync::Arc;

use super::Document;
use crate::ids::DocumentId;

/// Immutable, cheaply clonable document collection.
///
/// Every update produces a new collection; two handles can be compared with
/// [`DocumentCollection::ptr_eq`] for change detection.
#[derive(Debug, Clone)]
pub struct DocumentCollection(Arc<[Document]>);

impl DocumentCollection {
    pub fn new(documents: Vec<Document>) -> Self {
        Self(Arc::from(documents))
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.0.iter()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.0.iter().find(|doc| &doc.id == id)
    }

    /// New collection without the document `id`, preserving order.
    pub fn without(&self, id: &DocumentId) -> Self {
        Self::new(self.0.iter().filter(|doc| &doc.id != id).cloned().collect())
    }

    /// New collection with `document` replacing the entry with the same id.
    pub fn with_replaced(&self, document: Document) -> Self {
        Self::new(
            self.0
                .iter()
                .map(|doc| {
                    if doc.id == document.id {
                        document.clone()
                    } else {
                        doc.clone()
                    }
                })
                .collect(),
        )
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for DocumentCollection {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Document>> for DocumentCollection {
    fn from(documents: Vec<Document>) -> Self {
        Self::new(documents)
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
