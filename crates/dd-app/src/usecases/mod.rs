//! Business logic use cases
//!
//! DocumentBrowser            → list view (search / sort / filter / page)
//!         ↓
//! RemoteSearchSynchronizer   → server-side search, last response wins
//! ---------------------------------
//! Get / Rename / UpdateContent / Delete → document detail view
//! UploadDocuments            → upload dialog
//! SendChatMessage / history  → document chat panel

pub mod chat;
pub mod documents;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;
