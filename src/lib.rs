//! docdesk: browse, search and chat with documents on a docdesk backend.

pub mod bootstrap;
pub mod cli;
