//! Command implementations for the kurflow CLI.

pub(crate) mod fetch;
pub(crate) mod list;
pub(crate) mod settings;
pub(crate) mod url;
