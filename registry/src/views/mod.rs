//! State behind each page of the site. Rendering lives with the web client, these
//! types hold what a page shows and the messages it reports.

pub mod form;
pub mod listing;
pub mod toast;
pub mod upload;
