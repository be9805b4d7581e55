//! Content-stream parsing: the page access seam and line reconstruction.

pub mod access;
pub mod layout;
