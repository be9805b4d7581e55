//! Pure chapter detection and page partitioning for chaptools.
//!
//! This crate is the decision-making half of the workspace. Everything here
//! maps plain values to plain values, so the rules that pick chapter
//! boundaries and carve page ranges can be exercised in unit tests without
//! ever opening a document.
//!
//! # Workspace Layout
//!
//! - `chaptools_core` (this crate): detection rules, chapter normalization,
//!   page-range planning. No file, process, or PDF access.
//! - `pdf`: document access built on `lopdf` (page text, outlines,
//!   page-range extraction).
//! - `chaptools`: the command-line binary, owning all file and subprocess
//!   I/O.
//!
//! Keeping the boundary logic pure means a noisy outline, a strange config
//! file, or a garbled OCR line can be reproduced from literal fixture data.
//!
//! # Modules
//!
//! - [`chapters`]: the [`Chapter`] entity and chapter-list normalization
//! - [`config`]: detection thresholds and pattern sets, with a lenient
//!   key/value parser
//! - [`manual`]: parsing of user-supplied page lists into chapters
//! - [`ocr`]: OCR line normalization, pattern compilation, and line scanning
//! - [`partition`]: page-range planning and output-name derivation for
//!   split and merge
//! - [`style`]: the text-style heading predicate shared by visual detection
//!
//! Detection diagnostics (dropped pages, skipped patterns, fallback notices)
//! go through the [`log`] facade and never alter returned values.
//!
//! # Example
//!
//! ```rust,ignore
//! use chaptools_core::{partition::plan_sections, Chapter};
//!
//! let chapters = vec![
//!     Chapter::new("Chapter 1", 1),
//!     Chapter::new("Chapter 2", 5),
//! ];
//!
//! let plans = plan_sections(&chapters, 10);
//!
//! assert_eq!(plans.len(), 2);
//! assert_eq!(plans[0].end_page, 4);
//! ```

pub mod chapters;
pub mod config;
pub mod manual;
pub mod ocr;
pub mod partition;
pub mod style;

pub use chapters::Chapter;
