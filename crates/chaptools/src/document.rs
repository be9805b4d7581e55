//! Shared input handling for the command modules: path validation,
//! configuration sourcing and chapter acquisition.

use std::path::Path;

use chaptools_core::config::Config;
use chaptools_core::{manual, Chapter};
use pdf::{OcrEngine, SourceDocument};

use crate::ocr::SubprocessOcr;
use crate::prelude::*;

/// Chapter acquisition flags shared by `split` and `merge`.
#[derive(Debug, Clone, clap::Args)]
pub struct AcquireArgs {
    /// Comma-separated 1-based chapter start pages (e.g. "1,5,9"); skips detection
    #[arg(long)]
    pub manual: Option<String>,

    /// Allow OCR (pdftoppm + tesseract) for documents without embedded text
    #[arg(long)]
    pub ocr: bool,
}

/// Validates the input path and reads it whole.
///
/// The file must exist and carry a `.pdf` extension (case-insensitive).
pub fn read_pdf_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()).into());
    }
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(Error::NotPdf(path.display().to_string()).into());
    }

    std::fs::read(path).wrap_err_with(|| f!("Failed to read {}", path.display()))
}

/// Reads and parses the input document.
pub fn load_document(path: &Path) -> Result<SourceDocument> {
    let bytes = read_pdf_bytes(path)?;
    SourceDocument::from_bytes(&bytes).map_err(|e| eyre!(e))
}

/// Sources the detection configuration from the path given in [`crate::Global`].
///
/// A missing or unreadable file is not an error; defaults apply.
pub fn load_config(global: &crate::Global) -> Config {
    match std::fs::read_to_string(&global.config) {
        Ok(source) => Config::parse(&source),
        Err(_) => {
            log::info!(
                "No configuration file at {}; using defaults",
                global.config.display()
            );
            Config::default()
        }
    }
}

/// Produces the chapter list for `split` and `merge`: the manual page list
/// when one was given, automatic detection otherwise.
pub fn acquire_chapters(
    doc: &SourceDocument,
    path: &Path,
    args: &AcquireArgs,
    config: &Config,
) -> Result<Vec<Chapter>> {
    if let Some(pages) = &args.manual {
        let chapters = manual::parse_manual_pages(pages)?;
        log::info!("Using {} manually supplied start pages", chapters.len());
        return Ok(chapters);
    }

    let engine = args
        .ocr
        .then(|| SubprocessOcr::new(path, config.ocr_render_dpi));
    let detection = doc.detect_chapters(config, engine.as_ref().map(|e| e as &dyn OcrEngine));

    if let Some(source) = detection.source {
        log::info!(
            "Detected {} chapters via {}",
            detection.chapters.len(),
            source
        );
    }

    Ok(detection.chapters)
}
