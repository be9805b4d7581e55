//! OCR engine backed by the external `pdftoppm` and `tesseract` binaries.

use std::path::PathBuf;
use std::process::Command;

use pdf::{OcrEngine, PdfError};

/// Rasterizes single pages with `pdftoppm` and recognizes them with
/// `tesseract`. Both tools are looked up on `PATH`; nothing is bundled.
pub struct SubprocessOcr {
    pdf_path: PathBuf,
    dpi: u32,
}

impl SubprocessOcr {
    pub fn new(pdf_path: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            dpi,
        }
    }
}

impl OcrEngine for SubprocessOcr {
    fn is_available(&self) -> bool {
        for tool in ["pdftoppm", "tesseract"] {
            if which::which(tool).is_err() {
                log::warn!("{tool} not found on PATH; OCR detection is disabled");
                return false;
            }
        }
        true
    }

    fn recognize_page(&self, page: u32) -> Result<String, PdfError> {
        let dir = tempfile::tempdir()
            .map_err(|e| PdfError::Ocr(format!("cannot create temporary directory: {e}")))?;
        let image_base = dir.path().join(format!("page_{page}"));

        let render = Command::new("pdftoppm")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-png")
            .arg("-singlefile")
            .arg(&self.pdf_path)
            .arg(&image_base)
            .output()
            .map_err(|e| PdfError::Ocr(format!("failed to run pdftoppm: {e}")))?;
        if !render.status.success() {
            return Err(PdfError::Ocr(format!(
                "pdftoppm failed on page {page}: {}",
                String::from_utf8_lossy(&render.stderr).trim()
            )));
        }

        let image_path = image_base.with_extension("png");
        let recognize = Command::new("tesseract")
            .arg(&image_path)
            .arg("stdout")
            .arg("--psm")
            .arg("6")
            .output()
            .map_err(|e| PdfError::Ocr(format!("failed to run tesseract: {e}")))?;
        if !recognize.status.success() {
            return Err(PdfError::Ocr(format!(
                "tesseract failed on page {page}: {}",
                String::from_utf8_lossy(&recognize.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&recognize.stdout).into_owned())
    }
}
