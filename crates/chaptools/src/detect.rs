use std::path::PathBuf;

use chaptools_core::Chapter;
use pdf::OcrEngine;

use crate::document::{load_config, load_document};
use crate::ocr::SubprocessOcr;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Allow OCR (pdftoppm + tesseract) for documents without embedded text
    #[arg(long)]
    pub ocr: bool,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    let doc = load_document(&options.path)?;
    let config = load_config(&global);

    let engine = options
        .ocr
        .then(|| SubprocessOcr::new(&options.path, config.ocr_render_dpi));
    let detection = doc.detect_chapters(&config, engine.as_ref().map(|e| e as &dyn OcrEngine));

    match detection.source {
        Some(source) => println!("Detection source: {source}"),
        None => println!("No detection source applied (image-only document without --ocr)."),
    }

    if detection.chapters.is_empty() {
        println!("No chapters detected.");
        return Ok(());
    }

    chapter_table(&detection.chapters).printstd();

    Ok(())
}

fn chapter_table(chapters: &[Chapter]) -> prettytable::Table {
    let mut table = prettytable::Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_CLEAN);
    table.set_titles(prettytable::row!["Page", "Title"]);
    for chapter in chapters {
        table.add_row(prettytable::row![chapter.page, chapter.title]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_table_lists_one_row_per_chapter() {
        let chapters = vec![Chapter::new("Preface", 1), Chapter::new("Chapter 1", 5)];

        let table = chapter_table(&chapters);

        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Page"));
        assert!(rendered.contains("Preface"));
        assert!(rendered.contains("Chapter 1"));
    }
}
