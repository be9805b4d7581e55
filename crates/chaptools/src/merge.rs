use std::path::{Path, PathBuf};

use chaptools_core::partition;

use crate::document::{acquire_chapters, load_config, load_document, AcquireArgs};
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: PathBuf,

    #[clap(flatten)]
    pub acquire: AcquireArgs,

    /// Output file (default: "<input stem>_merged.pdf" next to the input)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    let doc = load_document(&options.path)?;
    let config = load_config(&global);
    let chapters = acquire_chapters(&doc, &options.path, &options.acquire, &config)?;

    let plans = partition::plan_sections(&chapters, doc.page_count());
    if plans.is_empty() {
        println!("No chapters found; nothing to merge.");
        return Ok(());
    }

    let ranges: Vec<(u32, u32)> = plans
        .iter()
        .map(|plan| (plan.start_page, plan.end_page))
        .collect();
    let bytes = doc.extract_merged(&ranges)?;

    let output = match options.output {
        Some(path) => path,
        None => default_output(&options.path)?,
    };
    std::fs::write(&output, &bytes)
        .wrap_err_with(|| f!("Failed to write {}", output.display()))?;

    let total_pages: u32 = plans.iter().map(|plan| plan.page_count()).sum();
    println!(
        "Created {} ({} sections, {} pages)",
        output.display(),
        plans.len(),
        total_pages
    );

    Ok(())
}

/// Sibling file named after the input.
fn default_output(input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_eyre("Input path has no file name")?;
    Ok(input.with_file_name(f!("{stem}_merged.pdf")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_file_sits_next_to_the_input() {
        let path = default_output(Path::new("/books/anthology.pdf")).unwrap();
        assert_eq!(path, Path::new("/books/anthology_merged.pdf"));
    }
}
