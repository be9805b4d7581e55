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

    /// Output directory (default: "<input stem>_chapters" next to the input)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    let doc = load_document(&options.path)?;
    let config = load_config(&global);
    let chapters = acquire_chapters(&doc, &options.path, &options.acquire, &config)?;

    let plans = partition::plan_sections(&chapters, doc.page_count());
    if plans.is_empty() {
        println!("No chapters found; nothing to split.");
        return Ok(());
    }

    let out_dir = match options.out_dir {
        Some(dir) => dir,
        None => default_out_dir(&options.path)?,
    };
    std::fs::create_dir_all(&out_dir)
        .wrap_err_with(|| f!("Failed to create output directory {}", out_dir.display()))?;

    for plan in &plans {
        let bytes = doc.extract_range(plan.start_page, plan.end_page)?;
        let out_path = out_dir.join(plan.file_name());
        std::fs::write(&out_path, &bytes)
            .wrap_err_with(|| f!("Failed to write {}", out_path.display()))?;
        println!(
            "Created {} (pages {}-{})",
            out_path.display(),
            plan.start_page,
            plan.end_page
        );
    }

    println!("Split into {} files under {}", plans.len(), out_dir.display());

    Ok(())
}

/// Sibling directory named after the input file.
fn default_out_dir(input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_eyre("Input path has no file name")?;
    Ok(input.with_file_name(f!("{stem}_chapters")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_directory_sits_next_to_the_input() {
        let dir = default_out_dir(Path::new("/books/linear_algebra.pdf")).unwrap();
        assert_eq!(dir, Path::new("/books/linear_algebra_chapters"));
    }

    #[test]
    fn relative_inputs_keep_relative_output_directories() {
        let dir = default_out_dir(Path::new("report.pdf")).unwrap();
        assert_eq!(dir, Path::new("report_chapters"));
    }
}
