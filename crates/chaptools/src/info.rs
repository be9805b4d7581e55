use crate::document::read_pdf_bytes;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: std::path::PathBuf,
}

pub fn run(options: Options, _global: crate::Global) -> Result<()> {
    let bytes = read_pdf_bytes(&options.path)?;
    let info = pdf::read_info(&bytes).map_err(|e| eyre!(e))?;

    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
