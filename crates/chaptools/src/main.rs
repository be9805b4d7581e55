use clap::Parser;
use color_eyre::eyre::Result;

mod detect;
mod document;
mod error;
mod info;
mod merge;
mod ocr;
mod prelude;
mod split;

#[derive(Debug, Parser)]
#[command(name = "chaptools", version, about = "Chapter-aware PDF split and merge")]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to the chapter detection configuration file
    #[clap(
        long,
        env = "CHAPTOOLS_CONFIG",
        global = true,
        default_value = "chapters_config.md"
    )]
    config: std::path::PathBuf,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Split a PDF into one file per detected chapter
    Split(split::Options),

    /// Merge detected chapter ranges into a single PDF
    Merge(merge::Options),

    /// Detect chapters and print them without writing anything
    Detect(detect::Options),

    /// Print document metadata as JSON
    Info(info::Options),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Split(options) => crate::split::run(options, app.global),
        SubCommands::Merge(options) => crate::merge::run(options, app.global),
        SubCommands::Detect(options) => crate::detect::run(options, app.global),
        SubCommands::Info(options) => crate::info::run(options, app.global),
    }
}
