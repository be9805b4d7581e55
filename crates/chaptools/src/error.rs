/// Input validation failures surfaced before any PDF parsing happens.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Not a PDF file: {0}")]
    NotPdf(String),

    #[error("No such file: {0}")]
    NotFound(String),
}
