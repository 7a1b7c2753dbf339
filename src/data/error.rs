use thiserror::Error;

/// Why an upload produced no table. The `Display` text is what the page shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Unsupported file format. Please upload a CSV or Excel file.")]
    UnsupportedFormat,

    #[error("Error occurred while loading the file: {0}")]
    Parse(String),

    #[error("The uploaded file is missing required column(s): {}", quoted(.0))]
    MissingColumns(Vec<String>),
}

impl From<anyhow::Error> for LoadError {
    fn from(err: anyhow::Error) -> Self {
        LoadError::Parse(format!("{err:#}"))
    }
}

fn quoted(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("{c:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
