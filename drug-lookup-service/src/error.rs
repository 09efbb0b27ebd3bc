use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrugLookupError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

pub type DrugLookupResult<T> = Result<T, DrugLookupError>;
