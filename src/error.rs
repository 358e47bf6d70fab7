use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("no upload mapping configured for field '{field}' on {target}")]
    MappingNotFound { field: String, target: String },

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
