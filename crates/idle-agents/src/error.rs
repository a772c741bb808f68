use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate agent name: {0}")]
    DuplicateAgent(String),
}
