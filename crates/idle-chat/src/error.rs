use idle_llm::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to create provider client: {0}")]
    ClientSetup(#[source] anyhow::Error),
}

/// Human readable message for an error raised while streaming
///
/// Provider failures surface their normalized body message, anything else its
/// display text.
pub fn error_text(error: &anyhow::Error) -> String {
    if let Some(provider) = error.chain().find_map(|e| e.downcast_ref::<ProviderError>()) {
        return provider.message().to_string();
    }

    let text = error.to_string();
    if text.trim().is_empty() {
        "unknown error".to_string()
    } else {
        text
    }
}
