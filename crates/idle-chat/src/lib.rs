pub mod adapter;
pub mod client_factory;
pub mod dispatch;
pub mod error;
pub mod fact_check;
pub mod run;

pub use adapter::{ChatStreamAdapter, CollectedToolCall, StepOutput, StreamAdapter};
pub use client_factory::{ClientResolver, GoogleClientResolver};
pub use dispatch::{ChatDispatcher, DispatchConfig, PreparedChat};
pub use error::{error_text, DispatchError};
pub use run::{spawn_run, RunConfig};
