pub mod accumulator;
pub mod error;
pub mod render;
pub mod session;
pub mod status;
pub mod transport;

pub use accumulator::apply_event;
pub use error::{SessionError, TransitionError};
pub use render::{tool_view, CanvasKind, ToolView};
pub use session::ChatSession;
pub use status::{ChatEvent, ChatStatus};
pub use transport::{drive, ChatEventParser, ChatEventStream, HttpChatClient};
