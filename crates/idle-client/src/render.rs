use idle_types::{ToolCallPart, ToolCallState};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasKind {
    Prompt,
    Workflow,
}

/// What a UI should show for a tool-call part
#[derive(Debug, Clone, PartialEq)]
pub enum ToolView {
    /// Arguments still streaming
    Pending { tool_name: String },
    /// Arguments complete, waiting for the result
    Running { tool_name: String, args: Value },
    Canvas { kind: CanvasKind, content: String },
    Image { mime_type: String, base64_data: String },
    Output { tool_name: String, output: Value },
    Failed { tool_name: String, error_text: String },
}

pub fn tool_view(part: &ToolCallPart) -> ToolView {
    let tool_name = part.tool_name.clone();

    match part.state {
        ToolCallState::InputStreaming => ToolView::Pending { tool_name },
        ToolCallState::InputAvailable => ToolView::Running {
            tool_name,
            args: part.args.clone(),
        },
        ToolCallState::OutputError => ToolView::Failed {
            tool_name,
            error_text: part
                .error_text
                .clone()
                .unwrap_or_else(|| "Tool failed".to_string()),
        },
        ToolCallState::OutputAvailable => {
            let output = part.result.clone().unwrap_or(Value::Null);
            let field = |key: &str| output.get(key).and_then(Value::as_str).map(str::to_string);

            match tool_name.as_str() {
                "showPromptInCanvas" => {
                    if let Some(content) = field("prompt") {
                        return ToolView::Canvas { kind: CanvasKind::Prompt, content };
                    }
                }
                "showWorkflowInCanvas" => {
                    if let Some(content) = field("workflow") {
                        return ToolView::Canvas { kind: CanvasKind::Workflow, content };
                    }
                }
                "generateImageTool" => {
                    if let (Some(mime_type), Some(base64_data)) = (field("mimeType"), field("base64Data")) {
                        return ToolView::Image { mime_type, base64_data };
                    }
                }
                _ => {}
            }

            ToolView::Output { tool_name, output }
        }
    }
}
