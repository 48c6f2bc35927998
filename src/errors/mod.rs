mod api_error;
mod mcp_error;

pub use api_error::ApiError;
pub use mcp_error::{ErrorCode, McpError};
