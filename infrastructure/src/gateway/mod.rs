//! [`SourceGateway`](weather_application::SourceGateway) adapters

mod tool_server;

pub(crate) use tool_server::loose_number;
pub use tool_server::{TOOL_SERVER_SOURCE, ToolServerGateway};
