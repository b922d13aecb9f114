// MCP (Model Context Protocol) gateway for the course platform.
// Exposes content, quiz and progress operations as tools and the course
// widgets as resources, over JSON-RPC and a Server-Sent-Events channel.

pub mod dispatcher;
pub mod gate;
pub mod invoker;
pub mod notifications;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod widget;

pub use server::{GatewaySettings, McpServer};
