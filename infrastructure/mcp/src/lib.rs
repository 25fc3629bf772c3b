pub mod connector;
pub mod jsonrpc;
pub mod protocol;
pub mod session;
pub mod sse;
