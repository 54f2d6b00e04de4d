// Library root: configuration and the season pipeline, shared by the binary
// and the integration tests.

pub mod config;
pub mod pipeline;
