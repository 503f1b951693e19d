//! Server sources written to disk by the materializer.
//!
//! The generated servers read their listen port from `SERVICE_PORT` and fall
//! back to the default port baked into each file.

pub const PADDLE_OCR_SERVER: &str = include_str!("../../templates/paddle_server.py");
pub const PADDLE_OCR_SERVER_NETWORK: &str =
    include_str!("../../templates/paddle_server_network.py");
pub const QWEN_ENHANCE_SERVER: &str = include_str!("../../templates/qwen_server.py");
pub const QWEN_ENHANCE_SERVER_NETWORK: &str =
    include_str!("../../templates/qwen_server_network.py");

/// Environment variable the generated servers read their port from.
pub const PORT_ENV_VAR: &str = "SERVICE_PORT";
