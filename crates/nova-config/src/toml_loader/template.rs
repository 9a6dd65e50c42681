//! Default TOML config template with documentation comments.

/// Generate the default TOML config content with comments.
pub(super) fn default_config_toml() -> &'static str {
    r##"# Nova widget client configuration
# Only override what you want to change -- missing fields use defaults.

[service]
# base_url = "http://localhost:8001"
# chat_path = "/api/chat"
# chat_stream_path = "/api/chat-stream"
# build_path = "/api/build"
# chat_timeout_secs = 60      # 1-600
# build_timeout_secs = 600    # 1-3600

[storage]
# session_file = "/path/to/session.json"   # defaults to the platform data dir
# session_key = "nova_session"

[chat]
# serialize_sends = true      # queue overlapping sends so replies arrive in order
# streaming = false           # use the SSE endpoint

[build]
# default_prompt = "Build me a site"

[logging]
# level = "info"              # debug, info, warn, error
"##
}
