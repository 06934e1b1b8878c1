//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Colloquy Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[service]
# base_url = "http://localhost:8000"   # overridden by COLLOQUY_API_URL
# chat_path = "/api/chat"
# connect_timeout_secs = 10            # 1-60
# request_timeout_secs = 120           # 5-600

[session]
# context_window = 5                   # 0-50 prior messages sent with each turn
# title_max_chars = 30                 # 8-200
# placeholder_title = "New Chat"

[storage]
# path = ""                            # empty = <data dir>/colloquy/sessions.json

[logging]
# level = "INFO"                       # TRACE, DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
