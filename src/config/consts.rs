/// Query parameter carrying the widget class name
pub const PARAM_WIDGET_AJAX: &str = "widget_ajax";
/// Query parameter carrying the nonce
pub const PARAM_NONCE: &str = "nonce";
/// Query parameter carrying the widget instance id
pub const PARAM_WIDGET_ID: &str = "widget_id";

/// Hook fired after a handler is constructed and before its callback runs
pub const WIDGET_AJAX_DISPATCH: &str = "widget_ajax_dispatch";

/// Default nonce lifetime (one day)
pub const DEFAULT_NONCE_LIFETIME_SECS: u64 = 86_400;
/// Number of hex characters in a nonce
pub const NONCE_LENGTH: usize = 10;
/// Minimum HMAC secret length in bytes
pub const MIN_NONCE_SECRET_LEN: usize = 16;
/// Environment variable consulted when the config has no nonce secret
pub const NONCE_SECRET_ENV: &str = "WIDGET_AJAX_NONCE_SECRET";

/// Default listen address for the HTTP host
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
/// Default externally visible base URL
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080/";
