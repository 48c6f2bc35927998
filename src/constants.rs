pub mod api {
    pub const BASE_URL: &str = "https://api.timelyapp.com/1.1";
    pub const TIMEOUT_REQUEST_MS: u64 = 30_000;
    pub const USER_AGENT: &str = concat!("timely-mcp/", env!("CARGO_PKG_VERSION"));
    pub const ENV_BASE_URL: &str = "TIMELY_BASE_URL";
}

pub mod nango {
    pub const ENV_CONNECTION_ID: &str = "NANGO_CONNECTION_ID";
    pub const ENV_INTEGRATION_ID: &str = "NANGO_INTEGRATION_ID";
    pub const ENV_BASE_URL: &str = "NANGO_BASE_URL";
    pub const ENV_SECRET_KEY: &str = "NANGO_SECRET_KEY";
    pub const TIMEOUT_CREDENTIALS_MS: u64 = 30_000;
}
