/// Default receiver URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4711";
