#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    /// Admin login email, exact-match checked at login.
    pub admin_email: String,
    /// Argon2id hash of the admin password. Plaintext is never configured
    /// or stored.
    pub admin_password_hash: String,
    pub https: bool,
    pub session_days: u32,
    pub duckdb_memory_limit: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("PAGETRACE_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("PAGETRACE_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string()),
            admin_email: std::env::var("PAGETRACE_ADMIN_EMAIL")
                .map_err(|_| "PAGETRACE_ADMIN_EMAIL is required".to_string())?,
            admin_password_hash: std::env::var("PAGETRACE_ADMIN_PASSWORD_HASH")
                .map_err(|_| "PAGETRACE_ADMIN_PASSWORD_HASH is required".to_string())?,
            https: std::env::var("PAGETRACE_HTTPS")
                .map(|v| v == "true")
                .unwrap_or(false),
            session_days: std::env::var("PAGETRACE_SESSION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            duckdb_memory_limit: std::env::var("PAGETRACE_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "512MB".to_string()),
        })
    }
}
