use anyhow::Result;

use crate::backend::rand_hex;
use crate::DuckDbBackend;

impl DuckDbBackend {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let result = conn
            .prepare("SELECT value FROM settings WHERE key = ?1")?
            .query_row(duckdb::params![key], |row| row.get::<_, String>(0))
            .ok();
        Ok(result)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            duckdb::params![key, value],
        )?;
        Ok(())
    }

    /// Ensure a session-token signing secret exists in settings. If not,
    /// generate one. Returns the secret.
    pub async fn ensure_session_secret(&self) -> Result<String> {
        if let Some(secret) = self.get_setting("session_secret").await? {
            return Ok(secret);
        }
        let secret = rand_hex(32);
        self.set_setting("session_secret", &secret).await?;
        Ok(secret)
    }
}
