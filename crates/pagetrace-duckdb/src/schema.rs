/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup (idempotent).
///
/// `memory_limit` is a DuckDB size string such as `"512MB"` or `"1GB"`,
/// read from `Config.duckdb_memory_limit` (env `PAGETRACE_DUCKDB_MEMORY`).
/// An explicit limit is always set; the DuckDB default is 80% of system RAM.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- SETTINGS
-- ===========================================
-- Keys stored in this table:
--   'session_secret' – 32-byte random hex signing key for admin session tokens
--   'version'        – Database schema version
--   'install_id'     – Unique installation identifier
CREATE TABLE IF NOT EXISTS settings (
    key             VARCHAR PRIMARY KEY,
    value           VARCHAR NOT NULL
);

-- ===========================================
-- VISITORS
-- ===========================================
-- One row per hashed client address. The display id is minted from a
-- sequence inside the same transaction as the INSERT, so concurrent
-- requests cannot produce duplicate ids.
CREATE SEQUENCE IF NOT EXISTS visitor_display_seq START 1001;
CREATE TABLE IF NOT EXISTS visitors (
    visitor_id      VARCHAR PRIMARY KEY,           -- 'V' + nextval(visitor_display_seq)
    ip_hash         VARCHAR NOT NULL UNIQUE,       -- sha256(ip)[0:16], never plaintext
    user_agent      VARCHAR,
    referrer        VARCHAR,
    source          VARCHAR NOT NULL,              -- derived traffic-source category
    first_visit     TIMESTAMP NOT NULL,
    last_visit      TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_visitors_last_visit ON visitors(last_visit DESC);

-- ===========================================
-- CLICKS
-- ===========================================
-- One row per buy-button interaction. visitor_id is a soft reference to
-- visitors.visitor_id; rows are never updated or deleted.
CREATE TABLE IF NOT EXISTS clicks (
    click_id        VARCHAR PRIMARY KEY,           -- 8-hex-char correlation id
    visitor_id      VARCHAR NOT NULL,
    ip_hash         VARCHAR NOT NULL,
    plan            VARCHAR NOT NULL,
    created_at      TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_clicks_created ON clicks(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_clicks_visitor ON clicks(visitor_id);
"#
    )
}
