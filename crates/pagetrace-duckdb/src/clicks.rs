use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::{format_ts, parse_ts, rand_hex};
use crate::visitors::find_or_create_visitor;
use crate::DuckDbBackend;

/// Acknowledgment returned to `POST /track`.
#[derive(Debug, Clone)]
pub struct ClickReceipt {
    pub visitor_id: String,
    pub click_id: String,
    pub new_visitor: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClickRow {
    pub click_id: String,
    pub visitor_id: String,
    pub ip_hash: String,
    pub plan: String,
    pub created_at: DateTime<Utc>,
}

impl DuckDbBackend {
    /// Record a buy-button click for the visitor behind `ip_hash`.
    ///
    /// If no visitor exists yet for the address, one is created first;
    /// visitor and click are persisted in the same transaction so a storage
    /// failure never leaves one without the other.
    pub async fn track_click(
        &self,
        ip_hash: &str,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        source: &str,
        plan: &str,
    ) -> Result<ClickReceipt> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let now = Utc::now();

        let upsert = find_or_create_visitor(&tx, ip_hash, user_agent, referrer, source, now)?;

        let click_id = rand_hex(4);
        tx.execute(
            "INSERT INTO clicks (click_id, visitor_id, ip_hash, plan, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            duckdb::params![click_id, upsert.visitor_id, ip_hash, plan, format_ts(now)],
        )?;

        tx.commit()?;
        Ok(ClickReceipt {
            visitor_id: upsert.visitor_id,
            click_id,
            new_visitor: upsert.new_visitor,
        })
    }

    /// Clicks ordered by `created_at` descending. `limit` of `None` returns
    /// all rows (admin clicks view).
    pub async fn clicks_by_recency(&self, limit: Option<i64>) -> Result<Vec<ClickRow>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT click_id, visitor_id, ip_hash, plan, CAST(created_at AS VARCHAR) \
             FROM clicks \
             ORDER BY created_at DESC{}",
            match limit {
                Some(n) => format!(" LIMIT {n}"),
                None => String::new(),
            }
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut clicks = Vec::new();
        for row in rows {
            let (click_id, visitor_id, ip_hash, plan, created_raw) = row?;
            clicks.push(ClickRow {
                click_id,
                visitor_id,
                ip_hash,
                plan,
                created_at: parse_ts(&created_raw)?,
            });
        }
        Ok(clicks)
    }
}
