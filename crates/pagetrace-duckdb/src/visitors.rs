use anyhow::Result;
use chrono::{DateTime, Utc};
use duckdb::Transaction;
use serde::Serialize;

use crate::backend::{format_ts, parse_ts};
use crate::DuckDbBackend;

/// Outcome of a create-or-update visit.
#[derive(Debug, Clone)]
pub struct VisitUpsert {
    pub visitor_id: String,
    pub new_visitor: bool,
}

/// A visitor row joined with its click count, for admin views.
#[derive(Debug, Clone, Serialize)]
pub struct VisitorRow {
    pub visitor_id: String,
    pub ip_hash: String,
    pub source: String,
    pub first_visit: DateTime<Utc>,
    pub last_visit: DateTime<Utc>,
    pub clicks: i64,
}

/// Mint the next display id from the sequence: `V1001`, `V1002`, ...
///
/// Must be called inside the transaction that also inserts the row, while
/// the connection mutex is held, so two concurrent new addresses can never
/// receive the same id.
fn next_display_id(tx: &Transaction<'_>) -> Result<String> {
    let n: i64 = tx
        .prepare("SELECT nextval('visitor_display_seq')")?
        .query_row([], |row| row.get(0))?;
    Ok(format!("V{n}"))
}

/// Find the visitor for `ip_hash`, or insert a new row. Shared by the
/// landing-page tracker and the click tracker (visitor-then-click).
pub(crate) fn find_or_create_visitor(
    tx: &Transaction<'_>,
    ip_hash: &str,
    user_agent: Option<&str>,
    referrer: Option<&str>,
    source: &str,
    now: DateTime<Utc>,
) -> Result<VisitUpsert> {
    let existing: Option<String> = tx
        .prepare("SELECT visitor_id FROM visitors WHERE ip_hash = ?1")?
        .query_row(duckdb::params![ip_hash], |row| row.get(0))
        .ok();

    match existing {
        Some(visitor_id) => {
            tx.execute(
                "UPDATE visitors SET last_visit = ?1 WHERE ip_hash = ?2",
                duckdb::params![format_ts(now), ip_hash],
            )?;
            Ok(VisitUpsert {
                visitor_id,
                new_visitor: false,
            })
        }
        None => {
            let visitor_id = next_display_id(tx)?;
            let ts = format_ts(now);
            tx.execute(
                "INSERT INTO visitors \
                 (visitor_id, ip_hash, user_agent, referrer, source, first_visit, last_visit) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                duckdb::params![visitor_id, ip_hash, user_agent, referrer, source, ts],
            )?;
            Ok(VisitUpsert {
                visitor_id,
                new_visitor: true,
            })
        }
    }
}

impl DuckDbBackend {
    /// Create-or-update the visitor for `ip_hash`.
    ///
    /// First request from an address inserts a row with `first_visit` =
    /// `last_visit` = now; every subsequent request only bumps `last_visit`.
    pub async fn record_visit(
        &self,
        ip_hash: &str,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        source: &str,
    ) -> Result<VisitUpsert> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let upsert = find_or_create_visitor(&tx, ip_hash, user_agent, referrer, source, Utc::now())?;
        tx.commit()?;
        Ok(upsert)
    }

    /// Visitors ordered by `last_visit` descending, each with its click
    /// count. `limit` of `None` returns all rows (admin visitors view).
    pub async fn visitors_by_recency(&self, limit: Option<i64>) -> Result<Vec<VisitorRow>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT v.visitor_id, v.ip_hash, v.source, \
             CAST(v.first_visit AS VARCHAR), CAST(v.last_visit AS VARCHAR), \
             COUNT(c.click_id) \
             FROM visitors v \
             LEFT JOIN clicks c ON c.visitor_id = v.visitor_id \
             GROUP BY v.visitor_id, v.ip_hash, v.source, v.first_visit, v.last_visit \
             ORDER BY v.last_visit DESC{}",
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
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut visitors = Vec::new();
        for row in rows {
            let (visitor_id, ip_hash, source, first_raw, last_raw, clicks) = row?;
            visitors.push(VisitorRow {
                visitor_id,
                ip_hash,
                source,
                first_visit: parse_ts(&first_raw)?,
                last_visit: parse_ts(&last_raw)?,
                clicks,
            });
        }
        Ok(visitors)
    }
}
