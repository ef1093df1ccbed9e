use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use pagetrace_core::plan::{unit_price, PRICE_TABLE};

use crate::DuckDbBackend;

/// Headline dashboard numbers, computed fresh per request.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_visitors: i64,
    pub total_clicks: i64,
    pub today_visitors: i64,
    pub today_clicks: i64,
    /// Clicks / visitors as a percentage, one decimal, in [0, 100].
    pub conversion_rate: f64,
}

/// The best-performing plan by grouped click count.
#[derive(Debug, Clone, Serialize)]
pub struct TopPlan {
    pub plan: String,
    pub clicks: i64,
}

/// Per-plan count, share, and revenue over the fixed price table.
#[derive(Debug, Clone, Serialize)]
pub struct PlanStat {
    pub plan: String,
    pub count: i64,
    pub percentage: f64,
    pub revenue: i64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl DuckDbBackend {
    /// Totals, same-day subsets (calendar-date comparison on UTC dates),
    /// and the zero-guarded conversion rate.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let conn = self.conn.lock().await;
        let today = Utc::now().date_naive().to_string();

        let total_visitors: i64 = conn
            .prepare("SELECT COUNT(*) FROM visitors")?
            .query_row([], |row| row.get(0))?;
        let total_clicks: i64 = conn
            .prepare("SELECT COUNT(*) FROM clicks")?
            .query_row([], |row| row.get(0))?;
        let today_visitors: i64 = conn
            .prepare("SELECT COUNT(*) FROM visitors WHERE CAST(first_visit AS DATE) = CAST(?1 AS DATE)")?
            .query_row(duckdb::params![today], |row| row.get(0))?;
        let today_clicks: i64 = conn
            .prepare("SELECT COUNT(*) FROM clicks WHERE CAST(created_at AS DATE) = CAST(?1 AS DATE)")?
            .query_row(duckdb::params![today], |row| row.get(0))?;

        // Multiple clicks per visitor can push the raw ratio past 100%;
        // the reported rate is clamped to [0, 100].
        let conversion_rate = if total_visitors == 0 {
            0.0
        } else {
            round1((total_clicks as f64 / total_visitors as f64 * 100.0).clamp(0.0, 100.0))
        };

        Ok(DashboardStats {
            total_visitors,
            total_clicks,
            today_visitors,
            today_clicks,
            conversion_rate,
        })
    }

    /// The plan with the most clicks, `None` when no clicks exist. Ties
    /// break by storage order.
    pub async fn top_plan(&self) -> Result<Option<TopPlan>> {
        let conn = self.conn.lock().await;
        let result = conn
            .prepare(
                "SELECT plan, COUNT(*) AS n FROM clicks \
                 GROUP BY plan ORDER BY n DESC LIMIT 1",
            )?
            .query_row([], |row| {
                Ok(TopPlan {
                    plan: row.get(0)?,
                    clicks: row.get(1)?,
                })
            })
            .ok();
        Ok(result)
    }

    /// Count, percentage of total clicks, and revenue (count × unit price)
    /// for each plan in the price table. Always returns all three plans,
    /// zero-filled, in price-table order.
    pub async fn plan_breakdown(&self) -> Result<Vec<PlanStat>> {
        let conn = self.conn.lock().await;

        let total_clicks: i64 = conn
            .prepare("SELECT COUNT(*) FROM clicks")?
            .query_row([], |row| row.get(0))?;

        let mut stats = Vec::with_capacity(PRICE_TABLE.len());
        for (plan, _) in PRICE_TABLE {
            let count: i64 = conn
                .prepare("SELECT COUNT(*) FROM clicks WHERE plan = ?1")?
                .query_row(duckdb::params![plan], |row| row.get(0))?;

            let percentage = if total_clicks == 0 {
                0.0
            } else {
                round1(count as f64 / total_clicks as f64 * 100.0)
            };
            let revenue = count * unit_price(plan).unwrap_or(0);

            stats.push(PlanStat {
                plan: plan.to_string(),
                count,
                percentage,
                revenue,
            });
        }
        Ok(stats)
    }
}
