use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::errors::CoreError;
use crate::metrics;
use crate::models::analytics::PortfolioSummary;
use crate::models::goal::{FinancialGoal, NewGoal};
use crate::models::holding::Holding;
use crate::models::snapshot::PortfolioSnapshot;

use super::schema;

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

/// Durable storage for holdings, daily snapshots and savings goals.
///
/// The connection is opened lazily: the first operation (or an explicit
/// `initialize()`) opens the database, creates the schema and seeds default
/// goals. Every operation awaits that same one-shot initialization, so
/// concurrent first callers share one init. A failed init is retried by the
/// next caller.
///
/// Failure semantics:
/// - **Reads** (`list_*`, `compute_summary`) log storage errors and degrade
///   to empty / zeroed results. `try_*` variants surface the error.
/// - **Writes** propagate `CoreError::Storage`.
pub struct PortfolioStore {
    location: StoreLocation,
    clock: Arc<dyn Clock>,
    conn: OnceCell<Mutex<Connection>>,
}

impl std::fmt::Debug for PortfolioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioStore")
            .field("location", &self.location)
            .field("initialized", &self.conn.initialized())
            .finish()
    }
}

impl PortfolioStore {
    /// A store backed by a database file. Nothing is opened until first use.
    pub fn open(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self::with_location(StoreLocation::File(path.into()), clock)
    }

    /// A private in-memory database, dropped with the store.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::with_location(StoreLocation::InMemory, clock)
    }

    pub fn with_location(location: StoreLocation, clock: Arc<dyn Clock>) -> Self {
        Self {
            location,
            clock,
            conn: OnceCell::new(),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.initialized()
    }

    /// Ensure the schema exists and default goals are seeded. Idempotent.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        self.connection().await.map(|_| ())
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Insert a holding, or overwrite every field of the existing row with the
    /// same symbol. Missing shares are stored as 0.
    pub async fn upsert_holding(&self, holding: &Holding) -> Result<(), CoreError> {
        let now = self.timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO stocks
                    (symbol, price, change_amount, change_percent, volume, shares, last_updated, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(symbol) DO UPDATE SET
                    price = excluded.price,
                    change_amount = excluded.change_amount,
                    change_percent = excluded.change_percent,
                    volume = excluded.volume,
                    shares = excluded.shares,
                    last_updated = excluded.last_updated,
                    updated_at = excluded.updated_at",
                params![
                    holding.symbol,
                    holding.price,
                    holding.change,
                    holding.change_percent,
                    holding.volume,
                    holding.shares_or_zero(),
                    holding.last_updated,
                    now,
                ],
            )
        })
        .await
        .map_err(|e| {
            error!(symbol = %holding.symbol, error = %e, "Failed to save holding");
            e
        })?;
        debug!(symbol = %holding.symbol, "Holding saved");
        Ok(())
    }

    /// Upsert each holding in order. Not atomic: on failure, holdings saved
    /// before the failing one stay saved.
    pub async fn upsert_holdings(&self, holdings: &[Holding]) -> Result<(), CoreError> {
        for holding in holdings {
            self.upsert_holding(holding).await?;
        }
        info!(count = holdings.len(), "Holdings saved");
        Ok(())
    }

    /// Change the share count of one holding. Returns the number of rows
    /// updated; an unknown symbol updates nothing and is not an error.
    pub async fn update_holding_shares(&self, symbol: &str, shares: u32) -> Result<usize, CoreError> {
        let now = self.timestamp();
        let updated = self
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE stocks SET shares = ?1, updated_at = ?2 WHERE symbol = ?3",
                    params![shares, now, symbol],
                )
            })
            .await?;
        if updated == 0 {
            debug!(symbol, "No holding to update shares for");
        } else {
            info!(symbol, shares, "Updated shares");
        }
        Ok(updated)
    }

    /// All holdings ordered by symbol. Empty on storage failure.
    pub async fn list_holdings(&self) -> Vec<Holding> {
        self.try_list_holdings().await.unwrap_or_else(|e| {
            error!(error = %e, "Error getting holdings");
            Vec::new()
        })
    }

    pub async fn try_list_holdings(&self) -> Result<Vec<Holding>, CoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT symbol, price, change_amount, change_percent, volume, shares, last_updated
                 FROM stocks ORDER BY symbol",
            )?;
            let rows = stmt.query_map([], holding_from_row)?;
            rows.collect()
        })
        .await
    }

    /// Modification timestamp (RFC 3339) of a holding row, if present.
    pub async fn holding_updated_at(&self, symbol: &str) -> Result<Option<String>, CoreError> {
        use rusqlite::OptionalExtension;
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT updated_at FROM stocks WHERE symbol = ?1",
                params![symbol],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Store a new goal and return its id. `current` defaults to 0.
    pub async fn create_goal(&self, goal: &NewGoal) -> Result<i64, CoreError> {
        let now = self.timestamp();
        let id = self
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO financial_goals
                        (name, target_amount, current_amount, deadline, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    params![
                        goal.name,
                        goal.target,
                        goal.current.unwrap_or(0.0),
                        goal.deadline,
                        now,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        info!(id, name = %goal.name, "Goal saved");
        Ok(id)
    }

    /// All goals ordered by deadline. Empty on storage failure.
    pub async fn list_goals(&self) -> Vec<FinancialGoal> {
        self.try_list_goals().await.unwrap_or_else(|e| {
            error!(error = %e, "Error getting goals");
            Vec::new()
        })
    }

    pub async fn try_list_goals(&self) -> Result<Vec<FinancialGoal>, CoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, target_amount, current_amount, deadline
                 FROM financial_goals ORDER BY deadline",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(FinancialGoal {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    target: row.get(2)?,
                    current: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                    deadline: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
    }

    /// Set the progress amount of a goal. Returns the number of rows
    /// updated; an unknown id updates nothing and is not an error.
    pub async fn update_goal_progress(&self, id: i64, current: f64) -> Result<usize, CoreError> {
        let now = self.timestamp();
        let updated = self
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE financial_goals SET current_amount = ?1, updated_at = ?2 WHERE id = ?3",
                    params![current, now, id],
                )
            })
            .await?;
        if updated == 0 {
            debug!(id, "No goal to update progress for");
        } else {
            info!(id, current, "Goal progress updated");
        }
        Ok(updated)
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Save today's snapshot. Saving again on the same date overwrites it.
    pub async fn record_snapshot(
        &self,
        total_value: f64,
        total_change: f64,
        change_percent: f64,
    ) -> Result<NaiveDate, CoreError> {
        let today = self.clock.today();
        let date = today.to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO portfolio_history (date, total_value, total_change, change_percent)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(date) DO UPDATE SET
                    total_value = excluded.total_value,
                    total_change = excluded.total_change,
                    change_percent = excluded.change_percent",
                params![date, total_value, total_change, change_percent],
            )
        })
        .await?;
        info!(%today, total_value, "Portfolio snapshot saved");
        Ok(today)
    }

    /// The most recent `limit_days` snapshots, oldest first. Empty on storage failure.
    pub async fn list_snapshots(&self, limit_days: u32) -> Vec<PortfolioSnapshot> {
        self.try_list_snapshots(limit_days).await.unwrap_or_else(|e| {
            error!(error = %e, "Error getting portfolio history");
            Vec::new()
        })
    }

    pub async fn try_list_snapshots(&self, limit_days: u32) -> Result<Vec<PortfolioSnapshot>, CoreError> {
        let mut snapshots = self
            .with_conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT date, total_value, total_change, change_percent
                     FROM portfolio_history ORDER BY date DESC LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit_days], snapshot_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        snapshots.reverse();
        Ok(snapshots)
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// Valuation of all stored holdings. Zeroed on storage failure.
    pub async fn compute_summary(&self) -> PortfolioSummary {
        match self.try_list_holdings().await {
            Ok(holdings) => metrics::summarize(&holdings),
            Err(e) => {
                error!(error = %e, "Error getting portfolio summary");
                PortfolioSummary::default()
            }
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    fn timestamp(&self) -> String {
        self.clock.now().to_rfc3339()
    }

    async fn connection(&self) -> Result<&Mutex<Connection>, CoreError> {
        self.conn
            .get_or_try_init(|| async { self.open_and_prepare().map(Mutex::new) })
            .await
    }

    fn open_and_prepare(&self) -> Result<Connection, CoreError> {
        let conn = match &self.location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Connection::open(path)?
            }
            StoreLocation::InMemory => Connection::open_in_memory()?,
        };

        schema::create_tables(&conn).map_err(|e| {
            error!(error = %e, "Error creating tables");
            CoreError::from(e)
        })?;

        match schema::seed_default_goals(&conn) {
            Ok(0) => {}
            Ok(n) => info!(count = n, "Default goals inserted"),
            Err(e) => warn!(error = %e, "Error inserting default goals"),
        }

        info!(location = ?self.location, "Database initialized");
        Ok(conn)
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.connection().await?.lock().await;
        f(&conn).map_err(CoreError::from)
    }
}

fn holding_from_row(row: &Row<'_>) -> rusqlite::Result<Holding> {
    Ok(Holding {
        symbol: row.get(0)?,
        price: row.get(1)?,
        change: row.get(2)?,
        change_percent: row.get(3)?,
        volume: row.get(4)?,
        shares: Some(row.get(5)?),
        last_updated: row.get(6)?,
    })
}

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<PortfolioSnapshot> {
    let raw_date: String = row.get(0)?;
    let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(PortfolioSnapshot {
        date,
        total_value: row.get(1)?,
        total_change: row.get(2)?,
        change_percent: row.get(3)?,
    })
}
