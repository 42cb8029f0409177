use rusqlite::{params, Connection};

/// Tables for holdings, daily snapshots and savings goals.
pub const CREATE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS stocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT UNIQUE NOT NULL,
    price REAL NOT NULL,
    change_amount REAL NOT NULL,
    change_percent TEXT NOT NULL,
    volume INTEGER NOT NULL,
    shares INTEGER NOT NULL,
    last_updated TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS portfolio_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT UNIQUE NOT NULL,
    total_value REAL NOT NULL,
    total_change REAL NOT NULL,
    change_percent REAL NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS financial_goals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    target_amount REAL NOT NULL,
    current_amount REAL DEFAULT 0,
    deadline TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);
";

/// Goals inserted on first run: (name, target, current, deadline).
pub const DEFAULT_GOALS: &[(&str, f64, f64, &str)] = &[
    ("Emergency Fund", 50_000.0, 35_000.0, "2025-12-31"),
    ("House Down Payment", 100_000.0, 65_000.0, "2026-06-30"),
    ("Retirement", 1_000_000.0, 150_000.0, "2045-01-01"),
];

pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TABLES_SQL)
}

/// Insert `DEFAULT_GOALS` when the goals table is empty.
/// Returns the number of goals inserted.
pub fn seed_default_goals(conn: &Connection) -> rusqlite::Result<usize> {
    let existing: i64 =
        conn.query_row("SELECT COUNT(*) FROM financial_goals", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let mut stmt = conn.prepare(
        "INSERT INTO financial_goals (name, target_amount, current_amount, deadline)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (name, target, current, deadline) in DEFAULT_GOALS {
        stmt.execute(params![name, target, current, deadline])?;
    }
    Ok(DEFAULT_GOALS.len())
}
