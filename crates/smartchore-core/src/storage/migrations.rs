//! Database schema migrations for smartchore.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (new database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: household roster and out-of-home events.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS members (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL DEFAULT '',
            skills       TEXT NOT NULL DEFAULT '{}',
            availability TEXT,
            liked        TEXT NOT NULL DEFAULT '[]',
            disliked     TEXT NOT NULL DEFAULT '[]',
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS out_of_home (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id TEXT NOT NULL,
            title     TEXT NOT NULL DEFAULT '',
            start_at  TEXT NOT NULL,
            end_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_out_of_home_member ON out_of_home(member_id);
        CREATE INDEX IF NOT EXISTS idx_out_of_home_span ON out_of_home(start_at, end_at);",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: chore instances and assignment runs.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS chore_instances (
            id               TEXT PRIMARY KEY,
            chore_id         TEXT NOT NULL,
            name             TEXT NOT NULL,
            category         TEXT NOT NULL DEFAULT '',
            skill            TEXT,
            duration_minutes INTEGER,
            difficulty       INTEGER,
            time_slot        TEXT,
            date             TEXT NOT NULL,
            status           TEXT NOT NULL DEFAULT 'pending',
            assignee         TEXT
        );

        CREATE TABLE IF NOT EXISTS assignment_runs (
            run_id           TEXT PRIMARY KEY,
            date             TEXT NOT NULL,
            generated_at     TEXT NOT NULL,
            score            REAL NOT NULL,
            assignment_count INTEGER NOT NULL,
            result           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chore_instances_date ON chore_instances(date);
        CREATE INDEX IF NOT EXISTS idx_chore_instances_assignee ON chore_instances(assignee, status);
        CREATE INDEX IF NOT EXISTS idx_assignment_runs_generated_at ON assignment_runs(generated_at);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        let tables: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('members', 'out_of_home', 'chore_instances', 'assignment_runs')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO members (id, name, created_at) VALUES ('a', 'Alice', '2026-10-01T00:00:00Z')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
        let name: String = conn
            .query_row("SELECT name FROM members WHERE id = 'a'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Alice");
    }
}
