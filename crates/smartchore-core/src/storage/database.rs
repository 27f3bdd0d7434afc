//! SQLite-backed household store.
//!
//! Provides persistent storage for:
//! - The member roster (skills, availability grid, preferences)
//! - Out-of-home events
//! - Dated chore instances and their assignees
//! - Assignment runs (full result JSON plus a summary row)

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{data_dir, migrations, RunRecord, Store};
use crate::availability::OutOfHomeEvent;
use crate::catalog::ChoreInstance;
use crate::error::StoreError;
use crate::household::Member;
use crate::intake::{normalize_chore, normalize_member, ChoreRecord, MemberRecord};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Summary row for one stored run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub score: f64,
    pub assignment_count: u32,
}

/// SQLite store for the household.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/smartchore.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, crate::error::CoreError> {
        let path = data_dir()?.join("smartchore.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Insert or replace a member.
    pub fn add_member(&self, member: &Member) -> Result<(), StoreError> {
        let skills: BTreeMap<&str, u8> = member
            .skills
            .iter()
            .map(|(skill, level)| (skill.as_str(), *level))
            .collect();
        self.conn.execute(
            "INSERT INTO members (id, name, skills, availability, liked, disliked, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                skills = excluded.skills,
                availability = excluded.availability,
                liked = excluded.liked,
                disliked = excluded.disliked",
            params![
                member.id,
                member.name.as_str(),
                to_json(&skills)?,
                to_json(&member.availability)?,
                to_json(&member.preferences.liked)?,
                to_json(&member.preferences.disliked)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn has_member(&self, member_id: &str) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM members WHERE id = ?1", params![member_id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Record an out-of-home event. Returns its row id.
    pub fn add_event(&self, event: &OutOfHomeEvent) -> Result<i64, StoreError> {
        if !self.has_member(&event.member_id)? {
            return Err(StoreError::UnknownMember(event.member_id.clone()));
        }
        self.conn.execute(
            "INSERT INTO out_of_home (member_id, title, start_at, end_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                event.member_id,
                event.title,
                event.start.format(DATETIME_FORMAT).to_string(),
                event.end.format(DATETIME_FORMAT).to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent runs first.
    pub fn history(&self, limit: usize) -> Result<Vec<RunSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, date, generated_at, score, assignment_count
             FROM assignment_runs
             ORDER BY generated_at DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (run_id, date, generated_at, score, assignment_count) = row?;
            summaries.push(RunSummary {
                run_id,
                date: parse_date("assignment_runs", &date)?,
                generated_at: DateTime::parse_from_rfc3339(&generated_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| corrupt("assignment_runs", e))?,
                score,
                assignment_count,
            });
        }
        Ok(summaries)
    }

    /// Load a stored run by id.
    pub fn load_run(&self, run_id: &str) -> Result<Option<RunRecord>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT result FROM assignment_runs WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(|e| corrupt("assignment_runs", e)))
            .transpose()
    }

    /// Mark a stored instance completed.
    pub fn complete_instance(&self, instance_id: &str) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE chore_instances SET status = 'completed' WHERE id = ?1",
            params![instance_id],
        )?;
        Ok(changed > 0)
    }
}

impl Store for SqliteStore {
    fn load_roster(&self) -> Result<Vec<Member>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, skills, availability, liked, disliked FROM members ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut members = Vec::new();
        for row in rows {
            let (id, name, skills, availability, liked, disliked) = row?;
            let record = MemberRecord {
                id,
                name: Some(name),
                skills: from_json("members", &skills)?,
                availability: availability
                    .map(|a| from_json("members", &a))
                    .transpose()?,
                liked: from_json("members", &liked)?,
                disliked: from_json("members", &disliked)?,
            };
            members.push(normalize_member(record).value);
        }
        Ok(members)
    }

    fn load_out_of_home(&self, date: NaiveDate) -> Result<Vec<OutOfHomeEvent>, StoreError> {
        let day_start = date.and_time(chrono::NaiveTime::MIN);
        let day_end = date
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .unwrap_or(day_start);

        let mut stmt = self.conn.prepare(
            "SELECT member_id, title, start_at, end_at FROM out_of_home
             WHERE start_at < ?1 AND end_at > ?2
             ORDER BY start_at, id",
        )?;
        let rows = stmt.query_map(
            params![
                day_end.format(DATETIME_FORMAT).to_string(),
                day_start.format(DATETIME_FORMAT).to_string(),
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;

        let mut events = Vec::new();
        for row in rows {
            let (member_id, title, start, end) = row?;
            let event = OutOfHomeEvent::new(
                member_id,
                title,
                parse_datetime(&start)?,
                parse_datetime(&end)?,
            )
            .map_err(|e| corrupt("out_of_home", e))?;
            events.push(event);
        }
        Ok(events)
    }

    fn load_instances(&self, date: NaiveDate) -> Result<Vec<ChoreInstance>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, chore_id, name, category, skill, duration_minutes, difficulty,
                    time_slot, status, assignee
             FROM chore_instances WHERE date = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![date.to_string()], |row| {
            Ok(ChoreRecord {
                id: row.get(0)?,
                chore_id: row.get(1)?,
                name: row.get(2)?,
                category: row.get(3)?,
                skill: row.get(4)?,
                duration_minutes: row.get(5)?,
                difficulty: row.get(6)?,
                time_slot: row.get(7)?,
                date,
                status: row.get(8)?,
                assignee: row.get(9)?,
            })
        })?;

        let mut instances = Vec::new();
        for row in rows {
            instances.push(normalize_chore(row?).value);
        }
        Ok(instances)
    }

    fn save_assignments(&self, run: &RunRecord) -> Result<(), StoreError> {
        let result = &run.result;
        let tx = self.conn.unchecked_transaction()?;

        for a in &result.assignments {
            let status = if a.completed { "completed" } else { "pending" };
            tx.execute(
                "INSERT INTO chore_instances
                    (id, chore_id, name, category, skill, duration_minutes, difficulty,
                     time_slot, date, status, assignee)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(id) DO UPDATE SET
                    assignee = excluded.assignee,
                    status = excluded.status",
                params![
                    a.instance_id,
                    a.chore_id,
                    a.chore_name,
                    a.category,
                    a.skill.as_str(),
                    a.duration_minutes,
                    a.difficulty,
                    a.time_slot.as_str(),
                    result.date.to_string(),
                    status,
                    a.member_id,
                ],
            )?;
        }

        tx.execute(
            "INSERT INTO assignment_runs (run_id, date, generated_at, score, assignment_count, result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run.run_id.to_string(),
                result.date.to_string(),
                run.generated_at.to_rfc3339(),
                result.fairness.score,
                result.assignments.len() as i64,
                to_json(run)?,
            ],
        )?;

        tx.commit()?;
        tracing::debug!(run_id = %run.run_id, assignments = result.assignments.len(), "saved run");
        Ok(())
    }

    fn remove_member(&self, member_id: &str, today: NaiveDate) -> Result<usize, StoreError> {
        if !self.has_member(member_id)? {
            return Err(StoreError::UnknownMember(member_id.to_string()));
        }
        let tx = self.conn.unchecked_transaction()?;
        let cleared = tx.execute(
            "UPDATE chore_instances SET assignee = NULL
             WHERE assignee = ?1 AND status = 'pending' AND date >= ?2",
            params![member_id, today.to_string()],
        )?;
        tx.execute("DELETE FROM out_of_home WHERE member_id = ?1", params![member_id])?;
        tx.execute("DELETE FROM members WHERE id = ?1", params![member_id])?;
        tx.commit()?;

        tracing::info!(member = member_id, cleared, "removed member");
        Ok(cleared)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::QueryFailed(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(table: &str, json: &str) -> Result<T, StoreError> {
    serde_json::from_str(json).map_err(|e| corrupt(table, e))
}

fn corrupt(table: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt {
        table: table.to_string(),
        message: err.to_string(),
    }
}

fn parse_date(table: &str, s: &str) -> Result<NaiveDate, StoreError> {
    s.parse().map_err(|e| corrupt(table, e))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map_err(|e| corrupt("out_of_home", e))
}
