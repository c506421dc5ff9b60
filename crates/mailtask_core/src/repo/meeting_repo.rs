//! Meeting repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the day's meeting blocks for the available-hours view.
//!
//! # Invariants
//! - Listings are ordered by start time.

use crate::model::meeting::{Meeting, MeetingId};
use crate::repo::{
    ensure_schema_ready, format_time, parse_time, parse_uuid, RepoError, RepoResult,
    RequiredTable,
};
use rusqlite::{params, Connection, Row};

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "meetings",
    columns: &["uuid", "title", "start_time", "end_time"],
}];

/// Repository interface for meeting persistence.
pub trait MeetingRepository {
    fn create_meeting(&self, meeting: &Meeting) -> RepoResult<MeetingId>;
    fn list_meetings(&self) -> RepoResult<Vec<Meeting>>;
    fn delete_meeting(&self, id: MeetingId) -> RepoResult<()>;
}

/// SQLite-backed meeting repository.
pub struct SqliteMeetingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMeetingRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl MeetingRepository for SqliteMeetingRepository<'_> {
    fn create_meeting(&self, meeting: &Meeting) -> RepoResult<MeetingId> {
        meeting.validate()?;

        self.conn.execute(
            "INSERT INTO meetings (uuid, title, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                meeting.uuid.to_string(),
                meeting.title.as_str(),
                format_time(meeting.start_time),
                format_time(meeting.end_time),
            ],
        )?;

        Ok(meeting.uuid)
    }

    fn list_meetings(&self) -> RepoResult<Vec<Meeting>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, title, start_time, end_time
             FROM meetings
             ORDER BY start_time ASC, uuid ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next()? {
            meetings.push(parse_meeting_row(row)?);
        }

        Ok(meetings)
    }

    fn delete_meeting(&self, id: MeetingId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM meetings WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_meeting_row(row: &Row<'_>) -> RepoResult<Meeting> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "meetings.uuid")?;

    let start_text: String = row.get("start_time")?;
    let end_text: String = row.get("end_time")?;

    let meeting = Meeting {
        uuid,
        title: row.get("title")?,
        start_time: parse_time(&start_text, "meetings.start_time")?,
        end_time: parse_time(&end_text, "meetings.end_time")?,
    };
    meeting.validate()?;
    Ok(meeting)
}
