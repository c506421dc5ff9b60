//! Email repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist action-required messages keyed by their external id.
//! - Keep re-sync idempotent without clobbering local read state.
//!
//! # Invariants
//! - Upsert refreshes message content and importance but never `is_read`.
//! - Listings are ordered newest-received first.

use crate::model::email::{EmailMessage, Importance};
use crate::repo::{
    bool_to_int, ensure_schema_ready, int_to_bool, RepoError, RepoResult, RequiredTable,
};
use rusqlite::{params, Connection, Row};

/// Listing filter matching the mailbox tab set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailFilter {
    #[default]
    All,
    /// Messages not yet opened locally.
    Unread,
    /// Messages the sender marked high importance.
    Flagged,
}

const EMAIL_SELECT_SQL: &str = "SELECT
    id,
    subject,
    from_name,
    from_address,
    received_at,
    body,
    is_read,
    importance
FROM emails";

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "emails",
    columns: &[
        "id",
        "subject",
        "from_name",
        "from_address",
        "received_at",
        "body",
        "is_read",
        "importance",
    ],
}];

/// Repository interface for email persistence.
pub trait EmailRepository {
    /// Inserts or refreshes one message. Returns `true` when newly inserted.
    fn upsert_email(&self, email: &EmailMessage) -> RepoResult<bool>;
    fn get_email(&self, id: &str) -> RepoResult<Option<EmailMessage>>;
    fn list_emails(&self, filter: EmailFilter) -> RepoResult<Vec<EmailMessage>>;
    fn mark_read(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed email repository.
pub struct SqliteEmailRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmailRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl EmailRepository for SqliteEmailRepository<'_> {
    fn upsert_email(&self, email: &EmailMessage) -> RepoResult<bool> {
        email.validate()?;

        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM emails WHERE id = ?1);",
            [email.id.as_str()],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "INSERT INTO emails (
                id,
                subject,
                from_name,
                from_address,
                received_at,
                body,
                is_read,
                importance
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                subject = excluded.subject,
                from_name = excluded.from_name,
                from_address = excluded.from_address,
                received_at = excluded.received_at,
                body = excluded.body,
                importance = excluded.importance;",
            params![
                email.id.as_str(),
                email.subject.as_str(),
                email.from_name.as_str(),
                email.from_address.as_str(),
                email.received_at,
                email.body.as_str(),
                bool_to_int(email.is_read),
                email.importance.as_str(),
            ],
        )?;

        Ok(exists == 0)
    }

    fn get_email(&self, id: &str) -> RepoResult<Option<EmailMessage>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMAIL_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_email_row(row)?));
        }

        Ok(None)
    }

    fn list_emails(&self, filter: EmailFilter) -> RepoResult<Vec<EmailMessage>> {
        let mut sql = format!("{EMAIL_SELECT_SQL} WHERE 1 = 1");
        match filter {
            EmailFilter::All => {}
            EmailFilter::Unread => sql.push_str(" AND is_read = 0"),
            EmailFilter::Flagged => sql.push_str(" AND importance = 'high'"),
        }
        sql.push_str(" ORDER BY received_at DESC, id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut emails = Vec::new();

        while let Some(row) = rows.next()? {
            emails.push(parse_email_row(row)?);
        }

        Ok(emails)
    }

    fn mark_read(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE emails SET is_read = 1 WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::EmailNotFound(id.to_string()));
        }

        Ok(())
    }
}

fn parse_email_row(row: &Row<'_>) -> RepoResult<EmailMessage> {
    let importance_text: String = row.get("importance")?;
    let importance = Importance::parse(&importance_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid importance `{importance_text}` in emails.importance"
        ))
    })?;

    let is_read = int_to_bool(row.get("is_read")?, "emails.is_read")?;

    let email = EmailMessage {
        id: row.get("id")?,
        subject: row.get("subject")?,
        from_name: row.get("from_name")?,
        from_address: row.get("from_address")?,
        received_at: row.get("received_at")?,
        body: row.get("body")?,
        is_read,
        importance,
    };
    email.validate()?;
    Ok(email)
}
