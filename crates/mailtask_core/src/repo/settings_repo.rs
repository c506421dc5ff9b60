//! Settings repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the single settings row and serve defaults before first save.
//!
//! # Invariants
//! - At most one settings row exists (`id = 1`).
//! - Loading never fails on a fresh database; defaults are returned instead.

use crate::model::settings::Settings;
use crate::model::task::Priority;
use crate::repo::{
    bool_to_int, ensure_schema_ready, format_time, int_to_bool, parse_time, RepoError,
    RepoResult, RequiredTable,
};
use rusqlite::{params, Connection};

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "settings",
    columns: &[
        "id",
        "daily_notification_enabled",
        "notification_time",
        "sync_interval_minutes",
        "default_priority",
        "action_required_folder",
    ],
}];

/// Repository interface for user settings.
pub trait SettingsRepository {
    /// Loads the stored settings, or defaults when none were saved yet.
    fn load_settings(&self) -> RepoResult<Settings>;
    fn save_settings(&self, settings: &Settings) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load_settings(&self) -> RepoResult<Settings> {
        let mut stmt = self.conn.prepare(
            "SELECT
                daily_notification_enabled,
                notification_time,
                sync_interval_minutes,
                default_priority,
                action_required_folder
             FROM settings
             WHERE id = 1;",
        )?;

        let mut rows = stmt.query([])?;
        let Some(row) = rows.next()? else {
            return Ok(Settings::default());
        };

        let time_text: String = row.get("notification_time")?;
        let priority_text: String = row.get("default_priority")?;
        let default_priority = Priority::parse(&priority_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid priority `{priority_text}` in settings.default_priority"
            ))
        })?;

        let settings = Settings {
            daily_notification_enabled: int_to_bool(
                row.get("daily_notification_enabled")?,
                "settings.daily_notification_enabled",
            )?,
            notification_time: parse_time(&time_text, "settings.notification_time")?,
            sync_interval_minutes: row.get("sync_interval_minutes")?,
            default_priority,
            action_required_folder: row.get("action_required_folder")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn save_settings(&self, settings: &Settings) -> RepoResult<()> {
        settings.validate()?;

        self.conn.execute(
            "INSERT INTO settings (
                id,
                daily_notification_enabled,
                notification_time,
                sync_interval_minutes,
                default_priority,
                action_required_folder
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                daily_notification_enabled = excluded.daily_notification_enabled,
                notification_time = excluded.notification_time,
                sync_interval_minutes = excluded.sync_interval_minutes,
                default_priority = excluded.default_priority,
                action_required_folder = excluded.action_required_folder;",
            params![
                bool_to_int(settings.daily_notification_enabled),
                format_time(settings.notification_time),
                settings.sync_interval_minutes,
                settings.default_priority.as_str(),
                settings.action_required_folder.as_str(),
            ],
        )?;

        Ok(())
    }
}
