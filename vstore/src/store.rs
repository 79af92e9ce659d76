//! SQLite-backed monitoring data source.
//!
//! ```rust
//! use vstore::{SqliteMonitoringStore, TimeRange};
//!
//! let store = SqliteMonitoringStore::new_in_memory().expect("store should open");
//! store.seed_demo_data().expect("seed should succeed");
//!
//! let range = TimeRange::parse("2024-05-27 11:00:00 - 2024-05-27 12:00:00").expect("range");
//! let alarms = store.intrusions_between(&range).expect("query should succeed");
//! assert_eq!(alarms.len(), 3);
//! ```

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use vreport::time::{format_timestamp, parse_timestamp};

use crate::{StoreError, TimeRange};

/// One intrusion alarm row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrusionAlarm {
    pub id: i64,
    pub alarm_time: NaiveDateTime,
    pub url: String,
}

/// One leave-post alarm row; slot bounds are packed `HHMMSS` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeavePostAlarm {
    pub alarm_time: NaiveDateTime,
    pub time_slot_start: String,
    pub time_slot_end: String,
    pub interval_time: Option<i64>,
}

#[derive(Debug)]
pub struct SqliteMonitoringStore {
    connection: Mutex<Connection>,
}

impl SqliteMonitoringStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| {
                StoreError::storage(format!("failed to create sqlite parent directory: {error}"))
            })?;
        }

        let connection = Connection::open(path).map_err(|error| {
            StoreError::storage(format!("failed to open sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    pub fn new_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|error| {
            StoreError::storage(format!("failed to open in-memory sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, StoreError> {
        connection
            .busy_timeout(Duration::from_secs(5))
            .map_err(|error| {
                StoreError::storage(format!("failed to configure sqlite busy timeout: {error}"))
            })?;
        let store = Self {
            connection: Mutex::new(connection),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::storage("sqlite store lock poisoned"))
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS passenger_flow_alarms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                alarm_time TEXT NOT NULL,
                person_num INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_passenger_flow_alarms_time
            ON passenger_flow_alarms(alarm_time);

            CREATE TABLE IF NOT EXISTS intrusion_alarms (
                id INTEGER PRIMARY KEY,
                alarm_time TEXT NOT NULL,
                url TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_intrusion_alarms_time
            ON intrusion_alarms(alarm_time);

            CREATE TABLE IF NOT EXISTS leave_post_alarms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                alarm_time TEXT NOT NULL,
                time_slot_start TEXT NOT NULL,
                time_slot_end TEXT NOT NULL,
                interval_time INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_leave_post_alarms_time
            ON leave_post_alarms(alarm_time);
            ",
        )
        .map_err(|error| {
            StoreError::storage(format!("failed to initialize sqlite schema: {error}"))
        })
    }

    pub fn insert_passenger_flow(
        &self,
        alarm_time: NaiveDateTime,
        person_num: u32,
    ) -> Result<(), StoreError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO passenger_flow_alarms (alarm_time, person_num) VALUES (?1, ?2)",
            params![format_timestamp(&alarm_time), i64::from(person_num)],
        )
        .map_err(|error| StoreError::storage(format!("failed to insert passenger flow: {error}")))?;
        Ok(())
    }

    /// Inserts or replaces the alarm with the same id.
    pub fn insert_intrusion(&self, alarm: &IntrusionAlarm) -> Result<(), StoreError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO intrusion_alarms (id, alarm_time, url) VALUES (?1, ?2, ?3)",
            params![alarm.id, format_timestamp(&alarm.alarm_time), alarm.url],
        )
        .map_err(|error| {
            StoreError::storage(format!("failed to insert intrusion alarm: {error}"))
        })?;
        Ok(())
    }

    pub fn insert_leave_post(&self, alarm: &LeavePostAlarm) -> Result<(), StoreError> {
        let conn = self.connection()?;
        conn.execute(
            "
            INSERT INTO leave_post_alarms
                (alarm_time, time_slot_start, time_slot_end, interval_time)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                format_timestamp(&alarm.alarm_time),
                alarm.time_slot_start,
                alarm.time_slot_end,
                alarm.interval_time
            ],
        )
        .map_err(|error| {
            StoreError::storage(format!("failed to insert leave-post alarm: {error}"))
        })?;
        Ok(())
    }

    /// Fills an empty store with a small demo day (2024-05-27).
    ///
    /// Returns `false` without writing when any table already holds rows.
    pub fn seed_demo_data(&self) -> Result<bool, StoreError> {
        if !self.is_empty()? {
            return Ok(false);
        }

        let day = parse_timestamp("2024-05-27 08:00:00")?;
        for index in 0..168u32 {
            let alarm_time = day + TimeDelta::minutes(i64::from(index) * 5);
            self.insert_passenger_flow(alarm_time, 10 + index % 10)?;
        }

        for (id, time, url) in [
            (66406, "2024-05-27 11:07:31", "http://example.com/1.jpg"),
            (66414, "2024-05-27 11:13:50", "http://example.com/2.jpg"),
            (66428, "2024-05-27 11:25:39", "http://example.com/3.jpg"),
        ] {
            self.insert_intrusion(&IntrusionAlarm {
                id,
                alarm_time: parse_timestamp(time)?,
                url: url.to_string(),
            })?;
        }

        for (time, start, end) in [
            ("2024-05-27 08:20:00", "080000", "082000"),
            ("2024-05-27 10:50:00", "103000", "105000"),
        ] {
            self.insert_leave_post(&LeavePostAlarm {
                alarm_time: parse_timestamp(time)?,
                time_slot_start: start.to_string(),
                time_slot_end: end.to_string(),
                interval_time: Some(20),
            })?;
        }

        Ok(true)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let conn = self.connection()?;
        let any_row = conn
            .query_row(
                "
                SELECT 1 FROM passenger_flow_alarms
                UNION ALL SELECT 1 FROM intrusion_alarms
                UNION ALL SELECT 1 FROM leave_post_alarms
                LIMIT 1
                ",
                [],
                |_| Ok(true),
            )
            .optional()
            .map_err(|error| StoreError::storage(format!("failed to inspect store: {error}")))?
            .unwrap_or(false);
        Ok(!any_row)
    }

    /// Total person count recorded within the inclusive range.
    pub fn passenger_flow_between(&self, range: &TimeRange) -> Result<u64, StoreError> {
        let conn = self.connection()?;
        let total: i64 = conn
            .query_row(
                "
                SELECT COALESCE(SUM(person_num), 0)
                FROM passenger_flow_alarms
                WHERE alarm_time BETWEEN ?1 AND ?2
                ",
                params![format_timestamp(&range.start), format_timestamp(&range.end)],
                |row| row.get(0),
            )
            .map_err(|error| {
                StoreError::storage(format!("failed to sum passenger flow: {error}"))
            })?;
        u64::try_from(total)
            .map_err(|_| StoreError::storage(format!("passenger flow sum is negative: {total}")))
    }

    /// Intrusion alarms within the inclusive range, oldest first.
    pub fn intrusions_between(&self, range: &TimeRange) -> Result<Vec<IntrusionAlarm>, StoreError> {
        self.query_intrusions(
            "
            SELECT id, alarm_time, url
            FROM intrusion_alarms
            WHERE alarm_time BETWEEN ?1 AND ?2
            ORDER BY alarm_time ASC, id ASC
            ",
            [format_timestamp(&range.start), format_timestamp(&range.end)],
        )
    }

    /// The alarm with `id` followed by every alarm up to `window` after it, oldest first.
    pub fn intrusion_followers(
        &self,
        id: i64,
        window: TimeDelta,
    ) -> Result<Vec<IntrusionAlarm>, StoreError> {
        let anchor = {
            let conn = self.connection()?;
            conn.query_row(
                "SELECT id, alarm_time, url FROM intrusion_alarms WHERE id = ?1",
                params![id],
                read_intrusion_columns,
            )
            .optional()
            .map_err(|error| {
                StoreError::storage(format!("failed to load intrusion alarm {id}: {error}"))
            })?
            .ok_or_else(|| StoreError::not_found(format!("no intrusion alarm with id {id}")))?
        };
        let anchor = intrusion_from_columns(anchor)?;

        let mut alarms = self.query_intrusions(
            "
            SELECT id, alarm_time, url
            FROM intrusion_alarms
            WHERE alarm_time > ?1 AND alarm_time <= ?2
            ORDER BY alarm_time ASC, id ASC
            ",
            [
                format_timestamp(&anchor.alarm_time),
                format_timestamp(&(anchor.alarm_time + window)),
            ],
        )?;
        alarms.insert(0, anchor);
        Ok(alarms)
    }

    /// Alarms whose id is in `ids`, oldest first; unknown ids are skipped.
    pub fn intrusions_by_ids(&self, ids: &[i64]) -> Result<Vec<IntrusionAlarm>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=ids.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.query_intrusions(
            &format!(
                "
                SELECT id, alarm_time, url
                FROM intrusion_alarms
                WHERE id IN ({placeholders})
                ORDER BY alarm_time ASC, id ASC
                "
            ),
            ids.iter().copied(),
        )
    }

    /// Leave-post alarms within the inclusive range, ordered by alarm time.
    pub fn leave_posts_between(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<LeavePostAlarm>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "
                SELECT alarm_time, time_slot_start, time_slot_end, interval_time
                FROM leave_post_alarms
                WHERE alarm_time BETWEEN ?1 AND ?2
                ORDER BY alarm_time ASC, id ASC
                ",
            )
            .map_err(|error| {
                StoreError::storage(format!("failed to prepare leave-post query: {error}"))
            })?;
        let rows = stmt
            .query_map(
                params![format_timestamp(&range.start), format_timestamp(&range.end)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                    ))
                },
            )
            .map_err(|error| {
                StoreError::storage(format!("failed to query leave-post rows: {error}"))
            })?;

        let mut alarms = Vec::new();
        for row in rows {
            let (alarm_time, time_slot_start, time_slot_end, interval_time) =
                row.map_err(|error| {
                    StoreError::storage(format!("failed to read leave-post row: {error}"))
                })?;
            alarms.push(LeavePostAlarm {
                alarm_time: stored_timestamp(&alarm_time)?,
                time_slot_start,
                time_slot_end,
                interval_time,
            });
        }
        Ok(alarms)
    }

    fn query_intrusions<P>(&self, sql: &str, values: P) -> Result<Vec<IntrusionAlarm>, StoreError>
    where
        P: IntoIterator,
        P::Item: rusqlite::ToSql,
    {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql).map_err(|error| {
            StoreError::storage(format!("failed to prepare intrusion query: {error}"))
        })?;
        let rows = stmt
            .query_map(params_from_iter(values), read_intrusion_columns)
            .map_err(|error| {
                StoreError::storage(format!("failed to query intrusion rows: {error}"))
            })?;

        let mut alarms = Vec::new();
        for row in rows {
            let columns = row.map_err(|error| {
                StoreError::storage(format!("failed to read intrusion row: {error}"))
            })?;
            alarms.push(intrusion_from_columns(columns)?);
        }
        Ok(alarms)
    }
}

type IntrusionColumns = (i64, String, String);

fn read_intrusion_columns(row: &Row<'_>) -> rusqlite::Result<IntrusionColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn intrusion_from_columns(
    (id, alarm_time, url): IntrusionColumns,
) -> Result<IntrusionAlarm, StoreError> {
    Ok(IntrusionAlarm {
        id,
        alarm_time: stored_timestamp(&alarm_time)?,
        url,
    })
}

fn stored_timestamp(raw: &str) -> Result<NaiveDateTime, StoreError> {
    parse_timestamp(raw).map_err(|error| {
        StoreError::storage(format!("stored alarm time is invalid: {}", error.message))
    })
}
