use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{BookingPayload, DeliveryStatus, Locale, Submission, TimeSlot, Weekday};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SUBMISSION_COLUMNS: &str = "id, name, email, phone, company, selected_day, selected_time, \
     message, locale, delivery_status, created_at";

// ── Submissions ──

pub fn insert_submission(conn: &Connection, submission: &Submission) -> anyhow::Result<()> {
    let payload = &submission.payload;
    let created_at = submission.created_at.format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO submissions (id, name, email, phone, company, selected_day, selected_time, message, locale, delivery_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            submission.id,
            payload.name,
            payload.email,
            payload.phone,
            payload.company,
            payload.selected_day.as_ref(),
            payload.selected_time.as_ref(),
            payload.message,
            submission.locale.as_ref(),
            submission.delivery_status.as_ref(),
            created_at,
        ],
    )?;
    Ok(())
}

pub fn update_delivery_status(
    conn: &Connection,
    id: &str,
    status: DeliveryStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE submissions SET delivery_status = ?1 WHERE id = ?2",
        params![status.as_ref(), id],
    )?;
    Ok(count > 0)
}

pub fn get_submission(conn: &Connection, id: &str) -> anyhow::Result<Option<Submission>> {
    let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_submission_row(row)));

    match result {
        Ok(submission) => Ok(Some(submission?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Newest first.
pub fn list_submissions(
    conn: &Connection,
    status_filter: Option<DeliveryStatus>,
    limit: i64,
) -> anyhow::Result<Vec<Submission>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE delivery_status = ?1 \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            ),
            vec![
                Box::new(status.as_ref().to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {SUBMISSION_COLUMNS} FROM submissions \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?1"
            ),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_submission_row(row)))?;

    let mut submissions = vec![];
    for row in rows {
        submissions.push(row??);
    }
    Ok(submissions)
}

pub fn count_submissions_since(conn: &Connection, since: &NaiveDateTime) -> anyhow::Result<i64> {
    let since = since.format(TIMESTAMP_FORMAT).to_string();
    let count = conn.query_row(
        "SELECT COUNT(*) FROM submissions WHERE created_at >= ?1",
        params![since],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn count_submissions_with_status(
    conn: &Connection,
    status: DeliveryStatus,
) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM submissions WHERE delivery_status = ?1",
        params![status.as_ref()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn parse_submission_row(row: &rusqlite::Row) -> anyhow::Result<Submission> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let company: Option<String> = row.get(4)?;
    let day_str: String = row.get(5)?;
    let time_str: String = row.get(6)?;
    let message: Option<String> = row.get(7)?;
    let locale_str: String = row.get(8)?;
    let status_str: String = row.get(9)?;
    let created_at_str: String = row.get(10)?;

    let selected_day: Weekday = day_str
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid stored day: {day_str}"))?;
    let selected_time: TimeSlot = time_str
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid stored time: {time_str}"))?;
    let delivery_status: DeliveryStatus = status_str.parse().unwrap_or(DeliveryStatus::Pending);
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Submission {
        id,
        payload: BookingPayload {
            name,
            email,
            phone,
            company,
            selected_day,
            selected_time,
            message,
        },
        locale: Locale::parse(&locale_str),
        delivery_status,
        created_at,
    })
}
