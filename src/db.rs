use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use crate::parser::record::{NoteItem, OutputRecord};

pub const DEFAULT_DB_PATH: &str = "data/notes.sqlite";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            id          INTEGER PRIMARY KEY,
            patient_id  TEXT NOT NULL,
            source      TEXT NOT NULL,
            char_count  INTEGER NOT NULL,
            parsed_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_documents_patient ON documents(patient_id);

        CREATE TABLE IF NOT EXISTS note_items (
            id           INTEGER PRIMARY KEY,
            document_id  INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            date         TEXT NOT NULL,
            position     INTEGER NOT NULL,
            keyword      TEXT,
            detail       TEXT,
            UNIQUE(document_id, date, position)
        );
        CREATE INDEX IF NOT EXISTS idx_items_document ON note_items(document_id);
        ",
    )?;
    Ok(())
}

// ── Writing ──

pub struct DocumentRow {
    pub patient_id: String,
    pub source: String,
    pub char_count: usize,
    pub records: Vec<OutputRecord>,
}

/// Save one parsed document. Dates without items still get a row (with NULL
/// keyword/detail) so an empty day survives the round trip.
pub fn save_document(conn: &Connection, doc: &DocumentRow) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let document_id = {
        tx.execute(
            "INSERT INTO documents (patient_id, source, char_count) VALUES (?1, ?2, ?3)",
            rusqlite::params![doc.patient_id, doc.source, doc.char_count as i64],
        )?;
        let id = tx.last_insert_rowid();

        let mut stmt = tx.prepare(
            "INSERT INTO note_items (document_id, date, position, keyword, detail)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for record in &doc.records {
            let date = record.date.to_string();
            if record.items.is_empty() {
                stmt.execute(rusqlite::params![id, date, 0, None::<String>, None::<String>])?;
                continue;
            }
            for (pos, item) in record.items.iter().enumerate() {
                stmt.execute(rusqlite::params![id, date, pos as i64, item.keyword, item.detail])?;
            }
        }
        id
    };
    tx.commit()?;
    Ok(document_id)
}

// ── Reading ──

/// Notes of the most recently parsed document for `patient_id`.
pub fn fetch_latest_notes(conn: &Connection, patient_id: &str) -> Result<Option<Vec<OutputRecord>>> {
    let document_id: Option<i64> = conn
        .query_row(
            "SELECT id FROM documents WHERE patient_id = ?1 ORDER BY id DESC LIMIT 1",
            [patient_id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(document_id) = document_id else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT date, keyword, detail FROM note_items
         WHERE document_id = ?1 ORDER BY date, position",
    )?;
    let rows = stmt
        .query_map([document_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records: Vec<OutputRecord> = Vec::new();
    for (date, keyword, detail) in rows {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("bad stored date '{}'", date))?;
        if records.last().map(|r| r.date) != Some(date) {
            records.push(OutputRecord {
                date,
                items: Vec::new(),
            });
        }
        if let (Some(keyword), Some(detail), Some(record)) = (keyword, detail, records.last_mut()) {
            record.items.push(NoteItem { keyword, detail });
        }
    }
    Ok(Some(records))
}

pub struct PatientRow {
    pub patient_id: String,
    pub documents: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub items: i64,
}

pub fn list_patients(conn: &Connection) -> Result<Vec<PatientRow>> {
    let mut stmt = conn.prepare(
        "SELECT d.patient_id,
                COUNT(DISTINCT d.id),
                MIN(n.date),
                MAX(n.date),
                COUNT(n.keyword)
         FROM documents d
         LEFT JOIN note_items n ON n.document_id = d.id
         GROUP BY d.patient_id
         ORDER BY d.patient_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PatientRow {
                patient_id: row.get(0)?,
                documents: row.get(1)?,
                first_date: row.get(2)?,
                last_date: row.get(3)?,
                items: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct Stats {
    pub patients: i64,
    pub documents: i64,
    pub items: i64,
    pub resolved: i64,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let stats = conn.query_row(
        "SELECT
            (SELECT COUNT(DISTINCT patient_id) FROM documents),
            (SELECT COUNT(*) FROM documents),
            (SELECT COUNT(keyword) FROM note_items),
            (SELECT COUNT(*) FROM note_items WHERE detail = ?1)",
        [crate::parser::record::RESOLVED_MARKER],
        |row| {
            Ok(Stats {
                patients: row.get(0)?,
                documents: row.get(1)?,
                items: row.get(2)?,
                resolved: row.get(3)?,
            })
        },
    )?;
    Ok(stats)
}
