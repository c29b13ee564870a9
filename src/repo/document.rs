use rusqlite::{Connection, OptionalExtension, Row};
use chrono::NaiveDate;
use thiserror::Error;
use crate::models::{Document, Impact, Status};
use anyhow::{Context, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str =
    "SELECT id, uuid, title, doc_type, impact, category, source, status, date, created_ts, modified_ts
     FROM documents";

/// Rejections from a status update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusUpdateError {
    #[error("Invalid status '{0}'. Status must be one of: open, waiting, finished")]
    InvalidStatus(String),
    #[error("Document {0} not found")]
    NotFound(i64),
}

/// Document repository for database operations
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a document, returning it with its assigned ID
    pub fn create(conn: &Connection, document: Document) -> Result<Document> {
        conn.execute(
            "INSERT INTO documents (uuid, title, doc_type, impact, category, source, status, date,
                    created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                document.uuid,
                document.title,
                document.doc_type,
                document.impact.as_str(),
                document.category,
                document.source,
                document.status.as_str(),
                document.date.format(DATE_FORMAT).to_string(),
                document.created_ts,
                document.modified_ts,
            ],
        )
        .with_context(|| format!("Failed to create document: {}", document.title))?;

        let id = conn.last_insert_rowid();
        log::debug!("Created document {} ({})", id, document.uuid);

        Ok(Document {
            id: Some(id),
            ..document
        })
    }

    /// Get document by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Document>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        let document = stmt.query_row([id], row_to_document).optional()?;
        Ok(document)
    }

    /// List all documents ordered by ID
    pub fn list_all(conn: &Connection) -> Result<Vec<Document>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], row_to_document)?;
        collect_rows(rows)
    }

    /// List the documents crawled on a single day
    pub fn list_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Document>> {
        let mut stmt = conn.prepare(&format!("{} WHERE date = ?1 ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([date.format(DATE_FORMAT).to_string()], row_to_document)?;
        collect_rows(rows)
    }

    /// List the documents crawled between `start` and `end` (both inclusive)
    pub fn list_between(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<Vec<Document>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(
            [
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string(),
            ],
            row_to_document,
        )?;
        collect_rows(rows)
    }

    /// Accept a status change for one document.
    ///
    /// Only `open`, `waiting` and `finished` are accepted; anything else is
    /// rejected before the row is touched. Returns the accepted status.
    pub fn set_status(conn: &Connection, id: i64, status_key: &str) -> Result<Status> {
        let status = Status::from_str(status_key)
            .filter(Status::is_assignable)
            .ok_or_else(|| StatusUpdateError::InvalidStatus(status_key.to_string()))?;

        let now = chrono::Utc::now().timestamp();
        let updated = conn
            .execute(
                "UPDATE documents SET status = ?1, modified_ts = ?2 WHERE id = ?3",
                rusqlite::params![status.as_str(), now, id],
            )
            .with_context(|| format!("Failed to update status of document {}", id))?;

        if updated == 0 {
            return Err(StatusUpdateError::NotFound(id).into());
        }

        log::info!("Document {} status set to {}", id, status.as_str());
        Ok(status)
    }

    /// Update the editable properties of a document. `None` leaves a field unchanged.
    pub fn update_properties(
        conn: &Connection,
        id: i64,
        impact: Option<Impact>,
        doc_type: Option<&str>,
        category: Option<&str>,
    ) -> Result<Document> {
        let mut document = Self::get_by_id(conn, id)?
            .ok_or_else(|| anyhow::anyhow!("Document {} not found", id))?;

        if let Some(impact) = impact {
            document.impact = impact;
        }
        if let Some(doc_type) = doc_type {
            document.doc_type = doc_type.to_string();
        }
        if let Some(category) = category {
            document.category = category.to_string();
        }
        document.modified_ts = chrono::Utc::now().timestamp();

        conn.execute(
            "UPDATE documents SET impact = ?1, doc_type = ?2, category = ?3, modified_ts = ?4
             WHERE id = ?5",
            rusqlite::params![
                document.impact.as_str(),
                document.doc_type,
                document.category,
                document.modified_ts,
                id,
            ],
        )
        .with_context(|| format!("Failed to update document {}", id))?;

        Ok(document)
    }

    /// Delete a document
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let deleted = conn
            .execute("DELETE FROM documents WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete document {}", id))?;
        if deleted == 0 {
            anyhow::bail!("Document {} not found", id);
        }
        Ok(())
    }
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    let date_str: String = row.get(8)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Document {
        id: Some(row.get(0)?),
        uuid: row.get(1)?,
        title: row.get(2)?,
        doc_type: row.get(3)?,
        impact: Impact::from_str(&row.get::<_, String>(4)?).unwrap_or(Impact::Medium),
        category: row.get(5)?,
        source: row.get(6)?,
        status: Status::from_str(&row.get::<_, String>(7)?).unwrap_or(Status::Empty),
        date,
        created_ts: row.get(9)?,
        modified_ts: row.get(10)?,
    })
}

fn collect_rows<I>(rows: I) -> Result<Vec<Document>>
where
    I: Iterator<Item = rusqlite::Result<Document>>,
{
    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn seed(conn: &Connection, title: &str, date: NaiveDate) -> Document {
        DocumentRepo::create(conn, Document::new(title.to_string(), date)).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let doc = seed(&conn, "MaSI FAQ", day(2));
        let id = doc.id.unwrap();

        let loaded = DocumentRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(loaded.title, "MaSI FAQ");
        assert_eq!(loaded.status, Status::Open);
        assert_eq!(loaded.date, day(2));
        assert!(DocumentRepo::get_by_id(&conn, id + 100).unwrap().is_none());
    }

    #[test]
    fn test_list_by_date_and_between() {
        let conn = DbConnection::connect_in_memory().unwrap();
        seed(&conn, "a", day(1));
        seed(&conn, "b", day(2));
        seed(&conn, "c", day(2));
        seed(&conn, "d", day(9));

        assert_eq!(DocumentRepo::list_by_date(&conn, day(2)).unwrap().len(), 2);
        assert_eq!(DocumentRepo::list_between(&conn, day(1), day(2)).unwrap().len(), 3);
        assert_eq!(DocumentRepo::list_between(&conn, day(3), day(8)).unwrap().len(), 0);
        assert_eq!(DocumentRepo::list_all(&conn).unwrap().len(), 4);
    }

    #[test]
    fn test_set_status_accepts_assignable() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let id = seed(&conn, "doc", day(1)).id.unwrap();

        let accepted = DocumentRepo::set_status(&conn, id, "waiting").unwrap();
        assert_eq!(accepted, Status::Waiting);
        let loaded = DocumentRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(loaded.status, Status::Waiting);
    }

    #[test]
    fn test_set_status_rejects_unknown_and_empty() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let id = seed(&conn, "doc", day(1)).id.unwrap();

        for bad in ["closed", "", "OPEN"] {
            let err = DocumentRepo::set_status(&conn, id, bad).unwrap_err();
            assert_eq!(
                err.downcast_ref::<StatusUpdateError>(),
                Some(&StatusUpdateError::InvalidStatus(bad.to_string()))
            );
        }
        let loaded = DocumentRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(loaded.status, Status::Open);
    }

    #[test]
    fn test_set_status_missing_document() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let err = DocumentRepo::set_status(&conn, 42, "finished").unwrap_err();
        assert_eq!(
            err.downcast_ref::<StatusUpdateError>(),
            Some(&StatusUpdateError::NotFound(42))
        );
    }

    #[test]
    fn test_update_properties_partial() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let id = seed(&conn, "doc", day(1)).id.unwrap();

        let updated = DocumentRepo::update_properties(&conn, id, Some(Impact::High), None, Some("Securities")).unwrap();
        assert_eq!(updated.impact, Impact::High);
        assert_eq!(updated.doc_type, "Regulation");
        assert_eq!(updated.category, "Securities");

        let loaded = DocumentRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(loaded.impact, Impact::High);
        assert_eq!(loaded.category, "Securities");
    }

    #[test]
    fn test_delete() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let id = seed(&conn, "doc", day(1)).id.unwrap();
        DocumentRepo::delete(&conn, id).unwrap();
        assert!(DocumentRepo::get_by_id(&conn, id).unwrap().is_none());
        assert!(DocumentRepo::delete(&conn, id).is_err());
    }
}
