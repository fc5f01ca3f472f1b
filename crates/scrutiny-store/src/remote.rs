//! libSQL relational adapter.
//!
//! Maps the store contract onto three tables: `audits` (one row per audit,
//! denormalized `status`, explicit `is_archived`), `contacts`, and
//! `status_log` (ordered by `seq`). Field names are snake_case on the wire
//! and map 1:1 onto the entity structs; no semantic transformation happens
//! here.
//!
//! Writes carry an optimistic version check: `UPDATE ... WHERE id = ? AND
//! version = ?`. A stale write surfaces as `StoreError::VersionConflict`
//! instead of silently winning. Log appends run as read-count, append,
//! write-back inside one transaction so ordering survives concurrent
//! sessions.

use std::collections::HashSet;

use libsql::Builder;

use scrutiny_core::entities::{Audit, Contact, StatusChange};

use crate::AuditStore;
use crate::error::StoreError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, parse_optional_enum,
};

const AUDIT_COLS: &str = "id, name, description, client_name, received_at, planned_meeting_at, \
                          scheduled_at, status, owner_id, owner_name, is_archived, version";
const CONTACT_COLS: &str = "id, audit_id, first_name, last_name, role, email, phone, gender";
const LOG_COLS: &str =
    "id, audit_id, seq, changed_at, old_status, new_status, old_date, new_date, reason, changed_by";

/// Relational backend handle.
pub struct RemoteStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore").finish_non_exhaustive()
    }
}

impl RemoteStore {
    /// Open a local-only database at the given path (`":memory:"` in
    /// tests). Runs migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        Self::finish_open(db)?.initialize().await
    }

    /// Connect to the configured remote database. Runs migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the connection or migrations fail.
    pub async fn connect(url: &str, auth_token: &str) -> Result<Self, StoreError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        Self::finish_open(db)?.initialize().await
    }

    fn finish_open(db: libsql::Database) -> Result<Self, StoreError> {
        let conn = db.connect()?;
        Ok(Self { db, conn })
    }

    /// Complete connection setup: per-connection pragmas plus migrations.
    ///
    /// Separate from construction because both open paths share it and it
    /// is async while `finish_open` is not.
    async fn initialize(self) -> Result<Self, StoreError> {
        // Foreign keys are per-connection in SQLite.
        self.conn
            .execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        self.run_migrations().await?;
        Ok(self)
    }

    pub(crate) const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Load one full audit (row + contacts + ordered log).
    async fn fetch(&self, id: &str) -> Result<Audit, StoreError> {
        let mut rows = self
            .conn
            .query(&format!("SELECT {AUDIT_COLS} FROM audits WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        let mut audit = row_to_audit(&row)?;
        audit.contacts = self.load_contacts(id).await?;
        audit.status_log = self.load_log(id).await?;
        Ok(audit)
    }

    async fn load_contacts(&self, audit_id: &str) -> Result<Vec<Contact>, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {CONTACT_COLS} FROM contacts WHERE audit_id = ?1 ORDER BY rowid"),
                [audit_id],
            )
            .await?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next().await? {
            contacts.push(row_to_contact(&row)?);
        }
        Ok(contacts)
    }

    async fn load_log(&self, audit_id: &str) -> Result<Vec<StatusChange>, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {LOG_COLS} FROM status_log WHERE audit_id = ?1 ORDER BY seq"),
                [audit_id],
            )
            .await?;
        let mut log = Vec::new();
        while let Some(row) = rows.next().await? {
            log.push(row_to_log_entry(&row)?);
        }
        Ok(log)
    }
}

impl AuditStore for RemoteStore {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Audit>, StoreError> {
        let mut rows = match owner {
            Some(owner) => {
                self.conn
                    .query(
                        &format!(
                            "SELECT {AUDIT_COLS} FROM audits WHERE owner_id = ?1 ORDER BY received_at"
                        ),
                        [owner],
                    )
                    .await?
            }
            None => {
                self.conn
                    .query(
                        &format!("SELECT {AUDIT_COLS} FROM audits ORDER BY received_at"),
                        (),
                    )
                    .await?
            }
        };

        let mut audits = Vec::new();
        while let Some(row) = rows.next().await? {
            audits.push(row_to_audit(&row)?);
        }
        for audit in &mut audits {
            audit.contacts = self.load_contacts(&audit.id).await?;
            audit.status_log = self.load_log(&audit.id).await?;
        }
        Ok(audits)
    }

    async fn create(&mut self, audit: &Audit) -> Result<(), StoreError> {
        let tx = self.conn.transaction().await?;

        tx.execute(
            &format!(
                "INSERT INTO audits ({AUDIT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            libsql::params![
                audit.id.as_str(),
                audit.name.as_str(),
                audit.description.as_str(),
                audit.client_name.as_str(),
                audit.received_at.to_rfc3339(),
                audit.planned_meeting_at.map(|d| d.to_rfc3339()),
                audit.scheduled_at.map(|d| d.to_rfc3339()),
                audit.status.as_str(),
                audit.owner_id.as_str(),
                audit.owner_name.as_str(),
                i64::from(audit.is_archived),
                0i64
            ],
        )
        .await?;

        for contact in &audit.contacts {
            insert_contact(&tx, &audit.id, contact).await?;
        }
        for (seq, entry) in audit.status_log.iter().enumerate() {
            insert_log_entry(&tx, &audit.id, seq as i64, entry).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update(&mut self, audit: &Audit) -> Result<Audit, StoreError> {
        let tx = self.conn.transaction().await?;

        let affected = tx
            .execute(
                "UPDATE audits SET name = ?1, description = ?2, client_name = ?3,
                        planned_meeting_at = ?4, scheduled_at = ?5, status = ?6,
                        owner_name = ?7, is_archived = ?8, version = version + 1
                  WHERE id = ?9 AND version = ?10",
                libsql::params![
                    audit.name.as_str(),
                    audit.description.as_str(),
                    audit.client_name.as_str(),
                    audit.planned_meeting_at.map(|d| d.to_rfc3339()),
                    audit.scheduled_at.map(|d| d.to_rfc3339()),
                    audit.status.as_str(),
                    audit.owner_name.as_str(),
                    i64::from(audit.is_archived),
                    audit.id.as_str(),
                    audit.version
                ],
            )
            .await?;

        if affected == 0 {
            let mut rows = tx
                .query("SELECT version FROM audits WHERE id = ?1", [audit.id.as_str()])
                .await?;
            return match rows.next().await? {
                None => Err(StoreError::NoResult),
                Some(_) => Err(StoreError::VersionConflict {
                    id: audit.id.clone(),
                    version: audit.version,
                }),
            };
        }

        // Contacts are a set: replace wholesale.
        tx.execute("DELETE FROM contacts WHERE audit_id = ?1", [audit.id.as_str()])
            .await?;
        for contact in &audit.contacts {
            insert_contact(&tx, &audit.id, contact).await?;
        }

        // The log is append-only: insert entries the table does not know
        // yet, continuing the seq sequence. Existing rows are never touched.
        let mut known = HashSet::new();
        let mut rows = tx
            .query(
                "SELECT id FROM status_log WHERE audit_id = ?1",
                [audit.id.as_str()],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            known.insert(row.get::<String>(0)?);
        }
        let mut seq = known.len() as i64;
        for entry in &audit.status_log {
            if !known.contains(&entry.id) {
                insert_log_entry(&tx, &audit.id, seq, entry).await?;
                seq += 1;
            }
        }

        tx.commit().await?;
        self.fetch(&audit.id).await
    }

    async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM audits WHERE id = ?1", [id])
            .await?;
        Ok(affected > 0)
    }

    async fn update_status(
        &mut self,
        id: &str,
        entry: &StatusChange,
    ) -> Result<Audit, StoreError> {
        let new_status = entry
            .new_status
            .ok_or_else(|| StoreError::Query("status entry carries no new status".into()))?;

        let tx = self.conn.transaction().await?;

        let mut rows = tx
            .query("SELECT version FROM audits WHERE id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        let version = row.get::<i64>(0)?;

        let mut rows = tx
            .query(
                "SELECT COUNT(*) FROM status_log WHERE audit_id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        let seq = row.get::<i64>(0)?;

        insert_log_entry(&tx, id, seq, entry).await?;

        let affected = tx
            .execute(
                "UPDATE audits SET status = ?1, is_archived = ?2, version = version + 1
                  WHERE id = ?3 AND version = ?4",
                libsql::params![
                    new_status.as_str(),
                    i64::from(new_status.is_archived()),
                    id,
                    version
                ],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::VersionConflict {
                id: id.to_string(),
                version,
            });
        }

        tx.commit().await?;
        self.fetch(id).await
    }
}

async fn insert_contact(
    tx: &libsql::Transaction,
    audit_id: &str,
    contact: &Contact,
) -> Result<(), StoreError> {
    tx.execute(
        &format!(
            "INSERT INTO contacts ({CONTACT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        ),
        libsql::params![
            contact.id.as_str(),
            audit_id,
            contact.first_name.as_str(),
            contact.last_name.as_str(),
            contact.role.as_str(),
            contact.email.as_str(),
            contact.phone.as_str(),
            contact.gender.as_str()
        ],
    )
    .await?;
    Ok(())
}

async fn insert_log_entry(
    tx: &libsql::Transaction,
    audit_id: &str,
    seq: i64,
    entry: &StatusChange,
) -> Result<(), StoreError> {
    tx.execute(
        &format!(
            "INSERT INTO status_log ({LOG_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        libsql::params![
            entry.id.as_str(),
            audit_id,
            seq,
            entry.changed_at.to_rfc3339(),
            entry.old_status.map(|s| s.as_str()),
            entry.new_status.map(|s| s.as_str()),
            entry.old_date.map(|d| d.to_rfc3339()),
            entry.new_date.map(|d| d.to_rfc3339()),
            entry.reason.as_str(),
            entry.changed_by.as_str()
        ],
    )
    .await?;
    Ok(())
}

fn row_to_audit(row: &libsql::Row) -> Result<Audit, StoreError> {
    Ok(Audit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get::<String>(2)?,
        client_name: row.get(3)?,
        received_at: parse_datetime(&row.get::<String>(4)?)?,
        planned_meeting_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        scheduled_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        status: parse_enum(&row.get::<String>(7)?)?,
        owner_id: row.get(8)?,
        owner_name: row.get(9)?,
        is_archived: row.get::<i64>(10)? != 0,
        version: row.get::<i64>(11)?,
        contacts: Vec::new(),
        status_log: Vec::new(),
    })
}

fn row_to_contact(row: &libsql::Row) -> Result<Contact, StoreError> {
    Ok(Contact {
        id: row.get(0)?,
        first_name: row.get::<String>(2)?,
        last_name: row.get::<String>(3)?,
        role: row.get::<String>(4)?,
        email: row.get::<String>(5)?,
        phone: row.get::<String>(6)?,
        gender: parse_enum(&row.get::<String>(7)?)?,
    })
}

fn row_to_log_entry(row: &libsql::Row) -> Result<StatusChange, StoreError> {
    Ok(StatusChange {
        id: row.get(0)?,
        changed_at: parse_datetime(&row.get::<String>(3)?)?,
        old_status: parse_optional_enum(get_opt_string(row, 4)?.as_deref())?,
        new_status: parse_optional_enum(get_opt_string(row, 5)?.as_deref())?,
        old_date: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        new_date: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        reason: row.get::<String>(8)?,
        changed_by: row.get::<String>(9)?,
    })
}
