//! Contact/tag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide contact CRUD APIs over canonical `contacts` storage.
//! - Own tag-link replacement logic (`set_contact_tags`) with atomic
//!   semantics.
//!
//! # Invariants
//! - Write paths call `Contact::validate()` before SQL mutations.
//! - `company_name` is denormalized on read from `companies`, never stored
//!   on the contact row.
//! - Tag names are normalized to lowercase before persistence.
//! - Contact deletion is a hard delete and deliberately does not touch
//!   `list_members`; stored list membership goes stale instead.

use crate::model::contact::{Contact, ContactId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT
    c.id,
    c.name,
    c.email,
    c.phone,
    c.company_id,
    co.name AS company_name
FROM contacts c
LEFT JOIN companies co ON co.id = c.company_id";

const CONTACTS_DEFAULT_LIMIT: u32 = 10;
const CONTACTS_LIMIT_MAX: u32 = 50;

/// Query options for contact list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactListQuery {
    /// Optional single-tag exact match filter.
    pub tag: Option<String>,
    /// Optional owning-company filter.
    pub company_id: Option<Uuid>,
    /// Maximum rows to return. Defaults to 10 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for contact CRUD and tag operations.
pub trait ContactRepository {
    /// Creates one contact and returns its stable id.
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    /// Replaces name/email/phone/company linkage of one contact.
    fn update_contact(&self, contact: &Contact) -> RepoResult<()>;
    /// Gets one contact by id.
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Lists contacts using tag/company filters + pagination.
    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>>;
    /// Replaces all tags for the given contact in one transaction.
    fn set_contact_tags(&mut self, id: ContactId, tags: &[String]) -> RepoResult<()>;
    /// Hard-deletes one contact. List membership rows are left behind.
    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()>;
    /// Returns all known tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (id, name, email, phone, company_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                contact.id.to_string(),
                contact.name.as_str(),
                contact.email.as_str(),
                contact.phone.as_deref(),
                contact.company_id.map(|id| id.to_string()),
            ],
        )?;

        Ok(contact.id)
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<()> {
        contact.validate()?;

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                name = ?1,
                email = ?2,
                phone = ?3,
                company_id = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                contact.name.as_str(),
                contact.email.as_str(),
                contact.phone.as_deref(),
                contact.company_id.map(|id| id.to_string()),
                contact.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(contact.id));
        }

        Ok(())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE c.id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(self.conn, row)?));
        }

        Ok(None)
    }

    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        let mut sql = format!("{CONTACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM contact_tags ct
                    INNER JOIN tags t ON t.id = ct.tag_id
                    WHERE ct.contact_id = c.id
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        if let Some(company_id) = query.company_id {
            sql.push_str(" AND c.company_id = ?");
            bind_values.push(Value::Text(company_id.to_string()));
        }

        sql.push_str(" ORDER BY c.updated_at DESC, c.id ASC");
        let limit = normalize_list_limit(query.limit);
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(self.conn, row)?);
        }

        Ok(contacts)
    }

    fn set_contact_tags(&mut self, id: ContactId, tags: &[String]) -> RepoResult<()> {
        let contact_id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !contact_exists_in_tx(&tx, contact_id_text.as_str())? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM contact_tags WHERE contact_id = ?1;",
            [contact_id_text.as_str()],
        )?;

        for tag in tags {
            tx.execute(
                "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
                [tag.as_str()],
            )?;
            tx.execute(
                "INSERT INTO contact_tags (contact_id, tag_id)
                 SELECT ?1, id
                 FROM tags
                 WHERE name = ?2 COLLATE NOCASE;",
                params![contact_id_text.as_str(), tag.as_str()],
            )?;
        }

        tx.execute(
            "UPDATE contacts
             SET updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [contact_id_text.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM tags ORDER BY name COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get("name")?;
            tags.push(value.to_lowercase());
        }
        Ok(tags)
    }
}

/// Normalizes list limit according to the list contract.
pub fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => CONTACTS_DEFAULT_LIMIT,
        Some(value) if value > CONTACTS_LIMIT_MAX => CONTACTS_LIMIT_MAX,
        Some(value) => value,
        None => CONTACTS_DEFAULT_LIMIT,
    }
}

/// Normalizes one tag value.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

/// Loads the full contact collection, used for list membership resolution.
pub(crate) fn contact_snapshot(conn: &Connection) -> RepoResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "{CONTACT_SELECT_SQL} ORDER BY c.updated_at DESC, c.id ASC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut contacts = Vec::new();
    while let Some(row) = rows.next()? {
        contacts.push(parse_contact_row(conn, row)?);
    }
    Ok(contacts)
}

fn parse_contact_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Contact> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "contacts.id")?;

    let company_id = match row.get::<_, Option<String>>("company_id")? {
        Some(value) => Some(parse_uuid(&value, "contacts.company_id")?),
        None => None,
    };

    let tags = load_tags_for_contact(conn, id_text.as_str())?;

    let contact = Contact {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        company_id,
        company_name: row.get("company_name")?,
        tags,
    };
    contact.validate()?;
    Ok(contact)
}

fn load_tags_for_contact(conn: &Connection, contact_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM contact_tags ct
         INNER JOIN tags t ON t.id = ct.tag_id
         WHERE ct.contact_id = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([contact_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

fn contact_exists_in_tx(tx: &Transaction<'_>, contact_id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM contacts WHERE id = ?1);",
        [contact_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
