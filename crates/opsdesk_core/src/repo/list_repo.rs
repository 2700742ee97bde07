//! Custom list repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide custom list CRUD on top of `custom_lists` storage.
//! - Own member and label replacement logic with atomic semantics.
//! - Expose the contact snapshot used for membership resolution.
//!
//! # Invariants
//! - `set_list_members` / `set_list_tags` replace the whole set in a single
//!   transaction.
//! - Stored membership is never reconciled against `contacts`; stale ids
//!   stay in `list_members` until explicitly replaced.
//! - List labels are free-form strings, kept apart from contact tags.

use crate::model::contact::{Contact, ContactId};
use crate::model::list::{CustomList, ListId, ListValidationError};
use crate::repo::contact_repo::contact_snapshot;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

/// Repository interface for custom list operations.
pub trait ListRepository {
    /// Creates one list, including its stored membership and labels.
    fn create_list(&mut self, list: &CustomList) -> RepoResult<ListId>;
    /// Replaces name and description of one list.
    fn update_list_info(&self, id: ListId, name: &str, description: &str) -> RepoResult<()>;
    /// Gets one list by id.
    fn get_list(&self, id: ListId) -> RepoResult<Option<CustomList>>;
    /// Lists all custom lists, most recently updated first.
    fn list_lists(&self) -> RepoResult<Vec<CustomList>>;
    /// Hard-deletes one list with its membership and labels.
    fn delete_list(&self, id: ListId) -> RepoResult<()>;
    /// Replaces the stored membership of one list in one transaction.
    fn set_list_members(&mut self, id: ListId, contact_ids: &[ContactId]) -> RepoResult<()>;
    /// Replaces the free-form labels of one list in one transaction.
    fn set_list_tags(&mut self, id: ListId, tags: &[String]) -> RepoResult<()>;
    /// Loads the full current contact collection for membership resolution.
    fn contact_snapshot(&self) -> RepoResult<Vec<Contact>>;
}

/// SQLite-backed custom list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&mut self, list: &CustomList) -> RepoResult<ListId> {
        list.validate()?;

        let list_id_text = list.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO custom_lists (id, name, description) VALUES (?1, ?2, ?3);",
            params![
                list_id_text.as_str(),
                list.name.as_str(),
                list.description.as_str(),
            ],
        )?;
        insert_members_in_tx(&tx, list_id_text.as_str(), &list.contact_ids)?;
        insert_tags_in_tx(&tx, list_id_text.as_str(), &list.tags)?;

        tx.commit()?;
        Ok(list.id)
    }

    fn update_list_info(&self, id: ListId, name: &str, description: &str) -> RepoResult<()> {
        if name.trim().is_empty() {
            return Err(RepoError::ListValidation(ListValidationError::BlankName));
        }

        let changed = self.conn.execute(
            "UPDATE custom_lists
             SET
                name = ?1,
                description = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![name, description, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_list(&self, id: ListId) -> RepoResult<Option<CustomList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM custom_lists WHERE id = ?1;")?;

        let mut rows = stmt.query([id.to_string()])?;
        let base = match rows.next()? {
            Some(row) => {
                let id_text: String = row.get("id")?;
                (
                    parse_uuid(&id_text, "custom_lists.id")?,
                    row.get::<_, String>("name")?,
                    row.get::<_, String>("description")?,
                )
            }
            None => return Ok(None),
        };

        Ok(Some(assemble_list(self.conn, base)?))
    }

    fn list_lists(&self) -> RepoResult<Vec<CustomList>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description
             FROM custom_lists
             ORDER BY updated_at DESC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;

        let mut bases = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            bases.push((
                parse_uuid(&id_text, "custom_lists.id")?,
                row.get::<_, String>("name")?,
                row.get::<_, String>("description")?,
            ));
        }

        let mut lists = Vec::new();
        for base in bases {
            lists.push(assemble_list(self.conn, base)?);
        }
        Ok(lists)
    }

    fn delete_list(&self, id: ListId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM custom_lists WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_list_members(&mut self, id: ListId, contact_ids: &[ContactId]) -> RepoResult<()> {
        let list_id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !list_exists_in_tx(&tx, list_id_text.as_str())? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM list_members WHERE list_id = ?1;",
            [list_id_text.as_str()],
        )?;
        insert_members_in_tx(&tx, list_id_text.as_str(), contact_ids)?;
        touch_list_in_tx(&tx, list_id_text.as_str())?;

        tx.commit()?;
        Ok(())
    }

    fn set_list_tags(&mut self, id: ListId, tags: &[String]) -> RepoResult<()> {
        let list_id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !list_exists_in_tx(&tx, list_id_text.as_str())? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM list_tags WHERE list_id = ?1;",
            [list_id_text.as_str()],
        )?;
        insert_tags_in_tx(&tx, list_id_text.as_str(), tags)?;
        touch_list_in_tx(&tx, list_id_text.as_str())?;

        tx.commit()?;
        Ok(())
    }

    fn contact_snapshot(&self) -> RepoResult<Vec<Contact>> {
        contact_snapshot(self.conn)
    }
}

fn assemble_list(
    conn: &Connection,
    (id, name, description): (ListId, String, String),
) -> RepoResult<CustomList> {
    let list = CustomList {
        id,
        name,
        description,
        contact_ids: load_members(conn, &id.to_string())?,
        tags: load_list_tags(conn, &id.to_string())?,
    };
    list.validate()?;
    Ok(list)
}

fn load_members(conn: &Connection, list_id: &str) -> RepoResult<Vec<ContactId>> {
    let mut stmt = conn.prepare(
        "SELECT contact_id
         FROM list_members
         WHERE list_id = ?1
         ORDER BY contact_id ASC;",
    )?;
    let mut rows = stmt.query([list_id])?;
    let mut members = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        members.push(parse_uuid(&value, "list_members.contact_id")?);
    }
    Ok(members)
}

fn load_list_tags(conn: &Connection, list_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM list_tags
         WHERE list_id = ?1
         ORDER BY tag ASC;",
    )?;
    let mut rows = stmt.query([list_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn insert_members_in_tx(
    tx: &Transaction<'_>,
    list_id: &str,
    contact_ids: &[ContactId],
) -> RepoResult<()> {
    // Stored membership is a set; duplicates collapse before insert.
    let unique: BTreeSet<String> = contact_ids.iter().map(|id| id.to_string()).collect();
    for contact_id in unique {
        tx.execute(
            "INSERT OR IGNORE INTO list_members (list_id, contact_id) VALUES (?1, ?2);",
            params![list_id, contact_id.as_str()],
        )?;
    }
    Ok(())
}

fn insert_tags_in_tx(tx: &Transaction<'_>, list_id: &str, tags: &[String]) -> RepoResult<()> {
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        tx.execute(
            "INSERT OR IGNORE INTO list_tags (list_id, tag) VALUES (?1, ?2);",
            params![list_id, trimmed],
        )?;
    }
    Ok(())
}

fn touch_list_in_tx(tx: &Transaction<'_>, list_id: &str) -> RepoResult<()> {
    tx.execute(
        "UPDATE custom_lists
         SET updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?1;",
        [list_id],
    )?;
    Ok(())
}

fn list_exists_in_tx(tx: &Transaction<'_>, list_id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM custom_lists WHERE id = ?1);",
        [list_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
