//! Company repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide company CRUD APIs over canonical `companies` storage.
//! - Persist lifecycle status as the wire ordinal, decoded strictly on read.
//!
//! # Invariants
//! - Write paths call `Company::validate()` before SQL mutations.
//! - `update_status` persists only an already guard-validated status; the
//!   transition check itself lives in the service layer.
//! - Read paths reject unknown persisted status ordinals instead of
//!   defaulting them.

use crate::model::company::{Company, CompanyId, CompanyStatus};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const COMPANY_SELECT_SQL: &str = "SELECT id, name, status FROM companies";

/// Repository interface for company CRUD operations.
pub trait CompanyRepository {
    /// Creates one company and returns its stable id.
    fn create_company(&self, company: &Company) -> RepoResult<CompanyId>;
    /// Gets one company by id.
    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>>;
    /// Lists all companies ordered by name.
    fn list_companies(&self) -> RepoResult<Vec<Company>>;
    /// Persists a new lifecycle status for one company.
    fn update_status(&self, id: CompanyId, status: CompanyStatus) -> RepoResult<()>;
}

/// SQLite-backed company repository.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn create_company(&self, company: &Company) -> RepoResult<CompanyId> {
        company.validate()?;

        self.conn.execute(
            "INSERT INTO companies (id, name, status) VALUES (?1, ?2, ?3);",
            params![
                company.id.to_string(),
                company.name.as_str(),
                company.status.wire_code(),
            ],
        )?;

        Ok(company.id)
    }

    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPANY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_company_row(row)?));
        }

        Ok(None)
    }

    fn list_companies(&self) -> RepoResult<Vec<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPANY_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }

    fn update_status(&self, id: CompanyId, status: CompanyStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE companies
             SET
                status = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![status.wire_code(), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_company_row(row: &Row<'_>) -> RepoResult<Company> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "companies.id")?;

    let status_code: i64 = row.get("status")?;
    let status = CompanyStatus::from_wire(status_code).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status code `{status_code}` in companies.status"
        ))
    })?;

    let company = Company {
        id,
        name: row.get("name")?,
        status,
    };
    company.validate()?;
    Ok(company)
}
