//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable CRUD and filtered reads over the `employee` table.
//! - Own the row mapping, including the legacy `phNumber` column to
//!   `phone_number` field remapping.
//!
//! # Invariants
//! - Every read returns rows in ascending `id` order.
//! - Partial updates write only the supplied fields.
//! - Each operation is a single autocommit statement; there are no
//!   cross-call transactions and no retries.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId, UpdateRequest};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    department,
    phNumber
FROM employee";

const REQUIRED_COLUMNS: [&str; 5] = ["id", "first_name", "last_name", "department", "phNumber"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-layer error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` on table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage-engine interface for employee rows.
pub trait EmployeeRepository {
    /// Appends a new row and returns its engine-assigned id.
    fn insert(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
        phone_number: &str,
    ) -> RepoResult<EmployeeId>;
    /// Single-row lookup; `None` is a normal outcome.
    fn get_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// All rows, ascending by id.
    fn list_all(&self) -> RepoResult<Vec<Employee>>;
    /// Rows with an exact department match, ascending by id.
    fn list_by_department(&self, department: &str) -> RepoResult<Vec<Employee>>;
    /// Case-insensitive substring match against first or last name.
    fn search_by_name(&self, term: &str) -> RepoResult<Vec<Employee>>;
    /// Applies only the present fields; returns whether a row was matched
    /// (false when the id is absent or no fields were supplied).
    fn update(&self, id: EmployeeId, request: &UpdateRequest) -> RepoResult<bool>;
    /// Returns whether a row was removed.
    fn delete(&self, id: EmployeeId) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<i64>;
    /// Distinct department names, sorted, NULL and blank excluded.
    fn distinct_departments(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed employee repository over a migrated connection.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository after verifying the connection carries the
    /// expected schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
        phone_number: &str,
    ) -> RepoResult<EmployeeId> {
        self.conn.execute(
            "INSERT INTO employee (first_name, last_name, department, phNumber)
             VALUES (?1, ?2, ?3, ?4);",
            params![first_name, last_name, department, phone_number],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<Employee>> {
        self.query_employees(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id;"), Vec::new())
    }

    fn list_by_department(&self, department: &str) -> RepoResult<Vec<Employee>> {
        self.query_employees(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE department = ? ORDER BY id;"),
            vec![Value::Text(department.to_string())],
        )
    }

    fn search_by_name(&self, term: &str) -> RepoResult<Vec<Employee>> {
        // SQLite LIKE is case-insensitive for ASCII, which is the contract
        // for name search.
        let pattern = format!("%{term}%");
        self.query_employees(
            &format!(
                "{EMPLOYEE_SELECT_SQL} WHERE first_name LIKE ?1 OR last_name LIKE ?1 ORDER BY id;"
            ),
            vec![Value::Text(pattern)],
        )
    }

    fn update(&self, id: EmployeeId, request: &UpdateRequest) -> RepoResult<bool> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(first_name) = request.first_name.as_ref() {
            assignments.push("first_name = ?");
            bind_values.push(Value::Text(first_name.clone()));
        }
        if let Some(last_name) = request.last_name.as_ref() {
            assignments.push("last_name = ?");
            bind_values.push(Value::Text(last_name.clone()));
        }
        if let Some(department) = request.department.as_ref() {
            assignments.push("department = ?");
            bind_values.push(Value::Text(department.clone()));
        }
        if let Some(phone_number) = request.phone_number.as_ref() {
            assignments.push("phNumber = ?");
            bind_values.push(Value::Text(phone_number.clone()));
        }

        if assignments.is_empty() {
            return Ok(false);
        }

        let sql = format!(
            "UPDATE employee SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed > 0)
    }

    fn delete(&self, id: EmployeeId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM employee WHERE id = ?1;", params![id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> RepoResult<i64> {
        let total = self
            .conn
            .query_row("SELECT COUNT(*) FROM employee;", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(total)
    }

    fn distinct_departments(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT department
             FROM employee
             WHERE department IS NOT NULL AND TRIM(department) <> ''
             ORDER BY department;",
        )?;

        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(row.get::<_, String>(0)?);
        }

        Ok(departments)
    }
}

impl SqliteEmployeeRepository<'_> {
    fn query_employees(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;

        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }
}

/// Maps one stored row to the domain record.
///
/// Lossless in both directions: the stored `phNumber` column feeds the
/// `phone_number` field, and NULL text columns surface as the empty-string
/// sentinel.
fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    let first_name: Option<String> = row.get("first_name")?;
    let last_name: Option<String> = row.get("last_name")?;
    let department: Option<String> = row.get("department")?;
    let phone_number: Option<String> = row.get("phNumber")?;

    Ok(Employee::with_id(
        id,
        first_name.unwrap_or_default(),
        last_name.unwrap_or_default(),
        department.unwrap_or_default(),
        phone_number.unwrap_or_default(),
    ))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "employee")? {
        return Err(RepoError::MissingRequiredTable("employee"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "employee", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "employee",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
