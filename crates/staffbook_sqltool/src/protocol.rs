//! Request/response protocol for the raw-SQL tool.
//!
//! # Invariants
//! - The `query` operation accepts SELECT statements only; everything else
//!   must go through `execute`.
//! - Every request maps to exactly one response; failures carry
//!   `ok = false` and an error string.

use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// SELECT-only read access.
    Query { sql: String },
    /// Any single SQL statement; reports affected rows.
    Execute { sql: String },
    /// Lists table names.
    Tables,
    /// Lists table names with their CREATE statements.
    Schema,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Rows {
        ok: bool,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Affected {
        ok: bool,
        rows_affected: usize,
    },
    Tables {
        ok: bool,
        tables: Vec<String>,
    },
    Schema {
        ok: bool,
        tables: Vec<TableSchema>,
    },
    Error {
        ok: bool,
        error: String,
    },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub sql: Option<String>,
}

impl Response {
    fn error(message: impl Into<String>) -> Self {
        Self::Error {
            ok: false,
            error: message.into(),
        }
    }
}

/// Parses one request line and produces its response.
pub fn handle_line(conn: &Connection, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle_request(conn, &request),
        Err(err) => Response::error(format!("invalid request: {err}")),
    }
}

pub fn handle_request(conn: &Connection, request: &Request) -> Response {
    match request {
        Request::Query { sql } => {
            if !is_select(sql) {
                return Response::error(
                    "only SELECT statements are accepted by `query`; use `execute` for other operations",
                );
            }
            debug!("event=sqltool_query module=sqltool");
            run_select(conn, sql).unwrap_or_else(sql_error)
        }
        Request::Execute { sql } => {
            debug!("event=sqltool_execute module=sqltool");
            // A SELECT routed through execute still answers with rows.
            if is_select(sql) {
                return run_select(conn, sql).unwrap_or_else(sql_error);
            }
            match conn.execute(sql, []) {
                Ok(rows_affected) => Response::Affected {
                    ok: true,
                    rows_affected,
                },
                Err(err) => sql_error(err),
            }
        }
        Request::Tables => list_tables(conn).unwrap_or_else(sql_error),
        Request::Schema => describe_schema(conn).unwrap_or_else(sql_error),
    }
}

/// Returns whether the statement starts with the SELECT keyword, ignoring
/// leading whitespace and case.
pub fn is_select(sql: &str) -> bool {
    let head: String = sql
        .trim_start()
        .chars()
        .take("select".len())
        .collect::<String>()
        .to_ascii_lowercase();
    head == "select"
}

fn run_select(conn: &Connection, sql: &str) -> rusqlite::Result<Response> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            values.push(json_value(row.get_ref(index)?));
        }
        out.push(values);
    }

    Ok(Response::Rows {
        ok: true,
        columns,
        rows: out,
    })
}

fn list_tables(conn: &Connection) -> rusqlite::Result<Response> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name;",
    )?;
    let mut rows = stmt.query([])?;

    let mut tables = Vec::new();
    while let Some(row) = rows.next()? {
        tables.push(row.get::<_, String>(0)?);
    }

    Ok(Response::Tables { ok: true, tables })
}

fn describe_schema(conn: &Connection) -> rusqlite::Result<Response> {
    let mut stmt = conn.prepare(
        "SELECT name, sql FROM sqlite_master WHERE type = 'table' ORDER BY name;",
    )?;
    let mut rows = stmt.query([])?;

    let mut tables = Vec::new();
    while let Some(row) = rows.next()? {
        tables.push(TableSchema {
            name: row.get(0)?,
            sql: row.get(1)?,
        });
    }

    Ok(Response::Schema { ok: true, tables })
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(number) => Value::from(number),
        ValueRef::Real(number) => Value::from(number),
        ValueRef::Text(text) => Value::from(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Value::from(format!("<blob {} bytes>", blob.len())),
    }
}

fn sql_error(err: rusqlite::Error) -> Response {
    Response::error(format!("SQLite error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{handle_line, is_select, Response};
    use rusqlite::Connection;
    use serde_json::json;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE employee (
                id INTEGER PRIMARY KEY NOT NULL,
                first_name TEXT,
                last_name TEXT,
                department TEXT,
                phNumber TEXT
            );
            INSERT INTO employee (first_name, last_name, department, phNumber)
            VALUES ('John', 'Doe', 'Engineering', '555-0101');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn is_select_ignores_case_and_leading_whitespace() {
        assert!(is_select("SELECT 1"));
        assert!(is_select("  select * from employee"));
        assert!(is_select("\n\tSeLeCt 1"));
        assert!(!is_select("INSERT INTO employee DEFAULT VALUES"));
        assert!(!is_select("sel"));
    }

    #[test]
    fn query_returns_columns_and_rows() {
        let conn = test_conn();

        let response = handle_line(
            &conn,
            r#"{"op":"query","sql":"SELECT first_name, phNumber FROM employee"}"#,
        );
        match response {
            Response::Rows { ok, columns, rows } => {
                assert!(ok);
                assert_eq!(columns, vec!["first_name", "phNumber"]);
                assert_eq!(rows, vec![vec![json!("John"), json!("555-0101")]]);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn query_rejects_mutating_statements() {
        let conn = test_conn();

        let response = handle_line(
            &conn,
            r#"{"op":"query","sql":"DELETE FROM employee"}"#,
        );
        match response {
            Response::Error { ok, error } => {
                assert!(!ok);
                assert!(error.contains("SELECT"));
            }
            other => panic!("expected error, got {other:?}"),
        }

        // The rejected statement must not have run.
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM employee;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn execute_reports_affected_rows() {
        let conn = test_conn();

        let response = handle_line(
            &conn,
            r#"{"op":"execute","sql":"UPDATE employee SET department = 'Finance'"}"#,
        );
        assert_eq!(
            response,
            Response::Affected {
                ok: true,
                rows_affected: 1
            }
        );
    }

    #[test]
    fn execute_passes_select_through_to_rows() {
        let conn = test_conn();

        let response = handle_line(
            &conn,
            r#"{"op":"execute","sql":"SELECT COUNT(*) FROM employee"}"#,
        );
        match response {
            Response::Rows { ok, rows, .. } => {
                assert!(ok);
                assert_eq!(rows, vec![vec![json!(1)]]);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn tables_and_schema_list_the_employee_table() {
        let conn = test_conn();

        match handle_line(&conn, r#"{"op":"tables"}"#) {
            Response::Tables { ok, tables } => {
                assert!(ok);
                assert!(tables.contains(&"employee".to_string()));
            }
            other => panic!("expected tables, got {other:?}"),
        }

        match handle_line(&conn, r#"{"op":"schema"}"#) {
            Response::Schema { ok, tables } => {
                assert!(ok);
                let employee = tables
                    .iter()
                    .find(|table| table.name == "employee")
                    .expect("employee table should be listed");
                assert!(employee.sql.as_deref().unwrap().contains("phNumber"));
            }
            other => panic!("expected schema, got {other:?}"),
        }
    }

    #[test]
    fn malformed_and_unknown_requests_answer_with_errors() {
        let conn = test_conn();

        assert!(matches!(
            handle_line(&conn, "not json"),
            Response::Error { ok: false, .. }
        ));
        assert!(matches!(
            handle_line(&conn, r#"{"op":"drop_everything"}"#),
            Response::Error { ok: false, .. }
        ));
        assert!(matches!(
            handle_line(&conn, r#"{"op":"query","sql":"SELECT FROM nowhere"}"#),
            Response::Error { ok: false, .. }
        ));
    }
}
