use rusqlite::Connection;
use staffbook_core::db::migrations::latest_version;
use staffbook_core::db::open_db_in_memory;
use staffbook_core::{
    Employee, EmployeeRepository, RepoError, SqliteEmployeeRepository, UpdateRequest,
};

#[test]
fn insert_and_get_roundtrip_maps_phone_column() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .insert("Ada", "Lovelace", "Engineering", "555-0199")
        .unwrap();
    assert!(id > 0);

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(
        loaded,
        Employee::with_id(id, "Ada", "Lovelace", "Engineering", "555-0199")
    );

    // The domain field reads back from the legacy column spelling.
    let stored_phone: String = conn
        .query_row(
            "SELECT phNumber FROM employee WHERE id = ?1;",
            [id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored_phone, loaded.phone_number);
}

#[test]
fn get_missing_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    assert!(repo.get_by_id(404).unwrap().is_none());
}

#[test]
fn list_all_returns_rows_in_ascending_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let first = repo.insert("John", "Doe", "Engineering", "555-0101").unwrap();
    let second = repo.insert("Jane", "Smith", "Marketing", "555-0102").unwrap();
    let third = repo.insert("Mike", "Johnson", "HR", "555-0103").unwrap();

    let ids: Vec<_> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|employee| employee.id)
        .collect();
    assert_eq!(ids, vec![Some(first), Some(second), Some(third)]);
}

#[test]
fn list_by_department_matches_exactly() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    repo.insert("John", "Doe", "Engineering", "555-0101").unwrap();
    repo.insert("Jane", "Smith", "engineering", "555-0102").unwrap();
    repo.insert("Mike", "Johnson", "Engineering", "555-0103").unwrap();

    let members = repo.list_by_department("Engineering").unwrap();
    assert_eq!(members.len(), 2);
    assert!(members
        .iter()
        .all(|employee| employee.department == "Engineering"));
}

#[test]
fn search_by_name_is_case_insensitive_substring_on_either_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    repo.insert("John", "Doe", "Engineering", "555-0101").unwrap();
    repo.insert("Anna", "Lee", "Marketing", "555-0102").unwrap();
    repo.insert("Bob", "Anderson", "Finance", "555-0103").unwrap();

    let matches = repo.search_by_name("AN").unwrap();
    let names: Vec<_> = matches
        .iter()
        .map(|employee| employee.full_name())
        .collect();
    assert_eq!(names, vec!["Anna Lee", "Bob Anderson"]);

    assert!(repo.search_by_name("zzz").unwrap().is_empty());
}

#[test]
fn update_writes_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .insert("John", "Doe", "Engineering", "555-0101")
        .unwrap();

    let request = UpdateRequest::new(None, None, Some("Finance"), None);
    assert!(repo.update(id, &request).unwrap());

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.first_name, "John");
    assert_eq!(loaded.last_name, "Doe");
    assert_eq!(loaded.department, "Finance");
    assert_eq!(loaded.phone_number, "555-0101");
}

#[test]
fn update_without_fields_or_without_row_returns_false() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .insert("John", "Doe", "Engineering", "555-0101")
        .unwrap();

    assert!(!repo.update(id, &UpdateRequest::default()).unwrap());

    let request = UpdateRequest::new(Some("Johnny"), None, None, None);
    assert!(!repo.update(id + 100, &request).unwrap());
}

#[test]
fn delete_removes_row_and_reports_result() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .insert("John", "Doe", "Engineering", "555-0101")
        .unwrap();
    assert_eq!(repo.count().unwrap(), 1);

    assert!(repo.delete(id).unwrap());
    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.get_by_id(id).unwrap().is_none());

    assert!(!repo.delete(id).unwrap());
}

#[test]
fn distinct_departments_are_sorted_and_exclude_null_and_blank() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    repo.insert("John", "Doe", "HR", "555-0101").unwrap();
    repo.insert("Jane", "Smith", "Engineering", "555-0102").unwrap();
    repo.insert("Mike", "Johnson", "Engineering", "555-0103").unwrap();
    repo.insert("Sara", "Miles", "  ", "555-0104").unwrap();
    conn.execute(
        "INSERT INTO employee (first_name, last_name, department, phNumber)
         VALUES ('Null', 'Dept', NULL, '555-0105');",
        [],
    )
    .unwrap();

    assert_eq!(
        repo.distinct_departments().unwrap(),
        vec!["Engineering".to_string(), "HR".to_string()]
    );
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteEmployeeRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_employee_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("employee"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE employee (
            id INTEGER PRIMARY KEY NOT NULL,
            first_name TEXT,
            last_name TEXT,
            department TEXT
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "employee",
            column: "phNumber"
        })
    ));
}
