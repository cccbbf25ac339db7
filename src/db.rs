use log::{debug, error, info, warn};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params};
use std::path::Path;

use crate::error::Result;

pub const NULL_TEXT: &str = "NULL";

/// One result row: column names in select order, each with its textual value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Like `get`, but a missing column reads as the empty string.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    #[allow(dead_code)]
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Store> {
        let conn = Connection::open(path)?;
        info!("connected to {}", path.to_string_lossy());
        Store::init(conn)
    }

    #[allow(dead_code)]
    pub fn open_in_memory() -> Result<Store> {
        Store::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Store> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        create_schema(&conn)?;
        let store = Store { conn };
        store.seed_if_empty()?;
        Ok(store)
    }

    /// Runs a free-form statement. Errors are logged and yield no rows.
    #[allow(dead_code)]
    pub fn query(&self, sql: &str) -> Vec<Row> {
        match self.query_with(sql, []) {
            Ok(rows) => rows,
            Err(e) => {
                error!("{e} ({sql})");
                Vec::new()
            }
        }
    }

    /// Runs a free-form mutating statement. Errors are logged.
    #[allow(dead_code)]
    pub fn execute(&self, sql: &str) -> bool {
        debug!("execute: {sql}");
        match self.conn.execute(sql, []) {
            Ok(_) => true,
            Err(e) => {
                error!("store operation failed: {e} ({sql})");
                false
            }
        }
    }

    pub fn query_with<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Row>> {
        debug!("query: {sql}");
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = stmt.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                cells.push((name.clone(), render_value(row.get_ref(i)?)));
            }
            out.push(Row { cells });
        }
        Ok(out)
    }

    /// Returns the number of rows affected.
    pub fn execute_with<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        debug!("execute: {sql}");
        Ok(self.conn.execute(sql, params)?)
    }

    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Doubles single quotes so `text` can sit inside a quoted SQL literal.
    #[allow(dead_code)]
    pub fn escape(text: &str) -> String {
        text.replace('\'', "''")
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    fn seed_if_empty(&self) -> Result<()> {
        let accounts: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))?;
        if accounts > 0 {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        match tx.execute_batch(SEED_SQL) {
            Ok(()) => {
                tx.commit()?;
                info!("demo data inserted");
            }
            Err(e) => {
                let _ = tx.rollback();
                warn!("demo data skipped: {e}");
            }
        }
        Ok(())
    }
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => NULL_TEXT.to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => render_real(f),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

// SQLite prints whole reals with a trailing ".0"; keep that so 17.0 stays "17.0".
fn render_real(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            login TEXT NOT NULL UNIQUE,
            secret TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('admin', 'instructor', 'student')),
            email TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            birthdate TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            credits INTEGER DEFAULT 3
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS grades(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL,
            course_id INTEGER NOT NULL,
            grade REAL NOT NULL CHECK(grade >= 0 AND grade <= 20),
            date_recorded TEXT DEFAULT (date('now')),
            FOREIGN KEY(student_id) REFERENCES students(id) ON DELETE CASCADE,
            FOREIGN KEY(course_id) REFERENCES courses(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_grades_student ON grades(student_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_grades_course ON grades(course_id)",
        [],
    )?;

    Ok(())
}

const SEED_SQL: &str = "
INSERT INTO accounts(id, login, secret, role, email) VALUES
    (1, 'admin', 'admin123', 'admin', 'admin@univ.fr'),
    (2, 'dupont', 'prof456', 'instructor', 'dupont@univ.fr'),
    (3, 'alice', 'alice789', 'student', 'alice@etud.fr'),
    (4, 'bob', 'bob101', 'student', 'bob@etud.fr'),
    (5, 'charlie', 'charlie202', 'student', 'charlie@etud.fr');

INSERT INTO students(id, name, email, birthdate) VALUES
    (1, 'Alice Martin', 'alice@etud.fr', '2002-03-15'),
    (2, 'Bob Dupuis', 'bob@etud.fr', '2001-07-22'),
    (3, 'Charlie Leroy', 'charlie@etud.fr', '2003-01-10');

INSERT INTO courses(id, name, description, credits) VALUES
    (1, 'Algorithms', 'Introduction to algorithms', 4),
    (2, 'Databases', 'Schema design and SQL queries', 4),
    (3, 'C++ Programming', 'OOP, STL, templates', 5),
    (4, 'Networks', 'TCP/IP protocols', 3),
    (5, 'Mathematics', 'Analysis and linear algebra', 3);

INSERT INTO grades(student_id, course_id, grade) VALUES
    (1, 1, 15.5), (1, 2, 17.0), (1, 3, 14.5), (1, 4, 12.0), (1, 5, 16.0),
    (2, 1, 11.0), (2, 2, 13.5), (2, 3, 10.0), (2, 4, 14.0),
    (3, 1, 18.0), (3, 3, 19.5), (3, 5, 17.5);
";
