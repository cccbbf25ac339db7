use rusqlite::params;

use crate::db::{Row, Store};
use crate::error::Result;
use crate::identity::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub email: Option<String>,
    pub birthdate: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
    pub credits: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewGrade {
    pub student_id: i64,
    pub course_id: i64,
    pub grade: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub login: String,
    pub secret: String,
    pub role: Role,
    pub email: Option<String>,
}

// Students

pub fn list_students(store: &Store) -> Result<Vec<Row>> {
    store.query_with(
        "SELECT id, name, email, birthdate FROM students ORDER BY name",
        [],
    )
}

pub fn add_student(store: &Store, s: &NewStudent) -> Result<i64> {
    store.execute_with(
        "INSERT INTO students(name, email, birthdate) VALUES(?1, ?2, ?3)",
        params![s.name, s.email, s.birthdate],
    )?;
    Ok(store.last_insert_id())
}

/// Inserts with a caller-chosen id. An existing id is left untouched and
/// reports zero rows; any other constraint violation is an error.
pub fn import_student(store: &Store, id: i64, s: &NewStudent) -> Result<usize> {
    store.execute_with(
        "INSERT INTO students(id, name, email, birthdate) VALUES(?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO NOTHING",
        params![id, s.name, s.email, s.birthdate],
    )
}

/// A missing email keeps the stored one, so the account link survives.
pub fn update_student(store: &Store, id: i64, s: &NewStudent) -> Result<usize> {
    store.execute_with(
        "UPDATE students SET name = ?1, email = COALESCE(?2, email), birthdate = ?3 WHERE id = ?4",
        params![s.name, s.email, s.birthdate, id],
    )
}

pub fn delete_student(store: &Store, id: i64) -> Result<usize> {
    store.execute_with("DELETE FROM students WHERE id = ?1", [id])
}

pub fn student_profile(store: &Store, id: i64) -> Result<Option<Row>> {
    let rows = store.query_with(
        "SELECT name, email, birthdate FROM students WHERE id = ?1",
        [id],
    )?;
    Ok(rows.into_iter().next())
}

pub fn student_grades(store: &Store, id: i64) -> Result<Vec<Row>> {
    store.query_with(
        "SELECT c.name AS course, g.grade, g.date_recorded
         FROM grades g
         JOIN courses c ON c.id = g.course_id
         WHERE g.student_id = ?1
         ORDER BY c.name",
        [id],
    )
}

pub fn student_grade_values(store: &Store, id: i64) -> Result<Vec<f64>> {
    let rows = store.query_with("SELECT grade FROM grades WHERE student_id = ?1", [id])?;
    Ok(rows
        .iter()
        .filter_map(|r| r.text("grade").parse::<f64>().ok())
        .collect())
}

// Courses

pub fn list_courses(store: &Store) -> Result<Vec<Row>> {
    store.query_with(
        "SELECT id, name, description, credits FROM courses ORDER BY name",
        [],
    )
}

pub fn add_course(store: &Store, c: &NewCourse) -> Result<i64> {
    store.execute_with(
        "INSERT INTO courses(name, description, credits) VALUES(?1, ?2, ?3)",
        params![c.name, c.description, c.credits],
    )?;
    Ok(store.last_insert_id())
}

pub fn import_course(store: &Store, id: i64, c: &NewCourse) -> Result<usize> {
    store.execute_with(
        "INSERT INTO courses(id, name, description, credits) VALUES(?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO NOTHING",
        params![id, c.name, c.description, c.credits],
    )
}

pub fn update_course(store: &Store, id: i64, c: &NewCourse) -> Result<usize> {
    store.execute_with(
        "UPDATE courses SET name = ?1, description = ?2, credits = ?3 WHERE id = ?4",
        params![c.name, c.description, c.credits, id],
    )
}

pub fn delete_course(store: &Store, id: i64) -> Result<usize> {
    store.execute_with("DELETE FROM courses WHERE id = ?1", [id])
}

// Grades

/// Grades joined to student and course names, optionally for one student.
pub fn list_grades(store: &Store, student_id: Option<i64>) -> Result<Vec<Row>> {
    store.query_with(
        "SELECT g.id, s.name AS student, c.name AS course, g.grade, g.date_recorded
         FROM grades g
         JOIN students s ON s.id = g.student_id
         JOIN courses c ON c.id = g.course_id
         WHERE ?1 IS NULL OR g.student_id = ?1
         ORDER BY s.name, c.name",
        [student_id],
    )
}

pub fn add_grade(store: &Store, g: &NewGrade) -> Result<i64> {
    store.execute_with(
        "INSERT INTO grades(student_id, course_id, grade) VALUES(?1, ?2, ?3)",
        params![g.student_id, g.course_id, g.grade],
    )?;
    Ok(store.last_insert_id())
}

pub fn update_grade(store: &Store, id: i64, grade: f64) -> Result<usize> {
    store.execute_with(
        "UPDATE grades SET grade = ?1 WHERE id = ?2",
        params![grade, id],
    )
}

pub fn delete_grade(store: &Store, id: i64) -> Result<usize> {
    store.execute_with("DELETE FROM grades WHERE id = ?1", [id])
}

// Accounts

pub fn list_accounts(store: &Store) -> Result<Vec<Row>> {
    store.query_with(
        "SELECT id, login, role, email FROM accounts ORDER BY role, login",
        [],
    )
}

pub fn add_account(store: &Store, a: &NewAccount) -> Result<i64> {
    store.execute_with(
        "INSERT INTO accounts(login, secret, role, email) VALUES(?1, ?2, ?3, ?4)",
        params![a.login, a.secret, a.role.as_tag(), a.email],
    )?;
    Ok(store.last_insert_id())
}

pub fn update_account(store: &Store, id: i64, a: &NewAccount) -> Result<usize> {
    store.execute_with(
        "UPDATE accounts SET login = ?1, secret = ?2, role = ?3, email = ?4 WHERE id = ?5",
        params![a.login, a.secret, a.role.as_tag(), a.email, id],
    )
}

pub fn delete_account(store: &Store, id: i64) -> Result<usize> {
    store.execute_with("DELETE FROM accounts WHERE id = ?1", [id])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(store: &Store, sql: &str) -> usize {
        store.query(sql)[0].text("n").parse().expect("count")
    }

    #[test]
    fn add_returns_generated_id() {
        let store = Store::open_in_memory().expect("open");
        let id = add_course(
            &store,
            &NewCourse {
                name: "Compilers".into(),
                description: None,
                credits: 6,
            },
        )
        .expect("add course");
        assert_eq!(id, 6);
        let rows = list_courses(&store).expect("list");
        let added = rows.iter().find(|r| r.text("id") == "6").expect("row");
        assert_eq!(added.text("description"), "NULL");
        assert_eq!(added.text("credits"), "6");
    }

    #[test]
    fn grade_filter_limits_to_one_student() {
        let store = Store::open_in_memory().expect("open");
        assert_eq!(list_grades(&store, None).expect("all").len(), 12);
        let bob = list_grades(&store, Some(2)).expect("bob");
        assert_eq!(bob.len(), 4);
        assert!(bob.iter().all(|r| r.text("student") == "Bob Dupuis"));
    }

    #[test]
    fn own_grades_are_ordered_by_course_name() {
        let store = Store::open_in_memory().expect("open");
        let rows = student_grades(&store, 1).expect("grades");
        let courses: Vec<&str> = rows.iter().map(|r| r.text("course")).collect();
        let mut sorted = courses.clone();
        sorted.sort();
        assert_eq!(courses, sorted);
    }

    #[test]
    fn deleting_course_cascades_to_grades() {
        let store = Store::open_in_memory().expect("open");
        assert_eq!(delete_course(&store, 1).expect("delete"), 1);
        assert_eq!(
            count(&store, "SELECT COUNT(*) AS n FROM grades WHERE course_id = 1"),
            0
        );
        assert_eq!(count(&store, "SELECT COUNT(*) AS n FROM grades"), 9);
    }

    #[test]
    fn delete_of_missing_id_affects_nothing() {
        let store = Store::open_in_memory().expect("open");
        assert_eq!(delete_student(&store, 999).expect("delete"), 0);
        assert_eq!(count(&store, "SELECT COUNT(*) AS n FROM students"), 3);
    }

    #[test]
    fn import_keeps_existing_rows() {
        let store = Store::open_in_memory().expect("open");
        let s = NewStudent {
            name: "Someone Else".into(),
            email: Some("else@etud.fr".into()),
            birthdate: None,
        };
        assert_eq!(import_student(&store, 1, &s).expect("import"), 0);
        assert_eq!(import_student(&store, 10, &s).expect("import"), 1);
        let profile = student_profile(&store, 10).expect("profile").expect("row");
        assert_eq!(profile.text("birthdate"), "NULL");
    }

    #[test]
    fn import_with_taken_email_is_an_error() {
        let store = Store::open_in_memory().expect("open");
        let s = NewStudent {
            name: "Imposter".into(),
            email: Some("alice@etud.fr".into()),
            birthdate: None,
        };
        assert!(import_student(&store, 50, &s).is_err());
        assert!(student_profile(&store, 50).expect("profile").is_none());
    }

    #[test]
    fn update_without_email_keeps_the_stored_one() {
        let store = Store::open_in_memory().expect("open");
        let s = NewStudent {
            name: "Alice Martin-Roy".into(),
            email: None,
            birthdate: Some("2002-03-15".into()),
        };
        assert_eq!(update_student(&store, 1, &s).expect("update"), 1);
        let profile = student_profile(&store, 1).expect("profile").expect("row");
        assert_eq!(profile.text("name"), "Alice Martin-Roy");
        assert_eq!(profile.text("email"), "alice@etud.fr");
    }
}
