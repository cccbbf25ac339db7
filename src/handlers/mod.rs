pub mod admin;
pub mod instructor;
pub mod student;

use log::{error, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::console::{Column, Console};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::identity::{Identity, Role};
use crate::records::{self, NewGrade};
use crate::transfer;
use crate::validate;

/// The command set chosen at login. Each variant runs its own menu.
#[derive(Debug, Clone)]
pub enum Session {
    Admin(Identity),
    Instructor(Identity),
    Student(Identity),
}

impl Session {
    pub fn for_identity(identity: Identity) -> Session {
        match identity.role {
            Role::Admin => Session::Admin(identity),
            Role::Instructor => Session::Instructor(identity),
            Role::Student => Session::Student(identity),
        }
    }

    pub fn identity(&self) -> &Identity {
        match self {
            Session::Admin(i) | Session::Instructor(i) | Session::Student(i) => i,
        }
    }

    /// Blocks until the user logs out or input ends.
    pub fn run<R: BufRead, W: Write>(&self, store: &Store, console: &mut Console<R, W>) {
        match self {
            Session::Admin(i) => admin::run(store, i, console),
            Session::Instructor(i) => instructor::run(store, i, console),
            Session::Student(i) => student::run(store, i, console),
        }
    }
}

pub(crate) const STUDENT_COLUMNS: &[Column] = &[
    ("id", "ID", 5),
    ("name", "Name", 25),
    ("email", "Email", 30),
    ("birthdate", "Birth date", 15),
];
pub(crate) const COURSE_COLUMNS: &[Column] = &[
    ("id", "ID", 5),
    ("name", "Course", 25),
    ("description", "Description", 30),
    ("credits", "Credits", 10),
];
pub(crate) const GRADE_COLUMNS: &[Column] = &[
    ("id", "ID", 5),
    ("student", "Student", 25),
    ("course", "Course", 25),
    ("grade", "Grade", 8),
    ("date_recorded", "Date", 15),
];

/// Prints a numbered menu until `0` or end of input. Out-of-range or
/// non-numeric choices re-prompt.
pub(crate) fn menu_loop<R, W, F>(console: &mut Console<R, W>, title: &str, entries: &[&str], mut act: F)
where
    R: BufRead,
    W: Write,
    F: FnMut(&mut Console<R, W>, usize) -> Result<()>,
{
    loop {
        console.say("\n==============================");
        console.say(format!("   {title}"));
        console.say("==============================");
        for (i, entry) in entries.iter().enumerate() {
            console.say(format!("  [{}] {entry}", i + 1));
        }
        console.say("  [0] Log out");
        console.say("------------------------------");
        let Some(line) = console.prompt("Choice: ") else {
            return;
        };
        match line.trim().parse::<usize>() {
            Ok(0) => {
                console.say("Logging out...");
                return;
            }
            Ok(n) if n <= entries.len() => {
                if let Err(e) = act(console, n) {
                    report_error(console, &e);
                }
            }
            _ => console.say("Invalid option."),
        }
    }
}

pub(crate) fn report_error<R: BufRead, W: Write>(console: &mut Console<R, W>, e: &AppError) {
    match e {
        AppError::StoreOperationFailed(_) => {
            error!("{e}");
            console.say(format!("✗ Operation failed: {e}"));
        }
        AppError::ValidationOutOfRange { .. } => console.say(format!("✗ Invalid input: {e}")),
        AppError::NotLinked => console.say(format!("✗ {e}")),
    }
}

/// Reads a line; end of input reads as empty.
pub(crate) fn ask<R: BufRead, W: Write>(console: &mut Console<R, W>, label: &str) -> String {
    console.prompt(label).unwrap_or_default()
}

pub(crate) fn ask_id<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
    field: &'static str,
) -> Result<i64> {
    validate::parse_id(field, &ask(console, label))
}

/// Updates and deletes do not check that the id exists; zero affected rows
/// still read as success.
pub(crate) fn confirm_change<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    what: &str,
    id: i64,
    affected: usize,
) {
    if affected == 0 {
        warn!("{what} {id}: no rows affected");
    }
    console.say(format!("✓ {what}."));
}

pub(crate) fn show_students<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    columns: &[Column],
) -> Result<()> {
    let rows = records::list_students(store)?;
    console.table(columns, &rows);
    Ok(())
}

pub(crate) fn show_courses<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    columns: &[Column],
) -> Result<()> {
    let rows = records::list_courses(store)?;
    console.table(columns, &rows);
    Ok(())
}

pub(crate) fn show_grades<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    let rows = records::list_grades(store, None)?;
    console.table(GRADE_COLUMNS, &rows);
    Ok(())
}

/// Shared by admins and instructors: pick ids from the listings, then a value.
pub(crate) fn add_grade<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    student_columns: &[Column],
    course_columns: &[Column],
) -> Result<()> {
    show_students(store, console, student_columns)?;
    let student_id = ask_id(console, "Student ID: ", "student id")?;
    show_courses(store, console, course_columns)?;
    let course_id = ask_id(console, "Course ID: ", "course id")?;
    let grade = validate::parse_grade(&ask(console, "Grade (0-20): "))?;

    let id = records::add_grade(
        store,
        &NewGrade {
            student_id,
            course_id,
            grade,
        },
    )?;
    console.say(format!("✓ Grade added (ID={id})."));
    Ok(())
}

pub(crate) fn update_grade<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_grades(store, console)?;
    let id = ask_id(console, "Grade ID to update: ", "grade id")?;
    let grade = validate::parse_grade(&ask(console, "New grade (0-20): "))?;
    let affected = records::update_grade(store, id, grade)?;
    confirm_change(console, "Grade updated", id, affected);
    Ok(())
}

pub(crate) fn export_data<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    identity: &Identity,
    student_filter: Option<i64>,
) -> Result<()> {
    let path = validate::required_text("file name", &ask(console, "Export file name (e.g. export.txt): "))?;
    let doc = transfer::export_document(store, identity, student_filter)?;
    match transfer::write_export(&PathBuf::from(&path), &doc) {
        Ok(()) => console.say(format!("✓ Exported to {path}")),
        Err(e) => {
            error!("{e:#}");
            console.say(format!("✗ {e:#}"));
        }
    }
    Ok(())
}

pub(crate) fn import_data<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    identity: &Identity,
) -> Result<()> {
    let path = validate::required_text("file name", &ask(console, "File to import: "))?;
    match transfer::import_file(store, identity, &PathBuf::from(&path)) {
        Ok(s) => console.say(format!(
            "✓ Import finished: {} imported, {} already present, {} failed.",
            s.imported, s.skipped, s.failed
        )),
        Err(e) => {
            error!("{e:#}");
            console.say(format!("✗ {e:#}"));
        }
    }
    Ok(())
}
