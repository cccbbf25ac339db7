//! Pipe-delimited export and import.
//!
//! A file is a sequence of `---NAME---` sections, each opened by a row of
//! field names followed by one `|`-separated line per record. Lines starting
//! with `=` or `#` are banners/comments and are skipped on import, as are
//! blank lines and the field-name rows.

use anyhow::{bail, Context};
use log::{info, warn};
use std::path::Path;

use crate::db::{Row, Store, NULL_TEXT};
use crate::error::{AppError, Result};
use crate::identity::{Identity, Role};
use crate::records::{self, NewCourse, NewGrade, NewStudent};
use crate::validate;

pub const STUDENTS_SECTION: &str = "---STUDENTS---";
pub const COURSES_SECTION: &str = "---COURSES---";
pub const GRADES_SECTION: &str = "---GRADES---";
pub const PROFILE_SECTION: &str = "---PROFILE---";

const STUDENT_FIELDS: [&str; 4] = ["id", "name", "email", "birthdate"];
const COURSE_FIELDS: [&str; 4] = ["id", "name", "description", "credits"];
const GRADE_FIELDS: [&str; 5] = ["id", "student", "course", "grade", "date_recorded"];
const PROFILE_FIELDS: [&str; 3] = ["name", "email", "birthdate"];
const OWN_GRADE_FIELDS: [&str; 3] = ["course", "grade", "date_recorded"];
const GRADE_IMPORT_FIELDS: [&str; 3] = ["student_id", "course_id", "grade"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Rows whose id already existed.
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Students,
    Courses,
    Grades,
    Profile,
}

fn section_of(line: &str) -> Option<Section> {
    match line.trim() {
        STUDENTS_SECTION => Some(Section::Students),
        COURSES_SECTION => Some(Section::Courses),
        GRADES_SECTION => Some(Section::Grades),
        PROFILE_SECTION => Some(Section::Profile),
        _ => None,
    }
}

/// Builds the export document for `identity`'s role. `student_filter` only
/// applies to instructors.
pub fn export_document(
    store: &Store,
    identity: &Identity,
    student_filter: Option<i64>,
) -> Result<String> {
    match identity.role {
        Role::Admin => export_all(store),
        Role::Instructor => export_grades(store, student_filter),
        Role::Student => {
            let id = identity.student_id.ok_or(AppError::NotLinked)?;
            export_student(store, id)
        }
    }
}

pub fn export_all(store: &Store) -> Result<String> {
    let mut doc = format!(
        "=== FULL EXPORT {} ===\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    push_section(
        &mut doc,
        STUDENTS_SECTION,
        &STUDENT_FIELDS,
        &records::list_students(store)?,
    );
    doc.push('\n');
    push_section(
        &mut doc,
        COURSES_SECTION,
        &COURSE_FIELDS,
        &records::list_courses(store)?,
    );
    doc.push('\n');
    push_section(
        &mut doc,
        GRADES_SECTION,
        &GRADE_FIELDS,
        &records::list_grades(store, None)?,
    );
    Ok(doc)
}

pub fn export_grades(store: &Store, student_id: Option<i64>) -> Result<String> {
    let mut doc = String::new();
    push_section(
        &mut doc,
        GRADES_SECTION,
        &GRADE_FIELDS,
        &records::list_grades(store, student_id)?,
    );
    Ok(doc)
}

pub fn export_student(store: &Store, student_id: i64) -> Result<String> {
    let mut doc = String::new();
    let profile: Vec<Row> = records::student_profile(store, student_id)?
        .into_iter()
        .collect();
    push_section(&mut doc, PROFILE_SECTION, &PROFILE_FIELDS, &profile);
    doc.push('\n');
    push_section(
        &mut doc,
        GRADES_SECTION,
        &OWN_GRADE_FIELDS,
        &records::student_grades(store, student_id)?,
    );
    Ok(doc)
}

fn push_section(doc: &mut String, header: &str, fields: &[&str], rows: &[Row]) {
    doc.push_str(header);
    doc.push('\n');
    doc.push_str(&fields.join("|"));
    doc.push('\n');
    for row in rows {
        let line: Vec<String> = fields.iter().map(|f| clean_field(row.text(f))).collect();
        doc.push_str(&line.join("|"));
        doc.push('\n');
    }
}

// The format has no quoting; delimiters inside a value become spaces.
fn clean_field(value: &str) -> String {
    value.replace(['|', '\n', '\r'], " ")
}

/// Writes a finished document. Nothing is created when the path is unusable.
pub fn write_export(path: &Path, doc: &str) -> anyhow::Result<()> {
    std::fs::write(path, doc)
        .with_context(|| format!("failed to create output file {}", path.to_string_lossy()))?;
    info!("exported {} bytes to {}", doc.len(), path.to_string_lossy());
    Ok(())
}

/// Admins import students and courses, instructors import grade triples.
pub fn import_file(store: &Store, identity: &Identity, path: &Path) -> anyhow::Result<ImportSummary> {
    let importer: fn(&Store, &str) -> ImportSummary = match identity.role {
        Role::Admin => import_catalog,
        Role::Instructor => import_grades,
        Role::Student => bail!("students cannot import data"),
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("file not found: {}", path.to_string_lossy()))?;
    let summary = importer(store, &text);
    info!(
        "import of {}: {} imported, {} skipped, {} failed",
        path.to_string_lossy(),
        summary.imported,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

/// Reads the students and courses sections. Each line is inserted on its
/// own; a bad line only bumps `failed`.
pub fn import_catalog(store: &Store, text: &str) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let mut section: Option<Section> = None;

    for (n, line) in text.lines().enumerate() {
        if let Some(s) = section_of(line) {
            section = Some(s);
            continue;
        }
        if is_skippable(line) {
            continue;
        }
        let outcome = match section {
            Some(Section::Students) if !is_field_row(line, &STUDENT_FIELDS) => {
                import_student_line(store, line)
            }
            Some(Section::Courses) if !is_field_row(line, &COURSE_FIELDS) => {
                import_course_line(store, line)
            }
            _ => continue,
        };
        tally(&mut summary, outcome, n + 1);
    }
    summary
}

/// Reads `student_id|course_id|grade` lines, either bare or under a grades
/// section.
pub fn import_grades(store: &Store, text: &str) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let mut section: Option<Section> = None;

    for (n, line) in text.lines().enumerate() {
        if let Some(s) = section_of(line) {
            section = Some(s);
            continue;
        }
        if is_skippable(line) || is_field_row(line, &GRADE_IMPORT_FIELDS) {
            continue;
        }
        if !matches!(section, None | Some(Section::Grades)) {
            continue;
        }
        tally(&mut summary, import_grade_line(store, line), n + 1);
    }
    summary
}

fn tally(summary: &mut ImportSummary, outcome: Result<usize>, line_no: usize) {
    match outcome {
        Ok(0) => summary.skipped += 1,
        Ok(_) => summary.imported += 1,
        Err(e) => {
            warn!("import line {line_no}: {e}");
            summary.failed += 1;
        }
    }
}

fn import_student_line(store: &Store, line: &str) -> Result<usize> {
    let f = expect_fields(line, STUDENT_FIELDS.len())?;
    let id = validate::parse_id("student id", f[0])?;
    let student = NewStudent {
        name: validate::required_text("name", f[1])?,
        email: nullable(f[2]),
        birthdate: validate::parse_birthdate(nullable(f[3]).as_deref().unwrap_or(""))?,
    };
    records::import_student(store, id, &student)
}

fn import_course_line(store: &Store, line: &str) -> Result<usize> {
    let f = expect_fields(line, COURSE_FIELDS.len())?;
    let id = validate::parse_id("course id", f[0])?;
    let course = NewCourse {
        name: validate::required_text("name", f[1])?,
        description: nullable(f[2]),
        credits: validate::parse_credits(nullable(f[3]).as_deref().unwrap_or(""))?,
    };
    records::import_course(store, id, &course)
}

fn import_grade_line(store: &Store, line: &str) -> Result<usize> {
    let f = expect_fields(line, GRADE_IMPORT_FIELDS.len())?;
    let grade = NewGrade {
        student_id: validate::parse_id("student id", f[0])?,
        course_id: validate::parse_id("course id", f[1])?,
        grade: validate::parse_grade(f[2])?,
    };
    records::add_grade(store, &grade)?;
    Ok(1)
}

fn expect_fields(line: &str, count: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() != count {
        return Err(AppError::invalid("line", line));
    }
    Ok(fields)
}

fn nullable(field: &str) -> Option<String> {
    if field == NULL_TEXT {
        None
    } else {
        validate::optional_text(field)
    }
}

fn is_skippable(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('=') || t.starts_with('#')
}

fn is_field_row(line: &str, fields: &[&str]) -> bool {
    let cells: Vec<&str> = line.split('|').map(str::trim).collect();
    cells.len() == fields.len()
        && cells
            .iter()
            .zip(fields)
            .all(|(c, f)| c.eq_ignore_ascii_case(f))
}
