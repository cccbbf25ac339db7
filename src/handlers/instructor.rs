use std::io::{BufRead, Write};

use super::{
    add_grade, ask, export_data, import_data, menu_loop, show_courses, show_grades, show_students,
    update_grade,
};
use crate::console::{Column, Console};
use crate::db::Store;
use crate::error::Result;
use crate::identity::Identity;
use crate::validate;

const STUDENT_COLUMNS: &[Column] = &[("id", "ID", 5), ("name", "Name", 25), ("email", "Email", 30)];
const COURSE_COLUMNS: &[Column] = &[("id", "ID", 5), ("name", "Course", 25), ("credits", "Credits", 10)];

pub fn run<R: BufRead, W: Write>(store: &Store, identity: &Identity, console: &mut Console<R, W>) {
    menu_loop(
        console,
        "INSTRUCTOR MENU",
        &[
            "View students",
            "View courses",
            "View grades",
            "Add a grade",
            "Update a grade",
            "Export grades",
            "Import grades",
        ],
        |c, choice| match choice {
            1 => show_students(store, c, STUDENT_COLUMNS),
            2 => show_courses(store, c, COURSE_COLUMNS),
            3 => show_grades(store, c),
            4 => add_grade(store, c, STUDENT_COLUMNS, COURSE_COLUMNS),
            5 => update_grade(store, c),
            6 => export_grades(store, c, identity),
            _ => import_data(store, c, identity),
        },
    );
}

fn export_grades<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    identity: &Identity,
) -> Result<()> {
    let raw = ask(console, "Student ID (blank for all students): ");
    let filter = match raw.trim() {
        "" => None,
        t => Some(validate::parse_id("student id", t)?),
    };
    export_data(store, console, identity, filter)
}
