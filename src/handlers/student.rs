use std::io::{BufRead, Write};

use super::{export_data, menu_loop};
use crate::console::{Column, Console};
use crate::db::Store;
use crate::error::Result;
use crate::identity::Identity;
use crate::records;
use crate::report;

const OWN_GRADE_COLUMNS: &[Column] = &[
    ("course", "Course", 30),
    ("grade", "Grade", 8),
    ("date_recorded", "Date", 12),
];

pub fn run<R: BufRead, W: Write>(store: &Store, identity: &Identity, console: &mut Console<R, W>) {
    menu_loop(
        console,
        "STUDENT MENU",
        &["My profile", "My grades", "My average", "Export my data"],
        |c, choice| match choice {
            1 => show_profile(store, c, identity),
            2 => show_grades(store, c, identity),
            3 => show_average(store, c, identity),
            _ => export_data(store, c, identity, None),
        },
    );
}

fn show_profile<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    identity: &Identity,
) -> Result<()> {
    let profile = match identity.student_id {
        Some(id) => records::student_profile(store, id)?,
        None => None,
    };
    let Some(row) = profile else {
        console.say("Profile not found.");
        return Ok(());
    };
    console.say("\n===== MY PROFILE =====");
    console.say(format!("  Name       : {}", row.text("name")));
    console.say(format!("  Email      : {}", row.text("email")));
    console.say(format!("  Birth date : {}", row.text("birthdate")));
    console.say(format!("  Login      : {}", identity.login));
    console.say("======================");
    Ok(())
}

fn show_grades<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    identity: &Identity,
) -> Result<()> {
    let rows = match identity.student_id {
        Some(id) => records::student_grades(store, id)?,
        None => Vec::new(),
    };
    console.table(OWN_GRADE_COLUMNS, &rows);
    Ok(())
}

fn show_average<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    identity: &Identity,
) -> Result<()> {
    let grades = match identity.student_id {
        Some(id) => records::student_grade_values(store, id)?,
        None => Vec::new(),
    };
    let Some(avg) = report::average(&grades) else {
        console.say("No grades recorded; no average can be computed.");
        return Ok(());
    };
    console.say(format!(
        "\nOverall average: {:.2} / 20 ({} grades)",
        avg.rounded(),
        avg.count
    ));
    console.say(format!("Mention: {}", avg.mention.label()));
    Ok(())
}
