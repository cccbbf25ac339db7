use std::io::{BufRead, Write};

use super::{
    add_grade, ask, ask_id, confirm_change, export_data, import_data, menu_loop, show_courses,
    show_grades, show_students, update_grade, COURSE_COLUMNS, STUDENT_COLUMNS,
};
use crate::console::{Column, Console};
use crate::db::Store;
use crate::error::Result;
use crate::identity::{Identity, Role};
use crate::records::{self, NewAccount, NewCourse, NewStudent};
use crate::validate;

const ACCOUNT_COLUMNS: &[Column] = &[
    ("id", "ID", 5),
    ("login", "Login", 20),
    ("role", "Role", 12),
    ("email", "Email", 30),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entity {
    Students,
    Courses,
    Grades,
    Accounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    List,
    Add,
    Update,
    Delete,
}

pub fn run<R: BufRead, W: Write>(store: &Store, identity: &Identity, console: &mut Console<R, W>) {
    menu_loop(
        console,
        "ADMINISTRATOR MENU",
        &[
            "Manage students",
            "Manage courses",
            "Manage grades",
            "Manage accounts",
            "Export all data",
            "Import students and courses",
        ],
        |c, choice| match choice {
            1 => manage(store, c, Entity::Students, "Students"),
            2 => manage(store, c, Entity::Courses, "Courses"),
            3 => manage(store, c, Entity::Grades, "Grades"),
            4 => manage(store, c, Entity::Accounts, "Accounts"),
            5 => export_data(store, c, identity, None),
            _ => import_data(store, c, identity),
        },
    );
}

fn manage<R: BufRead, W: Write>(
    store: &Store,
    console: &mut Console<R, W>,
    entity: Entity,
    title: &str,
) -> Result<()> {
    console.say(format!("\n-- {title} --"));
    let action = match ask(console, "[1] List  [2] Add  [3] Update  [4] Delete\nChoice: ")
        .trim()
        .parse::<u32>()
    {
        Ok(1) => Action::List,
        Ok(2) => Action::Add,
        Ok(3) => Action::Update,
        Ok(4) => Action::Delete,
        _ => {
            console.say("Invalid option.");
            return Ok(());
        }
    };

    match (entity, action) {
        (Entity::Students, Action::List) => show_students(store, console, STUDENT_COLUMNS),
        (Entity::Students, Action::Add) => add_student(store, console),
        (Entity::Students, Action::Update) => update_student(store, console),
        (Entity::Students, Action::Delete) => delete_student(store, console),
        (Entity::Courses, Action::List) => show_courses(store, console, COURSE_COLUMNS),
        (Entity::Courses, Action::Add) => add_course(store, console),
        (Entity::Courses, Action::Update) => update_course(store, console),
        (Entity::Courses, Action::Delete) => delete_course(store, console),
        (Entity::Grades, Action::List) => show_grades(store, console),
        (Entity::Grades, Action::Add) => add_grade(store, console, STUDENT_COLUMNS, COURSE_COLUMNS),
        (Entity::Grades, Action::Update) => update_grade(store, console),
        (Entity::Grades, Action::Delete) => delete_grade(store, console),
        (Entity::Accounts, Action::List) => show_accounts(store, console),
        (Entity::Accounts, Action::Add) => add_account(store, console),
        (Entity::Accounts, Action::Update) => update_account(store, console),
        (Entity::Accounts, Action::Delete) => delete_account(store, console),
    }
}

fn read_student<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    email_prompt: &str,
) -> Result<NewStudent> {
    let name = validate::required_text("name", &ask(console, "Full name: "))?;
    let email = validate::optional_text(&ask(console, email_prompt));
    let birthdate = validate::parse_birthdate(&ask(console, "Birth date (YYYY-MM-DD): "))?;
    Ok(NewStudent {
        name,
        email,
        birthdate,
    })
}

fn add_student<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    let student = read_student(console, "Email: ")?;
    let id = records::add_student(store, &student)?;
    console.say(format!("✓ Student added (ID={id})."));
    Ok(())
}

fn update_student<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_students(store, console, STUDENT_COLUMNS)?;
    let id = ask_id(console, "Student ID to update: ", "student id")?;
    let student = read_student(console, "Email (blank keeps current): ")?;
    let affected = records::update_student(store, id, &student)?;
    confirm_change(console, "Student updated", id, affected);
    Ok(())
}

fn delete_student<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_students(store, console, STUDENT_COLUMNS)?;
    let id = ask_id(console, "Student ID to delete: ", "student id")?;
    let affected = records::delete_student(store, id)?;
    confirm_change(console, "Student deleted", id, affected);
    Ok(())
}

fn read_course<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<NewCourse> {
    let name = validate::required_text("course name", &ask(console, "Course name: "))?;
    let description = validate::optional_text(&ask(console, "Description: "));
    let credits = validate::parse_credits(&ask(console, "Credits [3]: "))?;
    Ok(NewCourse {
        name,
        description,
        credits,
    })
}

fn add_course<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    let course = read_course(console)?;
    let id = records::add_course(store, &course)?;
    console.say(format!("✓ Course added (ID={id})."));
    Ok(())
}

fn update_course<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_courses(store, console, COURSE_COLUMNS)?;
    let id = ask_id(console, "Course ID to update: ", "course id")?;
    let course = read_course(console)?;
    let affected = records::update_course(store, id, &course)?;
    confirm_change(console, "Course updated", id, affected);
    Ok(())
}

fn delete_course<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_courses(store, console, COURSE_COLUMNS)?;
    let id = ask_id(console, "Course ID to delete: ", "course id")?;
    let affected = records::delete_course(store, id)?;
    confirm_change(console, "Course deleted", id, affected);
    Ok(())
}

fn delete_grade<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_grades(store, console)?;
    let id = ask_id(console, "Grade ID to delete: ", "grade id")?;
    let affected = records::delete_grade(store, id)?;
    confirm_change(console, "Grade deleted", id, affected);
    Ok(())
}

fn show_accounts<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    let rows = records::list_accounts(store)?;
    console.table(ACCOUNT_COLUMNS, &rows);
    Ok(())
}

fn read_account<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<NewAccount> {
    let login = validate::required_text("login", &ask(console, "Login: "))?;
    let secret = validate::required_text("password", &ask(console, "Password: "))?;
    let role: Role = ask(console, "Role (admin/instructor/student): ").parse()?;
    let email = validate::optional_text(&ask(console, "Email (links student records): "));
    Ok(NewAccount {
        login,
        secret,
        role,
        email,
    })
}

fn add_account<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    let account = read_account(console)?;
    let id = records::add_account(store, &account)?;
    console.say(format!("✓ Account created (ID={id})."));
    Ok(())
}

fn update_account<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_accounts(store, console)?;
    let id = ask_id(console, "Account ID to update: ", "account id")?;
    let account = read_account(console)?;
    let affected = records::update_account(store, id, &account)?;
    confirm_change(console, "Account updated", id, affected);
    Ok(())
}

fn delete_account<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) -> Result<()> {
    show_accounts(store, console)?;
    let id = ask_id(console, "Account ID to delete: ", "account id")?;
    let affected = records::delete_account(store, id)?;
    confirm_change(console, "Account deleted", id, affected);
    Ok(())
}
