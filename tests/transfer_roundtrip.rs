#![allow(dead_code)]

#[path = "../src/db.rs"]
mod db;
#[path = "../src/error.rs"]
mod error;
#[path = "../src/identity.rs"]
mod identity;
#[path = "../src/records.rs"]
mod records;
#[path = "../src/transfer.rs"]
mod transfer;
#[path = "../src/validate.rs"]
mod validate;

use db::Store;
use identity::{authenticate, Identity};
use transfer::ImportSummary;

/// Seeded accounts stay so the store is not reseeded; everything else is gone.
fn empty_store() -> Store {
    let store = Store::open_in_memory().expect("open store");
    assert!(store.execute("DELETE FROM students"));
    assert!(store.execute("DELETE FROM courses"));
    store
}

fn login(store: &Store, login: &str, secret: &str) -> Identity {
    authenticate(store, login, secret)
        .expect("auth")
        .expect("identity")
}

#[test]
fn full_export_imports_into_empty_schema() {
    let source = Store::open_in_memory().expect("open store");
    assert!(source.execute(
        "INSERT INTO students(name, email) VALUES('No Birthday', 'nobday@etud.fr')"
    ));
    let doc = transfer::export_all(&source).expect("export");
    assert!(doc.starts_with("=== FULL EXPORT"));
    assert!(doc.contains("---STUDENTS---\nid|name|email|birthdate\n"));
    assert!(doc.contains("---COURSES---\nid|name|description|credits\n"));
    assert!(doc.contains("---GRADES---\nid|student|course|grade|date_recorded\n"));

    let target = empty_store();
    let summary = transfer::import_catalog(&target, &doc);
    assert_eq!(
        summary,
        ImportSummary {
            imported: 9,
            skipped: 0,
            failed: 0
        }
    );

    assert_eq!(
        records::list_students(&target).expect("students"),
        records::list_students(&source).expect("students")
    );
    assert_eq!(
        records::list_courses(&target).expect("courses"),
        records::list_courses(&source).expect("courses")
    );
    assert!(records::list_grades(&target, None).expect("grades").is_empty());
}

#[test]
fn reimport_into_same_store_skips_existing_ids() {
    let store = Store::open_in_memory().expect("open store");
    let doc = transfer::export_all(&store).expect("export");
    let summary = transfer::import_catalog(&store, &doc);
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.skipped, 8);
    assert_eq!(summary.failed, 0);
}

#[test]
fn bad_lines_fail_independently() {
    let store = empty_store();
    let text = "\
# hand-written catalog
---STUDENTS---
id|name|email|birthdate
10|Dana Scully|dana@etud.fr|1990-02-23
x|Not An Id|bad@etud.fr|2000-01-01
11|Bad Date|date@etud.fr|23/02/1990
12|Too|Few

---COURSES---
20|Physics|Mechanics|6
21|Chemistry|NULL|NULL
";
    let summary = transfer::import_catalog(&store, text);
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.failed, 3);

    let courses = records::list_courses(&store).expect("courses");
    let chemistry = courses
        .iter()
        .find(|r| r.text("name") == "Chemistry")
        .expect("chemistry");
    assert_eq!(chemistry.text("description"), "NULL");
    assert_eq!(chemistry.text("credits"), "3");
}

#[test]
fn taken_email_under_new_id_counts_as_failed() {
    let store = Store::open_in_memory().expect("open store");
    let text = "\
---STUDENTS---
50|Imposter|alice@etud.fr|2000-01-01
1|Alice Again|alice.again@etud.fr|2002-03-15
51|Erin Moss|erin@etud.fr|NULL
";
    let summary = transfer::import_catalog(&store, text);
    assert_eq!(
        summary,
        ImportSummary {
            imported: 1,
            skipped: 1,
            failed: 1
        }
    );
    assert!(records::student_profile(&store, 50).expect("profile").is_none());
    let erin = records::student_profile(&store, 51)
        .expect("profile")
        .expect("row");
    assert_eq!(erin.text("name"), "Erin Moss");
}

#[test]
fn instructor_imports_grade_triples() {
    let store = Store::open_in_memory().expect("open store");
    let text = "\
---GRADES---
student_id|course_id|grade
2|5|12.5
3|2|25
1|99|10
abc|1|10
3|4|9
";
    let summary = transfer::import_grades(&store, text);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.failed, 3);
    assert_eq!(records::list_grades(&store, None).expect("grades").len(), 14);
}

#[test]
fn bare_triples_without_header_are_accepted() {
    let store = Store::open_in_memory().expect("open store");
    let summary = transfer::import_grades(&store, "1|1|10\n\n2|2|11\n");
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.failed, 0);
}

#[test]
fn import_is_gated_by_role() {
    let store = Store::open_in_memory().expect("open store");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grades.txt");
    std::fs::write(&path, "1|2|14\n").expect("write");

    let alice = login(&store, "alice", "alice789");
    assert!(transfer::import_file(&store, &alice, &path).is_err());
    assert_eq!(records::list_grades(&store, None).expect("grades").len(), 12);

    let dupont = login(&store, "dupont", "prof456");
    let summary = transfer::import_file(&store, &dupont, &path).expect("import");
    assert_eq!(summary.imported, 1);
}

#[test]
fn missing_import_file_is_reported() {
    let store = Store::open_in_memory().expect("open store");
    let dir = tempfile::tempdir().expect("tempdir");
    let admin = login(&store, "admin", "admin123");
    let err = transfer::import_file(&store, &admin, &dir.path().join("nope.txt"))
        .expect_err("missing file");
    assert!(format!("{err:#}").contains("file not found"));
}

#[test]
fn export_is_scoped_by_role() {
    let store = Store::open_in_memory().expect("open store");

    let dupont = login(&store, "dupont", "prof456");
    let all = transfer::export_document(&store, &dupont, None).expect("export");
    assert!(all.starts_with("---GRADES---\n"));
    assert!(!all.contains("---STUDENTS---"));
    assert_eq!(all.lines().count(), 2 + 12);

    let one = transfer::export_document(&store, &dupont, Some(3)).expect("export");
    assert_eq!(one.lines().count(), 2 + 3);
    assert!(one.lines().skip(2).all(|l| l.contains("|Charlie Leroy|")));

    let alice = login(&store, "alice", "alice789");
    let mine = transfer::export_document(&store, &alice, Some(3)).expect("export");
    assert!(mine.starts_with("---PROFILE---\nname|email|birthdate\nAlice Martin|alice@etud.fr|2002-03-15\n"));
    assert!(mine.contains("---GRADES---\ncourse|grade|date_recorded\n"));
    assert!(mine.contains("Databases|17.0|"));
    assert!(!mine.contains("Bob"));
    assert!(!mine.contains("Charlie"));
}

#[test]
fn unlinked_student_cannot_export() {
    let store = Store::open_in_memory().expect("open store");
    assert!(store.execute(
        "INSERT INTO accounts(login, secret, role) VALUES('dave', 'pw', 'student')"
    ));
    let dave = login(&store, "dave", "pw");
    assert!(matches!(
        transfer::export_document(&store, &dave, None),
        Err(error::AppError::NotLinked)
    ));
}

#[test]
fn unwritable_export_path_leaves_nothing_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("missing").join("export.txt");
    assert!(transfer::write_export(&target, "---GRADES---\n").is_err());
    assert!(!target.exists());

    let ok = dir.path().join("export.txt");
    transfer::write_export(&ok, "---GRADES---\n").expect("write");
    assert_eq!(std::fs::read_to_string(ok).expect("read"), "---GRADES---\n");
}
