#![allow(dead_code)]

#[path = "../src/db.rs"]
mod db;
#[path = "../src/error.rs"]
mod error;
#[path = "../src/identity.rs"]
mod identity;

use db::Store;
use identity::{authenticate, Role};

#[test]
fn wrong_secret_or_unknown_login_yields_no_identity() {
    let store = Store::open_in_memory().expect("open store");
    assert!(authenticate(&store, "admin", "wrong").expect("auth").is_none());
    assert!(authenticate(&store, "nobody", "admin123").expect("auth").is_none());
    assert!(authenticate(&store, "", "").expect("auth").is_none());
}

#[test]
fn credentials_are_case_sensitive() {
    let store = Store::open_in_memory().expect("open store");
    assert!(authenticate(&store, "Admin", "admin123").expect("auth").is_none());
    assert!(authenticate(&store, "admin", "ADMIN123").expect("auth").is_none());
}

#[test]
fn identity_carries_stored_role() {
    let store = Store::open_in_memory().expect("open store");

    let admin = authenticate(&store, "admin", "admin123")
        .expect("auth")
        .expect("admin identity");
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.account_id, 1);
    assert_eq!(admin.login, "admin");
    assert_eq!(admin.secret, "admin123");
    assert_eq!(admin.student_id, None);

    let instructor = authenticate(&store, "dupont", "prof456")
        .expect("auth")
        .expect("instructor identity");
    assert_eq!(instructor.role, Role::Instructor);
    assert_eq!(instructor.student_id, None);
}

#[test]
fn student_is_linked_to_record_by_email() {
    let store = Store::open_in_memory().expect("open store");
    let bob = authenticate(&store, "bob", "bob101")
        .expect("auth")
        .expect("student identity");
    assert_eq!(bob.role, Role::Student);
    assert_eq!(bob.student_id, Some(2));
}

#[test]
fn student_without_matching_email_is_unlinked() {
    let store = Store::open_in_memory().expect("open store");
    assert!(store.execute(
        "INSERT INTO accounts(login, secret, role, email) VALUES('dave', 'pw', 'student', 'dave@etud.fr')"
    ));
    let dave = authenticate(&store, "dave", "pw")
        .expect("auth")
        .expect("student identity");
    assert_eq!(dave.role, Role::Student);
    assert_eq!(dave.student_id, None);
}

#[test]
fn changing_record_email_breaks_the_link() {
    let store = Store::open_in_memory().expect("open store");
    assert!(store.execute("UPDATE students SET email = 'alice@other.fr' WHERE id = 1"));
    let alice = authenticate(&store, "alice", "alice789")
        .expect("auth")
        .expect("student identity");
    assert_eq!(alice.student_id, None);
}

#[test]
fn apostrophes_in_credentials_match() {
    let store = Store::open_in_memory().expect("open store");
    assert!(store.execute(&format!(
        "INSERT INTO accounts(login, secret, role) VALUES('{}', '{}', 'instructor')",
        Store::escape("o'brien"),
        Store::escape("it's-me")
    )));

    let who = authenticate(&store, "o'brien", "it's-me")
        .expect("auth")
        .expect("identity");
    assert_eq!(who.login, "o'brien");
    assert_eq!(who.role, Role::Instructor);

    assert!(authenticate(&store, "o'brien' --", "x").expect("auth").is_none());
    assert!(authenticate(&store, "admin' OR '1'='1", "x' OR '1'='1")
        .expect("auth")
        .is_none());
}
