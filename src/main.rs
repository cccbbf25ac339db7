mod config;
mod console;
mod db;
mod error;
mod handlers;
mod identity;
mod records;
mod report;
mod transfer;
mod validate;

use log::{error, info};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use console::Console;
use db::Store;
use handlers::Session;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cfg = match config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Unable to load configuration: {e:#}");
            return ExitCode::from(1);
        }
    };

    let store = match Store::open(&cfg.db_path) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            eprintln!("Unable to open the database {}.", cfg.db_path.to_string_lossy());
            return ExitCode::from(1);
        }
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    banner(&mut console);

    loop {
        let Some(line) = console.prompt("\n[1] Log in   [0] Quit\nChoice: ") else {
            break;
        };
        match line.trim() {
            "0" => {
                console.say("Goodbye!");
                break;
            }
            "1" => login(&store, &mut console),
            _ => console.say("Invalid option."),
        }
    }

    if let Err(e) = store.close() {
        error!("closing database: {e}");
    }
    ExitCode::SUCCESS
}

fn banner<R: BufRead, W: Write>(console: &mut Console<R, W>) {
    console.say("");
    console.say("==========================================");
    console.say("   STUDENT MANAGEMENT SYSTEM");
    console.say("   Role-based sign-in");
    console.say("==========================================");
}

fn login<R: BufRead, W: Write>(store: &Store, console: &mut Console<R, W>) {
    let login = console.prompt("Login    : ").unwrap_or_default();
    let secret = console.prompt("Password : ").unwrap_or_default();

    match identity::authenticate(store, &login, &secret) {
        Ok(Some(identity)) => {
            console.say(format!(
                "\n✓ Logged in as {} [{}]",
                identity.login,
                identity.role.display_name()
            ));
            let session = Session::for_identity(identity);
            session.run(store, console);
            info!("session ended for {}", session.identity().login);
        }
        Ok(None) => console.say("\n✗ Invalid credentials."),
        Err(e) => handlers::report_error(console, &e),
    }
}
