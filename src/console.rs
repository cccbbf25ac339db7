use std::io::{BufRead, Write};

use crate::db::Row;

pub const NO_RECORDS: &str = "No records found.";

/// A listed column: row key, header text, display width.
pub type Column = (&'static str, &'static str, usize);

pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn say(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.out, "{}", text.as_ref());
        let _ = self.out.flush();
    }

    /// Prints `label` and reads one line. `None` once input is exhausted.
    pub fn prompt(&mut self, label: &str) -> Option<String> {
        let _ = write!(self.out, "{label}");
        let _ = self.out.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    pub fn table(&mut self, columns: &[Column], rows: &[Row]) {
        let text = render_table(columns, rows);
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

pub fn render_table(columns: &[Column], rows: &[Row]) -> String {
    if rows.is_empty() {
        return format!("{NO_RECORDS}\n");
    }

    let mut s = String::from("\n");
    let mut total = 0;
    for &(_, header, width) in columns {
        s.push_str(&format!("{header:<width$}"));
        total += width;
    }
    s.push('\n');
    s.push_str(&"-".repeat(total));
    s.push('\n');
    for row in rows {
        for &(key, _, width) in columns {
            s.push_str(&format!("{:<width$}", row.text(key)));
        }
        s.push('\n');
    }
    s
}
