//! Rendering of command results as tables or JSON.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Render rows as a table, or as a JSON array.
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(&rows, "[]");
        return;
    }
    if rows.is_empty() {
        println!("(none)");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

/// Render one record as aligned `key: value` lines, or as a JSON object.
pub fn print_record<T: Serialize>(record: &T, fields: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(record, "{}"),
        OutputFormat::Table => fields.iter().for_each(|(k, v)| print_kv(k, v)),
    }
}

pub fn print_success(msg: &str) {
    println!("ok: {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("error: {msg}");
}

pub fn print_kv(key: &str, value: &str) {
    let label = format!("{key}:");
    println!("{label:<16}{value}");
}

fn print_json<T: Serialize + ?Sized>(value: &T, fallback: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(_) => println!("{fallback}"),
    }
}
