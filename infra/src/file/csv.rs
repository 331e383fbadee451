use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rng_core::frame::Frame;

/// CSV1行分に変換できるレコード
pub trait CsvRecord {
    fn header() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl CsvRecord for Frame {
    fn header() -> &'static [&'static str] {
        &[
            "Frame", "Shiny", "Nature", "Ability", "HP", "Atk", "Def", "SpA", "SpD", "Spe",
            "Gender", "EC", "PID", "Seed",
        ]
    }

    fn row(&self) -> Vec<String> {
        let mut row = vec![
            self.frame.to_string(),
            self.shiny.name().to_string(),
            self.nature.name().to_string(),
            self.ability.to_string(),
        ];
        row.extend(self.ivs.iter().map(|iv| iv.to_string()));
        row.push(self.gender.name().to_string());
        row.push(format!("{:08X}", self.ec));
        row.push(format!("{:08X}", self.pid));
        row.push(format!("{:016X}", self.seed));
        row
    }
}

pub fn write_csv<T: CsvRecord>(path: impl AsRef<Path>, records: &[T]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv_to(&mut writer, records)?;
    writer.flush()
}

pub fn write_csv_to<W: Write, T: CsvRecord>(writer: &mut W, records: &[T]) -> io::Result<()> {
    write_row(writer, T::header().iter().copied())?;
    for record in records {
        write_row(writer, record.row().iter().map(String::as_str))?;
    }
    Ok(())
}

fn write_row<'a, W: Write>(
    writer: &mut W,
    fields: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            writer.write_all(b",")?;
        }
        first = false;
        writer.write_all(escape_field(field).as_bytes())?;
    }
    writer.write_all(b"\n")
}

// カンマ・引用符・改行を含む項目だけ引用する
fn escape_field(value: &str) -> String {
    let needs_quotes = value.contains([',', '"', '\n', '\r']);
    if !needs_quotes {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
