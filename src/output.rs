use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_organisms(records: &[Value]) -> io::Result<()> {
        Self::print_json(&records)
    }

    pub fn print_datasets(records: &[Value]) -> io::Result<()> {
        Self::print_json(&records)
    }

    pub fn print_enrichment(records: &[Value]) -> io::Result<()> {
        Self::print_json(&records)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
