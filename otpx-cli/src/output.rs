//! Row sinks for extracted statements.

use anyhow::{Context, Result};
use otpx_ingest::{DocumentMeta, ExtractionResult};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::OutputFormat;

const CSV_HEADER: [&str; 7] = [
    "term",
    "account_number",
    "currency",
    "booking_date",
    "value_date",
    "amount",
    "description",
];

#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    file: String,
    term: Option<&'a str>,
    account_number: Option<&'a str>,
    currency: &'a str,
    fields: &'a [String],
}

pub enum RowWriter {
    Csv(csv::Writer<Box<dyn Write>>),
    JsonLines(Box<dyn Write>),
}

/// Stdout when no path is given.
pub fn open_sink(out: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match out {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

impl RowWriter {
    pub fn new(sink: Box<dyn Write>, format: OutputFormat, header: bool) -> Result<Self> {
        match format {
            OutputFormat::Csv => {
                // Records keep every trailing description token, so widths vary.
                let mut w = csv::WriterBuilder::new().flexible(true).from_writer(sink);
                if header {
                    w.write_record(CSV_HEADER)?;
                }
                Ok(RowWriter::Csv(w))
            }
            OutputFormat::Jsonl => Ok(RowWriter::JsonLines(sink)),
        }
    }

    pub fn write_result(&mut self, file: &Path, result: &ExtractionResult) -> Result<()> {
        match self {
            RowWriter::Csv(w) => {
                for row in result.rows() {
                    w.write_record(&row)?;
                }
            }
            RowWriter::JsonLines(w) => {
                for record in &result.records {
                    let line = JsonRecord {
                        file: file.display().to_string(),
                        term: result.meta.term.as_deref(),
                        account_number: record.account_number.as_deref(),
                        currency: &record.currency,
                        fields: &record.fields,
                    };
                    serde_json::to_writer(&mut *w, &line)?;
                    w.write_all(b"\n")?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<()> {
        match self {
            RowWriter::Csv(mut w) => w.flush()?,
            RowWriter::JsonLines(mut w) => w.flush()?,
        }
        Ok(())
    }
}

/// `file,term` rows for the `meta` command.
pub fn write_meta(
    w: &mut csv::Writer<Box<dyn Write>>,
    file: &Path,
    meta: &DocumentMeta,
) -> Result<()> {
    let file = file.display().to_string();
    w.write_record([file.as_str(), meta.term.as_deref().unwrap_or("")])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use otpx_ingest::TransactionRecord;
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory sink so the test can read what the writer produced.
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn sample() -> ExtractionResult {
        ExtractionResult {
            meta: DocumentMeta {
                term: Some("01.01.23-31.01.23".into()),
            },
            records: vec![
                TransactionRecord {
                    account_number: Some("11771234-56781234".into()),
                    currency: "HUF".into(),
                    fields: vec!["02.01.23".into(), "03.01.23".into(), "-12500.00".into(), "ELMU".into()],
                },
                TransactionRecord {
                    account_number: None,
                    currency: "NA".into(),
                    fields: vec!["05.01.23".into(), "05.01.23".into(), "1.00".into(), "A, B".into(), "C".into()],
                },
            ],
        }
    }

    #[test]
    fn test_csv_rows_with_header() {
        let sink = Shared::default();
        let mut w = RowWriter::new(Box::new(sink.clone()), OutputFormat::Csv, true).unwrap();
        w.write_result(Path::new("a.pdf"), &sample()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            sink.text(),
            "term,account_number,currency,booking_date,value_date,amount,description\n\
             01.01.23-31.01.23,11771234-56781234,HUF,02.01.23,03.01.23,-12500.00,ELMU\n\
             01.01.23-31.01.23,,NA,05.01.23,05.01.23,1.00,\"A, B\",C\n"
        );
    }

    #[test]
    fn test_json_lines() {
        let sink = Shared::default();
        let mut w = RowWriter::new(Box::new(sink.clone()), OutputFormat::Jsonl, true).unwrap();
        w.write_result(Path::new("a.pdf"), &sample()).unwrap();
        w.finish().unwrap();

        let text = sink.text();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["file"], "a.pdf");
        assert_eq!(lines[0]["account_number"], "11771234-56781234");
        assert_eq!(lines[1]["account_number"], serde_json::Value::Null);
        assert_eq!(lines[1]["fields"][3], "A, B");
    }
}
