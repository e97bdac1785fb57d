//! Per-document fan-out. Each statement is extracted on a blocking worker;
//! results are consumed in discovery order so output is deterministic.

use anyhow::{Context, Result};
use otpx_ingest::{ExtractionResult, extract_meta_path, extract_path};
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::vec;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::discover::discover;
use crate::output::{RowWriter, open_sink, write_meta};

type Outcome<T> = (PathBuf, otpx_ingest::Result<T>);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub documents: usize,
    pub extracted: usize,
    pub skipped: usize,
    pub records: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, {} with records, {} skipped, {} records",
            self.documents, self.extracted, self.skipped, self.records
        )
    }
}

/// Runs `work` over files on blocking workers, at most `jobs` at a time, and
/// hands back outcomes in file order. Only in-flight results are held.
pub struct OrderedJobs<T, F> {
    files: vec::IntoIter<PathBuf>,
    in_flight: VecDeque<JoinHandle<Outcome<T>>>,
    jobs: usize,
    work: F,
}

impl<T, F> OrderedJobs<T, F>
where
    T: Send + 'static,
    F: Fn(&Path) -> otpx_ingest::Result<T> + Copy + Send + 'static,
{
    pub fn new(files: Vec<PathBuf>, jobs: usize, work: F) -> Self {
        Self {
            files: files.into_iter(),
            in_flight: VecDeque::new(),
            jobs: jobs.max(1),
            work,
        }
    }

    fn top_up(&mut self) {
        while self.in_flight.len() < self.jobs {
            let Some(path) = self.files.next() else {
                break;
            };
            let work = self.work;
            self.in_flight.push_back(tokio::task::spawn_blocking(move || {
                let outcome = work(&path);
                (path, outcome)
            }));
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub async fn next(&mut self) -> Option<Result<Outcome<T>>> {
        self.top_up();
        let handle = self.in_flight.pop_front()?;
        Some(handle.await.map_err(anyhow::Error::from))
    }
}

/// One-line account of an extracted document for the log.
fn describe(path: &Path, result: &ExtractionResult) -> String {
    let mut line = format!("{}: {} records", path.display(), result.records.len());
    if let Some((from, to)) = result.meta.period() {
        line.push_str(&format!(", period {} .. {}", from, to));
    }
    if let Some(first) = result.records.iter().find_map(|r| r.date()) {
        line.push_str(&format!(", first booking {}", first));
    }
    line
}

fn matched_files(source: &str, cfg: &Config) -> Result<Vec<PathBuf>> {
    let files = discover(source, &cfg.discovery.pattern)?;
    if files.is_empty() {
        log::warn!("no documents match {}", source);
    }
    Ok(files)
}

pub async fn extract_all(source: &str, out: Option<&Path>, cfg: &Config) -> Result<Summary> {
    let files = matched_files(source, cfg)?;
    let mut writer = RowWriter::new(open_sink(out)?, cfg.output.format, cfg.output.header)?;
    let mut summary = Summary {
        documents: files.len(),
        ..Summary::default()
    };

    let mut queue = OrderedJobs::new(files, cfg.run.jobs, |p: &Path| extract_path(p));
    while let Some(next) = queue.next().await {
        let (path, outcome) = next?;
        match outcome {
            Ok(Some(result)) => {
                log::info!("{}", describe(&path, &result));
                summary.extracted += 1;
                summary.records += result.records.len();
                writer.write_result(&path, &result)?;
            }
            Ok(None) => log::info!("{}: no transactions", path.display()),
            Err(e) if cfg.run.fail_fast => {
                return Err(e).with_context(|| format!("decoding {}", path.display()));
            }
            Err(e) => {
                summary.skipped += 1;
                log::warn!("skipping {}: {}", path.display(), e);
            }
        }
    }

    writer.finish()?;
    Ok(summary)
}

pub async fn meta_all(source: &str, out: Option<&Path>, cfg: &Config) -> Result<()> {
    let files = matched_files(source, cfg)?;
    let mut w = csv::Writer::from_writer(open_sink(out)?);

    let mut queue = OrderedJobs::new(files, cfg.run.jobs, |p: &Path| extract_meta_path(p));
    while let Some(next) = queue.next().await {
        let (path, outcome) = next?;
        match outcome {
            Ok(meta) => write_meta(&mut w, &path, &meta)?,
            Err(e) if cfg.run.fail_fast => {
                return Err(e).with_context(|| format!("decoding {}", path.display()));
            }
            Err(e) => log::warn!("skipping {}: {}", path.display(), e),
        }
    }

    w.flush()?;
    Ok(())
}
