use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use rand::Rng as _;
use tabrl_engine::RngSeed;

/// Where a finished report goes: a file given by `--output`, or stdout.
#[derive(Debug)]
pub enum ReportSink {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl ReportSink {
    /// Opens the sink for `path`, creating or truncating the file.
    pub fn open(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(&path)
            .with_context(|| format!("cannot create report file {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    fn target(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    /// Writes `report` as pretty JSON followed by a newline, then flushes.
    pub fn write_report<T>(&mut self, report: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, report)
            .with_context(|| format!("cannot write report to {}", self.target()))?;
        writeln!(self)
            .and_then(|()| self.flush())
            .with_context(|| format!("cannot finish report on {}", self.target()))?;
        Ok(())
    }
}

impl io::Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(writer) => writer.write(buf),
            Self::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(writer) => writer.flush(),
            Self::File { writer, .. } => writer.flush(),
        }
    }
}

/// Writes `report` to `--output` (or stdout) and notes the file on stderr.
pub fn emit_report<T>(report: &T, output: Option<PathBuf>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut sink = ReportSink::open(output)?;
    sink.write_report(report)?;
    if let ReportSink::File { path, .. } = &sink {
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}

/// Loads a JSON config; `what` names it in error messages.
pub fn load_config<T, P>(what: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("cannot read {what} from {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a valid {what}", path.display()))
}

/// Seed from `--seed`, or a fresh random one.
pub fn resolve_seed(seed: Option<u64>) -> RngSeed {
    match seed {
        Some(value) => RngSeed::from_u64(value),
        None => rand::rng().random(),
    }
}
