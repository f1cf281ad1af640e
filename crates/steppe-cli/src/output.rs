//! Run-output bootstrapping: output directory, journal file, table log.

use anyhow::Context;
use rand::Rng;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use steppe_core::Journal;

/// Where one run writes its artifacts: `<out>/steppe.<run_id>/`.
pub struct RunOutput {
    pub run_id: String,
    pub dir: PathBuf,
}

impl RunOutput {
    /// Create the output directory tree. A random run id is drawn when the
    /// caller supplies none. Failures here are fatal configuration errors:
    /// nothing has stepped yet.
    pub fn prepare(out_dir: &str, run_id: Option<String>) -> anyhow::Result<Self> {
        let run_id = run_id.unwrap_or_else(|| format!("{}", rand::rng().random::<u32>()));
        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating output directory {out_dir}"))?;
        let dir = PathBuf::from(out_dir).join(format!("steppe.{run_id}"));
        fs::create_dir(&dir)
            .with_context(|| format!("creating run directory {}", dir.display()))?;
        Ok(Self { run_id, dir })
    }

    /// Open the journal sink at `journal.jsonl` inside the run directory.
    pub fn open_journal(&self) -> anyhow::Result<Journal> {
        let path = self.dir.join("journal.jsonl");
        let file = File::create(&path)
            .with_context(|| format!("creating journal {}", path.display()))?;
        tracing::info!(path = %path.display(), "journaling simulation states");
        Ok(Journal::new(Box::new(BufWriter::new(file))))
    }

    /// Table-log sink: the `log` file inside the run directory, or stdout.
    pub fn open_log(&self, to_file: bool) -> anyhow::Result<Box<dyn Write>> {
        if to_file {
            let path = self.dir.join("log");
            let file = File::create(&path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        } else {
            Ok(Box::new(io::stdout()))
        }
    }
}
