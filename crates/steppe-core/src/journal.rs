//! Append-only journal of per-step network snapshots.

use crate::landscape::NetworkSnapshot;
use serde::Serialize;
use std::io::{self, Write};

/// Newline-delimited JSON sink: one serialized [`NetworkSnapshot`] per
/// step, flushed on [`finish`](Journal::finish).
///
/// `finish` consumes the journal, so the close happens exactly once.
pub struct Journal {
    out: Box<dyn Write>,
}

impl Journal {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    /// Append one snapshot record, terminated by a newline.
    pub fn append<A: Serialize>(&mut self, snapshot: &NetworkSnapshot<'_, A>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot).map_err(io::Error::other)?;
        self.out.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Flush and close the sink.
    pub fn finish(mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal").finish_non_exhaustive()
    }
}
