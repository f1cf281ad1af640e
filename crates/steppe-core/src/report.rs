//! Tabular per-step logger over explicitly declared model columns.
//!
//! The original system reflected over the model's public struct fields,
//! skipping those tagged hidden. Here the model declares its columns as
//! `(name, accessor, visibility)` tuples once, and the writer stays free of
//! runtime introspection.

use crate::sim::Stats;
use std::fmt;
use std::io::{self, Write};

/// A single model-reported value.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Int(v) => write!(f, "{v}"),
            ColumnValue::Float(v) => write!(f, "{v}"),
            ColumnValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// One declared column: name, visibility, and a value accessor.
///
/// Hidden columns mirror the original's hide tag: declared alongside the
/// rest but skipped in output.
pub struct ColumnSpec<M> {
    pub name: &'static str,
    pub hidden: bool,
    pub value: fn(&M) -> ColumnValue,
}

impl<M> ColumnSpec<M> {
    pub fn visible(name: &'static str, value: fn(&M) -> ColumnValue) -> Self {
        Self {
            name,
            hidden: false,
            value,
        }
    }

    pub fn hidden(name: &'static str, value: fn(&M) -> ColumnValue) -> Self {
        Self {
            name,
            hidden: true,
            value,
        }
    }
}

/// Tab-separated table writer: a header row the first time it is used, then
/// one data row per step.
pub struct TableWriter<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    pub fn write_row<M>(
        &mut self,
        stats: &Stats,
        model: &M,
        columns: &[ColumnSpec<M>],
    ) -> io::Result<()> {
        if !self.header_written {
            write!(self.out, "step\tevents")?;
            for column in columns.iter().filter(|c| !c.hidden) {
                write!(self.out, "\t{}", column.name)?;
            }
            writeln!(self.out)?;
            self.header_written = true;
        }

        write!(self.out, "{}\t{}", stats.steps, stats.events)?;
        for column in columns.iter().filter(|c| !c.hidden) {
            write!(self.out, "\t{}", (column.value)(model))?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
