//! Writing records to the ingestion and query transports.
//!
//! The ingestion side is any [`std::io::Write`] stream (a TCP connection in
//! production); the query side is anything implementing [`Executor`]. Neither
//! retries: transport failures are returned to the caller as they are.

use std::io::Write;

use tracing::{debug, warn};

use qdb_common::{BoxError, Error, Result};
use qdb_config::WriterConfig;

use crate::model::Model;
use crate::record::Record;

/// Per-call write options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write to this table instead of the record's own.
    pub table_name: Option<String>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    fn model<R: Record>(&self, record: &R) -> Result<Model> {
        let model = Model::new(record)?;
        Ok(match &self.table_name {
            Some(name) if !name.is_empty() => model.with_table_name(name.clone()),
            _ => model,
        })
    }
}

/// Writes rendered lines straight to the ingestion stream.
#[derive(Debug)]
pub struct LineWriter<W: Write> {
    inner: W,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one record as a line.
    pub fn write<R: Record>(&mut self, record: &R, options: &WriteOptions) -> Result<()> {
        let line = options.model(record)?.marshal_line();
        self.inner.write_all(&line)?;
        Ok(())
    }

    /// Write pre-rendered line protocol text as is.
    pub fn write_message(&mut self, message: &[u8]) -> Result<()> {
        self.inner.write_all(message)?;
        Ok(())
    }

    /// Write several records in a single stream write. Every record is
    /// serialized first; if any fails nothing is written.
    pub fn write_batch<'a, R, I>(&mut self, records: I, options: &WriteOptions) -> Result<()>
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut buf = String::new();
        let mut lines = 0usize;
        for record in records {
            buf.push_str(&options.model(record)?.to_line());
            lines += 1;
        }
        if lines == 0 {
            return Ok(());
        }
        self.inner.write_all(buf.as_bytes())?;
        debug!(lines, bytes = buf.len(), "batch written");
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Buffers lines and writes them out in batches of
/// [`WriterConfig::batch_size`]. Pending lines are flushed on drop.
#[derive(Debug)]
pub struct BatchedWriter<W: Write> {
    inner: W,
    config: WriterConfig,
    options: WriteOptions,
    pending: String,
    pending_lines: usize,
}

impl<W: Write> BatchedWriter<W> {
    pub fn new(inner: W, config: WriterConfig) -> Self {
        let options = WriteOptions {
            table_name: config.table_name.clone(),
        };
        Self {
            inner,
            config,
            options,
            pending: String::new(),
            pending_lines: 0,
        }
    }

    /// Queue one record, flushing if the batch is full.
    pub fn push<R: Record>(&mut self, record: &R) -> Result<()> {
        let line = self.options.model(record)?.to_line();
        self.pending.push_str(&line);
        self.pending_lines += 1;
        if self.pending_lines >= self.config.batch_size.max(1) {
            self.flush()?;
        }
        Ok(())
    }

    pub fn pending_lines(&self) -> usize {
        self.pending_lines
    }

    /// Write out every pending line. Each batch reaches the stream at most
    /// once; a failed batch is dropped, never resent.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending_lines == 0 {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.pending);
        let lines = std::mem::replace(&mut self.pending_lines, 0);

        if let Err(e) = self.inner.write_all(batch.as_bytes()) {
            warn!(error = %e, lines, "batch write failed, lines dropped");
            return Err(e.into());
        }
        if self.config.flush_on_write {
            self.inner.flush()?;
        }
        debug!(lines, bytes = batch.len(), "batch flushed");
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Drop for BatchedWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "flush on drop failed");
        }
    }
}

/// The query transport, as far as table creation needs it.
pub trait Executor {
    fn execute(&mut self, sql: &str) -> std::result::Result<(), BoxError>;
}

/// Create the record's table unless it already exists.
pub fn create_table_if_not_exists<E, R>(
    executor: &mut E,
    record: &R,
    options: &WriteOptions,
) -> Result<()>
where
    E: Executor + ?Sized,
    R: Record,
{
    let model = options.model(record)?;
    if let Some(table_options) = model.table_options() {
        table_options
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;
    }
    let sql = model.create_table_statement();
    debug!(table = model.table_name(), %sql, "creating table");
    executor.execute(&sql).map_err(Error::Transport)
}
