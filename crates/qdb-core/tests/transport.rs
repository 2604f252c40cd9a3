//! Writers and executors against in-memory transports.

use std::io::{self, Write};

use qdb_core::{
    create_table_if_not_exists, BatchedWriter, BoxError, Error, Executor, FieldSet, LineWriter,
    Record, WriteOptions, WriterConfig,
};

struct Metric {
    name: String,
    value: i64,
}

impl Record for Metric {
    fn describe(&self, fields: &mut FieldSet) {
        fields
            .field("Name", "name;symbol", &self.name)
            .field("Value", "value;long", &self.value);
    }
}

struct BadMetric {
    value: i64,
}

impl Record for BadMetric {
    fn describe(&self, fields: &mut FieldSet) {
        fields.field("Value", "value;int", &self.value);
    }
}

fn metric(name: &str, value: i64) -> Metric {
    Metric {
        name: name.to_string(),
        value,
    }
}

/// A stream that refuses every write.
struct Closed;

impl Write for Closed {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_message_is_passed_through() {
    let mut writer = LineWriter::new(Vec::new());
    writer.write_message(b"raw,a=b c=1i\n").unwrap();
    writer.write(&metric("cpu", 3), &WriteOptions::default()).unwrap();
    assert_eq!(
        String::from_utf8(writer.into_inner()).unwrap(),
        "raw,a=b c=1i\nmetrics,name=cpu value=3i\n"
    );
}

#[test]
fn failed_serialization_writes_nothing() {
    let mut writer = LineWriter::new(Vec::new());
    let err = writer
        .write(&BadMetric { value: 5 }, &WriteOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), 30);
    assert!(writer.get_ref().is_empty());
}

#[test]
fn batch_table_override_applies_to_every_record() {
    let mut writer = LineWriter::new(Vec::new());
    let options = WriteOptions::new().with_table_name("m2");
    writer
        .write_batch(&[metric("a", 1), metric("b", 2)], &options)
        .unwrap();
    assert_eq!(
        writer.into_inner(),
        b"m2,name=a value=1i\nm2,name=b value=2i\n"
    );
}

#[test]
fn empty_batch_writes_nothing() {
    let mut writer = LineWriter::new(Vec::new());
    writer
        .write_batch(std::iter::empty::<&Metric>(), &WriteOptions::default())
        .unwrap();
    assert!(writer.into_inner().is_empty());
}

#[test]
fn stream_errors_propagate() {
    let mut writer = LineWriter::new(Closed);
    let err = writer
        .write(&metric("a", 1), &WriteOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert_eq!(err.code(), 60);
}

#[test]
fn batched_writer_uses_configured_table() {
    let mut out = Vec::new();
    {
        let config = WriterConfig::default().with_batch_size(10).with_table_name("fleet");
        let mut writer = BatchedWriter::new(&mut out, config);
        for i in 0..3 {
            writer.push(&metric("m", i + 1)).unwrap();
        }
        assert_eq!(writer.pending_lines(), 3);
        writer.flush().unwrap();
        assert_eq!(writer.pending_lines(), 0);
    }
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().all(|l| l.starts_with("fleet,name=m ")));
}

struct Laggy;

impl Record for Laggy {
    fn describe(&self, fields: &mut FieldSet) {
        fields.field("N", "n;int", &1i32);
    }

    fn table_options(&self) -> Option<qdb_core::TableOptions> {
        Some(qdb_core::TableOptions::new().commit_lag("soon"))
    }
}

struct Recording(Vec<String>);

impl Executor for Recording {
    fn execute(&mut self, sql: &str) -> Result<(), BoxError> {
        self.0.push(sql.to_string());
        Ok(())
    }
}

#[test]
fn invalid_table_options_never_reach_executor() {
    let mut exec = Recording(Vec::new());
    let err = create_table_if_not_exists(&mut exec, &Laggy, &WriteOptions::default()).unwrap_err();
    assert_eq!(err.code(), 70);
    assert!(exec.0.is_empty());
}

struct Refusing;

impl Executor for Refusing {
    fn execute(&mut self, _sql: &str) -> Result<(), BoxError> {
        Err("permission denied".into())
    }
}

#[test]
fn executor_errors_are_transport_errors() {
    let err = create_table_if_not_exists(&mut Refusing, &metric("a", 1), &WriteOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), 61);
    assert_eq!(err.to_string(), "transport error: permission denied");
}
