//! Scanning query rows back into records.

use chrono::{DateTime, TimeZone, Utc};
use qdb_core::{
    bind, scan_into, Bytes, Destination, Error, FieldSet, FieldSetMut, Json, Model, Record, Row,
    ScanAdapter, ScanColumn, ScanError, ScanRecord, Scanner, Slot, Value, ValueRow,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    retries: u32,
}

#[derive(Debug, Default, PartialEq)]
struct Position {
    x: f64,
    y: f64,
}

impl Record for Position {
    fn describe(&self, fields: &mut FieldSet) {
        fields.field("X", "x;double", &self.x).field("Y", "y;double", &self.y);
    }
}

impl ScanRecord for Position {
    fn describe_mut<'r>(&'r mut self, fields: &mut FieldSetMut<'r>) {
        fields
            .field("X", "x;double", &mut self.x)
            .field("Y", "y;double", &mut self.y);
    }
}

#[derive(Debug, Default, PartialEq)]
struct Device {
    name: String,
    firmware: Bytes,
    settings: Json<Settings>,
    pos: Position,
    note: Option<String>,
    seen: DateTime<Utc>,
    skipped: i32,
}

impl Record for Device {
    fn describe(&self, fields: &mut FieldSet) {
        fields
            .field("Name", "name;symbol", &self.name)
            .field("Firmware", "firmware;binary", &self.firmware)
            .field("Settings", "settings;json", &self.settings)
            .embedded("Pos", "pos;embedded;embeddedPrefix:pos_", &self.pos)
            .field("Note", "note;string", &self.note)
            .field("Seen", "seen;timestamp;designatedTS:true", &self.seen)
            .field("Skipped", "-", &self.skipped);
    }
}

impl ScanRecord for Device {
    fn describe_mut<'r>(&'r mut self, fields: &mut FieldSetMut<'r>) {
        fields
            .field("Name", "name;symbol", &mut self.name)
            .field("Firmware", "firmware;binary", &mut self.firmware)
            .field("Settings", "settings;json", &mut self.settings)
            .embedded("Pos", "pos;embedded;embeddedPrefix:pos_", &mut self.pos)
            .field("Note", "note;string", &mut self.note)
            .field("Seen", "seen;timestamp;designatedTS:true", &mut self.seen)
            .field("Skipped", "-", &mut self.skipped);
    }
}

#[test]
fn destinations_follow_column_order() {
    let mut device = Device::default();
    let columns = Model::new(&device).unwrap().columns();
    assert_eq!(columns, "name, firmware, settings, pos_x, pos_y, note, seen");

    let (schema, destinations) = bind(&mut device).unwrap();
    assert_eq!(schema.columns(), columns);
    let bound: Vec<_> = destinations
        .iter()
        .map(|d| (d.column(), d.is_adapted()))
        .collect();
    assert_eq!(
        bound,
        [
            ("name", false),
            ("firmware", true),
            ("settings", true),
            ("pos_x", false),
            ("pos_y", false),
            ("note", false),
            ("seen", false),
        ]
    );
}

#[test]
fn row_scans_into_record() {
    // {"retries":3}
    let settings = "eyJyZXRyaWVzIjozfQ==";
    let mut row = ValueRow(vec![
        Value::Str("edge-1".into()),
        Value::Str("AQI=".into()),
        Value::Str(settings.into()),
        Value::F64(1.0),
        Value::F64(2.5),
        Value::Null,
        Value::I64(1_000_000),
    ]);

    let mut device = Device {
        note: Some("stale".into()),
        skipped: 7,
        ..Device::default()
    };
    scan_into(&mut row, &mut device).unwrap();

    assert_eq!(
        device,
        Device {
            name: "edge-1".into(),
            firmware: Bytes(vec![1, 2]),
            settings: Json(Settings { retries: 3 }),
            pos: Position { x: 1.0, y: 2.5 },
            note: None,
            seen: Utc.timestamp_opt(1, 0).unwrap(),
            skipped: 7,
        }
    );
}

#[test]
fn scan_error_names_field() {
    let mut row = ValueRow(vec![
        Value::Str("edge-1".into()),
        Value::Str("not base64!".into()),
        Value::Null,
        Value::F64(0.0),
        Value::F64(0.0),
        Value::Null,
        Value::Null,
    ]);
    let mut device = Device::default();
    let err = scan_into(&mut row, &mut device).unwrap_err();
    assert_eq!(err.field(), Some("Firmware"));
    assert!(matches!(
        err,
        Error::Scan {
            source: ScanError::Base64(_),
            ..
        }
    ));
}

/// Upper-cases whatever it is given.
#[derive(Debug, Default, PartialEq)]
struct Shout(String);

impl Scanner for Shout {
    fn scan(&mut self, src: Value) -> Result<(), ScanError> {
        match src {
            Value::Str(s) => {
                self.0 = s.to_uppercase();
                Ok(())
            }
            other => Err(ScanError::Custom(format!("shout needs text, got {}", other.kind()))),
        }
    }
}

impl ScanColumn for Shout {
    fn scan_column(&mut self, src: Value) -> Result<(), ScanError> {
        Scanner::scan(self, src)
    }

    fn into_slot<'r>(&'r mut self) -> Slot<'r>
    where
        Self: Sized + 'r,
    {
        Slot::Adapted(ScanAdapter::new(self))
    }
}

#[derive(Debug, Default)]
struct Greeting {
    text: Shout,
}

impl Record for Greeting {
    fn describe(&self, fields: &mut FieldSet) {
        fields.field("Text", "text;string", &self.text.0);
    }
}

impl ScanRecord for Greeting {
    fn describe_mut<'r>(&'r mut self, fields: &mut FieldSetMut<'r>) {
        fields.field("Text", "text;string", &mut self.text);
    }
}

/// A row that hands out text columns by name lookup, like a driver would.
struct NamedRow(Vec<(&'static str, Value)>);

impl Row for NamedRow {
    fn scan(&mut self, destinations: &mut [Destination<'_>]) -> qdb_core::Result<()> {
        for dest in destinations.iter_mut() {
            let value = self
                .0
                .iter()
                .find(|(name, _)| *name == dest.column())
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Null);
            dest.assign(value)?;
        }
        Ok(())
    }
}

#[test]
fn custom_scanner_goes_through_adapter() {
    let mut greeting = Greeting::default();
    let mut row = NamedRow(vec![("text", Value::Str("hello".into()))]);
    scan_into(&mut row, &mut greeting).unwrap();
    assert_eq!(greeting.text, Shout("HELLO".into()));

    let mut row = NamedRow(vec![]);
    let err = scan_into(&mut row, &mut greeting).unwrap_err();
    assert_eq!(err.to_string(), "Text: shout needs text, got null");
}
