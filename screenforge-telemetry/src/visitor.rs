use std::collections::BTreeMap;
use std::fmt;
use tracing::field::{Field, Visit};

/// Flattens the fields of a render event into strings.
///
/// Values recorded with `%` or `?` keep their formatted text, so
/// `slot = %name` is stored as `name` without quotes.
#[derive(Debug, Default)]
pub struct EventFields {
    fields: BTreeMap<String, String>,
}

impl EventFields {
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.fields
    }

    fn put(&mut self, field: &Field, value: String) {
        self.fields.insert(field.name().to_owned(), value);
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string());
    }
}
