//! Date and datetime codecs (ISO-8601 raw storage)

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde_json::Value;
use tracing::trace;

use super::{format_date, format_datetime, AttrValue, Codec, CodecKind};
use crate::errors::{ViewError, ViewResult};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Timestamps without an offset; read in the fallback offset
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn raw_text(value: &AttrValue) -> Option<&str> {
    match value {
        AttrValue::String(s) | AttrValue::Raw(Value::String(s)) => Some(s.trim()),
        _ => None,
    }
}

/// Date codec
#[derive(Debug, Clone, Copy, Default)]
pub struct DateCodec;

impl DateCodec {
    fn parse(&self, text: &str) -> ViewResult<NaiveDate> {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.date())
            })
            .ok_or_else(|| ViewError::cast(self.name(), text))
    }

    fn to_date(&self, value: &AttrValue) -> ViewResult<Option<NaiveDate>> {
        match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => Ok(None),
            AttrValue::Date(d) => Ok(Some(*d)),
            AttrValue::DateTime(dt) => Ok(Some(dt.date_naive())),
            other => match raw_text(other) {
                Some("") => Ok(None),
                Some(text) => self.parse(text).map(Some),
                None => Err(ViewError::cast(self.name(), other)),
            },
        }
    }
}

impl Codec for DateCodec {
    fn name(&self) -> &'static str {
        "date"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Date
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        Ok(self.to_date(value)?.map_or(AttrValue::Null, AttrValue::Date))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(self
            .to_date(value)?
            .map_or(Value::Null, |d| Value::String(format_date(d))))
    }
}

/// Datetime codec.
///
/// Raw timestamps without an offset are read in the configured fallback
/// offset, or the process's local offset when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeCodec {
    fallback_offset: Option<FixedOffset>,
}

impl DateTimeCodec {
    pub fn new(fallback_offset: Option<FixedOffset>) -> Self {
        Self { fallback_offset }
    }

    fn offset(&self) -> FixedOffset {
        self.fallback_offset
            .unwrap_or_else(|| *Local::now().offset())
    }

    fn parse(&self, text: &str) -> ViewResult<DateTime<FixedOffset>> {
        let with_offset = DateTime::parse_from_rfc3339(text).ok().or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        });
        if let Some(dt) = with_offset {
            return Ok(dt);
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .ok_or_else(|| ViewError::cast(self.name(), text))?;
        let offset = self.offset();
        trace!(
            event = "NAIVE_DATETIME_OFFSET_APPLIED",
            timestamp = text,
            offset = %offset,
        );
        offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| ViewError::cast(self.name(), text))
    }

    fn to_datetime(&self, value: &AttrValue) -> ViewResult<Option<DateTime<FixedOffset>>> {
        match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => Ok(None),
            AttrValue::DateTime(dt) => Ok(Some(*dt)),
            AttrValue::Date(d) => self
                .offset()
                .from_local_datetime(&d.and_time(NaiveTime::MIN))
                .single()
                .map(Some)
                .ok_or_else(|| ViewError::cast(self.name(), d)),
            other => match raw_text(other) {
                Some("") => Ok(None),
                Some(text) => self.parse(text).map(Some),
                None => Err(ViewError::cast(self.name(), other)),
            },
        }
    }
}

impl Codec for DateTimeCodec {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::DateTime
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        Ok(self
            .to_datetime(value)?
            .map_or(AttrValue::Null, AttrValue::DateTime))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(self
            .to_datetime(value)?
            .map_or(Value::Null, |dt| Value::String(format_datetime(&dt))))
    }
}
