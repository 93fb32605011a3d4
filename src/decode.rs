//! Field-level decoding of SBS-1 BaseStation records.
//!
//! Pure functions only: no logging, no I/O. The first failing field aborts the
//! decode and the partially built value is never returned.

use crate::errors::DecodeError;
use crate::model::{Message, MessageType, TransmissionType};
use crate::splitter;
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Number of positional fields every record must carry.
pub const MIN_FIELDS: usize = 17;

/// Date and time sub-fields are joined with a literal `T` before parsing.
const TIMESTAMP_FMT: &str = "%Y/%m/%dT%H:%M:%S%.f";

pub const MESSAGE_TYPE: usize = 0;
pub const TRANSMISSION_TYPE: usize = 1;
pub const SESSION_ID: usize = 2;
pub const AIRCRAFT_ID: usize = 3;
pub const HEX_ID: usize = 4;
pub const FLIGHT_ID: usize = 5;
pub const GENERATED_DATE: usize = 6;
pub const GENERATED_TIME: usize = 7;
pub const LOGGED_DATE: usize = 8;
pub const LOGGED_TIME: usize = 9;
pub const CALLSIGN: usize = 10;
pub const ALTITUDE: usize = 11;
pub const GROUND_SPEED: usize = 12;
pub const TRACK: usize = 13;
pub const LATITUDE: usize = 14;
pub const LONGITUDE: usize = 15;
pub const VERTICAL_RATE: usize = 16;

/// Zone the receiver wrote its timestamps in. The wire format carries none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedZone {
    Fixed(FixedOffset),
    /// Offsets follow the zone's rules for each record's own date.
    Named(Tz),
}

impl FeedZone {
    fn to_utc(self, naive: NaiveDateTime) -> Result<DateTime<Utc>, String> {
        match self {
            FeedZone::Fixed(off) => single(off.from_local_datetime(&naive)),
            FeedZone::Named(tz) => single(tz.from_local_datetime(&naive)),
        }
    }
}

impl fmt::Display for FeedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedZone::Fixed(off) => write!(f, "{}", off),
            FeedZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

fn single<Z: TimeZone>(r: LocalResult<DateTime<Z>>) -> Result<DateTime<Utc>, String> {
    match r {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(a, b) => Err(format!(
            "ambiguous local time, offset {} or {}",
            a.offset().fix(),
            b.offset().fix()
        )),
        LocalResult::None => Err("local time skipped by a clock change".into()),
    }
}

/// Stateless record decoder.
///
/// The only setting is the zone the receiver wrote its timestamps in;
/// decoded instants are always stored in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoder {
    zone: FeedZone,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder { zone: FeedZone::Fixed(Utc.fix()) }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Decoder { zone: FeedZone::Fixed(offset) }
    }

    pub fn with_zone(tz: Tz) -> Self {
        Decoder { zone: FeedZone::Named(tz) }
    }

    pub fn zone(&self) -> FeedZone {
        self.zone
    }

    /// Split a raw line and decode it.
    pub fn decode_line(&self, line: &str) -> Result<Message, DecodeError> {
        let fields = splitter::split_record(line)?;
        self.decode(&fields)
    }

    /// Decode one record that has already been split into fields.
    pub fn decode<S: AsRef<str>>(&self, fields: &[S]) -> Result<Message, DecodeError> {
        if fields.len() < MIN_FIELDS {
            return Err(DecodeError::TooFewFields {
                expected: MIN_FIELDS,
                found: fields.len(),
            });
        }
        let f = |i: usize| fields[i].as_ref();

        let message_type = f(MESSAGE_TYPE).parse::<MessageType>()?;
        let transmission_type = f(TRANSMISSION_TYPE).parse::<TransmissionType>()?;

        let generated = self.timestamp(f(GENERATED_DATE), f(GENERATED_TIME), GENERATED_DATE)?;
        let logged = self.timestamp(f(LOGGED_DATE), f(LOGGED_TIME), LOGGED_DATE)?;

        let altitude = optional(f(ALTITUDE), ALTITUDE, parse_i32)?;
        let ground_speed = optional(f(GROUND_SPEED), GROUND_SPEED, truncate_i32)?;
        let track = optional(f(TRACK), TRACK, parse_f64)?;

        // Longitude is only read when latitude is present, and is then mandatory.
        let (latitude, longitude) = match optional(f(LATITUDE), LATITUDE, parse_f64)? {
            Some(lat) => (Some(lat), Some(numeric(f(LONGITUDE), LONGITUDE, parse_f64)?)),
            None => (None, None),
        };

        let vertical_rate = optional(f(VERTICAL_RATE), VERTICAL_RATE, truncate_i16)?;

        Ok(Message {
            message_type,
            transmission_type,
            session_id: f(SESSION_ID).to_string(),
            aircraft_id: f(AIRCRAFT_ID).to_string(),
            hex_id: f(HEX_ID).to_string(),
            flight_id: f(FLIGHT_ID).to_string(),
            generated,
            logged,
            callsign: f(CALLSIGN).to_string(),
            altitude,
            ground_speed,
            track,
            latitude,
            longitude,
            vertical_rate,
            squawk: None,
        })
    }

    /// Parse a date/time field pair. The time field is not looked at when
    /// the date field is empty.
    fn timestamp(
        &self,
        date: &str,
        time: &str,
        index: usize,
    ) -> Result<Option<DateTime<Utc>>, DecodeError> {
        if date.is_empty() {
            return Ok(None);
        }
        let joined = format!("{}T{}", date, time);
        let at = NaiveDateTime::parse_from_str(&joined, TIMESTAMP_FMT)
            .map_err(|e| e.to_string())
            .and_then(|naive| self.zone.to_utc(naive));
        match at {
            Ok(t) => Ok(Some(t)),
            Err(reason) => Err(DecodeError::TimestampFormat { index, value: joined, reason }),
        }
    }
}

/// Decode with the default (UTC) decoder.
pub fn decode<S: AsRef<str>>(fields: &[S]) -> Result<Message, DecodeError> {
    Decoder::default().decode(fields)
}

/// Split and decode one raw line with the default (UTC) decoder.
pub fn decode_line(line: &str) -> Result<Message, DecodeError> {
    Decoder::default().decode_line(line)
}

fn optional<T>(
    raw: &str,
    index: usize,
    parse: fn(&str) -> Result<T, String>,
) -> Result<Option<T>, DecodeError> {
    if raw.is_empty() {
        return Ok(None);
    }
    numeric(raw, index, parse).map(Some)
}

fn numeric<T>(
    raw: &str,
    index: usize,
    parse: fn(&str) -> Result<T, String>,
) -> Result<T, DecodeError> {
    parse(raw).map_err(|reason| DecodeError::NumericFormat {
        index,
        value: raw.to_string(),
        reason,
    })
}

fn parse_i32(s: &str) -> Result<i32, String> {
    s.parse::<i32>().map_err(|e| e.to_string())
}

fn parse_f64(s: &str) -> Result<f64, String> {
    s.parse::<f64>().map_err(|e| e.to_string())
}

// Speeds and rates are written as decimals but stored truncated toward zero,
// never rounded.
fn truncate_i32(s: &str) -> Result<i32, String> {
    let v = parse_f64(s)?.trunc();
    if v.is_finite() && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Ok(v as i32)
    } else {
        Err(format!("{} does not fit in 32 bits", s))
    }
}

fn truncate_i16(s: &str) -> Result<i16, String> {
    let v = parse_f64(s)?.trunc();
    if v.is_finite() && v >= i16::MIN as f64 && v <= i16::MAX as f64 {
        Ok(v as i16)
    } else {
        Err(format!("{} does not fit in 16 bits", s))
    }
}
