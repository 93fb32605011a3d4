use crate::errors::AppError;
use crate::model::Message;
use chrono::{DateTime, Utc};
use csv::Writer;
use std::io::Write;

/// Destination for decoded messages.
pub trait MessageSink {
    fn write(&mut self, m: &Message) -> Result<(), AppError>;
    fn finish(&mut self) -> Result<(), AppError>;
}

/// One JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        JsonLinesSink { out }
    }
}

impl<W: Write> MessageSink for JsonLinesSink<W> {
    fn write(&mut self, m: &Message) -> Result<(), AppError> {
        serde_json::to_writer(&mut self.out, m)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.out.flush()?;
        Ok(())
    }
}

/// `{:?}` of each message, for eyeballing a feed.
pub struct DebugSink<W: Write> {
    out: W,
}

impl<W: Write> DebugSink<W> {
    pub fn new(out: W) -> Self {
        DebugSink { out }
    }
}

impl<W: Write> MessageSink for DebugSink<W> {
    fn write(&mut self, m: &Message) -> Result<(), AppError> {
        writeln!(self.out, "{:?}", m)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.out.flush()?;
        Ok(())
    }
}

const HEADER: [&str; 19] = [
    "message_type", "transmission_type",
    "session_id", "aircraft_id", "hex_id", "flight_id",
    "generated_date", "generated_time", "logged_date", "logged_time",
    "callsign", "altitude", "ground_speed", "track",
    "latitude", "longitude", "vertical_rate", "squawk",
    "transmission_description",
];

/// Normalised CSV: a header once, then one row per message. Unset attributes
/// are empty cells; timestamps use the wire layout in UTC.
pub struct CsvSink<W: Write> {
    wtr: Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        CsvSink { wtr: Writer::from_writer(out), header_written: false }
    }

    pub fn into_inner(self) -> Result<W, AppError> {
        self.wtr
            .into_inner()
            .map_err(|e| AppError::IO(format!("csv flush: {}", e)))
    }
}

fn date_time_cells(ts: Option<DateTime<Utc>>) -> (String, String) {
    match ts {
        Some(t) => (t.format("%Y/%m/%d").to_string(), t.format("%H:%M:%S%.3f").to_string()),
        None => (String::new(), String::new()),
    }
}

fn cell<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl<W: Write> MessageSink for CsvSink<W> {
    fn write(&mut self, m: &Message) -> Result<(), AppError> {
        if !self.header_written {
            self.wtr
                .write_record(HEADER)
                .map_err(|e| AppError::IO(format!("csv write header: {}", e)))?;
            self.header_written = true;
        }

        let (g_date, g_time) = date_time_cells(m.generated);
        let (l_date, l_time) = date_time_cells(m.logged);
        let description = if m.is_transmission() {
            m.transmission_type.describe()
        } else {
            ""
        };

        let row = [
            m.message_type.code().to_string(),
            m.transmission_type.code().to_string(),
            m.session_id.clone(),
            m.aircraft_id.clone(),
            m.hex_id.clone(),
            m.flight_id.clone(),
            g_date,
            g_time,
            l_date,
            l_time,
            m.callsign.clone(),
            cell(m.altitude),
            cell(m.ground_speed),
            cell(m.track),
            cell(m.latitude),
            cell(m.longitude),
            cell(m.vertical_rate),
            m.squawk.clone().unwrap_or_default(),
            description.to_string(),
        ];
        self.wtr
            .write_record(&row)
            .map_err(|e| AppError::IO(format!("csv write row: {}", e)))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.wtr
            .flush()
            .map_err(|e| AppError::IO(format!("csv flush: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_line;

    const LINE: &str = "MSG,3,1,1,4CA2C8,1,2023/05/01,10:15:30.500,2023/05/01,10:15:31.000,BAW123,35000,450.7,270.5,51.4775,-0.4614,0,,";

    #[test]
    fn csv_rows_mirror_the_wire_layout() {
        let m = decode_line(LINE).unwrap();
        let mut sink = CsvSink::new(Vec::new());
        sink.write(&m).unwrap();
        sink.write(&m).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("message_type,transmission_type,"));
        assert!(lines[0].ends_with(",squawk,transmission_description"));
        assert_eq!(
            lines[1],
            "MSG,3,1,1,4CA2C8,1,2023/05/01,10:15:30.500,2023/05/01,10:15:31.000,BAW123,35000,450,270.5,51.4775,-0.4614,0,,airborne position"
        );
    }

    #[test]
    fn json_lines_use_camel_case_and_null_for_unset() {
        let m = decode_line("SEL,1,,,,,,,,,,,,,,,").unwrap();
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write(&m).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.out).unwrap();
        let v: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(v["messageType"], "selectionChange");
        assert_eq!(v["transmissionType"], "identAndCategory");
        assert!(v["altitude"].is_null());
        assert!(v["squawk"].is_null());
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn debug_sink_writes_one_line_per_message() {
        let m = decode_line(LINE).unwrap();
        let mut sink = DebugSink::new(Vec::new());
        sink.write(&m).unwrap();
        let text = String::from_utf8(sink.out).unwrap();
        assert!(text.starts_with("Message {"));
        assert_eq!(text.lines().count(), 1);
    }
}
