use crate::decode::Decoder;
use crate::errors::{AppError, DecodeError};
use crate::model::Message;
use crate::splitter;
use log::{debug, trace};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Pulls records off a byte stream, one line per record, and decodes them.
///
/// A line that fails to split or decode is returned as an error and reading
/// continues with the next line; whether to stop is up to the caller. A bad
/// line never consumes the lines after it.
pub struct MessageReader<R> {
    rdr: BufReader<R>,
    decoder: Decoder,
    buf: Vec<u8>,
    line: u64,
}

impl MessageReader<File> {
    pub fn from_path(path: &Path, decoder: Decoder) -> Result<Self, AppError> {
        let f = File::open(path)
            .map_err(|e| AppError::IO(format!("open {}: {}", path.display(), e)))?;
        Ok(MessageReader::new(f, decoder))
    }
}

impl<R: Read> MessageReader<R> {
    pub fn new(rdr: R, decoder: Decoder) -> Self {
        MessageReader {
            rdr: BufReader::new(rdr),
            decoder,
            buf: Vec::new(),
            line: 0,
        }
    }

    /// Line number of the most recently read record (1-based, 0 before the first read).
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Next decoded message, or `None` at end of input. Blank lines are skipped.
    pub fn read_message(&mut self) -> Option<Result<Message, AppError>> {
        loop {
            self.buf.clear();
            match self.rdr.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(AppError::IO(format!("read: {}", e)))),
            }
            self.line += 1;

            let raw = match std::str::from_utf8(&self.buf) {
                Ok(s) => s.trim_end_matches(['\r', '\n']),
                Err(e) => {
                    let source = DecodeError::MalformedRecord { reason: format!("{}", e) };
                    debug!("line {}: {}", self.line, source);
                    return Some(Err(AppError::Decode { line: self.line, source }));
                }
            };
            if raw.is_empty() {
                trace!("line {}: blank", self.line);
                continue;
            }

            let decoded = splitter::split_record(raw).and_then(|fields| {
                trace!("line {}: {} fields", self.line, fields.len());
                self.decoder.decode(&fields)
            });
            return match decoded {
                Ok(msg) => Some(Ok(msg)),
                Err(source) => {
                    debug!("line {}: {}", self.line, source);
                    Some(Err(AppError::Decode { line: self.line, source }))
                }
            };
        }
    }
}

impl<R: Read> Iterator for MessageReader<R> {
    type Item = Result<Message, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DecodeErrorKind;
    use crate::model::MessageType;

    const FEED: &str = "\
MSG,1,1,1,4CA2C8,1,2023/05/01,10:15:30.000,2023/05/01,10:15:30.010,BAW123,,,,,,,,,,,0
XYZ,1,1,1,4CA2C8,1,,,,,,,,,,,
MSG,3,1,1,4CA2C8,1,,,,,,35000,,,51.4775,-0.4614,,,,,,0
";

    fn kind_of(r: &Result<Message, AppError>) -> Option<DecodeErrorKind> {
        r.as_ref().err().and_then(|e| e.as_decode()).map(|e| e.kind())
    }

    #[test]
    fn continues_after_a_bad_record() {
        let mut r = MessageReader::new(FEED.as_bytes(), Decoder::default());

        let first = r.read_message().unwrap().unwrap();
        assert_eq!(first.callsign, "BAW123");
        assert_eq!(r.line(), 1);

        let second = r.read_message().unwrap();
        assert_eq!(kind_of(&second), Some(DecodeErrorKind::UnknownMessageType));
        assert_eq!(r.line(), 2);

        let third = r.read_message().unwrap().unwrap();
        assert_eq!(third.message_type, MessageType::Transmission);
        assert_eq!(third.altitude, Some(35000));
        assert_eq!(r.line(), 3);

        assert!(r.read_message().is_none());
    }

    #[test]
    fn unclosed_quote_only_spoils_its_own_line() {
        let feed = "\
MSG,1,1,1,4CA2C8,1,,,,,\"BAW123,,,,,,
MSG,3,1,1,4CA2C8,1,,,,,,35000,,,51.4775,-0.4614,
MSG,3,1,1,4CA2C9,1,,,,,,36000,,,52.1,-1.2,
";
        let results: Vec<_> = MessageReader::new(feed.as_bytes(), Decoder::default()).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(kind_of(&results[0]), Some(DecodeErrorKind::MalformedRecord));
        assert_eq!(results[1].as_ref().unwrap().altitude, Some(35000));
        assert_eq!(results[2].as_ref().unwrap().hex_id, "4CA2C9");
    }

    #[test]
    fn bare_quote_is_reported_with_its_line() {
        let feed = "\nMSG,1,1,1,4CA2C8,1,,,,,BA\"W,,,,,,\n";
        let mut r = MessageReader::new(feed.as_bytes(), Decoder::default());
        let err = r.read_message().unwrap().unwrap_err();
        assert_eq!(err.as_decode().map(|e| e.kind()), Some(DecodeErrorKind::MalformedRecord));
        assert_eq!(r.line(), 2);
        assert!(r.read_message().is_none());
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let mut bytes = b"MSG,1,1,1,".to_vec();
        bytes.extend([0xff, 0xfe]);
        bytes.extend(b",,,,,,,,,,,,,\nCLK,1,,,,,,,,,,,,,,,\n");
        let results: Vec<_> = MessageReader::new(&bytes[..], Decoder::default()).collect();
        assert_eq!(kind_of(&results[0]), Some(DecodeErrorKind::MalformedRecord));
        assert_eq!(results[1].as_ref().unwrap().message_type, MessageType::Click);
    }

    #[test]
    fn short_records_are_malformed() {
        let r = MessageReader::new("MSG,3,1\n".as_bytes(), Decoder::default());
        let results: Vec<_> = r.collect();
        assert_eq!(results.len(), 1);
        assert_eq!(kind_of(&results[0]), Some(DecodeErrorKind::MalformedRecord));
    }

    #[test]
    fn empty_input_yields_nothing() {
        let mut r = MessageReader::new("".as_bytes(), Decoder::default());
        assert!(r.read_message().is_none());
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let mut r = MessageReader::new("CLK,1,,,,,,,,,,,,,,,".as_bytes(), Decoder::default());
        assert!(r.read_message().unwrap().is_ok());
        assert!(r.read_message().is_none());
    }
}
