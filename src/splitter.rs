use crate::errors::DecodeError;
use csv::{ReaderBuilder, StringRecord};

/// CSV settings for splitting one record: no header row, any number of
/// fields, fields kept untrimmed.
pub fn reader_builder() -> ReaderBuilder {
    let mut b = ReaderBuilder::new();
    b.has_headers(false).flexible(true);
    b
}

/// Split one raw record into its fields.
pub fn split_record(line: &str) -> Result<Vec<String>, DecodeError> {
    check_quoting(line)?;

    let mut rdr = reader_builder().from_reader(line.as_bytes());
    let mut record = StringRecord::new();

    if !rdr.read_record(&mut record)? {
        return Err(DecodeError::MalformedRecord { reason: "empty record".into() });
    }
    let fields = record.iter().map(str::to_string).collect();

    // A quoted newline stays inside one record; anything else after it is a second record.
    if rdr.read_record(&mut record)? {
        return Err(DecodeError::MalformedRecord {
            reason: "more than one record on the line".into(),
        });
    }
    Ok(fields)
}

/// Reject quoting the `csv` reader would silently accept: a quote inside an
/// unquoted field, a closing quote followed by anything but a delimiter or
/// line end, and a quoted field still open at the end of the record.
fn check_quoting(line: &str) -> Result<(), DecodeError> {
    let malformed = |reason: String| DecodeError::MalformedRecord { reason };
    let bytes = line.trim_end_matches(['\r', '\n']).as_bytes();
    let mut i = 0;
    let mut field = 0usize;

    loop {
        if bytes.get(i) == Some(&b'"') {
            let open = i;
            i += 1;
            loop {
                match bytes.get(i) {
                    None => {
                        return Err(malformed(format!(
                            "unclosed quote opened at byte {} in field {}",
                            open, field
                        )));
                    }
                    Some(b'"') if bytes.get(i + 1) == Some(&b'"') => i += 2,
                    Some(b'"') => {
                        i += 1;
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
            match bytes.get(i) {
                None | Some(b',') => {}
                Some(_) => {
                    return Err(malformed(format!(
                        "unexpected text after closing quote at byte {} in field {}",
                        i, field
                    )));
                }
            }
        } else {
            while let Some(&c) = bytes.get(i) {
                match c {
                    b',' => break,
                    b'"' => {
                        return Err(malformed(format!(
                            "bare quote at byte {} in unquoted field {}",
                            i, field
                        )));
                    }
                    _ => i += 1,
                }
            }
        }

        if i >= bytes.len() {
            return Ok(());
        }
        // On a delimiter: step over it to the next field.
        i += 1;
        field += 1;
    }
}
