//! Validate the on-disk ledger and locate a torn trailing record.
//!
//! A crash mid-append can leave a partial last row: too few fields or no
//! record terminator. Everything before that row is intact because rows are
//! only ever appended. A malformed row anywhere else is real corruption.
//! Rows may end in LF or CRLF.

use ::csv::{ByteRecord, ReaderBuilder};

use super::entry::COLUMNS;

/// Result of scanning ledger bytes.
#[derive(Debug)]
pub(super) struct Scan {
    /// Byte length of the valid prefix (header plus complete rows).
    pub valid_len: u64,
    /// Header record, if a complete one was found.
    pub header: Option<ByteRecord>,
    /// Complete data rows with their 1-based record number.
    pub rows: Vec<(u64, ByteRecord)>,
}

impl Scan {
    pub fn is_torn(&self, total_len: u64) -> bool {
        self.valid_len < total_len
    }
}

#[derive(Debug)]
pub(super) struct ScanError {
    pub record: u64,
    pub message: String,
}

pub(super) fn scan(bytes: &[u8]) -> Result<Scan, ScanError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut header = None;
    let mut rows = Vec::new();
    let mut valid_len = 0u64;
    let mut torn: Option<(u64, String)> = None;
    let mut record = ByteRecord::new();
    let mut number = 0u64;

    loop {
        let more = rdr.read_byte_record(&mut record).map_err(|e| ScanError {
            record: number + 1,
            message: e.to_string(),
        })?;
        if !more {
            break;
        }
        number += 1;
        if let Some((at, message)) = torn.take() {
            return Err(ScanError { record: at, message });
        }

        let mut end = rdr.position().byte();
        let last = end.checked_sub(1).and_then(|i| bytes.get(i as usize));
        if !matches!(last, Some(b'\n' | b'\r')) {
            torn = Some((number, "record is not terminated".to_string()));
            continue;
        }
        // The reader stops between the two bytes of a CRLF terminator.
        if last == Some(&b'\r') && bytes.get(end as usize) == Some(&b'\n') {
            end += 1;
        }
        // A complete first record is the header whatever its width; the
        // caller compares it against the expected columns.
        let width = header.as_ref().map_or(record.len(), ByteRecord::len);
        if header.is_some() && record.len() != width {
            torn = Some((
                number,
                format!("expected {} fields, found {}", width, record.len()),
            ));
            continue;
        }

        valid_len = end;
        if header.is_none() {
            header = Some(record.clone());
        } else {
            rows.push((number, record.clone()));
        }
    }

    Ok(Scan {
        valid_len,
        header,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_line() -> String {
        format!("{}\n", COLUMNS.join(","))
    }

    fn row(id: &str) -> String {
        format!("{id},Title,,,,,,,,,,,,,,,,2026-01-01T00:00:00Z\n")
    }

    #[test]
    fn clean_file_is_fully_valid() {
        let data = format!("{}{}{}", header_line(), row("a"), row("b"));
        let s = scan(data.as_bytes()).unwrap();
        assert_eq!(s.valid_len, data.len() as u64);
        assert!(s.header.is_some());
        assert_eq!(s.rows.len(), 2);
        assert!(!s.is_torn(data.len() as u64));
    }

    #[test]
    fn unterminated_tail_is_excluded() {
        let good = format!("{}{}", header_line(), row("a"));
        let mut data = good.clone();
        let partial = row("b");
        data.push_str(&partial[..partial.len() - 1]);
        let s = scan(data.as_bytes()).unwrap();
        assert_eq!(s.valid_len, good.len() as u64);
        assert_eq!(s.rows.len(), 1);
        assert!(s.is_torn(data.len() as u64));
    }

    #[test]
    fn short_tail_inside_quotes_is_excluded() {
        let good = format!("{}{}", header_line(), row("a"));
        let data = format!("{good}b,Title,\"line one\nline two");
        let s = scan(data.as_bytes()).unwrap();
        assert_eq!(s.valid_len, good.len() as u64);
        assert_eq!(s.rows.len(), 1);
    }

    #[test]
    fn bad_row_followed_by_good_row_is_corrupt() {
        let data = format!("{}a,short\n{}", header_line(), row("b"));
        let err = scan(data.as_bytes()).unwrap_err();
        assert_eq!(err.record, 2);
    }

    #[test]
    fn crlf_rows_with_multiline_field_are_valid() {
        let header = format!("{}\r\n", COLUMNS.join(","));
        let multiline = concat!(
            "b,Title,\"line one\r\nline two\",",
            ",,,,,,,,,,,,,,2026-01-01T00:00:00Z\r\n"
        );
        let data = format!("{header}{}{multiline}", row("a").replace('\n', "\r\n"));
        let s = scan(data.as_bytes()).unwrap();
        assert_eq!(s.valid_len, data.len() as u64);
        assert_eq!(s.rows.len(), 2);
        assert_eq!(&s.rows[1].1[2], b"line one\r\nline two");
        assert!(!s.is_torn(data.len() as u64));
    }

    #[test]
    fn crlf_file_with_torn_tail_keeps_complete_rows() {
        let good = format!("{}\r\n{}", COLUMNS.join(","), row("a").replace('\n', "\r\n"));
        let data = format!("{good}b,Tit");
        let s = scan(data.as_bytes()).unwrap();
        assert_eq!(s.valid_len, good.len() as u64);
        assert_eq!(s.rows.len(), 1);
    }

    #[test]
    fn complete_header_of_any_width_is_kept() {
        let data = "video_id,title,notes\n";
        let s = scan(data.as_bytes()).unwrap();
        assert_eq!(s.valid_len, data.len() as u64);
        assert_eq!(s.header.unwrap().len(), 3);
    }

    #[test]
    fn torn_header_leaves_nothing_valid() {
        let data = "video_id,title,desc";
        let s = scan(data.as_bytes()).unwrap();
        assert_eq!(s.valid_len, 0);
        assert!(s.header.is_none());
    }
}
