//! Delimited-text parser turning raw CSV into flat records.
//!
//! The format is deliberately naive, matching the import contract: the
//! first line is the comma-delimited header row, every following line is
//! one record, and fields are split on the raw delimiter with no quoting
//! or escaping support. Embedded commas in values are a documented
//! limitation, not a missing feature.
//!
//! Files are read as bytes and decoded with encoding auto-detection so
//! ISO-8859-1 / Windows-1252 exports survive the trip.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{FlatRecord, ParsedRow};

/// Field delimiter for the import format.
pub const DELIMITER: char = ',';

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed data rows with provenance.
    pub rows: Vec<ParsedRow>,
    /// Trimmed column headers, in file order.
    pub headers: Vec<String>,
    /// Detected or assumed encoding.
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Parse CSV text into flat records.
///
/// The first line is the header row; headers and values are trimmed.
/// A row shorter than the header list simply omits the trailing keys
/// from its [`FlatRecord`] (defaulting happens later, in the mapper).
/// Every line after the header is a record, blank interior lines
/// included: a blank line splits into one empty field, so it becomes a
/// record holding just the first header mapped to `""`. The header is
/// line 1.
///
/// Fails with [`CsvError::EmptySource`] when the content has fewer than
/// two lines, i.e. there is nothing after the header.
///
/// # Example
/// ```ignore
/// use userload::parse_content;
///
/// let csv = "name.firstName,age\nAda,36";
/// let result = parse_content(csv).unwrap();
///
/// assert_eq!(result.rows.len(), 1);
/// assert_eq!(result.rows[0].fields.get("name.firstName"), Some("Ada"));
/// ```
pub fn parse_content(content: &str) -> CsvResult<ParseResult> {
    let content = content.trim();
    let mut lines = content.lines();

    let header_line = lines.next().ok_or(CsvError::EmptySource)?;

    let headers: Vec<String> = header_line
        .split(DELIMITER)
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for (line_idx, line) in lines.enumerate() {
        let line_number = line_idx + 2; // +1 for 0-index, +1 for header

        let values: Vec<&str> = line.split(DELIMITER).collect();
        let mut fields = FlatRecord::new();

        for (i, header) in headers.iter().enumerate() {
            // Short rows omit their trailing headers entirely.
            if let Some(value) = values.get(i) {
                fields.insert(header.clone(), value.trim());
            }
        }

        rows.push(ParsedRow {
            line_number,
            raw: line.to_string(),
            fields,
        });
    }

    if rows.is_empty() {
        return Err(CsvError::EmptySource);
    }

    Ok(ParseResult {
        rows,
        headers,
        encoding: "utf-8".to_string(),
    })
}

/// Parse CSV bytes with encoding auto-detection.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);

    let mut result = parse_content(&content)?;
    result.encoding = encoding;
    Ok(result)
}

/// Parse a CSV file with encoding auto-detection.
pub fn parse_file<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let csv = "name.firstName,age\nAda,36\nGrace,40";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.headers, vec!["name.firstName", "age"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].fields.get("name.firstName"), Some("Ada"));
        assert_eq!(result.rows[0].fields.get("age"), Some("36"));
        assert_eq!(result.rows[1].fields.get("name.firstName"), Some("Grace"));
    }

    #[test]
    fn test_values_and_headers_trimmed() {
        let csv = " name , age \n Ada , 36 ";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.headers, vec!["name", "age"]);
        assert_eq!(result.rows[0].fields.get("name"), Some("Ada"));
        assert_eq!(result.rows[0].fields.get("age"), Some("36"));
    }

    #[test]
    fn test_short_row_omits_trailing_headers() {
        let csv = "a,b,c\n1,2";
        let result = parse_content(csv).unwrap();

        let fields = &result.rows[0].fields;
        assert_eq!(fields.get("a"), Some("1"));
        assert_eq!(fields.get("b"), Some("2"));
        assert_eq!(fields.get("c"), None);
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "a,b\n1,2,3,4";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.rows[0].fields.len(), 2);
        assert_eq!(result.rows[0].fields.get("b"), Some("2"));
    }

    #[test]
    fn test_blank_interior_line_is_a_record() {
        // A blank line splits into one empty field: it is still a
        // record, carrying the first header mapped to "".
        let csv = "a,b\n1,2\n\n3,4\n";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0].line_number, 2);
        assert_eq!(result.rows[1].line_number, 3);
        assert_eq!(result.rows[2].line_number, 4);

        let blank = &result.rows[1].fields;
        assert_eq!(blank.get("a"), Some(""));
        assert_eq!(blank.get("b"), None);
        assert_eq!(blank.len(), 1);
    }

    #[test]
    fn test_empty_header_names_accepted() {
        // Header cells may be empty; values land under the "" key,
        // later columns winning as with any duplicate header.
        let csv = ",\n1,2";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.headers, vec!["", ""]);
        assert_eq!(result.rows[0].fields.get(""), Some("2"));
        assert_eq!(result.rows[0].fields.len(), 1);
    }

    #[test]
    fn test_raw_line_preserved() {
        let csv = "a,b\n 1 ,2";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.rows[0].raw, " 1 ,2");
    }

    #[test]
    fn test_no_escaping_of_embedded_delimiters() {
        // Quoting is NOT supported: the comma inside the quotes splits.
        let csv = "a,b\n\"x,y\",z";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.rows[0].fields.get("a"), Some("\"x"));
        assert_eq!(result.rows[0].fields.get("b"), Some("y\""));
    }

    #[test]
    fn test_empty_source_error() {
        assert!(matches!(parse_content(""), Err(CsvError::EmptySource)));
        assert!(matches!(
            parse_content("name,age"),
            Err(CsvError::EmptySource)
        ));
        assert!(matches!(
            parse_content("name,age\n\n\n"),
            Err(CsvError::EmptySource)
        ));
    }

    #[test]
    fn test_duplicate_header_last_column_wins() {
        let csv = "a,a\n1,2";
        let result = parse_content(csv).unwrap();

        assert_eq!(result.rows[0].fields.get("a"), Some("2"));
        assert_eq!(result.rows[0].fields.len(), 1);
    }

    #[test]
    fn test_detect_encoding_utf8() {
        assert_eq!(detect_encoding("name,age\nAda,36".as_bytes()), "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert!(decoded.contains("Soci"));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "name.firstName,age\nAda,36").unwrap();

        let result = parse_file(file.path()).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].fields.get("age"), Some("36"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = parse_file("/definitely/not/here.csv");
        assert!(matches!(result, Err(CsvError::Io(_))));
    }
}
