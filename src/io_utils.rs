//! Cell-level CSV input for column profiling.
//!
//! [`CellReader`] yields every data row as decoded cells, with cells that match
//! a configured null token already reduced to `None`. A path of `-` reads from
//! stdin. Row numbers in errors count the header as row 1.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

/// Explicit delimiter first, then `.tsv` → tab, otherwise comma.
pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    })
}

/// True when `raw`, trimmed, equals one of `tokens` ignoring ASCII case.
pub fn matches_null_token(tokens: &[String], raw: &str) -> bool {
    let trimmed = raw.trim();
    tokens
        .iter()
        .any(|token| token.trim().eq_ignore_ascii_case(trimmed))
}

pub struct CellReader {
    reader: csv::Reader<Box<dyn Read>>,
    encoding: &'static Encoding,
    headers: Vec<String>,
    null_tokens: Vec<String>,
    record: csv::ByteRecord,
    rows: usize,
}

impl CellReader {
    pub fn open(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let input: Box<dyn Read> = if path == Path::new("-") {
            Box::new(std::io::stdin().lock())
        } else {
            Box::new(BufReader::new(
                File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
            ))
        };
        Self::from_reader(input, delimiter, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))
    }

    /// Reads and decodes the header row immediately.
    pub fn from_reader(
        input: Box<dyn Read>,
        delimiter: u8,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .double_quote(true)
            .flexible(false)
            .from_reader(input);
        let header_record = reader
            .byte_headers()
            .context("Reading CSV header row")?
            .clone();
        let headers = decode_cells(&header_record, encoding)?;
        Ok(Self {
            reader,
            encoding,
            headers,
            null_tokens: Vec::new(),
            record: csv::ByteRecord::new(),
            rows: 0,
        })
    }

    pub fn with_null_tokens(mut self, tokens: &[String]) -> Self {
        self.null_tokens = tokens.to_vec();
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows returned so far.
    pub fn rows_read(&self) -> usize {
        self.rows
    }

    /// Next data row, or `None` at end of input. Null-token cells are `None`.
    pub fn next_row(&mut self) -> Result<Option<Vec<Option<String>>>> {
        let line = self.rows + 2;
        let more = self
            .reader
            .read_byte_record(&mut self.record)
            .with_context(|| format!("Reading row {line}"))?;
        if !more {
            return Ok(None);
        }
        let cells = decode_cells(&self.record, self.encoding)
            .with_context(|| format!("Decoding row {line}"))?
            .into_iter()
            .map(|cell| (!matches_null_token(&self.null_tokens, &cell)).then_some(cell))
            .collect();
        self.rows += 1;
        Ok(Some(cells))
    }
}

fn decode_cells(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                return Err(anyhow!(
                    "Failed to decode text with encoding {}",
                    encoding.name()
                ));
            }
            Ok(text.into_owned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn reader_over(bytes: &'static [u8]) -> CellReader {
        CellReader::from_reader(Box::new(Cursor::new(bytes)), b',', UTF_8).expect("headers")
    }

    #[test]
    fn delimiter_follows_extension_unless_overridden() {
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.csv"), None), b',');
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("a.tsv"), Some(b';')),
            b';'
        );
    }

    #[test]
    fn encodings_resolve_by_label() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some(" windows-1252 ")).unwrap(), WINDOWS_1252);
        assert!(resolve_encoding(Some("klingon")).is_err());
    }

    #[test]
    fn rows_reduce_null_tokens_to_none() {
        let tokens = vec![String::new(), "NULL".to_string()];
        let mut reader = reader_over(b"id,note\n1,null\n2, kept \n3,\n").with_null_tokens(&tokens);
        assert_eq!(reader.headers(), ["id".to_string(), "note".to_string()]);
        assert_eq!(
            reader.next_row().unwrap(),
            Some(vec![Some("1".to_string()), None])
        );
        assert_eq!(
            reader.next_row().unwrap(),
            Some(vec![Some("2".to_string()), Some(" kept ".to_string())])
        );
        assert_eq!(
            reader.next_row().unwrap(),
            Some(vec![Some("3".to_string()), None])
        );
        assert_eq!(reader.next_row().unwrap(), None);
        assert_eq!(reader.rows_read(), 3);
    }

    #[test]
    fn without_tokens_every_cell_is_kept() {
        let mut reader = reader_over(b"a\n\n\"\"\n");
        assert_eq!(reader.next_row().unwrap(), Some(vec![Some(String::new())]));
    }

    #[test]
    fn decoding_uses_requested_encoding_and_reports_row() {
        let mut latin = CellReader::from_reader(
            Box::new(Cursor::new(&b"name\nCaf\xe9\n"[..])),
            b',',
            WINDOWS_1252,
        )
        .unwrap();
        assert_eq!(
            latin.next_row().unwrap(),
            Some(vec![Some("Caf\u{e9}".to_string())])
        );

        let mut utf8 = reader_over(b"name\nok\nCaf\xe9\n");
        assert!(utf8.next_row().unwrap().is_some());
        let err = utf8.next_row().unwrap_err();
        assert!(format!("{err:#}").contains("Decoding row 3"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut reader = reader_over(b"a,b\n1\n");
        assert!(reader.next_row().is_err());
    }
}
