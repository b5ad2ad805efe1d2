use crate::error::ParseError;
use crate::ir::Record;
use tracing::debug;

pub const ID_COLUMN: &str = "id";
pub const VALUE_COLUMN: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl ParserConfig {
    /// Accepts any single ASCII character as the delimiter.
    pub fn with_delimiter(delimiter: char) -> Result<Self, ParseError> {
        u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .map(|delimiter| Self { delimiter })
            .ok_or(ParseError::InvalidDelimiter(delimiter))
    }
}

/// Parses comma-separated `id,value` rows. See [`parse_records_with`].
pub fn parse_records(input: &str) -> Result<Vec<Record>, ParseError> {
    parse_records_with(input, &ParserConfig::default())
}

/// Parses delimited text with a header row naming at least an `id` and a
/// `value` column; any other columns are ignored. Quoted fields may contain
/// the delimiter. An empty `value` parses as `None`.
pub fn parse_records_with(
    input: &str,
    config: &ParserConfig,
) -> Result<Vec<Record>, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers = reader.headers().map_err(malformed)?.clone();
    let id_col = column_index(&headers, ID_COLUMN)?;
    let value_col = column_index(&headers, VALUE_COLUMN)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(malformed)?;
        let line = row.position().map(|pos| pos.line()).unwrap_or(0);
        let id = row.get(id_col).unwrap_or_default();
        if id.is_empty() {
            return Err(ParseError::EmptyId { line });
        }
        let value = parse_value(row.get(value_col).unwrap_or_default(), line)?;
        records.push(Record::new(id, value));
    }

    debug!(rows = records.len(), "parsed csv records");
    Ok(records)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, ParseError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
}

fn parse_value(raw: &str, line: u64) -> Result<Option<f64>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(ParseError::InvalidValue {
            line,
            value: trimmed.to_string(),
        }),
    }
}

fn malformed(err: csv::Error) -> ParseError {
    let line = err.position().map(|pos| pos.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        _ => err.to_string(),
    };
    ParseError::Malformed { line, message }
}
