use thiserror::Error;

/// Failure while reading the CSV table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing required column `{0}` in header")]
    MissingColumn(String),
    #[error("line {line}: malformed row: {message}")]
    Malformed { line: u64, message: String },
    #[error("line {line}: empty id")]
    EmptyId { line: u64 },
    #[error("line {line}: invalid value `{value}` (expected a non-negative number)")]
    InvalidValue { line: u64, value: String },
    #[error("delimiter `{0}` is not a single ASCII character")]
    InvalidDelimiter(char),
}

/// Failure while stratifying records into a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("orphan node `{id}`: parent `{parent_id}` does not exist")]
    OrphanNode { id: String, parent_id: String },
    #[error("no root: every record has a parent")]
    NoRoot,
    #[error("multiple roots: {}", .ids.join(", "))]
    MultipleRoots { ids: Vec<String> },
    #[error("duplicate id `{id}`")]
    DuplicateId { id: String },
}

/// Failure while packing a tree into circles.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("invalid {name} {value}")]
    InvalidOption { name: &'static str, value: f64 },
    #[error("padding {padding} does not fit: layout did not settle after {passes} passes")]
    PaddingDoesNotFit { padding: f64, passes: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
