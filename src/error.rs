use thiserror::Error;

use crate::stream::GraphicsObject;

/// Broad classes of failure. Every [PDFError] belongs to exactly one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller described something impossible (bad spans, colours, fonts)
    Configuration,
    /// The content is valid but does not fit the space it was given
    Capacity,
    /// An emitting component broke the content stream grammar
    Protocol,
    /// Reading fonts or writing output failed
    Io,
}

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("no font with index {0} has been added to the document")]
    UnknownFont(usize),

    #[error("colour component {0} is outside the range [0, 1]")]
    ColourOutOfRange(f32),

    #[error("invalid hyphenation pattern `{0}`")]
    InvalidHyphenationPattern(String),

    #[error("a table needs at least one column with a positive width")]
    InvalidColumns,

    #[error("cell {cell} has an empty span ({row_span} rows by {col_span} columns)")]
    InvalidSpan {
        cell: usize,
        row_span: usize,
        col_span: usize,
    },

    #[error("cell {cell} spans {col_span} columns from column {column} but the table only has {columns}")]
    CellSpanOverflow {
        cell: usize,
        column: usize,
        col_span: usize,
        columns: usize,
    },

    #[error("cell {cell} overlaps row {row}, column {column} which is already covered")]
    CellOverlap {
        cell: usize,
        row: usize,
        column: usize,
    },

    #[error("table is incomplete: row {row}, column {column} is not covered by any cell")]
    TableIncomplete { row: usize, column: usize },

    #[error("Unable to fit all contents into the width of the table (short by {shortfall:.2}pt)")]
    TableTooNarrow { shortfall: f32 },

    #[error("column widths did not settle after {passes} balancing passes")]
    ColumnBalanceDiverged { passes: usize },

    #[error("`{word}` is {width:.2}pt wide but the line is only {available:.2}pt wide")]
    WordTooWide {
        word: String,
        width: f32,
        available: f32,
    },

    #[error("content cannot fit on a single page ({height:.2}pt needed, {available:.2}pt available)")]
    ContentTooTall { height: f32, available: f32 },

    #[error("operator `{operator}` is not allowed in {mode}")]
    IllegalOperator {
        operator: &'static str,
        mode: GraphicsObject,
    },

    #[error("restore state (Q) without a matching save state (q)")]
    StateStackUnderflow,

    #[error("content stream cannot be finished: {0}")]
    IncompleteContentStream(&'static str),

    #[error("malformed content stream near byte {offset}: {reason}")]
    MalformedContentStream { offset: usize, reason: String },

    #[error("bookmark `{0}` was never placed on a page")]
    UnplacedBookmark(String),

    #[error("page {0} is missing from the document")]
    PageMissing(usize),

    #[error("{context}")]
    /// Wraps another error with the place it happened, forming a cause chain
    Layout {
        context: String,
        #[source]
        source: Box<PDFError>,
    },
}

impl PDFError {
    /// Wrap this error with a description of what was being done
    pub fn context<S: ToString>(self, context: S) -> PDFError {
        PDFError::Layout {
            context: context.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error of a [PDFError::Layout] chain
    pub fn root_cause(&self) -> &PDFError {
        match self {
            PDFError::Layout { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Classify the error, looking through any context wrappers
    pub fn kind(&self) -> ErrorKind {
        match self {
            PDFError::Layout { source, .. } => source.kind(),
            PDFError::Io(_) | PDFError::FaceParsingError(_) => ErrorKind::Io,
            PDFError::UnknownFont(_)
            | PDFError::ColourOutOfRange(_)
            | PDFError::InvalidHyphenationPattern(_)
            | PDFError::InvalidColumns
            | PDFError::InvalidSpan { .. }
            | PDFError::CellSpanOverflow { .. }
            | PDFError::CellOverlap { .. }
            | PDFError::TableIncomplete { .. } => ErrorKind::Configuration,
            PDFError::TableTooNarrow { .. }
            | PDFError::ColumnBalanceDiverged { .. }
            | PDFError::WordTooWide { .. }
            | PDFError::ContentTooTall { .. } => ErrorKind::Capacity,
            PDFError::IllegalOperator { .. }
            | PDFError::StateStackUnderflow
            | PDFError::IncompleteContentStream(_)
            | PDFError::MalformedContentStream { .. }
            | PDFError::UnplacedBookmark(_)
            | PDFError::PageMissing(_) => ErrorKind::Protocol,
        }
    }
}
