//! Flowing text and tables onto PDF pages.
//!
//! Build a [Document] out of [Paragraph]s, [Table]s and page breaks, then
//! [Document::write] it: text is shaped into justified lines, tables are
//! sized and split into row chunks, and everything is paginated into content
//! streams that are checked against the PDF graphics-object grammar as they
//! are built.

mod colour;
pub use colour::*;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

/// Pagination of content items onto pages
pub mod layout;
pub use layout::{
    HeaderFooter, Margins, PageNumber, PageOrientation, PageSettings, PageSize, RenderedPage,
};

mod model;
pub use model::*;

mod outline;
pub use outline::*;

mod page;

mod rect;
pub use rect::*;

pub(crate) mod refs;

/// Content stream operators and the graphics-object state machine that
/// validates them
pub mod stream;
pub use stream::{ContentStream, Operator};

/// Table grid placement, column balancing and row chunking
pub mod table;

/// Breaking styled text into lines
pub mod text;
pub use text::Hyphenator;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
