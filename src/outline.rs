use pdf_writer::{Finish, Pdf, Ref, TextStr};

use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::PDFError;

/// Refers to a bookmark declared with [Outline::declare]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BookmarkId(usize);

impl BookmarkId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a bookmark's content landed: a page index and the point on that
/// page a reader should jump to
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Location {
    pub page: usize,
    pub left: Pt,
    pub top: Pt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub title: String,
    pub parent: Option<BookmarkId>,
    pub location: Option<Location>,
}

/// The document outline. Bookmarks are declared up front and attached to
/// content; pagination fills in where each one ended up.
#[derive(Default, Debug, Clone)]
pub struct Outline {
    entries: Vec<OutlineEntry>,
}

impl Outline {
    pub fn new() -> Outline {
        Outline::default()
    }

    /// Declare a bookmark, optionally nested under another one
    pub fn declare<S: ToString>(&mut self, title: S, parent: Option<BookmarkId>) -> BookmarkId {
        let id = BookmarkId(self.entries.len());
        self.entries.push(OutlineEntry {
            title: title.to_string(),
            parent,
            location: None,
        });
        id
    }

    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn get(&self, id: BookmarkId) -> Option<&OutlineEntry> {
        self.entries.get(id.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record where a bookmark's content was first placed. Later placements
    /// of the same bookmark are ignored.
    pub(crate) fn locate(&mut self, id: BookmarkId, location: Location) {
        match self.entries.get_mut(id.0) {
            Some(entry) if entry.location.is_none() => {
                log::debug!(
                    "bookmark `{}` located on page {} at {:.2}",
                    entry.title,
                    location.page + 1,
                    *location.top
                );
                entry.location = Some(location);
            }
            Some(_) => {}
            None => log::warn!("ignoring unknown bookmark #{}", id.0),
        }
    }

    /// The same bookmarks with no locations
    pub(crate) fn unplaced(&self) -> Outline {
        Outline {
            entries: self
                .entries
                .iter()
                .map(|e| OutlineEntry {
                    location: None,
                    ..e.clone()
                })
                .collect(),
        }
    }

    /// Every declared bookmark must have been placed
    pub fn check(&self) -> Result<(), PDFError> {
        match self.entries.iter().find(|e| e.location.is_none()) {
            Some(entry) => Err(PDFError::UnplacedBookmark(entry.title.clone())),
            None => Ok(()),
        }
    }

    fn children(&self, parent: Option<BookmarkId>) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.parent == parent)
            .map(|(i, _)| i)
            .collect()
    }

    fn descendants(&self, parent: Option<BookmarkId>) -> i32 {
        self.children(parent)
            .into_iter()
            .map(|i| 1 + self.descendants(Some(BookmarkId(i))))
            .sum()
    }

    /// Write the outline tree. Returns the root's reference, or `None` if
    /// there are no bookmarks.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        writer: &mut Pdf,
    ) -> Result<Option<Ref>, PDFError> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        self.check()?;

        let root = refs.gen(RefType::Outlines);
        let ids: Vec<Ref> = (0..self.entries.len())
            .map(|i| refs.gen(RefType::OutlineEntry(i)))
            .collect();

        let top = self.children(None);
        let mut outline = writer.outline(root);
        if let (Some(first), Some(last)) = (top.first(), top.last()) {
            outline.first(ids[*first]);
            outline.last(ids[*last]);
        }
        outline.count(self.descendants(None));
        outline.finish();

        for (i, entry) in self.entries.iter().enumerate() {
            let Some(location) = entry.location else {
                return Err(PDFError::UnplacedBookmark(entry.title.clone()));
            };
            let page = refs
                .get(RefType::Page(location.page))
                .ok_or(PDFError::PageMissing(location.page))?;
            let siblings = self.children(entry.parent);
            let position = siblings.iter().position(|&s| s == i).unwrap_or_default();
            let children = self.children(Some(BookmarkId(i)));

            let mut item = writer.outline_item(ids[i]);
            item.title(TextStr(entry.title.as_str()));
            item.parent(match entry.parent {
                Some(parent) => ids[parent.0],
                None => root,
            });
            if position > 0 {
                item.prev(ids[siblings[position - 1]]);
            }
            if let Some(next) = siblings.get(position + 1) {
                item.next(ids[*next]);
            }
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                item.first(ids[*first]);
                item.last(ids[*last]);
                item.count(self.descendants(Some(BookmarkId(i))));
            }
            item.dest()
                .page(page)
                .xyz(*location.left, *location.top, None);
        }

        Ok(Some(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_bookmarks_must_be_placed() {
        let mut outline = Outline::new();
        let chapter = outline.declare("Chapter 1", None);
        let section = outline.declare("Section 1.1", Some(chapter));
        assert!(matches!(
            outline.check(),
            Err(PDFError::UnplacedBookmark(t)) if t == "Chapter 1"
        ));

        let here = Location {
            page: 0,
            left: Pt(72.0),
            top: Pt(700.0),
        };
        outline.locate(chapter, here);
        outline.locate(section, here);
        // only the first placement counts
        outline.locate(
            chapter,
            Location {
                page: 3,
                ..here
            },
        );
        assert!(outline.check().is_ok());
        assert_eq!(outline.get(chapter).unwrap().location, Some(here));
        assert_eq!(outline.descendants(None), 2);
        assert_eq!(outline.children(Some(chapter)), vec![section.index()]);
    }
}
