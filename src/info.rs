use crate::refs::{ObjectReferences, RefType};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// General document metadata such as title, author, etc. The creation date
/// is not part of it: it is always the time the document is written.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Info {
    /// The title of the document.
    pub title: Option<String>,
    /// The author(s) of the document. No prescribed format.
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Adobe Acrobat suggests a comma separated list
    pub keywords: Option<String>,
    /// The application that produced the original content
    pub creator: Option<String>,
    /// The application that converted it to PDF. Defaults to this crate.
    pub producer: Option<String>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author<S: ToString>(&mut self, author: S) -> &mut Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn keywords<S: ToString>(&mut self, keywords: S) -> &mut Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    pub fn creator<S: ToString>(&mut self, creator: S) -> &mut Self {
        self.creator = Some(creator.to_string());
        self
    }

    pub fn producer<S: ToString>(&mut self, producer: S) -> &mut Self {
        self.producer = Some(producer.to_string());
        self
    }

    /// Set a field by its metadata dictionary key (`Title`, `Author`, ...).
    /// Creation dates are assigned when writing, so `CreationDate` and
    /// unknown keys are ignored.
    pub fn set<S: ToString>(&mut self, key: &str, value: S) -> &mut Self {
        match key.to_ascii_lowercase().as_str() {
            "title" => self.title(value),
            "author" => self.author(value),
            "subject" => self.subject(value),
            "keywords" => self.keywords(value),
            "creator" => self.creator(value),
            "producer" => self.producer(value),
            "creationdate" => {
                log::warn!("ignoring CreationDate: it is set when the document is written");
                self
            }
            _ => {
                log::warn!("ignoring unknown metadata key `{key}`");
                self
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(TextStr(keywords.as_str()));
        }
        if let Some(creator) = &self.creator {
            info.creator(TextStr(creator.as_str()));
        }
        match &self.producer {
            Some(producer) => info.producer(TextStr(producer.as_str())),
            None => info.producer(TextStr(concat!(
                env!("CARGO_PKG_NAME"),
                " v",
                env!("CARGO_PKG_VERSION")
            ))),
        };
        info.creation_date(now());
    }
}

fn now() -> PDate {
    use chrono::prelude::*;
    let now = Local::now();
    let offset = now.offset().fix().local_minus_utc();
    let hours = offset / 3600;
    let minutes = ((offset - hours * 3600) / 60).abs();
    PDate::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8)
        .utc_offset_hour(hours as i8)
        .utc_offset_minute(minutes as u8)
}
