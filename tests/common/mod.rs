#![allow(dead_code)]

use pdf_flow::stream::{parse, Operator};
use pdf_flow::{Document, Margins, Pt, RenderedPage, SpanFont, StandardFont};

/// A document set in 10pt Courier (6pt per character, 12pt lines) on a
/// letter page with one inch margins: 78 characters by 54 lines
pub fn courier_document() -> (Document, SpanFont) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut doc = Document::new();
    let courier = doc.add_font(StandardFont::Courier.into());
    let font = SpanFont::new(courier, Pt(10.0));
    doc.set_default_font(font);
    doc.settings.margins(Margins::all(Pt(72.0)));
    doc.info.title("integration test");
    (doc, font)
}

/// A text fragment shown on a page, with the baseline it was shown at
#[derive(Debug, Clone, PartialEq)]
pub struct Shown {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Re-read a page's content stream and collect every `Tj` with its position
pub fn shown(page: &RenderedPage) -> Vec<Shown> {
    let mut out = Vec::new();
    let (mut x, mut y) = (0.0, 0.0);
    for op in parse(&page.content).expect("page content parses") {
        match op {
            Operator::BeginText => {
                x = 0.0;
                y = 0.0;
            }
            Operator::SetTextMatrix(m) => {
                x = m[4];
                y = m[5];
            }
            Operator::MoveText(tx, ty) => {
                x += tx;
                y += ty;
            }
            Operator::ShowText(text) => out.push(Shown {
                text: String::from_utf8_lossy(text.bytes()).into_owned(),
                x,
                y,
            }),
            _ => {}
        }
    }
    out
}

/// Every word shown on a page, in stream order
pub fn words(page: &RenderedPage) -> Vec<String> {
    shown(page)
        .iter()
        .flat_map(|s| {
            s.text
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
