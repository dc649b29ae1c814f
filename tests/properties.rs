use id_arena::Arena;
use pdf_flow::table::{CellWidthHelper, Column};
use pdf_flow::text::TextBlock;
use pdf_flow::{Font, Hyphenator, PDFError, Paragraph, Pt, SpanFont, StandardFont};
use proptest::prelude::*;

fn fonts() -> (Arena<Font>, SpanFont, SpanFont) {
    let mut fonts: Arena<Font> = Arena::new();
    let courier = fonts.alloc(StandardFont::Courier.into());
    let helvetica = fonts.alloc(StandardFont::Helvetica.into());
    (
        fonts,
        SpanFont::new(courier, Pt(10.0)),
        SpanFont::new(helvetica, Pt(11.0)),
    )
}

proptest! {
    #[test]
    fn lines_never_exceed_their_width(
        text in "[a-z]{1,12}( [a-z]{1,12}){0,60}",
        width in 120.0f32..400.0,
        hyphenate: bool,
        proportional: bool,
    ) {
        let (fonts, courier, helvetica) = fonts();
        let font = if proportional { helvetica } else { courier };
        let paragraph = Paragraph::from_text(&text).with_hyphenation(hyphenate);
        let runs = paragraph.resolve(font).unwrap();
        let block = TextBlock::shape(
            &paragraph,
            &runs,
            Pt(width),
            &fonts,
            Hyphenator::english(),
        )
        .unwrap();

        for line in block.lines() {
            prop_assert!(
                *line.natural_width() <= width + 1e-3,
                "`{}` is {} wide in {}",
                line.text(),
                *line.natural_width(),
                width
            );
        }

        let shown: String = block
            .lines()
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" ");
        if !hyphenate {
            let placed: Vec<&str> = shown.split_whitespace().collect();
            let given: Vec<&str> = text.split_whitespace().collect();
            prop_assert_eq!(placed, given);
        }
    }

    #[test]
    fn hyphenation_is_deterministic(word in "[a-z]{1,20}") {
        let hyphenator = Hyphenator::english();
        let first = hyphenator.breaks(&word);
        prop_assert_eq!(&first, &hyphenator.breaks(&word));
        let n = word.chars().count();
        prop_assert!(first.iter().all(|&b| b >= 2 && b <= n - 2));
        prop_assert_eq!(hyphenator.hyphenate(&word).concat(), word);
    }

    #[test]
    fn balancing_conserves_the_table_width(
        widths in prop::collection::vec((10.0f32..150.0, 0.0f32..1.6), 1..8)
    ) {
        let mut columns: Vec<Column> = widths
            .iter()
            .enumerate()
            .map(|(i, &(preferred, need))| {
                let mut column = Column::new(i, Pt(preferred));
                column.minimum = Pt(preferred * need);
                column
            })
            .collect();
        let preferred: f32 = columns.iter().map(|c| *c.preferred).sum();
        let minimum: f32 = columns.iter().map(|c| *c.minimum).sum();

        match CellWidthHelper::balance(&mut columns) {
            Ok(()) => {
                let actual: f32 = columns.iter().map(|c| *c.actual).sum();
                prop_assert!((actual - preferred).abs() < 1e-2);
                for c in columns.iter() {
                    prop_assert!(*c.actual >= *c.minimum - 1e-2);
                }
            }
            Err(PDFError::TableTooNarrow { .. }) => {
                prop_assert!(minimum > preferred - 1e-2);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}

#[test]
fn exceptions_win_over_patterns() {
    let hyphenator = Hyphenator::new("1b1", "abc-de").unwrap();
    assert_eq!(hyphenator.breaks("abxde"), vec![2]);
    assert_eq!(hyphenator.hyphenate("abcde"), vec!["abc", "de"]);
    assert_eq!(hyphenator.breaks("cbbbc"), vec![2, 3]);
}
