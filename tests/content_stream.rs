mod common;

use common::courier_document;
use pdf_flow::stream::{parse, ContentStream, GraphicsState, Operator};
use pdf_flow::{
    Alignment, Cell, Chunk, Colour, Paragraph, Phrase, Pt, RenderedPage, SpanFont, Table,
};

fn mixed_document() -> Vec<RenderedPage> {
    let (mut doc, font) = courier_document();
    doc.push(
        Paragraph::from_text(lipsum::lipsum(400))
            .with_alignment(Alignment::Justified)
            .with_hyphenation(true)
            .with_first_line_indent(Pt(18.0)),
    );
    doc.push(
        Paragraph::new()
            .push("Some ")
            .push(Chunk::new("red").with_colour(Colour::new_rgb(1.0, 0.0, 0.0)))
            .push(" and ")
            .push(
                Phrase::new()
                    .push(Chunk::new("larger"))
                    .with_font(SpanFont::new(font.id, Pt(14.0))),
            )
            .push(" words.")
            .with_alignment(Alignment::Center),
    );
    doc.push(
        Table::new(vec![2.0, 1.0])
            .push(Cell::from_text(lipsum::lipsum(40)).with_grey_fill(0.85))
            .push(Cell::from_text("right").with_span(2, 1))
            .push(Cell::from_text("below")),
    );
    doc.set_footer(|n| {
        Some(Paragraph::from_text(n.current.to_string()).with_alignment(Alignment::Right))
    });
    doc.render().unwrap()
}

#[test]
fn rendered_pages_are_closed_and_replayable() {
    for page in mixed_document() {
        let ops = parse(&page.content).unwrap();
        let opened = ops.iter().filter(|op| **op == Operator::BeginText).count();
        let closed = ops.iter().filter(|op| **op == Operator::EndText).count();
        assert_eq!(opened, closed);
        assert!(opened > 0);
        GraphicsState::replay(&page.content).unwrap();
    }
}

#[test]
fn serialized_streams_are_a_fixed_point() {
    for page in mixed_document() {
        let mut stream = ContentStream::new();
        stream.extend(parse(&page.content).unwrap()).unwrap();
        assert_eq!(stream.operators().len(), parse(&page.content).unwrap().len());
        assert_eq!(stream.finish().unwrap(), page.content);
    }
}

#[test]
fn justified_lines_use_word_spacing() {
    let pages = mixed_document();
    let ops = parse(&pages[0].content).unwrap();
    assert!(ops
        .iter()
        .any(|op| matches!(op, Operator::SetWordSpacing(tw) if *tw > 0.0)));
    // lines that aren't justified put it back
    assert!(ops
        .iter()
        .any(|op| matches!(op, Operator::SetWordSpacing(tw) if *tw == 0.0)));
}

#[test]
fn no_redundant_state_survives() {
    for page in mixed_document() {
        let mut state = GraphicsState::default();
        for op in parse(&page.content).unwrap() {
            match op {
                Operator::SetLineWidth(_)
                | Operator::SetFillColour(_)
                | Operator::SetStrokeColour(_)
                | Operator::SetCharacterSpacing(_)
                | Operator::SetWordSpacing(_)
                | Operator::SetFont { .. } => {
                    assert!(state.apply(&op), "`{op}` changes nothing");
                }
                other => {
                    state.apply(&other);
                }
            }
        }
    }
}
