use pdf_flow::layout::A4;
use pdf_flow::{
    colours, Alignment, Cell, Chunk, Colour, Content, Document, In, Margins, Paragraph, Pt,
    SpanFont, StandardFont, Table,
};

fn main() {
    env_logger::init();

    let mut doc = Document::new();
    doc.settings.size(A4).margins(Margins::symmetric(In(1.0), In(0.75)));
    doc.info.title("Lorem Ipsum").author("pdf-flow");

    let courier_bold = doc.add_font(StandardFont::CourierBold.into());
    let heading = SpanFont::new(courier_bold, Pt(18.0));

    let intro = doc.bookmark("Introduction", None);
    let figures = doc.bookmark("Figures", None);
    let detail = doc.bookmark("Detail", Some(figures));

    doc.push(
        Paragraph::from_text("Introduction")
            .with_font(heading)
            .with_spacing(Pt(0.0), Pt(12.0))
            .with_bookmark(intro),
    );
    for _ in 0..4 {
        doc.push(
            Paragraph::from_text(lipsum::lipsum(180))
                .with_alignment(Alignment::Justified)
                .with_hyphenation(true)
                .with_first_line_indent(Pt(18.0))
                .with_spacing(Pt(6.0), Pt(6.0)),
        );
    }
    doc.push(
        Paragraph::new()
            .push("Words can be ")
            .push(Chunk::new("coloured").with_colour(colours::RED))
            .push(" or set in ")
            .push(Chunk::new("another face").with_font(heading))
            .push(" in the middle of a line.")
            .with_alignment(Alignment::Center),
    );

    doc.push(Content::PageBreak);
    doc.push(
        Paragraph::from_text("Figures")
            .with_font(heading)
            .with_spacing(Pt(0.0), Pt(12.0))
            .with_bookmark(figures),
    );

    let mut table = Table::new(vec![1.0, 2.0, 1.0])
        .with_spacing(Pt(6.0), Pt(6.0))
        .with_bookmark(detail)
        .push(Cell::from_text("Item").with_grey_fill(0.8))
        .push(Cell::from_text("Description").with_grey_fill(0.8))
        .push(Cell::from_text("Amount").with_grey_fill(0.8));
    for i in 0..60 {
        let description = if i % 7 == 0 {
            Cell::from_text(lipsum::lipsum(25)).with_span(2, 1)
        } else {
            Cell::from_text(lipsum::lipsum(6))
        };
        let spans_rows = i % 7 == 0;
        table = table
            .push(Cell::from_text(format!("#{i}")))
            .push(description)
            .push(Cell::from_text(format!("{:.2}", i as f32 * 1.25)));
        if spans_rows {
            // the description already covers the next row's middle column
            table = table
                .push(Cell::from_text(format!("#{i}b")))
                .push(Cell::from_text("-"));
        }
    }
    doc.push(table);

    doc.set_footer(|n| {
        Some(
            Paragraph::from_text(format!("Page {} of {}", n.current, n.total))
                .with_alignment(Alignment::Right)
                .with_colour(Colour::new_grey(0.5)),
        )
    });

    let mut out = std::fs::File::create("report.pdf").expect("can create report.pdf");
    doc.write(&mut out).expect("can write the document");
}
