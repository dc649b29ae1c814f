use id_arena::Arena;

use crate::colour::Colour;
use crate::font::{Font, SpanFont};
use crate::stream::Operator;
use crate::text::splitter::{is_space, TOLERANCE};
use crate::text::{lookup, Glyph, Split, StyledRun, TextSplitter};
use crate::units::Pt;
use crate::PDFError;

/// Lines with more unused width than this share of the line are not
/// justified
const JUSTIFY_LIMIT: f32 = 0.2;

/// Horizontal alignment of the lines of a paragraph
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

/// A stretch of a line shown with one font and colour
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub width: Pt,
    single_byte: bool,
}

/// One line of shaped text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    width: Pt,
    indent: Pt,
    alignment: Alignment,
    leading: Pt,
    line_height: f32,
    pieces: Vec<Piece>,
}

fn trunc3(v: f32) -> f32 {
    (v * 1000.0).trunc() / 1000.0
}

impl TextLine {
    /// An empty line `width` wide, starting `indent` from the frame's left edge
    pub fn new(
        width: Pt,
        indent: Pt,
        alignment: Alignment,
        leading: Option<Pt>,
        line_height: f32,
    ) -> TextLine {
        TextLine {
            width,
            indent,
            alignment,
            leading: leading.unwrap_or_default(),
            line_height,
            pieces: Vec::new(),
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The text of the line, as shown
    pub fn text(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }

    /// Width the line was given
    pub fn available(&self) -> Pt {
        self.width
    }

    /// Width of the shown text, without any spacing adjustments
    pub fn natural_width(&self) -> Pt {
        self.pieces.iter().map(|p| p.width).sum()
    }

    pub fn remaining(&self) -> Pt {
        self.width - self.natural_width()
    }

    /// Baseline to baseline distance to the line above
    pub fn leading(&self) -> Pt {
        self.leading
    }

    /// Account for a run touching this line: the leading grows to fit the
    /// run's font and any leading its phrase asks for
    pub fn observe(&mut self, run: &StyledRun, font: &Font) {
        let size = run.font.size;
        let candidates = [
            run.leading.unwrap_or_default(),
            size * self.line_height,
            font.min_leading(size),
        ];
        for c in candidates {
            self.leading = self.leading.max(c);
        }
    }

    pub fn push<S: ToString>(&mut self, text: S, run: &StyledRun, font: &Font, width: Pt) {
        self.pieces.push(Piece {
            text: text.to_string(),
            font: run.font,
            colour: run.colour,
            width,
            single_byte: font.single_byte(),
        });
    }

    /// Distance from the frame's left edge to the start of the line
    pub fn offset(&self) -> Pt {
        let unused = self.remaining().non_negative();
        match self.alignment {
            Alignment::Left | Alignment::Justified => self.indent,
            Alignment::Center => self.indent + unused / 2.0,
            Alignment::Right => self.indent + unused,
        }
    }

    /// Word and character spacing (`Tw`, `Tc`) that make a justified line
    /// flush with both edges
    pub fn spacing(&self) -> (f32, f32) {
        if self.alignment != Alignment::Justified {
            return (0.0, 0.0);
        }
        let unused = *self.remaining();
        if unused <= 0.0 || unused > *self.width * JUSTIFY_LIMIT {
            return (0.0, 0.0);
        }

        // Tw only applies to the single byte code 32
        let spaces = self
            .pieces
            .iter()
            .filter(|p| p.single_byte)
            .map(|p| p.text.matches(' ').count())
            .sum::<usize>();
        let glyphs = self
            .pieces
            .iter()
            .map(|p| p.text.chars().count())
            .sum::<usize>();

        let word = if spaces > 0 {
            trunc3(unused / spaces as f32)
        } else {
            0.0
        };
        let residual = unused - word * spaces as f32;
        // Tc applies to spaces as well as letters, and follows the last
        // glyph too, where it can't be seen
        let character = if glyphs > 1 {
            residual / (glyphs - 1) as f32
        } else {
            0.0
        };
        (word, character)
    }

    /// The operators that draw this line inside an open text object, given
    /// where the previous line started
    pub fn operators(
        &self,
        previous_offset: Pt,
        fonts: &Arena<Font>,
    ) -> Result<Vec<Operator>, PDFError> {
        let (word, character) = self.spacing();
        let mut ops = Vec::with_capacity(3 + self.pieces.len() * 3);
        ops.push(Operator::MoveText(
            *(self.offset() - previous_offset),
            -*self.leading,
        ));
        ops.push(Operator::SetWordSpacing(word));
        ops.push(Operator::SetCharacterSpacing(character));
        for piece in self.pieces.iter() {
            let font = lookup(fonts, piece.font)?;
            ops.push(Operator::SetFont {
                font: piece.font.id.index(),
                size: *piece.font.size,
            });
            ops.push(Operator::SetFillColour(piece.colour));
            ops.push(Operator::ShowText(font.encode(&piece.text)));
        }
        Ok(ops)
    }
}

/// How a paragraph's lines are set
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub alignment: Alignment,
    pub leading: Option<Pt>,
    pub line_height: f32,
}

/// Breaks a sequence of runs into lines, one at a time. The runs are never
/// copied: the builder keeps a cursor into them.
pub struct LineBuilder<'a> {
    runs: &'a [StyledRun],
    fonts: &'a Arena<Font>,
    splitter: TextSplitter<'a>,
    style: LineStyle,
    run: usize,
    offset: usize,
    skip_spaces: bool,
}

impl<'a> LineBuilder<'a> {
    pub fn new(
        runs: &'a [StyledRun],
        fonts: &'a Arena<Font>,
        splitter: TextSplitter<'a>,
        style: LineStyle,
    ) -> LineBuilder<'a> {
        LineBuilder {
            runs,
            fonts,
            splitter,
            style,
            run: 0,
            offset: 0,
            skip_spaces: false,
        }
    }

    /// Every run has been consumed
    pub fn is_done(&self) -> bool {
        self.runs
            .iter()
            .enumerate()
            .skip(self.run)
            .all(|(i, r)| {
                let from = if i == self.run { self.offset } else { 0 };
                r.text.len() <= from
            })
    }

    fn advance_run(&mut self) {
        self.run += 1;
        self.offset = 0;
    }

    /// After a soft break the spaces that caused it are not carried over
    fn drop_leading_spaces(&mut self) {
        while let Some(run) = self.runs.get(self.run) {
            let text = &run.text[self.offset..];
            let trimmed = text.trim_start_matches([' ', '\t']);
            self.offset += text.len() - trimmed.len();
            if !trimmed.is_empty() {
                break;
            }
            self.advance_run();
        }
    }

    /// Measure the text from the cursor up to the next forced break, which
    /// is returned as a (run, byte) position. Once the line is overfull the
    /// glyphs stop at the end of the word that overflowed it.
    fn measure(&self, width: Pt) -> Result<(Vec<Glyph>, Option<(usize, usize)>), PDFError> {
        let mut glyphs = Vec::new();
        let mut total = Pt(0.0);
        let mut inked = Pt(0.0);
        for (index, run) in self.runs.iter().enumerate().skip(self.run) {
            let from = if index == self.run { self.offset } else { 0 };
            let font = lookup(self.fonts, run.font)?;
            for glyph in Glyph::measure(index, run, from, font) {
                if glyph.c == '\n' {
                    return Ok((glyphs, Some((index, glyph.byte))));
                }
                if is_space(glyph.c) && *inked > *width + TOLERANCE {
                    return Ok((glyphs, None));
                }
                total += glyph.width;
                if !is_space(glyph.c) {
                    inked = total;
                }
                glyphs.push(glyph);
            }
        }
        Ok((glyphs, None))
    }

    /// Add `glyphs` to the line, one piece per run they came from
    fn fill(
        &self,
        line: &mut TextLine,
        glyphs: &[Glyph],
        hyphenated: bool,
    ) -> Result<(), PDFError> {
        let pieces: Vec<&[Glyph]> = glyphs.chunk_by(|a, b| a.run == b.run).collect();
        let count = pieces.len();
        for (i, piece) in pieces.into_iter().enumerate() {
            let (Some(first), Some(last)) = (piece.first(), piece.last()) else {
                continue;
            };
            let run = &self.runs[first.run];
            let font = lookup(self.fonts, run.font)?;
            let mut text = run.text[first.byte..last.byte + last.c.len_utf8()].to_string();
            let mut width: Pt = piece.iter().map(|g| g.width).sum();
            if hyphenated && i + 1 == count {
                text.push('-');
                width += font.char_width('-', run.font.size);
            }
            line.observe(run, font);
            line.push(text, run, font, width);
        }
        Ok(())
    }

    /// Produce the next line, `width` wide and starting `indent` from the
    /// left of the frame, or `None` once the runs are exhausted
    pub fn next_line(&mut self, width: Pt, indent: Pt) -> Result<Option<TextLine>, PDFError> {
        if self.skip_spaces {
            self.drop_leading_spaces();
            self.skip_spaces = false;
        }
        if self.is_done() {
            return Ok(None);
        }
        let start = self.run;

        let mut line = TextLine::new(
            width,
            indent,
            self.style.alignment,
            self.style.leading,
            self.style.line_height,
        );

        let (glyphs, forced) = self.measure(width)?;
        match self.splitter.split(&glyphs, self.runs, self.fonts, width)? {
            Split::Whole { end } => {
                self.fill(&mut line, &glyphs[..end], false)?;
                match forced {
                    Some((run, byte)) => {
                        self.run = run;
                        self.offset = byte + 1;
                    }
                    None => {
                        self.run = self.runs.len();
                        self.offset = 0;
                    }
                }
            }
            Split::Partial {
                end,
                rest,
                hyphenated,
            } => {
                self.fill(&mut line, &glyphs[..end], hyphenated)?;
                let next = glyphs[rest];
                self.run = next.run;
                self.offset = next.byte;
                self.skip_spaces = true;
            }
        }

        // a blank line still takes the height of the text it sits in
        if line.pieces.is_empty() {
            if let Some(run) = self.runs.get(start) {
                line.observe(run, lookup(self.fonts, run.font)?);
            }
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;
    use crate::text::Hyphenator;

    fn setup() -> (Arena<Font>, SpanFont) {
        let mut fonts = Arena::new();
        let id = fonts.alloc(StandardFont::Courier.into());
        (fonts, SpanFont::new(id, Pt(10.0)))
    }

    fn style(alignment: Alignment) -> LineStyle {
        LineStyle {
            alignment,
            leading: None,
            line_height: 1.2,
        }
    }

    fn all_lines(
        runs: &[StyledRun],
        fonts: &Arena<Font>,
        width: f32,
        a: Alignment,
    ) -> Vec<TextLine> {
        let mut builder = LineBuilder::new(
            runs,
            fonts,
            TextSplitter::new(Hyphenator::english()),
            style(a),
        );
        let mut lines = Vec::new();
        while let Some(line) = builder.next_line(Pt(width), Pt(0.0)).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn breaks_into_lines() {
        let (fonts, font) = setup();
        let runs = vec![StyledRun::new("the quick brown fox jumps over", font)];
        let lines = all_lines(&runs, &fonts, 60.0, Alignment::Left);
        let text: Vec<String> = lines.iter().map(TextLine::text).collect();
        assert_eq!(text, vec!["the quick", "brown fox", "jumps over"]);
        for line in lines.iter() {
            assert!(line.natural_width() <= Pt(60.0));
            assert!((*line.leading() - 12.0).abs() < 1e-4);
        }
    }

    #[test]
    fn forced_breaks_and_runs() {
        let (fonts, font) = setup();
        let mut red = StyledRun::new("red ", font);
        red.colour = crate::colours::RED;
        let runs = vec![
            StyledRun::new("one\ntwo ", font),
            red,
            StyledRun::new("three", font),
        ];
        let lines = all_lines(&runs, &fonts, 200.0, Alignment::Left);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "one");
        assert_eq!(lines[1].pieces().len(), 3);
        assert_eq!(lines[1].text(), "two red three");
        assert_eq!(lines[1].pieces()[1].colour, crate::colours::RED);
    }

    #[test]
    fn leading_is_the_largest_request() {
        let (fonts, font) = setup();
        let mut big = StyledRun::new("b", SpanFont::new(font.id, Pt(20.0)));
        big.leading = Some(Pt(30.0));
        let runs = vec![StyledRun::new("a ", font), big];
        let lines = all_lines(&runs, &fonts, 200.0, Alignment::Left);
        assert_eq!(lines[0].leading(), Pt(30.0));

        let mut line = TextLine::new(Pt(100.0), Pt(0.0), Alignment::Left, Some(Pt(40.0)), 1.2);
        line.observe(&runs[0], &fonts[font.id]);
        assert_eq!(line.leading(), Pt(40.0));
    }

    #[test]
    fn leading_ignores_runs_that_wrap() {
        let (fonts, font) = setup();
        let big = SpanFont::new(font.id, Pt(40.0));
        let runs = vec![StyledRun::new("aaaa ", font), StyledRun::new("BIG", big)];
        let lines = all_lines(&runs, &fonts, 80.0, Alignment::Left);
        let text: Vec<String> = lines.iter().map(TextLine::text).collect();
        assert_eq!(text, vec!["aaaa", "BIG"]);
        assert_eq!(lines[0].leading(), Pt(12.0));
        assert_eq!(lines[1].leading(), Pt(48.0));

        // blank lines from forced breaks keep the height of their text
        let runs = vec![StyledRun::new("a\n\nb", font)];
        let lines = all_lines(&runs, &fonts, 80.0, Alignment::Left);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.leading() == Pt(12.0)));
        assert_eq!(lines[1].text(), "");
    }

    #[test]
    fn words_are_not_broken_between_runs() {
        let (fonts, font) = setup();
        let mut red = StyledRun::new("cdef", font);
        red.colour = crate::colours::RED;
        let runs = vec![StyledRun::new("xxxx ab", font), red];
        let lines = all_lines(&runs, &fonts, 60.0, Alignment::Left);
        let text: Vec<String> = lines.iter().map(TextLine::text).collect();
        assert_eq!(text, vec!["xxxx", "abcdef"]);
        assert_eq!(lines[1].pieces().len(), 2);
        assert_eq!(lines[1].pieces()[1].colour, crate::colours::RED);
        assert_eq!(lines[1].natural_width(), Pt(36.0));
    }

    #[test]
    fn hyphen_takes_the_font_of_the_split_run() {
        let (fonts, font) = setup();
        let mut run = StyledRun::new("a hyphenation", font);
        run.hyphenate = true;
        let runs = vec![run];
        let lines = all_lines(&runs, &fonts, 56.0, Alignment::Left);
        let text: Vec<String> = lines.iter().map(TextLine::text).collect();
        assert_eq!(text, vec!["a hyphen-", "ation"]);
        assert_eq!(lines[0].natural_width(), Pt(54.0));
    }

    #[test]
    fn alignment_offsets() {
        let (fonts, font) = setup();
        let runs = vec![StyledRun::new("abcd", font)];
        let offset = |a| all_lines(&runs, &fonts, 100.0, a)[0].offset();
        assert_eq!(offset(Alignment::Left), Pt(0.0));
        assert_eq!(offset(Alignment::Justified), Pt(0.0));
        assert_eq!(offset(Alignment::Center), Pt(38.0));
        assert_eq!(offset(Alignment::Right), Pt(76.0));
    }

    #[test]
    fn justification_fills_the_line() {
        let (fonts, font) = setup();
        // 10 glyphs, 2 spaces, 60pt of text in a 70pt line
        let runs = vec![StyledRun::new("ab cd efgh", font)];
        let line = &all_lines(&runs, &fonts, 70.0, Alignment::Justified)[0];
        let (tw, tc) = line.spacing();
        assert_eq!(tw, 5.0);
        assert_eq!(tc, 0.0);

        // 7pt unused over 2 spaces truncates to 3.5 each
        let line = &all_lines(&runs, &fonts, 67.0, Alignment::Justified)[0];
        let (tw, tc) = line.spacing();
        assert_eq!(tw, 3.5);
        assert!(tc.abs() < 1e-6);

        // 4pt unused over 3 spaces leaves a residual for Tc
        let runs = vec![StyledRun::new("ab cd ef gh", font)];
        let line = &all_lines(&runs, &fonts, 70.0, Alignment::Justified)[0];
        let (tw, tc) = line.spacing();
        assert_eq!(tw, 1.333);
        let flush = *line.natural_width() + tw * 3.0 + tc * 10.0;
        assert!((flush - 70.0).abs() < 1e-3);

        // a short last line is left alone
        let line = &all_lines(&runs, &fonts, 200.0, Alignment::Justified)[0];
        assert_eq!(line.spacing(), (0.0, 0.0));
    }

    #[test]
    fn line_operators() {
        let (fonts, font) = setup();
        let runs = vec![StyledRun::new("hi", font)];
        let line = &all_lines(&runs, &fonts, 100.0, Alignment::Right)[0];
        let ops = line.operators(Pt(10.0), &fonts).unwrap();
        assert_eq!(
            ops,
            vec![
                Operator::MoveText(78.0, -*line.leading()),
                Operator::SetWordSpacing(0.0),
                Operator::SetCharacterSpacing(0.0),
                Operator::SetFont { font: 0, size: 10.0 },
                Operator::SetFillColour(crate::colours::BLACK),
                Operator::ShowText(crate::stream::TextString::Literal(b"hi".to_vec())),
            ]
        );
    }
}
