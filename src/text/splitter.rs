use id_arena::Arena;

use crate::font::Font;
use crate::text::{lookup, Hyphenator, StyledRun};
use crate::units::Pt;
use crate::PDFError;

/// Slack allowed when comparing widths, to absorb float error
pub(crate) const TOLERANCE: f32 = 1e-3;

pub(crate) fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// A character of a run, measured with the run's font
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    pub c: char,
    /// Index of the run the character came from
    pub run: usize,
    /// Byte offset of the character in its run's text
    pub byte: usize,
    pub width: Pt,
}

impl Glyph {
    /// Measure the characters of `run`, the `index`th run of a paragraph,
    /// from byte `from` on
    pub fn measure<'r>(
        index: usize,
        run: &'r StyledRun,
        from: usize,
        font: &'r Font,
    ) -> impl Iterator<Item = Glyph> + 'r {
        let size = run.font.size;
        run.text[from..]
            .char_indices()
            .map(move |(byte, c)| Glyph {
                c,
                run: index,
                byte: from + byte,
                width: font.char_width(c, size),
            })
    }
}

/// Character indices `k` such that a line may end after the first `k`
/// characters: after a run of spaces, or after a hyphen that follows a
/// letter. The end of the text is not included.
fn opportunities(chars: &[char]) -> Vec<usize> {
    let mut out = Vec::new();
    for k in 1..chars.len() {
        let prev = chars[k - 1];
        let c = chars[k];
        let after_spaces = is_space(prev) && !is_space(c);
        let after_hyphen =
            prev == '-' && k >= 2 && chars[k - 2].is_alphabetic() && !is_space(c);
        if after_spaces || after_hyphen {
            out.push(k);
        }
    }
    out
}

/// Width of the widest stretch of text that can only be broken by
/// hyphenation. Glyphs of consecutive runs are measured together, so a
/// word that changes style part way through counts as one word.
pub fn widest_word(glyphs: &[Glyph]) -> Pt {
    let mut widest = Pt(0.0);
    for line in glyphs.split(|g| g.c == '\n') {
        let chars: Vec<char> = line.iter().map(|g| g.c).collect();
        let mut start = 0;
        let bounds = opportunities(&chars)
            .into_iter()
            .chain(std::iter::once(line.len()));
        for end in bounds {
            // spaces only ever sit at the end of a stretch
            let width: Pt = line[start..end]
                .iter()
                .filter(|g| !is_space(g.c))
                .map(|g| g.width)
                .sum();
            widest = widest.max(width);
            start = end;
        }
    }
    widest
}

/// Where a line made from a sequence of glyphs ends
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    /// Everything fits. The line shows the first `end` glyphs; the rest
    /// are trailing spaces.
    Whole { end: usize },
    /// The line shows the first `end` glyphs, followed by a hyphen when
    /// `hyphenated`, and the next line resumes at glyph `rest`
    Partial {
        end: usize,
        rest: usize,
        hyphenated: bool,
    },
}

/// Finds the longest breakable prefix of a line's glyphs that fits a width
pub struct TextSplitter<'a> {
    hyphenator: &'a Hyphenator,
}

impl<'a> TextSplitter<'a> {
    pub fn new(hyphenator: &'a Hyphenator) -> TextSplitter<'a> {
        TextSplitter { hyphenator }
    }

    /// Fit `glyphs` (which must not contain line breaks) into `available`.
    /// Runs are only broken where the text itself allows it, so a run that
    /// starts in the middle of a word stays with that word. A line can't be
    /// left empty: if not even the first word fits, it is too wide.
    pub fn split(
        &self,
        glyphs: &[Glyph],
        runs: &[StyledRun],
        fonts: &Arena<Font>,
        available: Pt,
    ) -> Result<Split, PDFError> {
        let n = glyphs.len();
        let chars: Vec<char> = glyphs.iter().map(|g| g.c).collect();

        let mut cum = Vec::with_capacity(n + 1);
        cum.push(Pt(0.0));
        for g in glyphs.iter() {
            let last = cum[cum.len() - 1];
            cum.push(last + g.width);
        }
        let trimmed_end = |k: usize| {
            let mut e = k;
            while e > 0 && is_space(chars[e - 1]) {
                e -= 1;
            }
            e
        };
        let fits = |w: Pt| *w <= *available + TOLERANCE;

        if fits(cum[trimmed_end(n)]) {
            return Ok(Split::Whole {
                end: trimmed_end(n),
            });
        }

        let breaks = opportunities(&chars);
        let fitting = breaks.iter().rev().copied().find(|&k| {
            let e = trimmed_end(k);
            e > 0 && fits(cum[e])
        });

        // the word that overflows starts at the last break that fits
        let word_start = fitting.unwrap_or(0)
            + chars[fitting.unwrap_or(0)..]
                .iter()
                .take_while(|c| is_space(**c))
                .count();
        let word_end = breaks
            .iter()
            .copied()
            .find(|&k| k > word_start)
            .map(trimmed_end)
            .unwrap_or_else(|| trimmed_end(n));

        let hyphenate = glyphs
            .get(word_start)
            .and_then(|g| runs.get(g.run))
            .is_some_and(|run| run.hyphenate);
        if hyphenate {
            let lead = chars[word_start..word_end]
                .iter()
                .take_while(|c| !c.is_alphabetic())
                .count();
            let trail = chars[word_start + lead..word_end]
                .iter()
                .rev()
                .take_while(|c| !c.is_alphabetic())
                .count();
            let core_start = word_start + lead;
            let core_end = word_end - trail;
            let core: String = chars[core_start..core_end].iter().collect();
            if core_end > core_start && core.chars().all(char::is_alphabetic) {
                for j in self.hyphenator.breaks(&core).into_iter().rev() {
                    if j == 0 {
                        continue;
                    }
                    let end = core_start + j;
                    // the hyphen is set in the font of the letter before it
                    let before = &runs[glyphs[end - 1].run];
                    let hyphen =
                        lookup(fonts, before.font)?.char_width('-', before.font.size);
                    if fits(cum[end] + hyphen) {
                        log::debug!(
                            "hyphenated `{core}` after `{}`",
                            core.chars().take(j).collect::<String>()
                        );
                        return Ok(Split::Partial {
                            end,
                            rest: end,
                            hyphenated: true,
                        });
                    }
                }
            }
        }

        match fitting {
            Some(k) => Ok(Split::Partial {
                end: trimmed_end(k),
                rest: k,
                hyphenated: false,
            }),
            None => Err(PDFError::WordTooWide {
                word: chars[word_start..word_end].iter().collect(),
                width: *(cum[word_end] - cum[word_start]),
                available: *available,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{SpanFont, StandardFont};

    fn courier() -> (Arena<Font>, SpanFont) {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(StandardFont::Courier.into());
        (fonts, SpanFont::new(id, Pt(10.0)))
    }

    fn measure(runs: &[StyledRun], fonts: &Arena<Font>) -> Vec<Glyph> {
        runs.iter()
            .enumerate()
            .flat_map(|(i, run)| Glyph::measure(i, run, 0, &fonts[run.font.id]))
            .collect()
    }

    fn split(runs: &[StyledRun], fonts: &Arena<Font>, width: f32) -> Result<Split, PDFError> {
        TextSplitter::new(Hyphenator::english()).split(
            &measure(runs, fonts),
            runs,
            fonts,
            Pt(width),
        )
    }

    #[test]
    fn break_opportunities() {
        let chars: Vec<char> = "ab  cd well-known -x".chars().collect();
        assert_eq!(opportunities(&chars), vec![4, 7, 12, 18]);
    }

    #[test]
    fn widest_word_spans_runs() {
        let (fonts, span) = courier();
        let runs = vec![
            StyledRun::new("The well-known  fox\njump", span),
            StyledRun::new("ed over", span),
        ];
        // "jumped" is one word even though it is split between runs
        assert_eq!(widest_word(&measure(&runs, &fonts)), Pt(36.0));

        let runs = vec![StyledRun::new("The well-known  fox\njumps", span)];
        assert_eq!(widest_word(&measure(&runs, &fonts)), Pt(30.0));
    }

    #[test]
    fn splits_at_words() {
        let (fonts, span) = courier();
        let runs = vec![StyledRun::new("hello big world ", span)];

        // each character is 6pt wide
        assert_eq!(split(&runs, &fonts, 90.0).unwrap(), Split::Whole { end: 15 });
        assert_eq!(
            split(&runs, &fonts, 60.0).unwrap(),
            Split::Partial {
                end: 9,
                rest: 10,
                hyphenated: false
            }
        );
        // trailing spaces don't count against the width
        assert!(matches!(
            split(&runs, &fonts, 54.0).unwrap(),
            Split::Partial { rest: 10, .. }
        ));
    }

    #[test]
    fn words_continue_across_runs() {
        let (fonts, span) = courier();
        let mut red = StyledRun::new("cdef", span);
        red.colour = crate::colours::RED;
        let runs = vec![StyledRun::new("xxxx ab", span), red];

        // "abcdef" doesn't fit after "xxxx", so all of it moves down
        assert_eq!(
            split(&runs, &fonts, 60.0).unwrap(),
            Split::Partial {
                end: 4,
                rest: 5,
                hyphenated: false
            }
        );

        let runs = vec![StyledRun::new("ab", span), StyledRun::new("cdef", span)];
        match split(&runs, &fonts, 30.0) {
            Err(PDFError::WordTooWide { word, width, .. }) => {
                assert_eq!(word, "abcdef");
                assert_eq!(width, 36.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn word_too_wide_on_an_empty_line() {
        let (fonts, span) = courier();
        let runs = vec![StyledRun::new("  extraordinarily long", span)];
        match split(&runs, &fonts, 30.0) {
            Err(PDFError::WordTooWide { word, width, .. }) => {
                assert_eq!(word, "extraordinarily");
                assert_eq!(width, 90.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn word_too_wide_even_when_hyphenated() {
        let (fonts, span) = courier();
        let mut run = StyledRun::new("hyphenation", span);
        run.hyphenate = true;
        let runs = vec![run];

        // "hy-" needs 18pt
        assert!(matches!(
            split(&runs, &fonts, 18.0).unwrap(),
            Split::Partial {
                end: 2,
                hyphenated: true,
                ..
            }
        ));
        match split(&runs, &fonts, 12.0) {
            Err(PDFError::WordTooWide { word, width, .. }) => {
                assert_eq!(word, "hyphenation");
                assert_eq!(width, 66.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hyphenates_the_overflowing_word() {
        let (fonts, span) = courier();
        let mut run = StyledRun::new("a hyphenation", span);
        run.hyphenate = true;
        let mut runs = vec![run];

        // "a hyphen-" is 9 characters
        assert_eq!(
            split(&runs, &fonts, 56.0).unwrap(),
            Split::Partial {
                end: 8,
                rest: 8,
                hyphenated: true
            }
        );
        // "a hy-" is the shortest hyphenated head
        assert!(matches!(
            split(&runs, &fonts, 31.0).unwrap(),
            Split::Partial { rest: 4, hyphenated: true, .. }
        ));
        // narrower than that only the natural break remains
        assert_eq!(
            split(&runs, &fonts, 20.0).unwrap(),
            Split::Partial {
                end: 1,
                rest: 2,
                hyphenated: false
            }
        );

        runs[0].hyphenate = false;
        assert!(matches!(
            split(&runs, &fonts, 56.0).unwrap(),
            Split::Partial { rest: 2, hyphenated: false, .. }
        ));
    }

    #[test]
    fn punctuation_stays_outside_the_hyphenated_core() {
        let (fonts, span) = courier();
        let mut run = StyledRun::new("(hyphenation).", span);
        run.hyphenate = true;
        assert!(matches!(
            split(&[run], &fonts, 42.0).unwrap(),
            Split::Partial { rest: 3, hyphenated: true, .. }
        ));
    }
}
