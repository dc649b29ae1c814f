//! Reads serialized content stream bytes back into [Operator]s.
//!
//! Only the operators this crate writes are understood; anything else is a
//! [PDFError::MalformedContentStream].

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, opt, recognize},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::colour::Colour;
use crate::stream::operator::{LineCap, Operator, TextString};
use crate::PDFError;

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Number(f32),
    Name(&'a [u8]),
    Literal(Vec<u8>),
    Hex(Vec<u8>),
    Keyword(&'a [u8]),
}

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

fn is_delimiter(c: u8) -> bool {
    matches!(c, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

fn is_regular(c: u8) -> bool {
    !is_whitespace(c) && !is_delimiter(c)
}

fn number(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), opt(digit1))))),
            recognize(pair(char('.'), digit1)),
        )),
    )))(input)?;
    let value = std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .ok_or_else(|| {
            nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
        })?;
    Ok((rest, Token::Number(value)))
}

fn name(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    map(preceded(char('/'), take_while1(is_regular)), Token::Name)(input)
}

fn hex_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (rest, digits) = delimited(
        char('<'),
        take_while(|c: u8| c.is_ascii_hexdigit() || is_whitespace(c)),
        char('>'),
    )(input)?;
    let digits: Vec<u8> = digits.iter().copied().filter(u8::is_ascii_hexdigit).collect();
    let bytes = digits
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16).unwrap_or(0);
            let lo = pair.get(1).and_then(|c| (*c as char).to_digit(16)).unwrap_or(0);
            (hi * 16 + lo) as u8
        })
        .collect();
    Ok((rest, Token::Hex(bytes)))
}

/// Literal strings, decoding escapes and keeping balanced parentheses
fn literal_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (body, _) = char('(')(input)?;
    let mut out = Vec::new();
    let mut depth = 1usize;
    let mut pos = 0;
    while pos < body.len() {
        let c = body[pos];
        pos += 1;
        match c {
            b'\\' => {
                let Some(&e) = body.get(pos) else { break };
                pos += 1;
                match e {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0C),
                    b'0'..=b'7' => {
                        let mut v = (e - b'0') as u32;
                        for _ in 0..2 {
                            match body.get(pos) {
                                Some(&d @ b'0'..=b'7') => {
                                    v = v * 8 + (d - b'0') as u32;
                                    pos += 1;
                                }
                                _ => break,
                            }
                        }
                        out.push(v as u8);
                    }
                    b'\n' => {}
                    other => out.push(other),
                }
            }
            b'(' => {
                depth += 1;
                out.push(c);
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&body[pos..], Token::Literal(out)));
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

fn keyword(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    map(take_while1(is_regular), Token::Keyword)(input)
}

fn token(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (input, _) = take_while(is_whitespace)(input)?;
    alt((number, name, literal_string, hex_string, keyword))(input)
}

/// Parse a content stream into the operators it contains
pub fn parse(bytes: &[u8]) -> Result<Vec<Operator>, PDFError> {
    let mut operators = Vec::new();
    let mut operands: Vec<Token> = Vec::new();
    let mut input = bytes;
    let mut start = 0;

    loop {
        let skipped = input.iter().take_while(|c| is_whitespace(**c)).count();
        let rest = &input[skipped..];
        if rest.is_empty() {
            break;
        }
        if operands.is_empty() {
            start = bytes.len() - rest.len();
        }
        let (rest, tok) = token(rest).map_err(|_| malformed(bytes, rest, "unrecognised token"))?;
        match tok {
            Token::Keyword(kw) => {
                let op = build(kw, &operands).ok_or_else(|| PDFError::MalformedContentStream {
                    offset: start,
                    reason: format!(
                        "`{}` with {} operands is not a known operator",
                        String::from_utf8_lossy(kw),
                        operands.len()
                    ),
                })?;
                operators.push(op);
                operands.clear();
            }
            other => operands.push(other),
        }
        input = rest;
    }

    if !operands.is_empty() {
        return Err(PDFError::MalformedContentStream {
            offset: start,
            reason: "operands without an operator".into(),
        });
    }
    Ok(operators)
}

fn malformed<S: ToString>(whole: &[u8], at: &[u8], reason: S) -> PDFError {
    PDFError::MalformedContentStream {
        offset: whole.len() - at.len(),
        reason: reason.to_string(),
    }
}

fn numbers<const N: usize>(operands: &[Token]) -> Option<[f32; N]> {
    if operands.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, tok) in out.iter_mut().zip(operands) {
        match tok {
            Token::Number(v) => *slot = *v,
            _ => return None,
        }
    }
    Some(out)
}

fn colour(operands: &[Token]) -> Option<Colour> {
    match operands.len() {
        1 => numbers::<1>(operands).map(|[g]| Colour::new_grey(g)),
        3 => numbers::<3>(operands).map(|[r, g, b]| Colour::new_rgb(r, g, b)),
        4 => numbers::<4>(operands).map(|[c, m, y, k]| Colour::new_cmyk(c, m, y, k)),
        _ => None,
    }
}

fn build(keyword: &[u8], operands: &[Token]) -> Option<Operator> {
    let op = match keyword {
        b"w" => Operator::SetLineWidth(numbers::<1>(operands)?[0]),
        b"J" => Operator::SetLineCap(LineCap::from_code(numbers::<1>(operands)?[0] as i64)?),
        b"q" => {
            numbers::<0>(operands)?;
            Operator::SaveState
        }
        b"Q" => {
            numbers::<0>(operands)?;
            Operator::RestoreState
        }
        b"cm" => Operator::Transform(numbers::<6>(operands)?),
        b"rg" if operands.len() == 3 => Operator::SetFillColour(colour(operands)?),
        b"g" if operands.len() == 1 => Operator::SetFillColour(colour(operands)?),
        b"k" if operands.len() == 4 => Operator::SetFillColour(colour(operands)?),
        b"RG" if operands.len() == 3 => Operator::SetStrokeColour(colour(operands)?),
        b"G" if operands.len() == 1 => Operator::SetStrokeColour(colour(operands)?),
        b"K" if operands.len() == 4 => Operator::SetStrokeColour(colour(operands)?),
        b"Tc" => Operator::SetCharacterSpacing(numbers::<1>(operands)?[0]),
        b"Tw" => Operator::SetWordSpacing(numbers::<1>(operands)?[0]),
        b"TL" => Operator::SetLeading(numbers::<1>(operands)?[0]),
        b"Tf" => match operands {
            [Token::Name(n), Token::Number(size)] => {
                let index = std::str::from_utf8(n.strip_prefix(b"F")?).ok()?.parse().ok()?;
                Operator::SetFont {
                    font: index,
                    size: *size,
                }
            }
            _ => return None,
        },
        b"BT" if operands.is_empty() => Operator::BeginText,
        b"ET" if operands.is_empty() => Operator::EndText,
        b"Td" => {
            let [x, y] = numbers::<2>(operands)?;
            Operator::MoveText(x, y)
        }
        b"Tm" => Operator::SetTextMatrix(numbers::<6>(operands)?),
        b"T*" if operands.is_empty() => Operator::NextLine,
        b"Tj" => match operands {
            [Token::Literal(b)] => Operator::ShowText(TextString::Literal(b.clone())),
            [Token::Hex(b)] => Operator::ShowText(TextString::Hex(b.clone())),
            _ => return None,
        },
        b"m" => {
            let [x, y] = numbers::<2>(operands)?;
            Operator::MoveTo(x, y)
        }
        b"l" => {
            let [x, y] = numbers::<2>(operands)?;
            Operator::LineTo(x, y)
        }
        b"c" => Operator::CurveTo(numbers::<6>(operands)?),
        b"re" => {
            let [x, y, w, h] = numbers::<4>(operands)?;
            Operator::Rectangle(x, y, w, h)
        }
        b"h" if operands.is_empty() => Operator::ClosePath,
        b"S" if operands.is_empty() => Operator::Stroke,
        b"s" if operands.is_empty() => Operator::CloseStroke,
        b"f" if operands.is_empty() => Operator::Fill,
        b"B" if operands.is_empty() => Operator::FillStroke,
        b"n" if operands.is_empty() => Operator::EndPath,
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers() {
        assert_eq!(number(b"-12.5 ").unwrap().1, Token::Number(-12.5));
        assert_eq!(number(b".5").unwrap().1, Token::Number(0.5));
        assert_eq!(number(b"3.").unwrap().1, Token::Number(3.0));
        assert!(number(b"x").is_err());
    }

    #[test]
    fn decodes_literal_strings() {
        let (rest, tok) = literal_string(b"(a \\(b\\) (c) \\\\ \\351) Tj").unwrap();
        assert_eq!(rest, b" Tj");
        assert_eq!(tok, Token::Literal(b"a (b) (c) \\ \xe9".to_vec()));
    }

    #[test]
    fn parses_a_stream() {
        let ops = parse(b"BT\n/F2 12 Tf\n72 700 Td\n(Hi) Tj\n<0041> Tj\nET\n0.5 g\n").unwrap();
        assert_eq!(
            ops,
            vec![
                Operator::BeginText,
                Operator::SetFont { font: 2, size: 12.0 },
                Operator::MoveText(72.0, 700.0),
                Operator::ShowText(TextString::Literal(b"Hi".to_vec())),
                Operator::ShowText(TextString::Hex(vec![0x00, 0x41])),
                Operator::EndText,
                Operator::SetFillColour(Colour::new_grey(0.5)),
            ]
        );
    }

    #[test]
    fn reports_unknown_operators() {
        let err = parse(b"1 2 Zz\n").unwrap_err();
        assert!(matches!(err, PDFError::MalformedContentStream { offset: 0, .. }));
        assert!(parse(b"1 2 3").is_err());
        assert!(parse(b"1 2 rg").is_err());
    }
}
