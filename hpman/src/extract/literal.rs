//! Literal evaluation of default and hint expressions.
//!
//! The grammar accepts the constant displays a Python literal evaluator
//! accepts: `None`, booleans, signed numbers, string and byte literals
//! (with implicit concatenation), lists, tuples, sets and dicts. Names,
//! calls, operators other than a leading sign, f-strings and complex numbers
//! are rejected.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1, take_while_m_n},
    character::complete::{char, digit1, multispace1, one_of, satisfy},
    combinator::{all_consuming, map, map_opt, not, opt, recognize, success, verify},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
};

use crate::value::{Dict, Value};

type Res<'a, O> = IResult<&'a str, O>;

/// Evaluates `text` as a literal expression.
///
/// Returns `None` when the text is not a literal display. Integers that do
/// not fit in 64 bits are treated as not literal.
///
/// # Examples
///
/// ```
/// use hpman::{Value, literal_eval};
///
/// assert_eq!(literal_eval("[1, 'a']"), Some(Value::List(vec![1.into(), "a".into()])));
/// assert_eq!(literal_eval("os.getcwd()"), None);
/// ```
#[must_use]
pub fn literal_eval(text: &str) -> Option<Value> {
    all_consuming(expr)(text).ok().map(|(_, value)| value)
}

fn fail<O>(input: &str, kind: ErrorKind) -> Res<'_, O> {
    Err(nom::Err::Error(Error::new(input, kind)))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn comment(input: &str) -> Res<'_, &str> {
    recognize(pair(char('#'), take_while(|c| c != '\n')))(input)
}

fn continuation(input: &str) -> Res<'_, &str> {
    alt((tag("\\\r\n"), tag("\\\n")))(input)
}

fn ws0(input: &str) -> Res<'_, &str> {
    recognize(many0(alt((multispace1, comment, continuation))))(input)
}

fn expr(input: &str) -> Res<'_, Value> {
    delimited(ws0, atom, ws0)(input)
}

fn atom(input: &str) -> Res<'_, Value> {
    alt((strings, number, keyword, list, parenthesised, braced))(input)
}

fn keyword(input: &str) -> Res<'_, Value> {
    let identifier = recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ));
    map_opt(identifier, |word: &str| match word {
        "None" => Some(Value::None),
        "True" => Some(Value::Bool(true)),
        "False" => Some(Value::Bool(false)),
        _ => None,
    })(input)
}

enum Numeral<'a> {
    Int { digits: &'a str, radix: u32 },
    Float(&'a str),
}

impl Numeral<'_> {
    fn signed(&self, negative: bool) -> Option<Value> {
        let sign = if negative { "-" } else { "" };
        match self {
            Self::Int { digits, radix } => {
                let cleaned = digits.replace('_', "");
                i64::from_str_radix(&format!("{sign}{cleaned}"), *radix)
                    .ok()
                    .map(Value::Int)
            }
            Self::Float(text) => {
                let cleaned = text.replace('_', "");
                format!("{sign}{cleaned}").parse::<f64>().ok().map(Value::Float)
            }
        }
    }
}

fn digits(input: &str) -> Res<'_, &str> {
    recognize(pair(
        digit1,
        take_while(|c: char| c.is_ascii_digit() || c == '_'),
    ))(input)
}

fn exponent(input: &str) -> Res<'_, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digits)))(input)
}

fn radix_int(input: &str) -> Res<'_, Numeral<'_>> {
    let (rest, _) = char('0')(input)?;
    let (after_marker, marker) = one_of("xXoObB")(rest)?;
    let radix = match marker {
        'x' | 'X' => 16,
        'o' | 'O' => 8,
        _ => 2,
    };
    let (remaining, body) =
        take_while1(|c: char| c == '_' || c.is_digit(radix))(after_marker)?;
    Ok((remaining, Numeral::Int { digits: body, radix }))
}

fn decimal(input: &str) -> Res<'_, Numeral<'_>> {
    let fraction_first = recognize(tuple((char('.'), digits, opt(exponent))));
    let integer_first = recognize(tuple((
        digits,
        opt(pair(char('.'), opt(digits))),
        opt(exponent),
    )));
    map(alt((fraction_first, integer_first)), |text: &str| {
        if text.contains(['.', 'e', 'E']) {
            Numeral::Float(text)
        } else {
            Numeral::Int {
                digits: text,
                radix: 10,
            }
        }
    })(input)
}

fn number(input: &str) -> Res<'_, Value> {
    let sign = opt(terminated(one_of("+-"), ws0));
    let numeral = terminated(alt((radix_int, decimal)), not(satisfy(is_ident_char)));
    map_opt(pair(sign, numeral), |(sign, numeral)| {
        numeral.signed(sign == Some('-'))
    })(input)
}

struct Piece {
    bytes: bool,
    text: String,
}

fn string_body<'a>(input: &'a str, quote: &str) -> Res<'a, &'a str> {
    let triple = quote.len() == 3;
    let mut chars = input.char_indices();
    while let Some((position, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\n' if !triple => break,
            _ if input
                .get(position..)
                .is_some_and(|tail| tail.starts_with(quote)) =>
            {
                let (body, tail) = input.split_at(position);
                let rest = tail.get(quote.len()..).unwrap_or_default();
                return Ok((rest, body));
            }
            _ => {}
        }
    }
    fail(input, ErrorKind::Char)
}

fn hex_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, count: usize) -> Option<char> {
    let hex: String = (0..count)
        .map_while(|_| chars.next_if(char::is_ascii_hexdigit))
        .collect();
    if hex.len() != count {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}

/// Resolves backslash escapes. In byte literals `\u`, `\U` and `\N` are not
/// escapes and stay verbatim.
fn unescape(body: &str, bytes: bool) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let escaped = chars.next()?;
        match escaped {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(escaped),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut octal = String::from(escaped);
                while octal.len() < 3 {
                    match chars.next_if(|c| ('0'..='7').contains(c)) {
                        Some(digit) => octal.push(digit),
                        None => break,
                    }
                }
                out.push(u32::from_str_radix(&octal, 8).ok().and_then(char::from_u32)?);
            }
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' if !bytes => out.push(hex_escape(&mut chars, 4)?),
            'U' if !bytes => out.push(hex_escape(&mut chars, 8)?),
            'N' if !bytes => return None,
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Some(out)
}

fn string_literal(input: &str) -> Res<'_, Piece> {
    let (rest, prefix) =
        take_while_m_n(0, 2, |c: char| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U'))(input)?;
    let (raw, bytes) = match prefix.to_ascii_lowercase().as_str() {
        "" | "u" => (false, false),
        "r" => (true, false),
        "b" => (false, true),
        "br" | "rb" => (true, true),
        _ => return fail(input, ErrorKind::Tag),
    };
    let (after_quote, quote) = alt((tag("\"\"\""), tag("'''"), tag("\""), tag("'")))(rest)?;
    let (remaining, body) = string_body(after_quote, quote)?;
    if bytes && !body.is_ascii() {
        return fail(input, ErrorKind::Char);
    }
    let text = if raw {
        Some(body.to_owned())
    } else {
        unescape(body, bytes)
    };
    match text {
        Some(text) => Ok((remaining, Piece { bytes, text })),
        None => fail(input, ErrorKind::Escaped),
    }
}

fn strings(input: &str) -> Res<'_, Value> {
    map_opt(
        pair(string_literal, many0(preceded(ws0, string_literal))),
        |(first, rest)| {
            let mut text = first.text;
            for piece in rest {
                if piece.bytes != first.bytes {
                    return None;
                }
                text.push_str(&piece.text);
            }
            if first.bytes {
                text.chars()
                    .map(|c| u8::try_from(c).ok())
                    .collect::<Option<Vec<u8>>>()
                    .map(Value::Bytes)
            } else {
                Some(Value::Str(text))
            }
        },
    )(input)
}

/// Items separated by commas, with an optional trailing comma.
///
/// Yields the items and whether a trailing comma was present. A lone comma is
/// rejected.
fn comma_separated<'a, O, F>(item: F) -> impl FnMut(&'a str) -> Res<'a, (Vec<O>, bool)>
where
    F: Parser<&'a str, O, Error<&'a str>>,
{
    verify(
        terminated(
            pair(
                separated_list0(char(','), item),
                map(opt(char(',')), |comma| comma.is_some()),
            ),
            ws0,
        ),
        |(items, trailing): &(Vec<O>, bool)| !items.is_empty() || !trailing,
    )
}

fn list(input: &str) -> Res<'_, Value> {
    map(
        delimited(pair(char('['), ws0), comma_separated(expr), char(']')),
        |(items, _)| Value::List(items),
    )(input)
}

fn parenthesised(input: &str) -> Res<'_, Value> {
    map(
        delimited(pair(char('('), ws0), comma_separated(expr), char(')')),
        |(mut items, trailing): (Vec<Value>, bool)| {
            if !trailing && items.len() == 1 {
                if let Some(only) = items.pop() {
                    return only;
                }
            }
            Value::Tuple(items)
        },
    )(input)
}

fn dict_entry(input: &str) -> Res<'_, (Value, Value)> {
    separated_pair(expr, char(':'), expr)(input)
}

fn dict_display(input: &str) -> Res<'_, Value> {
    map(
        verify(comma_separated(dict_entry), |(entries, _): &(Vec<(Value, Value)>, bool)| {
            !entries.is_empty()
        }),
        |(entries, _)| Value::Dict(entries.into_iter().collect()),
    )(input)
}

fn set_display(input: &str) -> Res<'_, Value> {
    map(
        verify(comma_separated(expr), |(items, _): &(Vec<Value>, bool)| {
            !items.is_empty()
        }),
        |(items, _)| {
            let mut unique: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !unique.contains(&item) {
                    unique.push(item);
                }
            }
            Value::Set(unique)
        },
    )(input)
}

fn braced(input: &str) -> Res<'_, Value> {
    delimited(
        pair(char('{'), ws0),
        alt((dict_display, set_display, success(Value::Dict(Dict::new())))),
        char('}'),
    )(input)
}
