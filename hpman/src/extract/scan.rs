//! Call-site scanner.
//!
//! Finds `placeholder(...)` calls in source text and splits their argument
//! lists at top-level commas. Commas in a top-level lambda's parameter list
//! do not split. Strings and comments are skipped so quoted or commented-out
//! calls are never reported.
//!
//! Calls are reported in source order, and a call nested inside the
//! arguments of another call comes right after its enclosing call. Python's
//! `ast.walk` is breadth-first instead, so when the same name has parsed
//! defaults both nested and at top level, the location reported as the first
//! occurrence of a double assignment can differ from the one Python reports.

/// A located placeholder call.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CallSite<'a> {
    /// 1-based line of the placeholder identifier.
    pub(crate) line: usize,
    /// Arguments in call order.
    pub(crate) arguments: Vec<Argument<'a>>,
}

/// One argument of a call, as trimmed source text.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Argument<'a> {
    Positional(&'a str),
    Keyword { name: &'a str, value: &'a str },
    Unpacked(&'a str),
}

impl<'a> Argument<'a> {
    fn classify(text: &'a str) -> Self {
        if let Some(rest) = text.strip_prefix("**") {
            return Self::Unpacked(rest.trim_start());
        }
        let name_end = text
            .bytes()
            .position(|byte| !is_ident_byte(byte))
            .unwrap_or(text.len());
        let (name, tail) = text.split_at(name_end);
        let starts_like_name = name
            .bytes()
            .next()
            .is_some_and(|byte| !byte.is_ascii_digit());
        match tail.trim_start().strip_prefix('=') {
            Some(value) if starts_like_name && !value.starts_with('=') => Self::Keyword {
                name,
                value: value.trim(),
            },
            _ => Self::Positional(text),
        }
    }
}

/// Failure to scan, located by line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub(crate) line: usize,
    pub(crate) message: &'static str,
}

impl ScanError {
    const fn new(line: usize, message: &'static str) -> Self {
        Self { line, message }
    }
}

const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

/// What preceded the identifier being examined.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Preceding {
    Dot,
    Definition,
    Other,
}

#[derive(Clone)]
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    const fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn advance(&mut self) {
        if self.peek() == Some(b'\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn slice(&self, from: usize) -> &'a str {
        self.text.get(from..self.pos).unwrap_or_default()
    }

    fn take_word(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.advance();
        }
        self.slice(start)
    }

    fn skip_comment(&mut self) {
        while self.peek().is_some_and(|byte| byte != b'\n') {
            self.advance();
        }
    }

    fn at_quote_run(&self, quote: u8) -> bool {
        self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote)
    }

    fn skip_string(&mut self) -> Result<(), ScanError> {
        let start_line = self.line;
        let Some(quote) = self.peek() else {
            return Ok(());
        };
        let triple = self.at_quote_run(quote);
        let width = if triple { 3 } else { 1 };
        for _ in 0..width {
            self.advance();
        }
        loop {
            match self.peek() {
                None => return Err(ScanError::new(start_line, "unterminated string literal")),
                Some(b'\\') => {
                    self.advance();
                    self.advance();
                }
                Some(b'\n') if !triple => {
                    return Err(ScanError::new(start_line, "unterminated string literal"));
                }
                Some(byte) if byte == quote && (!triple || self.at_quote_run(quote)) => {
                    for _ in 0..width {
                        self.advance();
                    }
                    return Ok(());
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Consumes spaces and tabs, then `(` when it follows.
    fn open_call(&mut self) -> bool {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.advance();
        }
        if self.peek() == Some(b'(') {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Splits the arguments of a call whose `(` has just been consumed.
    fn split_arguments(mut self, line: usize) -> Result<Vec<Argument<'a>>, ScanError> {
        let mut closers: Vec<u8> = Vec::new();
        let mut arguments = Vec::new();
        let mut start = self.pos;
        // Top-level lambdas whose parameter list has not reached its `:` yet.
        let mut open_lambdas = 0_usize;
        loop {
            let Some(byte) = self.peek() else {
                return Err(ScanError::new(line, "unterminated placeholder call"));
            };
            match byte {
                byte if is_ident_byte(byte) => {
                    if self.take_word() == "lambda" && closers.is_empty() {
                        open_lambdas += 1;
                    }
                }
                b':' if closers.is_empty() => {
                    open_lambdas = open_lambdas.saturating_sub(1);
                    self.advance();
                }
                b'#' => self.skip_comment(),
                b'\'' | b'"' => self.skip_string()?,
                b'(' => {
                    closers.push(b')');
                    self.advance();
                }
                b'[' => {
                    closers.push(b']');
                    self.advance();
                }
                b'{' => {
                    closers.push(b'}');
                    self.advance();
                }
                b')' | b']' | b'}' => match closers.pop() {
                    Some(expected) if expected == byte => self.advance(),
                    None if byte == b')' => {
                        push_argument(&mut arguments, self.slice(start), true, line)?;
                        return Ok(arguments);
                    }
                    _ => return Err(ScanError::new(self.line, "mismatched closing bracket")),
                },
                b',' if closers.is_empty() && open_lambdas == 0 => {
                    push_argument(&mut arguments, self.slice(start), false, line)?;
                    self.advance();
                    start = self.pos;
                }
                _ => self.advance(),
            }
        }
    }
}

fn push_argument<'a>(
    arguments: &mut Vec<Argument<'a>>,
    raw: &'a str,
    last: bool,
    line: usize,
) -> Result<(), ScanError> {
    let text = raw.trim();
    if text.is_empty() {
        return if last {
            Ok(())
        } else {
            Err(ScanError::new(line, "empty argument"))
        };
    }
    arguments.push(Argument::classify(text));
    Ok(())
}

/// Finds every call of `placeholder` in `source`, in source order.
pub(crate) fn scan<'a>(source: &'a str, placeholder: &str) -> Result<Vec<CallSite<'a>>, ScanError> {
    let mut cursor = Cursor::new(source);
    let mut calls = Vec::new();
    let mut preceding = Preceding::Other;
    while let Some(byte) = cursor.peek() {
        match byte {
            b'#' => cursor.skip_comment(),
            b'\'' | b'"' => {
                cursor.skip_string()?;
                preceding = Preceding::Other;
            }
            b' ' | b'\t' | b'\r' | b'\n' | b'\\' | b'\x0c' => cursor.advance(),
            b'.' => {
                cursor.advance();
                preceding = Preceding::Dot;
            }
            byte if is_ident_byte(byte) => {
                let line = cursor.line;
                let word = cursor.take_word();
                let candidate = word == placeholder && preceding == Preceding::Other;
                preceding = if matches!(word, "def" | "class") {
                    Preceding::Definition
                } else {
                    Preceding::Other
                };
                if candidate && cursor.open_call() {
                    let arguments = cursor.clone().split_arguments(line)?;
                    calls.push(CallSite { line, arguments });
                }
            }
            _ => {
                cursor.advance();
                preceding = Preceding::Other;
            }
        }
    }
    Ok(calls)
}
