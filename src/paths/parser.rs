use std::iter::Peekable;
use std::str::CharIndices;

// Path token
//------------------------------------------------------------------------------

/// One element of a size-independent path: a command letter, a coordinate
/// expressed as a fraction of the authoring unit, or an arc parameter that
/// does not scale (x-axis rotation and the two flags).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathToken {
    Cmd(char),
    Unit(f64),
    Fixed(f64),
}

impl PathToken {
    /// Renders the token for a concrete pixel size, rounded half-up to 3 decimals.
    pub fn scaled(self, size: f64) -> String {
        match self {
            Self::Cmd(c) => c.to_string(),
            Self::Unit(v) => round3(v * size).to_string(),
            Self::Fixed(v) => v.to_string(),
        }
    }
}

pub fn round3(v: f64) -> f64 {
    (v * 1000.0 + 0.5).floor() / 1000.0
}

fn arg_count(cmd: char) -> usize {
    match cmd {
        'm' | 'l' | 't' => 2,
        'h' | 'v' => 1,
        'c' => 6,
        's' | 'q' => 4,
        'a' => 7,
        _ => 0,
    }
}

// Parser
//------------------------------------------------------------------------------

/// Parses a relative path template authored in a `unit`-sized square.
///
/// Only lowercase (relative) commands are accepted, plus `z`/`Z`. Numbers may be
/// packed the way minifiers emit them (`1.05.49`, `2-.5`), commands may repeat
/// implicitly, and arc flags may be written without separators. Implicit
/// repetitions are emitted with an explicit command letter (`l` after `m`).
pub fn parse(path: &str, unit: f64) -> Result<Vec<PathToken>, String> {
    if !(unit.is_finite() && unit > 0.0) {
        return Err(format!("invalid unit size {unit}"));
    }

    let mut lex = Lexer { chars: path.char_indices().peekable() };
    let mut out = Vec::new();
    let mut cur: Option<char> = None;

    loop {
        lex.skip_separators();
        let Some(&(pos, ch)) = lex.chars.peek() else { break };

        let cmd = if ch.is_ascii_alphabetic() {
            lex.chars.next();
            match ch {
                'z' | 'Z' => {
                    out.push(PathToken::Cmd('z'));
                    cur = Some('z');
                    continue;
                }
                'm' | 'l' | 'h' | 'v' | 'c' | 's' | 'q' | 't' | 'a' => ch,
                c if c.is_ascii_uppercase() => return Err(format!("absolute command {c} at {pos}")),
                c => return Err(format!("unknown command {c} at {pos}")),
            }
        } else {
            match cur {
                Some('m') => 'l',
                Some('z') => return Err(format!("number after close at {pos}")),
                Some(c) => c,
                None => return Err(format!("path must start with m, found {ch:?}")),
            }
        };

        if cur.is_none() && cmd != 'm' {
            return Err(format!("path must start with m, found {cmd}"));
        }

        out.push(PathToken::Cmd(cmd));
        for i in 0..arg_count(cmd) {
            lex.skip_separators();
            let token = match (cmd, i) {
                ('a', 2) => PathToken::Fixed(lex.number()?),
                ('a', 3 | 4) => PathToken::Fixed(lex.flag()?),
                _ => PathToken::Unit(lex.number()? / unit),
            };
            out.push(token);
        }
        cur = Some(cmd);
    }

    if out.is_empty() {
        return Err("empty path".to_string());
    }
    Ok(out)
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl Lexer<'_> {
    fn skip_separators(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace() || *c == ',') {
            self.chars.next();
        }
    }

    fn flag(&mut self) -> Result<f64, String> {
        match self.chars.next() {
            Some((_, '0')) => Ok(0.0),
            Some((_, '1')) => Ok(1.0),
            Some((pos, c)) => Err(format!("invalid arc flag {c:?} at {pos}")),
            None => Err("missing arc flag".to_string()),
        }
    }

    fn number(&mut self) -> Result<f64, String> {
        let mut s = String::new();
        if let Some(&(_, c @ ('-' | '+'))) = self.chars.peek() {
            s.push(c);
            self.chars.next();
        }

        let mut digits = 0;
        let mut dot = false;
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '0'..='9' => digits += 1,
                '.' if !dot => dot = true,
                _ => break,
            }
            s.push(c);
            self.chars.next();
        }
        if digits == 0 {
            return match self.chars.peek() {
                Some(&(pos, c)) => Err(format!("expected number at {pos}, found {c:?}")),
                None => Err("unexpected end of path".to_string()),
            };
        }

        // Exponent, only when followed by digits
        if let Some(&(_, 'e' | 'E')) = self.chars.peek() {
            let mut ahead = self.chars.clone();
            ahead.next();
            let mut exp = String::from("e");
            if let Some(&(_, c @ ('-' | '+'))) = ahead.peek() {
                exp.push(c);
                ahead.next();
            }
            if matches!(ahead.peek(), Some((_, '0'..='9'))) {
                while let Some(&(_, c @ '0'..='9')) = ahead.peek() {
                    exp.push(c);
                    ahead.next();
                }
                s.push_str(&exp);
                self.chars = ahead;
            }
        }

        s.parse::<f64>().map_err(|e| format!("invalid number {s:?}: {e}"))
    }
}
