//! Go literal syntax: rendering constants into source and reading them back.

use pe_core::ir::ConstValue;
use pe_core::{bail, unsupported, Result};

/// Render a constant as Go source. Non-finite floats have no literal form.
pub fn render_value(value: &ConstValue) -> Result<String> {
    match value {
        ConstValue::String(s) => Ok(quote_string(&s.value)),
        ConstValue::Int(i) => Ok(i.value.to_string()),
        ConstValue::Float(f) if f.value.is_finite() => Ok(format!("{:?}", f.value)),
        ConstValue::Float(f) => unsupported!("float constant {} has no Go literal form", f.value),
        ConstValue::Bool(b) => Ok(b.value.to_string()),
    }
}

/// Quote `input` as a Go interpreted string literal.
pub fn quote_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('"');
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            // gc rejects a byte order mark anywhere but the start of a file
            '\u{feff}' => out.push_str("\\ufeff"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Parse a Go basic literal (string, rune, integer, float or boolean).
///
/// Rune literals produce integer constants, as they do in Go. A leading `-`
/// is accepted on numbers.
pub fn parse_literal(text: &str) -> Result<ConstValue> {
    let text = text.trim();
    match text {
        "true" => return Ok(ConstValue::bool(true)),
        "false" => return Ok(ConstValue::bool(false)),
        "" => bail!("empty literal"),
        _ => {}
    }

    if let Some(body) = text.strip_prefix('"') {
        let Some(body) = body.strip_suffix('"') else {
            bail!("unterminated string literal: {}", text);
        };
        return Ok(ConstValue::string(unescape(body, '"')?));
    }
    if let Some(body) = text.strip_prefix('`') {
        let Some(body) = body.strip_suffix('`') else {
            bail!("unterminated raw string literal: {}", text);
        };
        return Ok(ConstValue::string(body.replace('\r', "")));
    }
    if let Some(body) = text.strip_prefix('\'') {
        let Some(body) = body.strip_suffix('\'') else {
            bail!("unterminated rune literal: {}", text);
        };
        let decoded = unescape(body, '\'')?;
        let mut chars = decoded.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(ConstValue::int(c as i64)),
            _ => bail!("rune literal must hold exactly one character: {}", text),
        };
    }

    parse_number(text)
}

fn parse_number(text: &str) -> Result<ConstValue> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = digits.replace('_', "");
    let lower = digits.to_ascii_lowercase();

    let radix_body = if let Some(hex) = lower.strip_prefix("0x") {
        if hex.contains('.') || hex.contains('p') {
            unsupported!("hexadecimal float literal {}", text);
        }
        Some((16, hex.to_string()))
    } else if let Some(bin) = lower.strip_prefix("0b") {
        Some((2, bin.to_string()))
    } else if let Some(oct) = lower.strip_prefix("0o") {
        Some((8, oct.to_string()))
    } else if lower.len() > 1
        && lower.starts_with('0')
        && lower.bytes().all(|b| b.is_ascii_digit())
    {
        Some((8, lower[1..].to_string()))
    } else {
        None
    };

    if let Some((radix, body)) = radix_body {
        return parse_int(&body, radix, negative, text);
    }

    if lower.contains(['.', 'e']) {
        let value: f64 = lower
            .parse()
            .map_err(|_| pe_core::Error::Generic(format!("invalid float literal: {}", text)))?;
        return Ok(ConstValue::float(if negative { -value } else { value }));
    }
    parse_int(&lower, 10, negative, text)
}

fn parse_int(body: &str, radix: u32, negative: bool, text: &str) -> Result<ConstValue> {
    if body.is_empty() {
        bail!("invalid integer literal: {}", text);
    }
    let magnitude = u64::from_str_radix(body, radix)
        .map_err(|_| pe_core::Error::Generic(format!("invalid integer literal: {}", text)))?;
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    match value {
        Some(value) => Ok(ConstValue::int(value)),
        None => unsupported!("integer literal {} does not fit in 64 bits", text),
    }
}

fn unescape(body: &str, quote: char) -> Result<String> {
    let mut bytes: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == quote {
            bail!("unescaped {} inside literal", quote);
        }
        if ch != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let Some(esc) = chars.next() else {
            bail!("dangling escape at end of literal");
        };
        let simple = match esc {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '"' if quote == '"' => Some(b'"'),
            '\'' if quote == '\'' => Some(b'\''),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            continue;
        }
        match esc {
            'x' => bytes.push(take_radix(&mut chars, 2, 16)? as u8),
            'u' | 'U' => {
                let width = if esc == 'u' { 4 } else { 8 };
                let code = take_radix(&mut chars, width, 16)?;
                let Some(c) = char::from_u32(code) else {
                    bail!("invalid unicode escape \\{}{:x}", esc, code);
                };
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            '0'..='7' => {
                let rest = take_radix(&mut chars, 2, 8)?;
                let code = (esc as u32 - '0' as u32) * 64 + rest;
                if code > 0xff {
                    bail!("octal escape out of range");
                }
                bytes.push(code as u8);
            }
            other => bail!("unknown escape sequence \\{}", other),
        }
    }
    String::from_utf8(bytes)
        .map_err(|_| pe_core::Error::Generic("literal is not valid UTF-8".to_string()))
}

fn take_radix(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    width: usize,
    radix: u32,
) -> Result<u32> {
    let mut value = 0u32;
    for _ in 0..width {
        let Some(digit) = chars.next().and_then(|c| c.to_digit(radix)) else {
            bail!("malformed escape sequence");
        };
        value = value * radix + digit;
    }
    Ok(value)
}
