//! Go string and rune literal decoding.

/// Decode a Go string literal (interpreted `"..."` or raw `` `...` ``).
pub fn unquote_string(lit: &str) -> Result<String, String> {
    if let Some(body) = lit.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) {
        // Carriage returns are discarded from raw strings.
        return Ok(body.replace('\r', ""));
    }
    let body = lit
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| format!("not a string literal: {lit}"))?;
    unescape(body, '"')
}

/// Decode a Go rune literal such as `'a'`, `'\n'` or `'\U0001F600'`.
pub fn unquote_rune(lit: &str) -> Result<char, String> {
    let body = lit
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| format!("not a rune literal: {lit}"))?;
    let decoded = unescape(body, '\'')?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("rune literal must hold exactly one character: {lit}")),
    }
}

fn unescape(body: &str, quote: char) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == quote {
            return Err(format!("unescaped {quote} in literal"));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escape = chars.next().ok_or("literal ends with a backslash")?;
        let decoded = match escape {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '\'' if quote == '\'' => '\'',
            '"' if quote == '"' => '"',
            'x' => hex_escape(&mut chars, 2)?,
            'u' => hex_escape(&mut chars, 4)?,
            'U' => hex_escape(&mut chars, 8)?,
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    let digit = chars
                        .next()
                        .and_then(|d| d.to_digit(8))
                        .ok_or("octal escape needs three digits")?;
                    value = value * 8 + digit;
                }
                if value > 255 {
                    return Err(format!("octal escape value {value} > 255"));
                }
                char::from_u32(value).ok_or("invalid octal escape")?
            }
            other => return Err(format!("unknown escape sequence \\{other}")),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<char, String> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|d| d.to_digit(16))
            .ok_or_else(|| format!("hex escape needs {digits} digits"))?;
        value = value * 16 + digit;
    }
    char::from_u32(value).ok_or_else(|| format!("escape value {value:#x} is not a valid code point"))
}
