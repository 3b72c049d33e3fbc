//! Field-level handling for DPR text tables.
//!
//! - Tokenizing raw text into records of quoted/escaped fields
//! - Classifying fields as numeric for block detection
//! - Best-effort numeric conversion with caller defaults
//! - ASCII-hex decoding of encoded header values

/// One physical row of the source table
pub type Record = Vec<String>;

/// Placeholder tokens that sit inside numeric columns
const NUMERIC_MARKERS: &[&str] = &["#TRUE#", "#FALSE#", "-", "+"];

/// Split raw text into records of fields.
///
/// Double quotes enclose fields that may contain commas and newlines; a doubled
/// quote inside a quoted field is a literal quote. Outside quotes a comma ends
/// the field, `\r` is dropped and `\n` ends the field and the record. An
/// unterminated quote swallows the rest of the input into the current field.
pub fn tokenize(contents: &str) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    let mut row: Record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = contents.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        records.push(row);
    }

    records
}

/// Longest numeric prefix of `s`, `strtod` style.
///
/// Returns the value and the byte offset just past the number. Leading
/// whitespace is skipped; `inf`, `infinity` and `nan` are accepted in any case.
fn numeric_prefix(s: &str) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let start = i;
    let negative = i < bytes.len() && bytes[i] == b'-';
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    for (word, value) in [
        ("infinity", f64::INFINITY),
        ("inf", f64::INFINITY),
        ("nan", f64::NAN),
    ] {
        let end = i + word.len();
        if end <= bytes.len() && bytes[i..end].eq_ignore_ascii_case(word.as_bytes()) {
            return Some((if negative { -value } else { value }, end));
        }
    }

    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[start..i].parse::<f64>().ok().map(|v| (v, i))
}

/// Whether a field is compatible with a numeric column.
///
/// Empty fields and the boolean/placeholder markers count as numeric. Anything
/// else must be consumed entirely by a decimal/exponential number parse.
pub fn is_numeric(field: &str) -> bool {
    if field.is_empty() || NUMERIC_MARKERS.contains(&field) {
        return true;
    }
    matches!(numeric_prefix(field), Some((_, end)) if end == field.len())
}

/// Parse the numeric prefix of a field, or return `default` when there is none
pub fn parse_f64_or(field: &str, default: f64) -> f64 {
    if field.is_empty() {
        return default;
    }
    numeric_prefix(field).map_or(default, |(v, _)| v)
}

/// Integer variant of [`parse_f64_or`]; the value is truncated toward zero
pub fn parse_i32_or(field: &str, default: i32) -> i32 {
    parse_f64_or(field, default as f64) as i32
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode ASCII-hex text, `None` if any pair holds a non-hex digit.
///
/// A trailing unpaired character is ignored.
pub fn try_hex_decode(hex: &str) -> Option<String> {
    let bytes = hex.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let hi = hex_nibble(pair[0])?;
        let lo = hex_nibble(pair[1])?;
        out.push(hi * 16 + lo);
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}

/// Decode ASCII-hex text, passing the input through unchanged when it is not hex
pub fn hex_decode(hex: &str) -> String {
    try_hex_decode(hex).unwrap_or_else(|| hex.to_string())
}
