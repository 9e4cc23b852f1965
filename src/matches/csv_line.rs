//! Single-line CSV tokenizer.
//!
//! Follows what spreadsheet exports actually produce rather than strict
//! RFC 4180: a quote anywhere outside a quoted run opens one, `""` inside a
//! quoted run is a literal quote, and an unterminated quote simply runs to
//! the end of the line.

/// Split one line into its fields.
///
/// Always returns at least one field; the number of fields is the number of
/// unquoted commas plus one.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => current.push(ch),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            }
        }
    }
    fields.push(current);

    fields
}
