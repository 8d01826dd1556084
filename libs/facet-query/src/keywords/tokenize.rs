/// Quotation marks recognized by default.
pub const DEFAULT_QUOTATION_MARKS: &[char] = &['"', '\''];

/// Split `input` on whitespace, keeping quoted spans together.
///
/// A fragment that is quoted on both ends becomes one token with the quotes
/// stripped. A fragment that opens a quote without closing it swallows the
/// following fragments until one ends in a quotation mark (or input runs
/// out); the joined span is re-wrapped in double quotes. Lone quotation
/// marks and empty quoted strings produce no token.
pub fn tokenize_quoted(input: &str, quotation_marks: &[char]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut fragments = input.split_whitespace();

    while let Some(fragment) = fragments.next() {
        let Some(rest) = strip_opening_quote(fragment, quotation_marks) else {
            tokens.push(fragment.to_string());
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        if let Some(inner) = strip_closing_quote(rest, quotation_marks) {
            if !inner.is_empty() {
                tokens.push(inner.to_string());
            }
            continue;
        }

        let mut phrase = String::from(rest);
        for next in fragments.by_ref() {
            let closing = strip_closing_quote(next, quotation_marks);
            let part = closing.unwrap_or(next);
            if !part.is_empty() {
                phrase.push(' ');
                phrase.push_str(part);
            }
            if closing.is_some() {
                break;
            }
        }
        tokens.push(format!("\"{phrase}\""));
    }

    tokens
}

fn strip_opening_quote<'a>(s: &'a str, quotation_marks: &[char]) -> Option<&'a str> {
    let first = s.chars().next()?;
    quotation_marks
        .contains(&first)
        .then(|| &s[first.len_utf8()..])
}

fn strip_closing_quote<'a>(s: &'a str, quotation_marks: &[char]) -> Option<&'a str> {
    let last = s.chars().next_back()?;
    quotation_marks
        .contains(&last)
        .then(|| &s[..s.len() - last.len_utf8()])
}
