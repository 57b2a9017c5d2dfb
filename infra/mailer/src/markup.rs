//! Plain-text rendering of HTML bodies.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Tag { quote: Option<char> },
    Comment,
}

/// Removes markup tags and comments, leaving the text between them untouched.
///
/// Entities are not decoded. A `<` that cannot start a tag (`a < b`) stays as text; an
/// unterminated tag swallows the rest of the input.
///
/// ```rust
/// assert_eq!(kissj_mailer::strip_tags("<b>Hi</b>"), "Hi");
/// assert_eq!(kissj_mailer::strip_tags("1 < 2 <!-- note --><br/>ok"), "1 < 2 ok");
/// ```
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut state = State::Text;
    let mut rest = html;

    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];
        match state {
            State::Text if c == '<' && after.starts_with("!--") => {
                state = State::Comment;
                rest = &after[3..];
                continue;
            },
            State::Text if c == '<' && opens_tag(after) => state = State::Tag { quote: None },
            State::Text => out.push(c),
            State::Tag { quote: None } if c == '>' => state = State::Text,
            State::Tag { quote: None } if c == '"' || c == '\'' => {
                state = State::Tag { quote: Some(c) };
            },
            State::Tag { quote: Some(q) } if c == q => state = State::Tag { quote: None },
            State::Tag { .. } => {},
            State::Comment if rest.starts_with("-->") => {
                state = State::Text;
                rest = &rest[3..];
                continue;
            },
            State::Comment => {},
        }
        rest = after;
    }

    out
}

fn opens_tag(after: &str) -> bool {
    after.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}
