// SPDX-License-Identifier: PMPL-1.0-or-later

//! Reader for the artifact grammar: `# comment` lines, parenthesised
//! lists, bare atoms and double-quoted strings using the escapes produced
//! by [`crate::compile::escape_literal`].

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Sexpr {
    Atom(String),
    String(String),
    List(Vec<Sexpr>),
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Atom(String),
    Str(String),
}

/// Read exactly one top-level expression.
pub(super) fn parse(input: &str) -> Result<Sexpr, String> {
    let mut tokens = tokenize(input)?.into_iter();
    let expr = match tokens.next() {
        Some(first) => read(first, &mut tokens)?,
        None => return Err("empty artifact".to_string()),
    };
    match tokens.next() {
        None => Ok(expr),
        Some(_) => Err("extra tokens after artifact".to_string()),
    }
}

fn read(token: Token, rest: &mut impl Iterator<Item = Token>) -> Result<Sexpr, String> {
    match token {
        Token::Atom(atom) => Ok(Sexpr::Atom(atom)),
        Token::Str(text) => Ok(Sexpr::String(text)),
        Token::Close => Err("unexpected closing parenthesis".to_string()),
        Token::Open => {
            let mut items = Vec::new();
            loop {
                match rest.next() {
                    Some(Token::Close) => return Ok(Sexpr::List(items)),
                    Some(next) => items.push(read(next, rest)?),
                    None => return Err("unterminated list".to_string()),
                }
            }
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        match ch {
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '#' => {
                chars.by_ref().find(|&(_, c)| c == '\n');
            }
            '"' => tokens.push(Token::Str(unescape(&mut chars)?)),
            c if c.is_whitespace() => {}
            _ => {
                let mut end = start + ch.len_utf8();
                while let Some(&(at, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"') {
                        break;
                    }
                    end = at + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Atom(input[start..end].to_string()));
            }
        }
    }
    Ok(tokens)
}

/// Consume a string body up to and including its closing quote.
fn unescape(chars: &mut impl Iterator<Item = (usize, char)>) -> Result<String, String> {
    let mut value = String::new();
    while let Some((_, ch)) = chars.next() {
        match ch {
            '"' => return Ok(value),
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, 't')) => value.push('\t'),
                Some((_, other)) => value.push(other),
                None => break,
            },
            other => value.push(other),
        }
    }
    Err("unterminated string literal".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lists_strings_and_comments() {
        let tree = parse("# header\n(root (key \"va\\\"lue\") atom)").unwrap();
        assert_eq!(
            tree,
            Sexpr::List(vec![
                Sexpr::Atom("root".to_string()),
                Sexpr::List(vec![
                    Sexpr::Atom("key".to_string()),
                    Sexpr::String("va\"lue".to_string()),
                ]),
                Sexpr::Atom("atom".to_string()),
            ])
        );
    }

    #[test]
    fn hash_inside_a_string_is_not_a_comment() {
        let tree = parse("(entry \"a # b\\n\")").unwrap();
        assert_eq!(
            tree,
            Sexpr::List(vec![
                Sexpr::Atom("entry".to_string()),
                Sexpr::String("a # b\n".to_string()),
            ])
        );
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(parse("(a) (b)").is_err());
        assert!(parse("(a").is_err());
        assert!(parse(")").is_err());
        assert!(parse("# only a comment\n").is_err());
        assert!(parse("(a \"open)").is_err());
    }
}
