use crate::error::LexError;
use crate::token::{Token, Type};

// The scanner table is tried strictly top to bottom and the first pattern
// that matches at the cursor wins. There is no longest-match rule: two
// character operators sit above their one character prefixes, and keywords
// sit above the identifier catch-all. The ordering is the disambiguation
// mechanism, so `**` never scans as two stars and `iffy` scans as 'if'
// followed by the identifier 'fy'.
const PATTERNS: &[(Pat, Type)] = &[
    (Pat::Number, Type::Number),
    (Pat::Str, Type::Str),
    (Pat::Exact("+"), Type::Plus),
    (Pat::Exact("-"), Type::Minus),
    (Pat::Exact("**"), Type::Exp),
    (Pat::Exact("*"), Type::Mul),
    (Pat::Exact("/"), Type::Div),
    (Pat::Exact("%"), Type::Mod),
    (Pat::Exact(":"), Type::Colon),
    (Pat::Exact("<>"), Type::Ne),
    (Pat::Exact("<="), Type::Le),
    (Pat::Exact(">="), Type::Ge),
    (Pat::Exact("<"), Type::Lt),
    (Pat::Exact(">"), Type::Gt),
    (Pat::Exact("="), Type::Eq),
    (Pat::Exact("."), Type::Period),
    (Pat::Exact("("), Type::LParen),
    (Pat::Exact(")"), Type::RParen),
    (Pat::Exact("if"), Type::If),
    (Pat::Exact("then"), Type::Then),
    (Pat::Exact("else"), Type::Else),
    (Pat::Exact("end"), Type::End),
    (Pat::Exact("while"), Type::While),
    (Pat::Exact("do"), Type::Do),
    (Pat::Exact("routine"), Type::Routine),
    (Pat::Word, Type::Identifier),
];

enum Pat {
    Exact(&'static str),
    Number,
    Str,
    Word,
}

impl Pat {
    // Matches against the start of `rest` only. Returns the number of bytes
    // consumed and the token text, which for strings excludes the quotes.
    fn match_prefix<'a>(&self, rest: &'a str) -> Option<(usize, &'a str)> {
        match self {
            Pat::Exact(lit) => {
                if rest.starts_with(lit) {
                    Some((lit.len(), lit))
                } else {
                    None
                }
            }

            // Digits with an optional fractional part. The fraction needs at
            // least one digit after the dot, so `1.` is a number followed by
            // a period token.
            Pat::Number => {
                let whole = leading_digits(rest);
                if whole == 0 {
                    return None;
                }

                let mut len = whole;
                if let Some(after) = rest[whole..].strip_prefix('.') {
                    let frac = leading_digits(after);
                    if frac > 0 {
                        len += 1 + frac;
                    }
                }

                Some((len, &rest[..len]))
            }

            // Double-quoted, no escape sequences. A quote that is never
            // closed matches nothing and surfaces as an unexpected '"'.
            Pat::Str => {
                let body = rest.strip_prefix('"')?;
                let close = body.find('"')?;
                Some((close + 2, &body[..close]))
            }

            Pat::Word => {
                let len = rest
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                    .count();

                if len == 0 {
                    None
                } else {
                    Some((len, &rest[..len]))
                }
            }
        }
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(|b| b.is_ascii_digit()).count()
}

pub struct Scanner<'a> {
    src: &'a str,
    current: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Scanner { src, current: 0 }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        self.skip_whitespace();
        while let Some(ch) = self.peek() {
            match self.scan_token() {
                Some(token) => tokens.push(token),
                None => {
                    return Err(LexError::UnexpectedCharacter {
                        ch,
                        at: self.current,
                    })
                }
            }

            self.skip_whitespace();
        }

        tokens.push(Token::eof());
        Ok(tokens)
    }

    fn scan_token(&mut self) -> Option<Token> {
        let rest = &self.src[self.current..];

        for (pat, ty) in PATTERNS {
            if let Some((len, text)) = pat.match_prefix(rest) {
                let token = Token::new(*ty, String::from(text));
                self.current += len;
                return Some(token);
            }
        }

        None
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }

            self.current += ch.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.current..].chars().next()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LexError;
    use crate::scanner::Scanner;
    use crate::token::{Token, Type};

    macro_rules! token {
        ($ty:ident, $text:literal) => {
            Token::new(Type::$ty, String::from($text))
        };
    }

    #[test]
    fn test_basic_scanning() {
        let source = "total: 12 + 3.5 * combine(x \"hello\").";

        assert_eq!(
            Scanner::new(source).scan_tokens().unwrap(),
            vec![
                token!(Identifier, "total"),
                token!(Colon, ":"),
                token!(Number, "12"),
                token!(Plus, "+"),
                token!(Number, "3.5"),
                token!(Mul, "*"),
                token!(Identifier, "combine"),
                token!(LParen, "("),
                token!(Identifier, "x"),
                token!(Str, "hello"),
                token!(RParen, ")"),
                token!(Period, "."),
                Token::eof(),
            ]
        );
    }

    #[test]
    fn test_two_char_operators_win_over_prefixes() {
        let source = "2 ** 3 * 4 <= 5 < 6 <> 7 >= 8 > 9 = 10";

        let kinds: Vec<Type> = Scanner::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|token| token.ty)
            .collect();

        assert_eq!(
            kinds,
            vec![
                Type::Number,
                Type::Exp,
                Type::Number,
                Type::Mul,
                Type::Number,
                Type::Le,
                Type::Number,
                Type::Lt,
                Type::Number,
                Type::Ne,
                Type::Number,
                Type::Ge,
                Type::Number,
                Type::Gt,
                Type::Number,
                Type::Eq,
                Type::Number,
                Type::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        let source = "if then else end while do routine flag";

        assert_eq!(
            Scanner::new(source).scan_tokens().unwrap(),
            vec![
                token!(If, "if"),
                token!(Then, "then"),
                token!(Else, "else"),
                token!(End, "end"),
                token!(While, "while"),
                token!(Do, "do"),
                token!(Routine, "routine"),
                token!(Identifier, "flag"),
                Token::eof(),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_splits_identifier() {
        // First match wins, so a word starting with a keyword is split
        // rather than scanned as one identifier.
        assert_eq!(
            Scanner::new("iffy").scan_tokens().unwrap(),
            vec![token!(If, "if"), token!(Identifier, "fy"), Token::eof()]
        );
    }

    #[test]
    fn test_number_with_trailing_dot_is_statement_end() {
        assert_eq!(
            Scanner::new("1.").scan_tokens().unwrap(),
            vec![token!(Number, "1"), token!(Period, "."), Token::eof()]
        );

        assert_eq!(
            Scanner::new("1.5.").scan_tokens().unwrap(),
            vec![token!(Number, "1.5"), token!(Period, "."), Token::eof()]
        );
    }

    #[test]
    fn test_string_text_excludes_quotes() {
        assert_eq!(
            Scanner::new("\"\" \"a b\"").scan_tokens().unwrap(),
            vec![token!(Str, ""), token!(Str, "a b"), Token::eof()]
        );
    }

    #[test]
    fn test_empty_source_scans_to_eof() {
        assert_eq!(
            Scanner::new("  \n\t ").scan_tokens().unwrap(),
            vec![Token::eof()]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            Scanner::new("1 + @").scan_tokens(),
            Err(LexError::UnexpectedCharacter { ch: '@', at: 4 })
        );
    }

    #[test]
    fn test_unterminated_string() {
        // Without a closing quote the string pattern never matches, so the
        // opening quote itself is the unexpected character.
        assert_eq!(
            Scanner::new("x: \"oops").scan_tokens(),
            Err(LexError::UnexpectedCharacter { ch: '"', at: 3 })
        );
    }
}
