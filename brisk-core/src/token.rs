use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Number,
    Str,
    Identifier,

    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Exp,

    Colon,

    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Period,

    LParen,
    RParen,

    If,
    Then,
    Else,
    End,
    While,
    Do,
    Routine,

    Eof,
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Type::Number => "a number",
            Type::Str => "a string",
            Type::Identifier => "an identifier",
            Type::Plus => "'+'",
            Type::Minus => "'-'",
            Type::Mul => "'*'",
            Type::Div => "'/'",
            Type::Mod => "'%'",
            Type::Exp => "'**'",
            Type::Colon => "':'",
            Type::Eq => "'='",
            Type::Ne => "'<>'",
            Type::Lt => "'<'",
            Type::Le => "'<='",
            Type::Gt => "'>'",
            Type::Ge => "'>='",
            Type::Period => "'.'",
            Type::LParen => "'('",
            Type::RParen => "')'",
            Type::If => "'if'",
            Type::Then => "'then'",
            Type::Else => "'else'",
            Type::End => "'end'",
            Type::While => "'while'",
            Type::Do => "'do'",
            Type::Routine => "'routine'",
            Type::Eof => "end of input",
        };

        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ty: Type,
    pub text: String,
}

impl Token {
    pub fn new(ty: Type, text: String) -> Self {
        Token { ty, text }
    }

    pub fn eof() -> Self {
        Token {
            ty: Type::Eof,
            text: String::new(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.ty {
            Type::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}
