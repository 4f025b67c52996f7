//! SQL tokens, the atomic units of rendered statements.
//!
//! Tokens are backend-agnostic and serialize to backend-specific strings.
//! Column names are quoted when the catalog is built, so they are carried
//! as pre-rendered [`Token::Column`] text.

use crate::backend::{Backend, SqlBackend};
use crate::join::JoinType;
use crate::query::{CompareOp, SortDir};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    On,
    Join(JoinType),
    OrderBy,
    Sort(SortDir),
    Limit,
    Offset,
    In,
    Like,
    IsNull,
    IsNotNull,

    // === Punctuation ===
    Comma,
    LParen,
    RParen,

    // === Operators ===
    Compare(CompareOp),

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Identifier, quoted by the backend.
    Ident(String),
    /// Already quoted `"table"."column"`.
    Column(String),
    /// Bind parameter. Always `?`; the executor rewrites it per backend.
    Placeholder,
    LitInt(i64),
    /// Trusted static SQL only.
    Raw(&'static str),
}

impl Token {
    pub fn serialize(&self, backend: Backend) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::On => "ON".into(),
            Token::Join(join_type) => backend.join_keyword(*join_type).into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Sort(dir) => dir.keyword().into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::In => "IN".into(),
            Token::Like => "LIKE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),

            Token::Comma => ",".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Compare(op) => op.as_sql().into(),

            Token::Space => " ".into(),

            Token::Ident(name) => backend.quote_identifier(name),
            Token::Column(quoted) => quoted.clone(),
            Token::Placeholder => "?".into(),
            Token::LitInt(n) => n.to_string(),
            Token::Raw(s) => (*s).into(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn serialize(&self, backend: Backend) -> String {
        self.tokens.iter().map(|t| t.serialize(backend)).collect()
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
