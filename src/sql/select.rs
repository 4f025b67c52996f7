//! SELECT rendering over a join chain.
//!
//! Field references are resolved with [`JoinChain::map`]; values become `?`
//! placeholders collected, in order, as bind arguments.

use super::token::{Token, TokenStream};
use crate::join::JoinChain;
use crate::model::MapError;
use crate::query::{CompareOp, Condition, Sort, Value};

// =============================================================================
// Select Statement
// =============================================================================

/// A SELECT over every projected model of a join chain.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct SelectStatement<'a> {
    chain: &'a JoinChain,
    filter: Option<&'a Condition>,
    sort: &'a [Sort],
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<'a> SelectStatement<'a> {
    pub fn new(chain: &'a JoinChain) -> Self {
        Self {
            chain,
            filter: None,
            sort: &[],
            limit: None,
            offset: None,
        }
    }

    pub fn filter(mut self, filter: Option<&'a Condition>) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, sort: &'a [Sort]) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: Option<u64>) -> Self {
        self.offset = offset;
        self
    }

    /// Build the token stream, pushing bind arguments onto `args`.
    pub fn to_tokens(&self, args: &mut Vec<Value>) -> Result<TokenStream, MapError> {
        let catalog = self.chain.catalog();
        let mut ts = TokenStream::new();

        ts.push(Token::Select).space();
        let mut first = true;
        for model in self.chain.projected() {
            for field in model.fields() {
                if !first {
                    ts.comma().space();
                }
                first = false;
                ts.push(Token::Column(field.quoted.clone()));
            }
        }
        if first {
            ts.push(Token::Raw("*"));
        }

        for node in self.chain.nodes() {
            let table = catalog.model(node.model).table().to_string();
            match &node.join {
                None => {
                    ts.space().push(Token::From).space().push(Token::Ident(table));
                }
                Some(join) => {
                    ts.space()
                        .push(Token::Join(join.join_type))
                        .space()
                        .push(Token::Ident(table))
                        .space()
                        .push(Token::On)
                        .space();
                    self.condition(&mut ts, &join.condition, args, false)?;
                }
            }
        }

        if let Some(filter) = self.filter {
            ts.space().push(Token::Where).space();
            self.condition(&mut ts, filter, args, false)?;
        }

        if !self.sort.is_empty() {
            ts.space().push(Token::OrderBy).space();
            for (i, key) in self.sort.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                let (column, _) = self.chain.map(key.field())?;
                ts.push(Token::Column(column))
                    .space()
                    .push(Token::Sort(key.dir));
            }
        }

        // Counts past i64::MAX clamp instead of wrapping negative.
        if let Some(limit) = self.limit {
            ts.space().push(Token::Limit).space().push(Token::LitInt(clamp_count(limit)));
        }
        if let Some(offset) = self.offset {
            ts.space().push(Token::Offset).space().push(Token::LitInt(clamp_count(offset)));
        }

        Ok(ts)
    }

    /// Render to SQL text plus bind arguments.
    pub fn render(&self) -> Result<(String, Vec<Value>), MapError> {
        let mut args = Vec::new();
        let ts = self.to_tokens(&mut args)?;
        Ok((ts.serialize(self.chain.catalog().backend()), args))
    }

    fn condition(
        &self,
        ts: &mut TokenStream,
        condition: &Condition,
        args: &mut Vec<Value>,
        nested: bool,
    ) -> Result<(), MapError> {
        match condition {
            Condition::Compare { field, op, value } => {
                let (column, _) = self.chain.map(field)?;
                ts.push(Token::Column(column)).space();
                match (op, value) {
                    (CompareOp::Eq, Value::Null) => {
                        ts.push(Token::IsNull);
                    }
                    (CompareOp::Neq, Value::Null) => {
                        ts.push(Token::IsNotNull);
                    }
                    _ => {
                        ts.push(Token::Compare(*op)).space();
                        self.operand(ts, value, args)?;
                    }
                }
            }
            Condition::In { field, values } => {
                if values.is_empty() {
                    ts.push(Token::Raw("1 = 0"));
                    return Ok(());
                }
                let (column, _) = self.chain.map(field)?;
                ts.push(Token::Column(column))
                    .space()
                    .push(Token::In)
                    .space()
                    .lparen();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    self.operand(ts, value, args)?;
                }
                ts.rparen();
            }
            Condition::Like { field, pattern } => {
                let (column, _) = self.chain.map(field)?;
                ts.push(Token::Column(column))
                    .space()
                    .push(Token::Like)
                    .space()
                    .push(Token::Placeholder);
                args.push(Value::Text(pattern.clone()));
            }
            Condition::And(subs) => self.compound(ts, subs, Token::And, "1 = 1", args, nested)?,
            Condition::Or(subs) => self.compound(ts, subs, Token::Or, "1 = 0", args, nested)?,
        }
        Ok(())
    }

    fn compound(
        &self,
        ts: &mut TokenStream,
        subs: &[Condition],
        sep: Token,
        empty: &'static str,
        args: &mut Vec<Value>,
        nested: bool,
    ) -> Result<(), MapError> {
        if subs.is_empty() {
            ts.push(Token::Raw(empty));
            return Ok(());
        }
        if nested {
            ts.lparen();
        }
        for (i, sub) in subs.iter().enumerate() {
            if i > 0 {
                ts.space().push(sep.clone()).space();
            }
            self.condition(ts, sub, args, true)?;
        }
        if nested {
            ts.rparen();
        }
        Ok(())
    }

    fn operand(
        &self,
        ts: &mut TokenStream,
        value: &Value,
        args: &mut Vec<Value>,
    ) -> Result<(), MapError> {
        match value {
            Value::Field(qname) => {
                let (column, _) = self.chain.map(qname)?;
                ts.push(Token::Column(column));
            }
            other => {
                ts.push(Token::Placeholder);
                args.push(other.clone());
            }
        }
        Ok(())
    }
}

fn clamp_count(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
