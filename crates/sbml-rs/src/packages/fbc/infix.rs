// crates/sbml-rs/src/packages/fbc/infix.rs

//! Text form of gene product associations.
//!
//! Grammar, with `and` binding tighter than `or` and keywords matched without
//! regard to case:
//!
//! ```text
//! or_expr  := and_expr ("or" and_expr)*
//! and_expr := primary ("and" primary)*
//! primary  := gene_product_id | "(" or_expr ")"
//! ```

use super::association::{FbcAnd, FbcOr, GeneProductRef};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::SBase;
use crate::types::{OperationError, is_valid_sid};
use thiserror::Error;

/// Why an association string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InfixError {
    #[error("the association string is empty")]
    Empty,

    #[error("unexpected '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    #[error("unexpected end of the association string")]
    UnexpectedEnd,

    #[error("'{0}' is not a valid gene product identifier")]
    InvalidIdentifier(String),

    #[error("association node rejected: {0}")]
    Rejected(#[from] OperationError),
}

/// Renders an association tree. Nested `and`/`or` nodes are parenthesized.
pub fn to_infix(association: &dyn SBase) -> String {
    if let Some(leaf) = association.downcast_ref::<GeneProductRef>() {
        return leaf.gene_product().unwrap_or_default().to_string();
    }
    let (operands, separator): (Vec<&dyn SBase>, &str) =
        if let Some(and) = association.downcast_ref::<FbcAnd>() {
            (and.associations().collect(), " and ")
        } else if let Some(or) = association.downcast_ref::<FbcOr>() {
            (or.associations().collect(), " or ")
        } else {
            return String::new();
        };
    operands
        .into_iter()
        .map(|operand| {
            if operand.is::<GeneProductRef>() {
                to_infix(operand)
            } else {
                format!("({})", to_infix(operand))
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Parses `infix` into a detached association tree in the namespaces `ns`.
/// A single operand is returned as itself, without a wrapping `and`/`or`.
pub fn parse_infix(infix: &str, ns: &SbmlNamespaces) -> Result<Box<dyn SBase>, InfixError> {
    let tokens = tokenize(infix);
    if tokens.is_empty() {
        return Err(InfixError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        ns,
    };
    let tree = parser.parse_or()?;
    match parser.tokens.get(parser.pos) {
        Some((token, offset)) => Err(InfixError::UnexpectedToken {
            token: token.text(),
            offset: *offset,
        }),
        None => Ok(tree),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    Word(String),
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::Word(word) => word.clone(),
        }
    }
}

fn tokenize(infix: &str) -> Vec<(Token, usize)> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    let flush = |tokens: &mut Vec<(Token, usize)>, start: Option<usize>, end: usize| {
        if let Some(start) = start {
            let word = &infix[start..end];
            let token = if word.eq_ignore_ascii_case("and") {
                Token::And
            } else if word.eq_ignore_ascii_case("or") {
                Token::Or
            } else {
                Token::Word(word.to_string())
            };
            tokens.push((token, start));
        }
    };
    for (offset, ch) in infix.char_indices() {
        if ch.is_whitespace() || ch == '(' || ch == ')' {
            flush(&mut tokens, word_start.take(), offset);
            match ch {
                '(' => tokens.push((Token::Open, offset)),
                ')' => tokens.push((Token::Close, offset)),
                _ => {}
            }
        } else if word_start.is_none() {
            word_start = Some(offset);
        }
    }
    flush(&mut tokens, word_start, infix.len());
    tokens
}

struct Parser<'a> {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    ns: &'a SbmlNamespaces,
}

impl Parser<'_> {
    fn eat(&mut self, expected: &Token) -> bool {
        if self.tokens.get(self.pos).is_some_and(|(t, _)| t == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Box<dyn SBase>, InfixError> {
        let mut operands = vec![self.parse_and()?];
        while self.eat(&Token::Or) {
            operands.push(self.parse_and()?);
        }
        if operands.len() == 1 {
            return Ok(operands.remove(0));
        }
        let mut or = FbcOr::with_namespaces(self.ns.clone());
        for operand in operands {
            or.add_association_owned(operand)?;
        }
        Ok(Box::new(or))
    }

    fn parse_and(&mut self) -> Result<Box<dyn SBase>, InfixError> {
        let mut operands = vec![self.parse_primary()?];
        while self.eat(&Token::And) {
            operands.push(self.parse_primary()?);
        }
        if operands.len() == 1 {
            return Ok(operands.remove(0));
        }
        let mut and = FbcAnd::with_namespaces(self.ns.clone());
        for operand in operands {
            and.add_association_owned(operand)?;
        }
        Ok(Box::new(and))
    }

    fn parse_primary(&mut self) -> Result<Box<dyn SBase>, InfixError> {
        let Some((token, offset)) = self.tokens.get(self.pos).cloned() else {
            return Err(InfixError::UnexpectedEnd);
        };
        self.pos += 1;
        match token {
            Token::Open => {
                let inner = self.parse_or()?;
                if self.eat(&Token::Close) {
                    Ok(inner)
                } else {
                    match self.tokens.get(self.pos) {
                        Some((token, offset)) => Err(InfixError::UnexpectedToken {
                            token: token.text(),
                            offset: *offset,
                        }),
                        None => Err(InfixError::UnexpectedEnd),
                    }
                }
            }
            Token::Word(id) => {
                if !is_valid_sid(&id) {
                    return Err(InfixError::InvalidIdentifier(id));
                }
                let mut leaf = GeneProductRef::with_namespaces(self.ns.clone());
                leaf.set_gene_product(&id)?;
                Ok(Box::new(leaf))
            }
            other => Err(InfixError::UnexpectedToken {
                token: other.text(),
                offset,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeCode;

    fn ns() -> SbmlNamespaces {
        SbmlNamespaces::with_package(3, 1, "fbc", 2).unwrap()
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let tree = parse_infix("g1 or g2 and g3", &ns()).unwrap();
        let or = tree.downcast_ref::<FbcOr>().unwrap();
        assert_eq!(or.num_associations(), 2);
        assert_eq!(or.get_association(1).unwrap().type_code(), TypeCode::FbcAnd);
        assert_eq!(to_infix(tree.as_ref()), "g1 or (g2 and g3)");
    }

    #[test]
    fn test_parentheses_and_case() {
        let tree = parse_infix("(G1 OR g2) AND g3", &ns()).unwrap();
        assert_eq!(tree.type_code(), TypeCode::FbcAnd);
        assert_eq!(to_infix(tree.as_ref()), "(G1 or g2) and g3");
    }

    #[test]
    fn test_single_gene() {
        let tree = parse_infix("  b0001 ", &ns()).unwrap();
        let leaf = tree.downcast_ref::<GeneProductRef>().unwrap();
        assert_eq!(leaf.gene_product(), Some("b0001"));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_infix("   ", &ns()).unwrap_err(), InfixError::Empty);
        assert_eq!(parse_infix("g1 and", &ns()).unwrap_err(), InfixError::UnexpectedEnd);
        assert_eq!(parse_infix("(g1 or g2", &ns()).unwrap_err(), InfixError::UnexpectedEnd);
        assert_eq!(
            parse_infix("g1 g2", &ns()).unwrap_err(),
            InfixError::UnexpectedToken {
                token: "g2".into(),
                offset: 3
            }
        );
        assert_eq!(
            parse_infix("g-1", &ns()).unwrap_err(),
            InfixError::InvalidIdentifier("g-1".into())
        );
    }
}
