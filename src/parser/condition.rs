use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{all_consuming, map, recognize},
    multi::{fold_many0, many0},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::{error::ParseConditionError, ActorState, Symbol};

/// A guard expression over named actor flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Literal(bool),
    Flag(Symbol),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn eval<A: ActorState + ?Sized>(&self, actor: &A) -> bool {
        match self {
            Self::Literal(value) => *value,
            Self::Flag(name) => actor.flag(*name),
            Self::Not(inner) => !inner.eval(actor),
            Self::And(lhs, rhs) => lhs.eval(actor) && rhs.eval(actor),
            Self::Or(lhs, rhs) => lhs.eval(actor) || rhs.eval(actor),
        }
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn flag_or_literal(i: &str) -> IResult<&str, Condition> {
    map(identifier, |name| match name {
        "true" => Condition::Literal(true),
        "false" => Condition::Literal(false),
        _ => Condition::Flag(name.into()),
    })(i)
}

fn factor(i: &str) -> IResult<&str, Condition> {
    let (i, _) = multispace0(i)?;
    alt((
        map(preceded(char('!'), factor), |inner| {
            Condition::Not(Box::new(inner))
        }),
        delimited(char('('), or_expr, preceded(multispace0, char(')'))),
        flag_or_literal,
    ))(i)
}

fn and_expr(i: &str) -> IResult<&str, Condition> {
    let (i, first) = factor(i)?;
    fold_many0(
        preceded(delimited(multispace0, tag("&&"), multispace0), factor),
        move || first.clone(),
        |lhs, rhs| Condition::And(Box::new(lhs), Box::new(rhs)),
    )(i)
}

fn or_expr(i: &str) -> IResult<&str, Condition> {
    let (i, first) = and_expr(i)?;
    fold_many0(
        preceded(delimited(multispace0, tag("||"), multispace0), and_expr),
        move || first.clone(),
        |lhs, rhs| Condition::Or(Box::new(lhs), Box::new(rhs)),
    )(i)
}

/// Parses a guard expression. A blank expression always holds.
pub fn parse_condition(expr: &str) -> Result<Condition, ParseConditionError> {
    if expr.trim().is_empty() {
        return Ok(Condition::Literal(true));
    }

    all_consuming(delimited(multispace0, or_expr, multispace0))(expr)
        .map(|(_, condition)| condition)
        .map_err(|err| {
            let rest = match err {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
                nom::Err::Incomplete(_) => "",
            };
            ParseConditionError {
                expr: expr.to_owned(),
                offset: expr.len() - rest.len(),
            }
        })
}
