/*! Implements the parser for the supported answer set programming subset.

Programs are sequences of statements terminated by `.`: rules, facts, integrity
constraints, and `#show`/`#external` declarations. Aggregates and theory atoms are
recognized shallowly so that the translation can reject them with a dedicated
diagnostic. `%` starts a line comment, `%* … *%` a block comment. */

use crate::error::Error;
use crate::input::{
    Atom, BodyLiteral, ComparisonOperator, Head, Literal, Rule, Sign, Signature, Statement, Term,
    UnaryOperator,
};
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while},
    character::complete::{char, digit1, multispace1, satisfy},
    combinator::{eof, map, map_res, not, opt, peek, recognize, value, verify},
    multi::{many0, many0_count, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use prism_fol::syntax::BinaryOperator;

/// Parses a whole program into its statement stream. `name` is used for diagnostics
/// only.
pub fn parse_program(name: &str, source: &str) -> Result<Vec<Statement>, Error> {
    let result: IResult<&str, Vec<Statement>> =
        terminated(many0(statement), pair(whitespace, eof))(source);

    match result {
        Ok((_, statements)) => Ok(statements),
        Err(nom::Err::Error(error)) | Err(nom::Err::Failure(error)) => {
            Err(parse_error(name, source, error.input))
        }
        Err(nom::Err::Incomplete(_)) => Err(parse_error(name, source, "")),
    }
}

fn parse_error(name: &str, source: &str, remaining: &str) -> Error {
    let offset = source.len() - remaining.len();
    let consumed = &source[..offset];

    let line = consumed.matches('\n').count() + 1;
    let column = match consumed.rfind('\n') {
        Some(position) => offset - position,
        None => offset + 1,
    };

    let fragment = remaining.lines().next().unwrap_or("").trim_end();
    let message = if fragment.is_empty() {
        "unexpected end of input".to_string()
    } else {
        format!("unexpected \"{}\"", fragment)
    };

    Error::Parse {
        name: name.to_string(),
        line,
        column,
        message,
    }
}

fn whitespace(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0_count(alt((
            value((), multispace1),
            value(
                (),
                tuple((tag("%*"), nom::bytes::complete::take_until("*%"), tag("*%"))),
            ),
            value((), pair(char('%'), take_while(|character| character != '\n'))),
        ))),
    )(input)
}

fn token<'a, O, P>(parser: P) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    P: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(whitespace, parser)
}

fn symbol<'a>(text: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    token(tag(text))
}

// A keyword or directive must not be followed by an identifier character
fn keyword<'a>(text: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    token(terminated(
        tag(text),
        peek(not(satisfy(|character: char| {
            character.is_ascii_alphanumeric() || character == '_'
        }))),
    ))
}

fn identifier_tail(input: &str) -> IResult<&str, &str> {
    take_while(|character: char| character.is_ascii_alphanumeric() || character == '_')(input)
}

fn lowercase_identifier(input: &str) -> IResult<&str, &str> {
    verify(
        recognize(pair(
            satisfy(|character| character.is_ascii_lowercase()),
            identifier_tail,
        )),
        |name: &str| name != "not",
    )(input)
}

fn variable_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|character| character.is_ascii_uppercase() || character == '_'),
        identifier_tail,
    ))(input)
}

////////////////////////////////////////////////////////////////////////////////////////
// Statements
////////////////////////////////////////////////////////////////////////////////////////

fn statement(input: &str) -> IResult<&str, Statement> {
    alt((
        show_statement,
        external_statement,
        map(rule, Statement::Rule),
    ))(input)
}

fn signature(input: &str) -> IResult<&str, Signature> {
    map(
        separated_pair(
            token(lowercase_identifier),
            symbol("/"),
            token(map_res(digit1, str::parse::<usize>)),
        ),
        |(name, arity)| Signature {
            name: name.to_string(),
            arity,
        },
    )(input)
}

fn show_statement(input: &str) -> IResult<&str, Statement> {
    preceded(
        keyword("#show"),
        alt((
            map(
                terminated(signature, symbol(".")),
                Statement::ShowSignature,
            ),
            value(Statement::ShowNothing, symbol(".")),
        )),
    )(input)
}

fn external_statement(input: &str) -> IResult<&str, Statement> {
    preceded(
        keyword("#external"),
        map(
            terminated(signature, symbol(".")),
            Statement::ExternalSignature,
        ),
    )(input)
}

fn rule(input: &str) -> IResult<&str, Rule> {
    alt((
        // Integrity constraints have an empty head
        map(
            preceded(symbol(":-"), terminated(body, symbol("."))),
            |body| Rule {
                head: Head::Literal(Literal::Boolean(false)),
                body,
            },
        ),
        map(
            tuple((head, opt(preceded(symbol(":-"), body)), symbol("."))),
            |(head, body, _)| Rule {
                head,
                body: body.unwrap_or_default(),
            },
        ),
    ))(input)
}

////////////////////////////////////////////////////////////////////////////////////////
// Heads and bodies
////////////////////////////////////////////////////////////////////////////////////////

fn head(input: &str) -> IResult<&str, Head> {
    alt((
        map(
            delimited(
                symbol("{"),
                separated_list0(symbol(";"), literal),
                symbol("}"),
            ),
            Head::Choice,
        ),
        map(named_aggregate, |_| Head::Aggregate),
        map(
            separated_list1(symbol(";"), literal),
            |mut literals| match literals.len() {
                1 => Head::Literal(literals.remove(0)),
                _ => Head::Disjunction(literals),
            },
        ),
    ))(input)
}

fn body(input: &str) -> IResult<&str, Vec<BodyLiteral>> {
    separated_list0(symbol(","), body_literal)(input)
}

fn body_literal(input: &str) -> IResult<&str, BodyLiteral> {
    alt((
        map(theory_atom, |_| BodyLiteral::TheoryAtom),
        map(aggregate_atom, |_| BodyLiteral::Aggregate),
        map(literal, BodyLiteral::Literal),
    ))(input)
}

// An aggregate atom is an optionally named brace block with an optional guard, e.g.
// `{ ... }` or `#count { ... } > 1`; its contents are skipped
fn aggregate_atom(input: &str) -> IResult<&str, &str> {
    terminated(
        alt((named_aggregate, token(brace_block))),
        opt(pair(comparison_operator, term)),
    )(input)
}

fn named_aggregate(input: &str) -> IResult<&str, &str> {
    preceded(
        token(recognize(pair(char('#'), lowercase_identifier))),
        token(brace_block),
    )(input)
}

// A theory atom is `&name` followed by an optional brace block and an optional guard
fn theory_atom(input: &str) -> IResult<&str, &str> {
    terminated(
        preceded(
            token(recognize(pair(char('&'), lowercase_identifier))),
            map(opt(token(brace_block)), |block| block.unwrap_or("")),
        ),
        opt(pair(comparison_operator, term)),
    )(input)
}

fn brace_block(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut depth = 0usize;

    for (index, character) in input.char_indices() {
        match character {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[index + 1..], &input[..=index]));
                }
            }
            _ => (),
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::TakeUntil,
    )))
}

////////////////////////////////////////////////////////////////////////////////////////
// Literals
////////////////////////////////////////////////////////////////////////////////////////

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((
        value(Literal::Boolean(true), keyword("#true")),
        value(Literal::Boolean(false), keyword("#false")),
        signed_literal,
    ))(input)
}

fn signed_literal(input: &str) -> IResult<&str, Literal> {
    let (input, sign) = sign(input)?;

    alt((
        map(
            tuple((term, comparison_operator, term)),
            move |(left, operator, right)| Literal::Comparison {
                sign,
                operator,
                left,
                right,
            },
        ),
        map(atom, move |atom| Literal::Atom { sign, atom }),
    ))(input)
}

fn sign(input: &str) -> IResult<&str, Sign> {
    let (input, first) = opt(keyword("not"))(input)?;
    if first.is_none() {
        return Ok((input, Sign::None));
    }

    let (input, second) = opt(keyword("not"))(input)?;
    let sign = match second {
        None => Sign::Negation,
        Some(_) => Sign::DoubleNegation,
    };

    Ok((input, sign))
}

fn atom(input: &str) -> IResult<&str, Atom> {
    map(
        pair(
            token(lowercase_identifier),
            opt(delimited(
                symbol("("),
                separated_list1(symbol(","), term),
                symbol(")"),
            )),
        ),
        |(name, arguments)| Atom {
            predicate: name.to_string(),
            arguments: arguments.unwrap_or_default(),
        },
    )(input)
}

fn comparison_operator(input: &str) -> IResult<&str, ComparisonOperator> {
    token(alt((
        value(ComparisonOperator::LessEqual, tag("<=")),
        value(ComparisonOperator::GreaterEqual, tag(">=")),
        value(ComparisonOperator::NotEqual, tag("!=")),
        value(ComparisonOperator::LessThan, tag("<")),
        value(ComparisonOperator::GreaterThan, tag(">")),
        value(ComparisonOperator::Equal, tag("=")),
    )))(input)
}

////////////////////////////////////////////////////////////////////////////////////////
// Terms
////////////////////////////////////////////////////////////////////////////////////////

fn term(input: &str) -> IResult<&str, Term> {
    let (input, first) = additive_term(input)?;
    let (input, rest) = opt(preceded(symbol(".."), additive_term))(input)?;

    let term = match rest {
        Some(to) => Term::Interval {
            from: Box::new(first),
            to: Box::new(to),
        },
        None => first,
    };

    Ok((input, term))
}

fn additive_term(input: &str) -> IResult<&str, Term> {
    let (input, first) = multiplicative_term(input)?;
    let (input, rest) = many0(pair(
        token(alt((
            value(BinaryOperator::Plus, tag("+")),
            value(BinaryOperator::Minus, tag("-")),
        ))),
        multiplicative_term,
    ))(input)?;

    Ok((input, fold_binary_operations(first, rest)))
}

fn multiplicative_term(input: &str) -> IResult<&str, Term> {
    let (input, first) = unary_term(input)?;
    let (input, rest) = many0(pair(
        token(alt((
            value(BinaryOperator::Multiplication, tag("*")),
            value(BinaryOperator::Division, tag("/")),
            value(BinaryOperator::Modulo, tag("\\")),
        ))),
        unary_term,
    ))(input)?;

    Ok((input, fold_binary_operations(first, rest)))
}

fn fold_binary_operations(first: Term, rest: Vec<(BinaryOperator, Term)>) -> Term {
    rest.into_iter().fold(first, |left, (operator, right)| {
        Term::BinaryOperation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    })
}

fn unary_term(input: &str) -> IResult<&str, Term> {
    alt((
        map(preceded(symbol("-"), unary_term), |argument| {
            // Fold a minus applied directly to an integer literal
            match argument {
                Term::Integer(value) => Term::Integer(-value),
                other => Term::UnaryOperation {
                    operator: UnaryOperator::Minus,
                    argument: Box::new(other),
                },
            }
        }),
        map(
            delimited(symbol("|"), term, symbol("|")),
            |argument| Term::UnaryOperation {
                operator: UnaryOperator::AbsoluteValue,
                argument: Box::new(argument),
            },
        ),
        primary_term,
    ))(input)
}

fn primary_term(input: &str) -> IResult<&str, Term> {
    token(alt((
        map(map_res(digit1, str::parse::<i64>), Term::Integer),
        value(Term::Infimum, keyword("#inf")),
        value(Term::Supremum, keyword("#sup")),
        string_term,
        external_function,
        function_or_constant,
        variable_term,
        parenthesized_or_pool,
    )))(input)
}

fn string_term(input: &str) -> IResult<&str, Term> {
    map(
        delimited(
            char('"'),
            opt(escaped_transform(
                is_not("\"\\"),
                '\\',
                alt((
                    value("\"", char('"')),
                    value("\\", char('\\')),
                    value("\n", char('n')),
                )),
            )),
            char('"'),
        ),
        |text| Term::String(text.unwrap_or_default()),
    )(input)
}

fn external_function(input: &str) -> IResult<&str, Term> {
    map(
        preceded(
            char('@'),
            pair(
                lowercase_identifier,
                opt(delimited(
                    symbol("("),
                    separated_list0(symbol(","), term),
                    symbol(")"),
                )),
            ),
        ),
        |(name, arguments)| Term::Function {
            name: name.to_string(),
            arguments: arguments.unwrap_or_default(),
            external: true,
        },
    )(input)
}

fn function_or_constant(input: &str) -> IResult<&str, Term> {
    map(
        pair(
            lowercase_identifier,
            opt(delimited(
                symbol("("),
                separated_list0(symbol(","), term),
                symbol(")"),
            )),
        ),
        |(name, arguments)| match arguments {
            Some(arguments) => Term::Function {
                name: name.to_string(),
                arguments,
                external: false,
            },
            None => Term::Constant(name.to_string()),
        },
    )(input)
}

fn variable_term(input: &str) -> IResult<&str, Term> {
    map(variable_identifier, |name| match name {
        "_" => Term::Variable(None),
        other => Term::Variable(Some(other.to_string())),
    })(input)
}

fn parenthesized_or_pool(input: &str) -> IResult<&str, Term> {
    map(
        delimited(
            char('('),
            separated_list1(symbol(";"), term),
            symbol(")"),
        ),
        |mut terms| match terms.len() {
            1 => terms.remove(0),
            _ => Term::Pool(terms),
        },
    )(input)
}
