/*! Implements the human-readable output dialect: ASCII connectives `and`, `or`, `not`,
`->`, `<->`, quantifiers `forall` and `exists`, and ASP syntax for terms. */

use super::{domain_name, TypeAnnotations, VariableNames};
use crate::syntax::{
    BinaryOperator, ComparisonOperator, Formula, SpecialInteger, Term, UnaryOperator,
};
use itertools::Itertools;
use std::io;

// Formula precedence levels, tightest first
const PRECEDENCE_ATOMIC: u8 = 0;
const PRECEDENCE_NOT: u8 = 1;
const PRECEDENCE_AND: u8 = 2;
const PRECEDENCE_OR: u8 = 3;
const PRECEDENCE_IMPLIES: u8 = 4;
const PRECEDENCE_BICONDITIONAL: u8 = 5;
const PRECEDENCE_QUANTIFIER: u8 = 6;

/// Renders a formula, assigning fresh display names to its variables.
pub fn format_formula(formula: &Formula) -> String {
    let names = VariableNames::new();
    let mut buffer = String::new();
    write_formula(&mut buffer, formula, &names, PRECEDENCE_QUANTIFIER);
    buffer
}

/// Renders a term, assigning fresh display names to its variables.
pub fn format_term(term: &Term) -> String {
    let names = VariableNames::new();
    let mut buffer = String::new();
    write_term(&mut buffer, term, &names, TERM_PRECEDENCE_INTERVAL);
    buffer
}

/// Writes the type annotations for all predicate and function declarations.
pub fn write_type_annotations(
    output: &mut impl io::Write,
    annotations: &TypeAnnotations,
) -> io::Result<()> {
    for predicate in &annotations.predicates {
        let domains = predicate
            .parameter_domains()
            .into_iter()
            .map(domain_name)
            .join(", ");
        writeln!(
            output,
            "type: {}: ({}) -> bool.",
            predicate.declaration, domains
        )?;
    }

    for function in &annotations.functions {
        let domains = std::iter::repeat("object").take(function.arity).join(", ");
        writeln!(output, "type: {}: ({}) -> object.", function, domains)?;
    }

    Ok(())
}

/// Writes one closed formula as an axiom line.
pub fn write_axiom(output: &mut impl io::Write, formula: &Formula) -> io::Result<()> {
    writeln!(output, "axiom: {}.", format_formula(formula))
}

fn formula_precedence(formula: &Formula) -> u8 {
    match formula {
        Formula::Boolean(_)
        | Formula::Predicate { .. }
        | Formula::Comparison { .. }
        | Formula::In { .. } => PRECEDENCE_ATOMIC,
        Formula::Not(_) => PRECEDENCE_NOT,
        Formula::And(_) => PRECEDENCE_AND,
        Formula::Or(_) => PRECEDENCE_OR,
        Formula::Implies { .. } => PRECEDENCE_IMPLIES,
        Formula::Biconditional { .. } => PRECEDENCE_BICONDITIONAL,
        Formula::Exists { .. } | Formula::ForAll { .. } => PRECEDENCE_QUANTIFIER,
    }
}

fn write_formula(buffer: &mut String, formula: &Formula, names: &VariableNames, allowed: u8) {
    let parenthesize = formula_precedence(formula) > allowed;
    if parenthesize {
        buffer.push('(');
    }

    match formula {
        Formula::Boolean(true) => buffer.push_str("#true"),
        Formula::Boolean(false) => buffer.push_str("#false"),
        Formula::Predicate {
            declaration,
            arguments,
        } => {
            buffer.push_str(&declaration.name);

            if !arguments.is_empty() {
                buffer.push('(');
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        buffer.push_str(", ");
                    }
                    write_term(buffer, argument, names, TERM_PRECEDENCE_INTERVAL);
                }
                buffer.push(')');
            }
        }
        Formula::Comparison {
            operator,
            left,
            right,
        } => {
            write_term(buffer, left, names, TERM_PRECEDENCE_INTERVAL);
            buffer.push(' ');
            buffer.push_str(comparison_operator_name(*operator));
            buffer.push(' ');
            write_term(buffer, right, names, TERM_PRECEDENCE_INTERVAL);
        }
        Formula::In { element, set } => {
            write_term(buffer, element, names, TERM_PRECEDENCE_INTERVAL);
            buffer.push_str(" in ");
            write_term(buffer, set, names, TERM_PRECEDENCE_INTERVAL);
        }
        Formula::Not(argument) => {
            buffer.push_str("not ");
            write_formula(buffer, argument, names, PRECEDENCE_ATOMIC);
        }
        Formula::And(arguments) => {
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    buffer.push_str(" and ");
                }
                write_formula(buffer, argument, names, PRECEDENCE_NOT);
            }
        }
        Formula::Or(arguments) => {
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    buffer.push_str(" or ");
                }
                write_formula(buffer, argument, names, PRECEDENCE_AND);
            }
        }
        Formula::Implies {
            antecedent,
            consequent,
        } => {
            write_formula(buffer, antecedent, names, PRECEDENCE_OR);
            buffer.push_str(" -> ");
            write_formula(buffer, consequent, names, PRECEDENCE_QUANTIFIER);
        }
        Formula::Biconditional { left, right } => {
            write_formula(buffer, left, names, PRECEDENCE_IMPLIES);
            buffer.push_str(" <-> ");
            write_formula(buffer, right, names, PRECEDENCE_QUANTIFIER);
        }
        Formula::Exists {
            variables,
            argument,
        } => write_quantified(buffer, "exists", variables, argument, names),
        Formula::ForAll {
            variables,
            argument,
        } => write_quantified(buffer, "forall", variables, argument, names),
    }

    if parenthesize {
        buffer.push(')');
    }
}

fn write_quantified(
    buffer: &mut String,
    quantifier: &str,
    variables: &[std::rc::Rc<crate::syntax::VariableDeclaration>],
    argument: &Formula,
    names: &VariableNames,
) {
    buffer.push_str(quantifier);
    buffer.push(' ');

    for (index, variable) in variables.iter().enumerate() {
        if index > 0 {
            buffer.push_str(", ");
        }
        buffer.push_str(&names.resolve(variable));
    }

    buffer.push_str(" (");
    write_formula(buffer, argument, names, PRECEDENCE_QUANTIFIER);
    buffer.push(')');
}

fn comparison_operator_name(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::GreaterThan => ">",
        ComparisonOperator::LessThan => "<",
        ComparisonOperator::LessEqual => "<=",
        ComparisonOperator::GreaterEqual => ">=",
        ComparisonOperator::NotEqual => "!=",
        ComparisonOperator::Equal => "=",
    }
}

// Term precedence levels, tightest first
const TERM_PRECEDENCE_PRIMARY: u8 = 0;
const TERM_PRECEDENCE_MULTIPLICATIVE: u8 = 1;
const TERM_PRECEDENCE_ADDITIVE: u8 = 2;
const TERM_PRECEDENCE_INTERVAL: u8 = 3;

fn term_precedence(term: &Term) -> u8 {
    match term {
        Term::BinaryOperation(operator, ..) => match operator {
            BinaryOperator::Plus | BinaryOperator::Minus => TERM_PRECEDENCE_ADDITIVE,
            BinaryOperator::Multiplication | BinaryOperator::Division | BinaryOperator::Modulo => {
                TERM_PRECEDENCE_MULTIPLICATIVE
            }
        },
        Term::Interval(..) => TERM_PRECEDENCE_INTERVAL,
        _ => TERM_PRECEDENCE_PRIMARY,
    }
}

fn write_term(buffer: &mut String, term: &Term, names: &VariableNames, allowed: u8) {
    let parenthesize = term_precedence(term) > allowed;
    if parenthesize {
        buffer.push('(');
    }

    match term {
        Term::Boolean(true) => buffer.push_str("#true"),
        Term::Boolean(false) => buffer.push_str("#false"),
        Term::Integer(value) => {
            buffer.push_str(&value.to_string());
        }
        Term::SpecialInteger(SpecialInteger::Infimum) => buffer.push_str("#inf"),
        Term::SpecialInteger(SpecialInteger::Supremum) => buffer.push_str("#sup"),
        Term::String(text) => {
            buffer.push('"');
            buffer.push_str(&text.replace('\\', "\\\\").replace('"', "\\\""));
            buffer.push('"');
        }
        Term::Constant(declaration) => buffer.push_str(&declaration.name),
        Term::Variable(declaration) => buffer.push_str(&names.resolve(declaration)),
        Term::Function(declaration, arguments) => {
            buffer.push_str(&declaration.name);
            buffer.push('(');
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    buffer.push_str(", ");
                }
                write_term(buffer, argument, names, TERM_PRECEDENCE_INTERVAL);
            }
            buffer.push(')');
        }
        Term::BinaryOperation(operator, left, right) => {
            let precedence = term_precedence(term);
            write_term(buffer, left, names, precedence);
            buffer.push(' ');
            buffer.push_str(binary_operator_name(*operator));
            buffer.push(' ');
            write_term(buffer, right, names, precedence - 1);
        }
        Term::UnaryOperation(UnaryOperator::AbsoluteValue, argument) => {
            buffer.push('|');
            write_term(buffer, argument, names, TERM_PRECEDENCE_INTERVAL);
            buffer.push('|');
        }
        Term::Interval(from, to) => {
            write_term(buffer, from, names, TERM_PRECEDENCE_ADDITIVE);
            buffer.push_str("..");
            write_term(buffer, to, names, TERM_PRECEDENCE_ADDITIVE);
        }
    }

    if parenthesize {
        buffer.push(')');
    }
}

fn binary_operator_name(operator: BinaryOperator) -> &'static str {
    match operator {
        BinaryOperator::Plus => "+",
        BinaryOperator::Minus => "-",
        BinaryOperator::Multiplication => "*",
        BinaryOperator::Division => "/",
        BinaryOperator::Modulo => "\\",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PredicateDeclarations, VariableDeclaration, VariableKind};
    use std::rc::Rc;

    #[test]
    fn format_completed_definition() {
        let mut predicates = PredicateDeclarations::new();
        let q = predicates.find_or_create("q", 1);
        let p = predicates.find_or_create("p", 1);

        let v = VariableDeclaration::head();
        let x = VariableDeclaration::user_defined("X");

        let formula = Formula::for_all(
            vec![Rc::clone(&v)],
            Formula::if_and_only_if(
                Formula::predicate(&q, vec![Term::variable(&v)]),
                Formula::exists(
                    vec![Rc::clone(&x)],
                    Formula::And(vec![
                        Formula::predicate(&p, vec![Term::variable(&x)]),
                        Formula::equal(Term::variable(&v), Term::variable(&x)),
                    ]),
                ),
            ),
        );

        assert_eq!(
            format_formula(&formula),
            "forall V1 (q(V1) <-> exists X (p(X) and V1 = X))"
        );
    }

    #[test]
    fn format_constraint_with_negation() {
        let mut predicates = PredicateDeclarations::new();
        let p = predicates.find_or_create("p", 1);
        let q = predicates.find_or_create("q", 1);

        let x = VariableDeclaration::user_defined("X");
        let formula = Formula::for_all(
            vec![Rc::clone(&x)],
            Formula::not(Formula::And(vec![
                Formula::predicate(&p, vec![Term::variable(&x)]),
                Formula::not(Formula::predicate(&q, vec![Term::variable(&x)])),
            ])),
        );

        assert_eq!(
            format_formula(&formula),
            "forall X (not (p(X) and not q(X)))"
        );
    }

    #[test]
    fn format_arithmetic_terms() {
        let x = VariableDeclaration::user_defined("X");
        let y = VariableDeclaration::user_defined("Y");

        let sum = Term::BinaryOperation(
            BinaryOperator::Plus,
            Box::new(Term::variable(&x)),
            Box::new(Term::BinaryOperation(
                BinaryOperator::Multiplication,
                Box::new(Term::variable(&y)),
                Box::new(Term::Integer(2)),
            )),
        );
        assert_eq!(format_term(&sum), "X + Y * 2");

        let product = Term::BinaryOperation(
            BinaryOperator::Multiplication,
            Box::new(Term::BinaryOperation(
                BinaryOperator::Plus,
                Box::new(Term::variable(&x)),
                Box::new(Term::Integer(1)),
            )),
            Box::new(Term::variable(&y)),
        );
        assert_eq!(format_term(&product), "(X + 1) * Y");

        let interval = Term::Interval(
            Box::new(Term::variable(&x)),
            Box::new(Term::BinaryOperation(
                BinaryOperator::Plus,
                Box::new(Term::variable(&y)),
                Box::new(Term::Integer(1)),
            )),
        );
        assert_eq!(format_term(&interval), "X..Y + 1");
    }

    #[test]
    fn reserved_user_names_are_renamed() {
        let mut predicates = PredicateDeclarations::new();
        let p = predicates.find_or_create("p", 2);

        let clashing = VariableDeclaration::user_defined("X1");
        let body = VariableDeclaration::new(VariableKind::Body, None);

        let formula = Formula::exists(
            vec![Rc::clone(&clashing), Rc::clone(&body)],
            Formula::predicate(
                &p,
                vec![Term::variable(&clashing), Term::variable(&body)],
            ),
        );

        assert_eq!(format_formula(&formula), "exists U1, X1 (p(U1, X1))");
    }
}
