/*! Implements the TPTP output dialect.

Formulas are emitted as untyped `fof` axioms over a single object sort. Symbolic
functions and constants carry the prefix `f__` and suffix `__`; integer arithmetic maps
to the fixed function and predicate symbols axiomatized by the preamble. */

use super::{domain_name, TypeAnnotations, VariableNames};
use crate::syntax::{
    BinaryOperator, ComparisonOperator, Formula, SpecialInteger, Term, UnaryOperator,
};
use itertools::Itertools;
use std::io;

pub const TPTP_TYPE_HEADER: &str = "\
%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
% types
%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
";

pub const TPTP_PREAMBLE: &str = "\
%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
% integer arithmetic
%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
fof(less_equal, axiom, (![X, Y]: (p__less_equal__(X, Y) <=> (p__less__(X, Y) | X = Y)))).
fof(greater, axiom, (![X, Y]: (p__greater__(X, Y) <=> p__less__(Y, X)))).
fof(greater_equal, axiom, (![X, Y]: (p__greater_equal__(X, Y) <=> p__less_equal__(Y, X)))).
fof(less_irreflexive, axiom, (![X]: ~p__less__(X, X))).
fof(less_transitive, axiom, (![X, Y, Z]: ((p__less__(X, Y) & p__less__(Y, Z)) => p__less__(X, Z)))).
fof(sum_commutative, axiom, (![X, Y]: f__sum__(X, Y) = f__sum__(Y, X))).
fof(sum_associative, axiom, (![X, Y, Z]: f__sum__(X, f__sum__(Y, Z)) = f__sum__(f__sum__(X, Y), Z))).
fof(sum_identity, axiom, (![X]: f__sum__(X, 0) = X)).
fof(difference, axiom, (![X, Y, Z]: (f__difference__(X, Y) = Z <=> f__sum__(Z, Y) = X))).
fof(product_commutative, axiom, (![X, Y]: f__product__(X, Y) = f__product__(Y, X))).
fof(product_distributive, axiom, (![X, Y, Z]: f__product__(X, f__sum__(Y, Z)) = f__sum__(f__product__(X, Y), f__product__(X, Z)))).
fof(quotient_remainder, axiom, (![X, Y]: (~(Y = 0) => X = f__sum__(f__product__(Y, f__quotient__(X, Y)), f__remainder__(X, Y))))).
fof(absolute_value, axiom, (![X]: (f__absolute__(X) = X | f__absolute__(X) = f__difference__(0, X)))).
fof(is_even, axiom, (![X]: (p__is_even__(X) <=> (?[Y]: X = f__product__(2, Y))))).
fof(is_odd, axiom, (![X]: (p__is_odd__(X) <=> (?[Y]: X = f__sum__(f__product__(2, Y), 1))))).
";

/// Writes the fixed header opening the type section.
pub fn write_type_header(output: &mut impl io::Write) -> io::Result<()> {
    output.write_all(TPTP_TYPE_HEADER.as_bytes())
}

/// Writes the fixed preamble of arithmetic axioms.
pub fn write_preamble(output: &mut impl io::Write) -> io::Result<()> {
    output.write_all(TPTP_PREAMBLE.as_bytes())
}

/// Writes the type annotations for all predicate and function declarations as comments.
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
            "% type: {}: ({}) -> bool.",
            predicate.declaration, domains
        )?;
    }

    for function in &annotations.functions {
        let domains = std::iter::repeat("object").take(function.arity).join(", ");
        writeln!(output, "% type: {}: ({}) -> object.", function, domains)?;
    }

    Ok(())
}

/// Writes one closed formula as a named `fof` axiom.
pub fn write_axiom(
    output: &mut impl io::Write,
    name: &str,
    formula: &Formula,
) -> io::Result<()> {
    writeln!(output, "fof({}, axiom, {}).", name, format_fof_formula(formula))
}

/// Renders a formula in `fof` syntax, assigning fresh display names to its variables.
pub fn format_fof_formula(formula: &Formula) -> String {
    let names = VariableNames::new();
    let mut buffer = String::new();
    write_formula(&mut buffer, formula, &names);
    buffer
}

// Connectives and quantifiers emit their own parentheses, so operands that render as
// applications or already-parenthesized subformulas can be written directly.
fn is_self_delimiting(formula: &Formula) -> bool {
    match formula {
        Formula::Boolean(_)
        | Formula::Predicate { .. }
        | Formula::And(_)
        | Formula::Or(_)
        | Formula::Implies { .. }
        | Formula::Biconditional { .. } => true,
        Formula::Comparison { operator, .. } => !matches!(
            operator,
            ComparisonOperator::Equal | ComparisonOperator::NotEqual
        ),
        Formula::In { set, .. } => matches!(set, Term::Interval(..)),
        Formula::Not(_) | Formula::Exists { .. } | Formula::ForAll { .. } => false,
    }
}

fn write_operand(buffer: &mut String, formula: &Formula, names: &VariableNames) {
    if is_self_delimiting(formula) {
        write_formula(buffer, formula, names);
    } else {
        buffer.push('(');
        write_formula(buffer, formula, names);
        buffer.push(')');
    }
}

fn write_formula(buffer: &mut String, formula: &Formula, names: &VariableNames) {
    match formula {
        Formula::Boolean(true) => buffer.push_str("$true"),
        Formula::Boolean(false) => buffer.push_str("$false"),
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
                    write_term(buffer, argument, names);
                }
                buffer.push(')');
            }
        }
        Formula::Comparison {
            operator,
            left,
            right,
        } => match operator {
            ComparisonOperator::Equal => {
                write_term(buffer, left, names);
                buffer.push_str(" = ");
                write_term(buffer, right, names);
            }
            ComparisonOperator::NotEqual => {
                write_term(buffer, left, names);
                buffer.push_str(" != ");
                write_term(buffer, right, names);
            }
            other => {
                buffer.push_str(comparison_predicate_name(*other));
                buffer.push('(');
                write_term(buffer, left, names);
                buffer.push_str(", ");
                write_term(buffer, right, names);
                buffer.push(')');
            }
        },
        Formula::In { element, set } => match set {
            // Membership in an interval unfolds into its two bounds
            Term::Interval(from, to) => {
                buffer.push('(');
                buffer.push_str("p__less_equal__(");
                write_term(buffer, from, names);
                buffer.push_str(", ");
                write_term(buffer, element, names);
                buffer.push_str(") & p__less_equal__(");
                write_term(buffer, element, names);
                buffer.push_str(", ");
                write_term(buffer, to, names);
                buffer.push_str("))");
            }
            other => {
                write_term(buffer, element, names);
                buffer.push_str(" = ");
                write_term(buffer, other, names);
            }
        },
        Formula::Not(argument) => {
            buffer.push('~');
            write_operand(buffer, argument, names);
        }
        Formula::And(arguments) => write_connective(buffer, arguments, " & ", names),
        Formula::Or(arguments) => write_connective(buffer, arguments, " | ", names),
        Formula::Implies {
            antecedent,
            consequent,
        } => {
            buffer.push('(');
            write_operand(buffer, antecedent, names);
            buffer.push_str(" => ");
            write_operand(buffer, consequent, names);
            buffer.push(')');
        }
        Formula::Biconditional { left, right } => {
            buffer.push('(');
            write_operand(buffer, left, names);
            buffer.push_str(" <=> ");
            write_operand(buffer, right, names);
            buffer.push(')');
        }
        Formula::Exists {
            variables,
            argument,
        } => write_quantified(buffer, "?", variables, argument, names),
        Formula::ForAll {
            variables,
            argument,
        } => write_quantified(buffer, "!", variables, argument, names),
    }
}

fn write_connective(
    buffer: &mut String,
    arguments: &[Formula],
    separator: &str,
    names: &VariableNames,
) {
    buffer.push('(');
    for (index, argument) in arguments.iter().enumerate() {
        if index > 0 {
            buffer.push_str(separator);
        }
        write_operand(buffer, argument, names);
    }
    buffer.push(')');
}

fn write_quantified(
    buffer: &mut String,
    quantifier: &str,
    variables: &[std::rc::Rc<crate::syntax::VariableDeclaration>],
    argument: &Formula,
    names: &VariableNames,
) {
    buffer.push_str(quantifier);
    buffer.push('[');

    for (index, variable) in variables.iter().enumerate() {
        if index > 0 {
            buffer.push_str(", ");
        }
        buffer.push_str(&names.resolve(variable));
    }

    buffer.push_str("]: ");
    buffer.push('(');
    write_formula(buffer, argument, names);
    buffer.push(')');
}

fn comparison_predicate_name(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::GreaterThan => "p__greater__",
        ComparisonOperator::LessThan => "p__less__",
        ComparisonOperator::LessEqual => "p__less_equal__",
        ComparisonOperator::GreaterEqual => "p__greater_equal__",
        ComparisonOperator::NotEqual | ComparisonOperator::Equal => {
            unreachable!("equality is printed infix")
        }
    }
}

fn write_term(buffer: &mut String, term: &Term, names: &VariableNames) {
    match term {
        Term::Boolean(true) => buffer.push_str("c__true__"),
        Term::Boolean(false) => buffer.push_str("c__false__"),
        Term::Integer(value) => buffer.push_str(&value.to_string()),
        Term::SpecialInteger(SpecialInteger::Infimum) => buffer.push_str("c__infimum__"),
        Term::SpecialInteger(SpecialInteger::Supremum) => buffer.push_str("c__supremum__"),
        Term::String(text) => {
            buffer.push('"');
            buffer.push_str(&text.replace('\\', "\\\\").replace('"', "\\\""));
            buffer.push('"');
        }
        Term::Constant(declaration) => {
            buffer.push_str("f__");
            buffer.push_str(&declaration.name);
            buffer.push_str("__");
        }
        Term::Variable(declaration) => buffer.push_str(&names.resolve(declaration)),
        Term::Function(declaration, arguments) => {
            buffer.push_str("f__");
            buffer.push_str(&declaration.name);
            buffer.push_str("__(");
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    buffer.push_str(", ");
                }
                write_term(buffer, argument, names);
            }
            buffer.push(')');
        }
        Term::BinaryOperation(operator, left, right) => {
            buffer.push_str(binary_operation_name(*operator));
            buffer.push('(');
            write_term(buffer, left, names);
            buffer.push_str(", ");
            write_term(buffer, right, names);
            buffer.push(')');
        }
        Term::UnaryOperation(UnaryOperator::AbsoluteValue, argument) => {
            buffer.push_str("f__absolute__(");
            write_term(buffer, argument, names);
            buffer.push(')');
        }
        Term::Interval(..) => unreachable!("intervals only occur as the set of a membership"),
    }
}

fn binary_operation_name(operator: BinaryOperator) -> &'static str {
    match operator {
        BinaryOperator::Plus => "f__sum__",
        BinaryOperator::Minus => "f__difference__",
        BinaryOperator::Multiplication => "f__product__",
        BinaryOperator::Division => "f__quotient__",
        BinaryOperator::Modulo => "f__remainder__",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PredicateDeclarations, VariableDeclaration};
    use std::rc::Rc;

    #[test]
    fn format_completed_definition() {
        let mut predicates = PredicateDeclarations::new();
        let q = predicates.find_or_create("q", 1);
        let p = predicates.find_or_create("p", 1);

        let v = VariableDeclaration::head();
        let formula = Formula::for_all(
            vec![Rc::clone(&v)],
            Formula::if_and_only_if(
                Formula::predicate(&q, vec![Term::variable(&v)]),
                Formula::predicate(&p, vec![Term::variable(&v)]),
            ),
        );

        assert_eq!(
            format_fof_formula(&formula),
            "![V1]: ((q(V1) <=> p(V1)))"
        );
    }

    #[test]
    fn format_arithmetic_and_membership() {
        let v = VariableDeclaration::head();

        let membership = Formula::in_set(
            Term::variable(&v),
            Term::Interval(Box::new(Term::Integer(1)), Box::new(Term::Integer(3))),
        );
        assert_eq!(
            format_fof_formula(&membership),
            "(p__less_equal__(1, V1) & p__less_equal__(V1, 3))"
        );

        let x = VariableDeclaration::user_defined("X");
        let comparison = Formula::equal(
            Term::variable(&v),
            Term::BinaryOperation(
                BinaryOperator::Plus,
                Box::new(Term::variable(&x)),
                Box::new(Term::Integer(1)),
            ),
        );
        assert_eq!(format_fof_formula(&comparison), "V1 = f__sum__(X, 1)");

        let less = Formula::comparison(
            ComparisonOperator::LessThan,
            Term::variable(&x),
            Term::Integer(5),
        );
        assert_eq!(format_fof_formula(&less), "p__less__(X, 5)");
    }

    #[test]
    fn symbolic_functions_carry_the_reserved_prefix() {
        let mut predicates = PredicateDeclarations::new();
        let p = predicates.find_or_create("p", 1);

        let mut functions = crate::syntax::FunctionDeclarations::new();
        let f = functions.find_or_create("f", 1);
        let c = functions.find_or_create("c", 0);

        let formula = Formula::predicate(
            &p,
            vec![Term::Function(f, vec![Term::Constant(c)])],
        );
        assert_eq!(format_fof_formula(&formula), "p(f__f__(f__c__))");
    }
}
