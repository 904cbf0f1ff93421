/*! Implements the fixed-point inference that refines variable declarations to the
integer domain.

The inference walks completed definitions of the shape `∀ V⃗. (p(V⃗) <-> definition)`
and strengthens quantified declarations whose domain is still unknown to the integer
domain whenever the definition forces the variable to range over integers. Since the
only transition is unknown → integer, the iteration is monotone and terminates. */

use super::OperationResult;
use crate::syntax::{Domain, Formula, Term, VariableDeclaration};
use std::rc::Rc;

/// Refines the domains of variable declarations bound in the given completed formulas.
/// Assumes the formulas are in translated, unsimplified form.
pub fn detect_integer_variables(formulas: &[Formula]) {
    let mut result = OperationResult::Changed;

    while result == OperationResult::Changed {
        result = OperationResult::Unchanged;

        for formula in formulas {
            let (variables, definition) = match formula {
                Formula::ForAll {
                    variables,
                    argument,
                } => match argument.as_ref() {
                    Formula::Biconditional { left, right }
                        if matches!(left.as_ref(), Formula::Predicate { .. }) =>
                    {
                        (variables, right.as_ref())
                    }
                    _ => continue,
                },
                _ => continue,
            };

            result = result.or(detect_in_formula(definition));

            for variable in variables {
                if variable.domain.get() == Domain::Unknown
                    && variable_domain_in(definition, variable) == Domain::Integer
                {
                    variable.domain.set(Domain::Integer);
                    result = OperationResult::Changed;
                }
            }
        }
    }
}

// Finds every quantifier in the formula and refines its declarations against the
// quantified subformula.
fn detect_in_formula(formula: &Formula) -> OperationResult {
    match formula {
        Formula::Boolean(_)
        | Formula::Predicate { .. }
        | Formula::Comparison { .. }
        | Formula::In { .. } => OperationResult::Unchanged,
        Formula::Not(argument) => detect_in_formula(argument),
        Formula::And(arguments) | Formula::Or(arguments) => arguments
            .iter()
            .fold(OperationResult::Unchanged, |result, argument| {
                result.or(detect_in_formula(argument))
            }),
        Formula::Implies {
            antecedent,
            consequent,
        } => detect_in_formula(antecedent).or(detect_in_formula(consequent)),
        Formula::Biconditional { left, right } => {
            detect_in_formula(left).or(detect_in_formula(right))
        }
        Formula::Exists {
            variables,
            argument,
        }
        | Formula::ForAll {
            variables,
            argument,
        } => {
            let mut result = detect_in_formula(argument);

            for variable in variables {
                if variable.domain.get() == Domain::Unknown
                    && variable_domain_in(argument, variable) == Domain::Integer
                {
                    variable.domain.set(Domain::Integer);
                    result = OperationResult::Changed;
                }
            }

            result
        }
    }
}

fn is_variable(term: &Term, declaration: &Rc<VariableDeclaration>) -> bool {
    match term {
        Term::Variable(other) => Rc::ptr_eq(other, declaration),
        _ => false,
    }
}

/// Returns the domain the formula forces the given variable into, as far as can be told
/// from comparisons and membership formulas with the variable alone on one side.
pub fn variable_domain_in(formula: &Formula, variable: &Rc<VariableDeclaration>) -> Domain {
    match formula {
        Formula::Boolean(_) | Formula::Predicate { .. } => Domain::Unknown,
        Formula::Comparison { left, right, .. } | Formula::In {
            element: left,
            set: right,
        } => {
            let left_is_variable = is_variable(left, variable);
            let right_is_variable = is_variable(right, variable);

            if left_is_variable == right_is_variable {
                return Domain::Unknown;
            }

            let other_side = if left_is_variable { right } else { left };
            term_domain(other_side)
        }
        Formula::And(arguments) | Formula::Or(arguments) => combine_domains(
            arguments
                .iter()
                .map(|argument| variable_domain_in(argument, variable)),
        ),
        Formula::Implies {
            antecedent,
            consequent,
        } => combine_domains(
            [antecedent, consequent]
                .iter()
                .map(|side| variable_domain_in(side, variable)),
        ),
        Formula::Biconditional { left, right } => combine_domains(
            [left, right]
                .iter()
                .map(|side| variable_domain_in(side, variable)),
        ),
        Formula::Not(argument) => variable_domain_in(argument, variable),
        Formula::Exists { argument, .. } | Formula::ForAll { argument, .. } => {
            variable_domain_in(argument, variable)
        }
    }
}

/// Returns the domain of the values a term can take.
pub fn term_domain(term: &Term) -> Domain {
    match term {
        Term::Integer(_) => Domain::Integer,
        // TODO: decide whether #inf and #sup should count as integers here
        Term::SpecialInteger(_) => Domain::Integer,
        Term::Boolean(_) | Term::String(_) => Domain::General,
        // Symbolic functions may return values of any sort
        Term::Constant(_) | Term::Function(..) => Domain::General,
        Term::Variable(declaration) => declaration.domain.get(),
        Term::UnaryOperation(_, argument) => term_domain(argument),
        Term::BinaryOperation(_, left, right) | Term::Interval(left, right) => {
            combine_domains([left, right].iter().map(|side| term_domain(side)))
        }
    }
}

// General dominates; otherwise integer wins over unknown.
fn combine_domains(domains: impl Iterator<Item = Domain>) -> Domain {
    let mut integer = false;

    for domain in domains {
        match domain {
            Domain::General => return Domain::General,
            Domain::Integer => integer = true,
            Domain::Program | Domain::Unknown => (),
        }
    }

    if integer {
        Domain::Integer
    } else {
        Domain::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{BinaryOperator, PredicateDeclarations, VariableKind};

    #[test]
    fn term_domains() {
        let x = VariableDeclaration::user_defined("X");
        assert_eq!(term_domain(&Term::Integer(1)), Domain::Integer);
        assert_eq!(term_domain(&Term::String("a".to_string())), Domain::General);
        assert_eq!(term_domain(&Term::variable(&x)), Domain::Unknown);

        let sum = Term::BinaryOperation(
            BinaryOperator::Plus,
            Box::new(Term::variable(&x)),
            Box::new(Term::Integer(1)),
        );
        assert_eq!(term_domain(&sum), Domain::Integer);

        x.domain.set(Domain::General);
        assert_eq!(term_domain(&sum), Domain::General);
    }

    #[test]
    fn detect_variable_bound_by_interval_membership() {
        let mut predicates = PredicateDeclarations::new();
        let t = predicates.find_or_create("t", 1);

        let v = VariableDeclaration::head();
        let x = VariableDeclaration::user_defined("X");
        let n = VariableDeclaration::new(VariableKind::Reserved, None);
        n.domain.set(Domain::Integer);

        // forall V (t(V) <-> exists X, N (X = N and N in 1..3 and V = X))
        let definition = Formula::exists(
            vec![Rc::clone(&x), Rc::clone(&n)],
            Formula::And(vec![
                Formula::equal(Term::variable(&x), Term::variable(&n)),
                Formula::in_set(
                    Term::variable(&n),
                    Term::Interval(Box::new(Term::Integer(1)), Box::new(Term::Integer(3))),
                ),
                Formula::equal(Term::variable(&v), Term::variable(&x)),
            ]),
        );
        let completed = Formula::for_all(
            vec![Rc::clone(&v)],
            Formula::if_and_only_if(
                Formula::predicate(&t, vec![Term::variable(&v)]),
                definition,
            ),
        );

        detect_integer_variables(&[completed]);

        assert_eq!(x.domain.get(), Domain::Integer);
        assert_eq!(v.domain.get(), Domain::Integer);
        assert_eq!(n.domain.get(), Domain::Integer);
    }

    #[test]
    fn general_dominates_integer_evidence() {
        let mut predicates = PredicateDeclarations::new();
        let p = predicates.find_or_create("p", 1);

        let v = VariableDeclaration::head();
        let x = VariableDeclaration::user_defined("X");

        // forall V (p(V) <-> exists X (V = X and X = 1 and X = "a"))
        let definition = Formula::exists(
            vec![Rc::clone(&x)],
            Formula::And(vec![
                Formula::equal(Term::variable(&v), Term::variable(&x)),
                Formula::equal(Term::variable(&x), Term::Integer(1)),
                Formula::equal(Term::variable(&x), Term::String("a".to_string())),
            ]),
        );
        let completed = Formula::for_all(
            vec![Rc::clone(&v)],
            Formula::if_and_only_if(
                Formula::predicate(&p, vec![Term::variable(&v)]),
                definition,
            ),
        );

        detect_integer_variables(&[completed]);

        assert_eq!(x.domain.get(), Domain::Unknown);
        assert_eq!(v.domain.get(), Domain::Unknown);
    }

    #[test]
    fn constraints_are_left_untouched() {
        let mut predicates = PredicateDeclarations::new();
        let p = predicates.find_or_create("p", 1);

        let x = VariableDeclaration::user_defined("X");
        let constraint = Formula::for_all(
            vec![Rc::clone(&x)],
            Formula::not(Formula::And(vec![
                Formula::predicate(&p, vec![Term::variable(&x)]),
                Formula::equal(Term::variable(&x), Term::Integer(1)),
            ])),
        );

        detect_integer_variables(&[constraint]);
        assert_eq!(x.domain.get(), Domain::Unknown);
    }
}
