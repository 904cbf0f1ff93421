/*! Implements syntactic, equivalence-preserving simplification of formulas.

A simplification pass rewrites the formula bottom-up; passes are repeated until one of
them leaves the formula unchanged. The individual rewrites are Boolean absorption,
flattening of nested connectives, evaluation of comparisons between constant terms,
elimination of existentially quantified variables that are determined by an equation,
collapsing of trivial connectives, double negation, and dropping of unused quantified
variables. */

use super::OperationResult;
use crate::syntax::{ComparisonOperator, Formula, SpecialInteger, Term, VariableDeclaration};
use std::{cmp::Ordering, rc::Rc};

/// Simplifies the formula in place until no further rewrite applies.
pub fn simplify(formula: &mut Formula) {
    while simplification_pass(formula) == OperationResult::Changed {}
}

fn simplification_pass(formula: &mut Formula) -> OperationResult {
    // Simplify the subformulas first
    let result = match formula {
        Formula::Not(argument) => simplification_pass(argument),
        Formula::And(arguments) | Formula::Or(arguments) => arguments
            .iter_mut()
            .fold(OperationResult::Unchanged, |result, argument| {
                result.or(simplification_pass(argument))
            }),
        Formula::Implies {
            antecedent,
            consequent,
        } => simplification_pass(antecedent).or(simplification_pass(consequent)),
        Formula::Biconditional { left, right } => {
            simplification_pass(left).or(simplification_pass(right))
        }
        Formula::Exists { argument, .. } | Formula::ForAll { argument, .. } => {
            simplification_pass(argument)
        }
        _ => OperationResult::Unchanged,
    };

    let owned = std::mem::replace(formula, Formula::Boolean(false));
    let (simplified, node_result) = simplify_node(owned);
    *formula = simplified;

    result.or(node_result)
}

fn simplify_node(formula: Formula) -> (Formula, OperationResult) {
    match formula {
        Formula::Not(argument) => match *argument {
            Formula::Boolean(value) => (Formula::Boolean(!value), OperationResult::Changed),
            Formula::Not(inner) => (*inner, OperationResult::Changed),
            other => (Formula::not(other), OperationResult::Unchanged),
        },
        Formula::And(arguments) => simplify_connective(arguments, true),
        Formula::Or(arguments) => simplify_connective(arguments, false),
        Formula::Comparison {
            operator,
            left,
            right,
        } => match evaluate_comparison(operator, &left, &right) {
            Some(value) => (Formula::Boolean(value), OperationResult::Changed),
            None => (
                Formula::Comparison {
                    operator,
                    left,
                    right,
                },
                OperationResult::Unchanged,
            ),
        },
        Formula::Implies {
            antecedent,
            consequent,
        } => match (*antecedent, *consequent) {
            (Formula::Boolean(false), _) => (Formula::Boolean(true), OperationResult::Changed),
            (_, Formula::Boolean(true)) => (Formula::Boolean(true), OperationResult::Changed),
            (Formula::Boolean(true), consequent) => (consequent, OperationResult::Changed),
            (antecedent, Formula::Boolean(false)) => {
                (Formula::not(antecedent), OperationResult::Changed)
            }
            (antecedent, consequent) => (
                Formula::implies(antecedent, consequent),
                OperationResult::Unchanged,
            ),
        },
        Formula::Biconditional { left, right } => match (*left, *right) {
            (Formula::Boolean(true), other) | (other, Formula::Boolean(true)) => {
                (other, OperationResult::Changed)
            }
            (Formula::Boolean(false), other) | (other, Formula::Boolean(false)) => {
                (Formula::not(other), OperationResult::Changed)
            }
            (left, right) => (
                Formula::if_and_only_if(left, right),
                OperationResult::Unchanged,
            ),
        },
        Formula::Exists {
            variables,
            argument,
        } => simplify_exists(variables, *argument),
        Formula::ForAll {
            mut variables,
            argument,
        } => {
            let count = variables.len();
            variables.retain(|variable| argument.contains_variable(variable));
            let result = if variables.len() == count {
                OperationResult::Unchanged
            } else {
                OperationResult::Changed
            };

            if variables.is_empty() {
                (*argument, OperationResult::Changed)
            } else {
                (
                    Formula::ForAll {
                        variables,
                        argument,
                    },
                    result,
                )
            }
        }
        other => (other, OperationResult::Unchanged),
    }
}

// Shared rewrite for conjunctions (identity ⊤, absorbing ⊥) and disjunctions (identity
// ⊥, absorbing ⊤): flatten nested connectives of the same kind, drop the identity
// element, collapse on the absorbing element, and unwrap empty or singleton argument
// lists.
fn simplify_connective(arguments: Vec<Formula>, conjunction: bool) -> (Formula, OperationResult) {
    let mut result = OperationResult::Unchanged;
    let mut flattened = Vec::with_capacity(arguments.len());

    for argument in arguments {
        match argument {
            Formula::And(inner) if conjunction => {
                flattened.extend(inner);
                result = OperationResult::Changed;
            }
            Formula::Or(inner) if !conjunction => {
                flattened.extend(inner);
                result = OperationResult::Changed;
            }
            Formula::Boolean(value) if value == conjunction => result = OperationResult::Changed,
            Formula::Boolean(value) => return (Formula::Boolean(value), OperationResult::Changed),
            other => flattened.push(other),
        }
    }

    match flattened.len() {
        0 => (Formula::Boolean(conjunction), OperationResult::Changed),
        1 => (flattened.pop().unwrap(), OperationResult::Changed),
        _ => {
            let formula = if conjunction {
                Formula::And(flattened)
            } else {
                Formula::Or(flattened)
            };
            (formula, result)
        }
    }
}

// Rewrites ∃ X. (X = t ∧ φ) to φ[X ↦ t] whenever X does not occur in t, and drops
// quantified variables without occurrences. Substitution by declaration identity cannot
// capture variables of nested quantifiers.
fn simplify_exists(
    mut variables: Vec<Rc<VariableDeclaration>>,
    mut argument: Formula,
) -> (Formula, OperationResult) {
    let mut result = OperationResult::Unchanged;

    if let Formula::And(arguments) = &mut argument {
        let mut matched = None;

        'conjuncts: for (conjunct_index, conjunct) in arguments.iter().enumerate() {
            if let Formula::Comparison {
                operator: ComparisonOperator::Equal,
                left,
                right,
            } = conjunct
            {
                for (variable_index, variable) in variables.iter().enumerate() {
                    if let Term::Variable(declaration) = left {
                        if Rc::ptr_eq(declaration, variable) && !right.contains_variable(variable) {
                            matched = Some((variable_index, conjunct_index, right.clone()));
                            break 'conjuncts;
                        }
                    }

                    if let Term::Variable(declaration) = right {
                        if Rc::ptr_eq(declaration, variable) && !left.contains_variable(variable) {
                            matched = Some((variable_index, conjunct_index, left.clone()));
                            break 'conjuncts;
                        }
                    }
                }
            }
        }

        if let Some((variable_index, conjunct_index, replacement)) = matched {
            let variable = variables.remove(variable_index);
            arguments.remove(conjunct_index);

            for conjunct in arguments.iter_mut() {
                conjunct.substitute(&variable, &replacement);
            }

            result = OperationResult::Changed;
        }
    } else if let Formula::Comparison {
        operator: ComparisonOperator::Equal,
        left,
        right,
    } = &argument
    {
        let is_determined = |candidate: &Term, other: &Term, variable: &Rc<VariableDeclaration>| {
            match candidate {
                Term::Variable(declaration) => {
                    Rc::ptr_eq(declaration, variable) && !other.contains_variable(variable)
                }
                _ => false,
            }
        };

        let matched = variables.iter().position(|variable| {
            is_determined(left, right, variable) || is_determined(right, left, variable)
        });

        if let Some(variable_index) = matched {
            variables.remove(variable_index);
            argument = Formula::Boolean(true);
            result = OperationResult::Changed;
        }
    }

    let count = variables.len();
    variables.retain(|variable| argument.contains_variable(variable));
    if variables.len() != count {
        result = OperationResult::Changed;
    }

    if variables.is_empty() {
        (argument, OperationResult::Changed)
    } else {
        (
            Formula::Exists {
                variables,
                argument: Box::new(argument),
            },
            result,
        )
    }
}

fn evaluate_comparison(operator: ComparisonOperator, left: &Term, right: &Term) -> Option<bool> {
    let ordering = compare_constant_terms(left, right)?;

    Some(match operator {
        ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
        ComparisonOperator::LessThan => ordering == Ordering::Less,
        ComparisonOperator::LessEqual => ordering != Ordering::Greater,
        ComparisonOperator::GreaterEqual => ordering != Ordering::Less,
        ComparisonOperator::NotEqual => ordering != Ordering::Equal,
        ComparisonOperator::Equal => ordering == Ordering::Equal,
    })
}

// Orders constant terms of matching sorts; #inf and #sup relate to all integers.
// Comparisons involving symbolic constants or compound terms are left untouched.
fn compare_constant_terms(left: &Term, right: &Term) -> Option<Ordering> {
    match (left, right) {
        (Term::Integer(left), Term::Integer(right)) => Some(left.cmp(right)),
        (Term::SpecialInteger(left), Term::SpecialInteger(right)) => {
            Some(special_rank(*left).cmp(&special_rank(*right)))
        }
        (Term::SpecialInteger(SpecialInteger::Infimum), Term::Integer(_)) => Some(Ordering::Less),
        (Term::SpecialInteger(SpecialInteger::Supremum), Term::Integer(_)) => {
            Some(Ordering::Greater)
        }
        (Term::Integer(_), Term::SpecialInteger(SpecialInteger::Infimum)) => {
            Some(Ordering::Greater)
        }
        (Term::Integer(_), Term::SpecialInteger(SpecialInteger::Supremum)) => Some(Ordering::Less),
        (Term::String(left), Term::String(right)) => Some(left.cmp(right)),
        (Term::Boolean(left), Term::Boolean(right)) => Some(left.cmp(right)),
        _ => None,
    }
}

fn special_rank(value: SpecialInteger) -> u8 {
    match value {
        SpecialInteger::Infimum => 0,
        SpecialInteger::Supremum => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PredicateDeclarations, VariableKind};

    fn simplified(mut formula: Formula) -> Formula {
        simplify(&mut formula);
        formula
    }

    fn atom(
        predicates: &mut PredicateDeclarations,
        name: &str,
        arguments: Vec<Term>,
    ) -> Formula {
        let declaration = predicates.find_or_create(name, arguments.len());
        Formula::predicate(&declaration, arguments)
    }

    #[test]
    fn absorb_booleans() {
        let mut predicates = PredicateDeclarations::new();
        let x = VariableDeclaration::user_defined("X");
        let p = atom(&mut predicates, "p", vec![Term::variable(&x)]);

        assert_eq!(
            simplified(Formula::not(Formula::Boolean(true))),
            Formula::Boolean(false)
        );
        assert_eq!(
            simplified(Formula::And(vec![Formula::Boolean(true), p.clone()])),
            p
        );
        assert_eq!(
            simplified(Formula::And(vec![Formula::Boolean(false), p.clone()])),
            Formula::Boolean(false)
        );
        assert_eq!(
            simplified(Formula::Or(vec![Formula::Boolean(false), p.clone()])),
            p
        );
        assert_eq!(
            simplified(Formula::Or(vec![Formula::Boolean(true), p.clone()])),
            Formula::Boolean(true)
        );
    }

    #[test]
    fn flatten_nested_connectives() {
        let mut predicates = PredicateDeclarations::new();
        let x = VariableDeclaration::user_defined("X");
        let p = atom(&mut predicates, "p", vec![Term::variable(&x)]);
        let q = atom(&mut predicates, "q", vec![Term::variable(&x)]);
        let r = atom(&mut predicates, "r", vec![Term::variable(&x)]);

        let nested = Formula::And(vec![p.clone(), Formula::And(vec![q.clone(), r.clone()])]);
        assert_eq!(simplified(nested), Formula::And(vec![p, q, r]));
    }

    #[test]
    fn evaluate_constant_comparisons() {
        let less = Formula::comparison(
            ComparisonOperator::LessThan,
            Term::Integer(1),
            Term::Integer(2),
        );
        assert_eq!(simplified(less), Formula::Boolean(true));

        let infimum = Formula::comparison(
            ComparisonOperator::LessThan,
            Term::SpecialInteger(SpecialInteger::Infimum),
            Term::Integer(-100),
        );
        assert_eq!(simplified(infimum), Formula::Boolean(true));

        let strings = Formula::comparison(
            ComparisonOperator::Equal,
            Term::String("a".to_string()),
            Term::String("b".to_string()),
        );
        assert_eq!(simplified(strings), Formula::Boolean(false));
    }

    #[test]
    fn constant_comparisons_keep_uninterpreted_terms() {
        let x = VariableDeclaration::user_defined("X");
        let comparison = Formula::equal(Term::variable(&x), Term::Integer(1));
        assert_eq!(simplified(comparison.clone()), comparison);
    }

    #[test]
    fn double_negation() {
        let mut predicates = PredicateDeclarations::new();
        let x = VariableDeclaration::user_defined("X");
        let p = atom(&mut predicates, "p", vec![Term::variable(&x)]);

        assert_eq!(simplified(Formula::not(Formula::not(p.clone()))), p);
    }

    #[test]
    fn project_determined_existential_variable() {
        let mut predicates = PredicateDeclarations::new();
        let v = VariableDeclaration::head();
        let x = VariableDeclaration::user_defined("X");
        let p = atom(&mut predicates, "p", vec![Term::variable(&x)]);

        // exists X (p(X) and V = X) becomes p(V)
        let formula = Formula::exists(
            vec![Rc::clone(&x)],
            Formula::And(vec![
                p,
                Formula::equal(Term::variable(&v), Term::variable(&x)),
            ]),
        );

        assert_eq!(
            simplified(formula),
            atom(&mut predicates, "p", vec![Term::variable(&v)])
        );
    }

    #[test]
    fn project_chained_equations_down_to_membership() {
        let v = VariableDeclaration::head();
        let x = VariableDeclaration::user_defined("X");
        let n = VariableDeclaration::new(VariableKind::Reserved, None);

        // exists X, N (X = N and N in 1..3 and V = X) becomes V in 1..3
        let interval = Term::Interval(Box::new(Term::Integer(1)), Box::new(Term::Integer(3)));
        let formula = Formula::exists(
            vec![Rc::clone(&x), Rc::clone(&n)],
            Formula::And(vec![
                Formula::equal(Term::variable(&x), Term::variable(&n)),
                Formula::in_set(Term::variable(&n), interval.clone()),
                Formula::equal(Term::variable(&v), Term::variable(&x)),
            ]),
        );

        assert_eq!(
            simplified(formula),
            Formula::in_set(Term::variable(&v), interval)
        );
    }

    #[test]
    fn drop_unused_quantified_variables() {
        let mut predicates = PredicateDeclarations::new();
        let x = VariableDeclaration::user_defined("X");
        let y = VariableDeclaration::user_defined("Y");
        let p = atom(&mut predicates, "p", vec![Term::variable(&y)]);

        assert_eq!(simplified(Formula::exists(vec![Rc::clone(&x)], p.clone())), p);
        assert_eq!(
            simplified(Formula::for_all(vec![Rc::clone(&x)], p.clone())),
            p
        );

        let partially_used = Formula::for_all(
            vec![Rc::clone(&x), Rc::clone(&y)],
            p.clone(),
        );
        assert_eq!(simplified(partially_used), Formula::for_all(vec![y], p));
    }

    #[test]
    fn simplification_is_idempotent() {
        let mut predicates = PredicateDeclarations::new();
        let v = VariableDeclaration::head();
        let x = VariableDeclaration::user_defined("X");
        let p = atom(&mut predicates, "p", vec![Term::variable(&x)]);

        let mut formula = Formula::exists(
            vec![Rc::clone(&x)],
            Formula::And(vec![
                Formula::Boolean(true),
                p,
                Formula::equal(Term::variable(&v), Term::variable(&x)),
            ]),
        );

        simplify(&mut formula);
        let once = formula.clone();
        simplify(&mut formula);
        assert_eq!(once, formula);
    }
}
