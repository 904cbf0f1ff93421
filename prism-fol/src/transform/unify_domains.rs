/*! Collapses the program and integer domains into one general sort.

The TPTP dialect is untyped, so every quantified variable is made to range over a single
sort of objects before formatting. */

use crate::syntax::{Domain, Formula};

/// Assigns the general domain to every variable declaration bound in the given
/// formulas.
pub fn unify_domains(formulas: &[Formula]) {
    for formula in formulas {
        unify_formula_domains(formula);
    }
}

fn unify_formula_domains(formula: &Formula) {
    match formula {
        Formula::Boolean(_)
        | Formula::Predicate { .. }
        | Formula::Comparison { .. }
        | Formula::In { .. } => (),
        Formula::Not(argument) => unify_formula_domains(argument),
        Formula::And(arguments) | Formula::Or(arguments) => {
            for argument in arguments {
                unify_formula_domains(argument);
            }
        }
        Formula::Implies {
            antecedent,
            consequent,
        } => {
            unify_formula_domains(antecedent);
            unify_formula_domains(consequent);
        }
        Formula::Biconditional { left, right } => {
            unify_formula_domains(left);
            unify_formula_domains(right);
        }
        Formula::Exists {
            variables,
            argument,
        }
        | Formula::ForAll {
            variables,
            argument,
        } => {
            for variable in variables {
                variable.domain.set(Domain::General);
            }

            unify_formula_domains(argument);
        }
    }
}
