/*! Defines the syntax of first-order formulas with comparisons and interval
membership. */

use super::declaration::{PredicateDeclaration, VariableDeclaration};
use super::term::Term;
use std::{fmt, rc::Rc};

/// Is a comparison operator between two terms.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    LessEqual,
    GreaterEqual,
    NotEqual,
    Equal,
}

/// Is a first-order formula.
///
/// Conjunction and disjunction are n-ary. Interior nodes own their children; quantifiers
/// own the variable declarations they bind. Equality is structural modulo declaration
/// identity.
#[derive(Clone, PartialEq, Eq)]
pub enum Formula {
    Boolean(bool),
    Predicate {
        declaration: Rc<PredicateDeclaration>,
        arguments: Vec<Term>,
    },
    Comparison {
        operator: ComparisonOperator,
        left: Term,
        right: Term,
    },
    /// Membership of a primitive term in the set of values of another term.
    In {
        element: Term,
        set: Term,
    },
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies {
        antecedent: Box<Formula>,
        consequent: Box<Formula>,
    },
    Biconditional {
        left: Box<Formula>,
        right: Box<Formula>,
    },
    Exists {
        variables: Vec<Rc<VariableDeclaration>>,
        argument: Box<Formula>,
    },
    ForAll {
        variables: Vec<Rc<VariableDeclaration>>,
        argument: Box<Formula>,
    },
}

impl Formula {
    pub fn predicate(declaration: &Rc<PredicateDeclaration>, arguments: Vec<Term>) -> Self {
        debug_assert_eq!(declaration.arity, arguments.len());
        Self::Predicate {
            declaration: Rc::clone(declaration),
            arguments,
        }
    }

    pub fn comparison(operator: ComparisonOperator, left: Term, right: Term) -> Self {
        Self::Comparison {
            operator,
            left,
            right,
        }
    }

    pub fn equal(left: Term, right: Term) -> Self {
        Self::comparison(ComparisonOperator::Equal, left, right)
    }

    pub fn in_set(element: Term, set: Term) -> Self {
        debug_assert!(element.is_primitive());
        Self::In { element, set }
    }

    pub fn not(argument: Formula) -> Self {
        Self::Not(Box::new(argument))
    }

    /// Builds a conjunction, collapsing the trivial cases of zero or one argument.
    pub fn and(mut arguments: Vec<Formula>) -> Self {
        match arguments.len() {
            0 => Self::Boolean(true),
            1 => arguments.remove(0),
            _ => Self::And(arguments),
        }
    }

    /// Builds a disjunction, collapsing the trivial cases of zero or one argument.
    pub fn or(mut arguments: Vec<Formula>) -> Self {
        match arguments.len() {
            0 => Self::Boolean(false),
            1 => arguments.remove(0),
            _ => Self::Or(arguments),
        }
    }

    pub fn implies(antecedent: Formula, consequent: Formula) -> Self {
        Self::Implies {
            antecedent: Box::new(antecedent),
            consequent: Box::new(consequent),
        }
    }

    pub fn if_and_only_if(left: Formula, right: Formula) -> Self {
        Self::Biconditional {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Existentially quantifies `argument`; with no variables, the argument is returned
    /// unchanged.
    pub fn exists(variables: Vec<Rc<VariableDeclaration>>, argument: Formula) -> Self {
        if variables.is_empty() {
            return argument;
        }

        Self::Exists {
            variables,
            argument: Box::new(argument),
        }
    }

    /// Universally quantifies `argument`; with no variables, the argument is returned
    /// unchanged.
    pub fn for_all(variables: Vec<Rc<VariableDeclaration>>, argument: Formula) -> Self {
        if variables.is_empty() {
            return argument;
        }

        Self::ForAll {
            variables,
            argument: Box::new(argument),
        }
    }

    /// Returns the free variables of the formula in order of first occurrence.
    pub fn free_variables(&self) -> Vec<Rc<VariableDeclaration>> {
        let mut free = vec![];
        let mut bound = vec![];
        self.collect_free_variables(&mut free, &mut bound);
        free
    }

    pub fn is_closed(&self) -> bool {
        self.free_variables().is_empty()
    }

    fn collect_free_variables(
        &self,
        free: &mut Vec<Rc<VariableDeclaration>>,
        bound: &mut Vec<Rc<VariableDeclaration>>,
    ) {
        let visit_term = |term: &Term, free: &mut Vec<_>, bound: &[Rc<VariableDeclaration>]| {
            let mut occurring = vec![];
            term.collect_variables(&mut occurring);

            for declaration in occurring {
                if !bound.iter().any(|other| Rc::ptr_eq(other, &declaration))
                    && !free.iter().any(|other| Rc::ptr_eq(other, &declaration))
                {
                    free.push(declaration);
                }
            }
        };

        match self {
            Self::Boolean(_) => (),
            Self::Predicate { arguments, .. } => {
                for argument in arguments {
                    visit_term(argument, free, bound);
                }
            }
            Self::Comparison { left, right, .. } => {
                visit_term(left, free, bound);
                visit_term(right, free, bound);
            }
            Self::In { element, set } => {
                visit_term(element, free, bound);
                visit_term(set, free, bound);
            }
            Self::Not(argument) => argument.collect_free_variables(free, bound),
            Self::And(arguments) | Self::Or(arguments) => {
                for argument in arguments {
                    argument.collect_free_variables(free, bound);
                }
            }
            Self::Implies {
                antecedent,
                consequent,
            } => {
                antecedent.collect_free_variables(free, bound);
                consequent.collect_free_variables(free, bound);
            }
            Self::Biconditional { left, right } => {
                left.collect_free_variables(free, bound);
                right.collect_free_variables(free, bound);
            }
            Self::Exists {
                variables,
                argument,
            }
            | Self::ForAll {
                variables,
                argument,
            } => {
                let depth = bound.len();
                bound.extend(variables.iter().map(Rc::clone));
                argument.collect_free_variables(free, bound);
                bound.truncate(depth);
            }
        }
    }

    /// Returns whether the given variable occurs (free) in the formula. Since
    /// declarations are unique, an occurrence under a quantifier is never a rebinding.
    pub fn contains_variable(&self, declaration: &Rc<VariableDeclaration>) -> bool {
        match self {
            Self::Boolean(_) => false,
            Self::Predicate { arguments, .. } => arguments
                .iter()
                .any(|argument| argument.contains_variable(declaration)),
            Self::Comparison { left, right, .. } => {
                left.contains_variable(declaration) || right.contains_variable(declaration)
            }
            Self::In { element, set } => {
                element.contains_variable(declaration) || set.contains_variable(declaration)
            }
            Self::Not(argument) => argument.contains_variable(declaration),
            Self::And(arguments) | Self::Or(arguments) => arguments
                .iter()
                .any(|argument| argument.contains_variable(declaration)),
            Self::Implies {
                antecedent,
                consequent,
            } => {
                antecedent.contains_variable(declaration)
                    || consequent.contains_variable(declaration)
            }
            Self::Biconditional { left, right } => {
                left.contains_variable(declaration) || right.contains_variable(declaration)
            }
            Self::Exists { argument, .. } | Self::ForAll { argument, .. } => {
                argument.contains_variable(declaration)
            }
        }
    }

    /// Replaces every occurrence of the given variable by `replacement` in all terms of
    /// the formula.
    pub fn substitute(&mut self, declaration: &Rc<VariableDeclaration>, replacement: &Term) {
        match self {
            Self::Boolean(_) => (),
            Self::Predicate { arguments, .. } => {
                for argument in arguments {
                    argument.substitute(declaration, replacement);
                }
            }
            Self::Comparison { left, right, .. } => {
                left.substitute(declaration, replacement);
                right.substitute(declaration, replacement);
            }
            Self::In { element, set } => {
                element.substitute(declaration, replacement);
                set.substitute(declaration, replacement);
            }
            Self::Not(argument) => argument.substitute(declaration, replacement),
            Self::And(arguments) | Self::Or(arguments) => {
                for argument in arguments {
                    argument.substitute(declaration, replacement);
                }
            }
            Self::Implies {
                antecedent,
                consequent,
            } => {
                antecedent.substitute(declaration, replacement);
                consequent.substitute(declaration, replacement);
            }
            Self::Biconditional { left, right } => {
                left.substitute(declaration, replacement);
                right.substitute(declaration, replacement);
            }
            Self::Exists { argument, .. } | Self::ForAll { argument, .. } => {
                argument.substitute(declaration, replacement)
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", crate::output::human_readable::format_formula(self))
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Is a formula together with the variable declarations that are free in it, awaiting
/// quantification.
pub struct ScopedFormula {
    pub formula: Formula,
    pub free_variables: Vec<Rc<VariableDeclaration>>,
}

impl ScopedFormula {
    pub fn existential_closure(self) -> Formula {
        Formula::exists(self.free_variables, self.formula)
    }

    pub fn universal_closure(self) -> Formula {
        Formula::for_all(self.free_variables, self.formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::declaration::VariableDeclaration;

    #[test]
    fn collapse_trivial_connectives() {
        assert_eq!(Formula::and(vec![]), Formula::Boolean(true));
        assert_eq!(Formula::or(vec![]), Formula::Boolean(false));

        let x = VariableDeclaration::user_defined("X");
        let comparison = Formula::equal(Term::variable(&x), Term::Integer(1));
        assert_eq!(Formula::and(vec![comparison.clone()]), comparison);
    }

    #[test]
    fn quantifier_over_no_variables_is_dropped() {
        let formula = Formula::for_all(vec![], Formula::Boolean(true));
        assert_eq!(formula, Formula::Boolean(true));
    }

    #[test]
    fn free_variables_exclude_bound_declarations() {
        let x = VariableDeclaration::user_defined("X");
        let y = VariableDeclaration::user_defined("Y");

        let argument = Formula::equal(Term::variable(&x), Term::variable(&y));
        let formula = Formula::exists(vec![Rc::clone(&x)], argument);

        let free = formula.free_variables();
        assert_eq!(free.len(), 1);
        assert!(Rc::ptr_eq(&free[0], &y));
        assert!(!formula.is_closed());
    }

    #[test]
    fn scoped_formula_closure_binds_free_variables() {
        let x = VariableDeclaration::user_defined("X");
        let scoped = ScopedFormula {
            formula: Formula::equal(Term::variable(&x), Term::Integer(1)),
            free_variables: vec![Rc::clone(&x)],
        };

        assert!(scoped.universal_closure().is_closed());
    }
}
