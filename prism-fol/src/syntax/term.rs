/*! Defines the syntax of first-order terms over the value vocabulary of a logic
program: integers, symbolic constants and functions, strings, intervals, and integer
arithmetic. */

use super::declaration::{FunctionDeclaration, VariableDeclaration};
use std::{fmt, rc::Rc};

/// Is one of the two special values below and above every integer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpecialInteger {
    Infimum,
    Supremum,
}

/// Is an integer arithmetic operator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiplication,
    Division,
    Modulo,
}

/// Is a unary operator on terms.
///
/// Unary minus does not occur here; term elaboration rewrites `-t` to `0 - t`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOperator {
    AbsoluteValue,
}

/// Is a first-order term.
///
/// Subterms are owned by their parent node; declarations are shared handles. Cloning a
/// term copies every node and keeps referring to the same declarations, and equality is
/// structural modulo declaration identity.
#[derive(Clone, PartialEq, Eq)]
pub enum Term {
    Boolean(bool),
    Integer(i64),
    SpecialInteger(SpecialInteger),
    String(String),
    Constant(Rc<FunctionDeclaration>),
    Variable(Rc<VariableDeclaration>),
    Function(Rc<FunctionDeclaration>, Vec<Term>),
    BinaryOperation(BinaryOperator, Box<Term>, Box<Term>),
    UnaryOperation(UnaryOperator, Box<Term>),
    Interval(Box<Term>, Box<Term>),
}

impl Term {
    pub fn variable(declaration: &Rc<VariableDeclaration>) -> Self {
        Self::Variable(Rc::clone(declaration))
    }

    /// Terms are primitive if they are neither operations nor intervals. Only primitive
    /// terms may occur as predicate arguments or as the element of a membership formula.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::BinaryOperation(..) | Self::Interval(..))
    }

    /// Appends every variable declaration occurring in the term to `variables`, without
    /// duplicates.
    pub fn collect_variables(&self, variables: &mut Vec<Rc<VariableDeclaration>>) {
        match self {
            Self::Boolean(_)
            | Self::Integer(_)
            | Self::SpecialInteger(_)
            | Self::String(_)
            | Self::Constant(_) => (),
            Self::Variable(declaration) => {
                if !variables.iter().any(|other| Rc::ptr_eq(other, declaration)) {
                    variables.push(Rc::clone(declaration));
                }
            }
            Self::Function(_, arguments) => {
                for argument in arguments {
                    argument.collect_variables(variables);
                }
            }
            Self::BinaryOperation(_, left, right) | Self::Interval(left, right) => {
                left.collect_variables(variables);
                right.collect_variables(variables);
            }
            Self::UnaryOperation(_, argument) => argument.collect_variables(variables),
        }
    }

    pub fn contains_variable(&self, declaration: &Rc<VariableDeclaration>) -> bool {
        match self {
            Self::Boolean(_)
            | Self::Integer(_)
            | Self::SpecialInteger(_)
            | Self::String(_)
            | Self::Constant(_) => false,
            Self::Variable(other) => Rc::ptr_eq(other, declaration),
            Self::Function(_, arguments) => arguments
                .iter()
                .any(|argument| argument.contains_variable(declaration)),
            Self::BinaryOperation(_, left, right) | Self::Interval(left, right) => {
                left.contains_variable(declaration) || right.contains_variable(declaration)
            }
            Self::UnaryOperation(_, argument) => argument.contains_variable(declaration),
        }
    }

    /// Replaces every occurrence of the given variable by `replacement`.
    ///
    /// Declarations are compared by identity, so the replacement cannot be captured by
    /// quantifiers in an enclosing formula.
    pub fn substitute(&mut self, declaration: &Rc<VariableDeclaration>, replacement: &Term) {
        match self {
            Self::Boolean(_)
            | Self::Integer(_)
            | Self::SpecialInteger(_)
            | Self::String(_)
            | Self::Constant(_) => (),
            Self::Variable(other) => {
                if Rc::ptr_eq(other, declaration) {
                    *self = replacement.clone();
                }
            }
            Self::Function(_, arguments) => {
                for argument in arguments {
                    argument.substitute(declaration, replacement);
                }
            }
            Self::BinaryOperation(_, left, right) | Self::Interval(left, right) => {
                left.substitute(declaration, replacement);
                right.substitute(declaration, replacement);
            }
            Self::UnaryOperation(_, argument) => argument.substitute(declaration, replacement),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", crate::output::human_readable::format_term(self))
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::declaration::VariableDeclaration;

    fn x_plus_one(x: &Rc<VariableDeclaration>) -> Term {
        Term::BinaryOperation(
            BinaryOperator::Plus,
            Box::new(Term::variable(x)),
            Box::new(Term::Integer(1)),
        )
    }

    #[test]
    fn primitive_terms() {
        let x = VariableDeclaration::user_defined("X");
        assert!(Term::Integer(1).is_primitive());
        assert!(Term::variable(&x).is_primitive());
        assert!(!x_plus_one(&x).is_primitive());
        assert!(!Term::Interval(Box::new(Term::Integer(1)), Box::new(Term::Integer(3))).is_primitive());
    }

    #[test]
    fn collect_variables_is_unique() {
        let x = VariableDeclaration::user_defined("X");
        let term = Term::Interval(Box::new(Term::variable(&x)), Box::new(x_plus_one(&x)));

        let mut variables = vec![];
        term.collect_variables(&mut variables);
        assert_eq!(variables.len(), 1);
        assert!(Rc::ptr_eq(&variables[0], &x));
    }

    #[test]
    fn substitution_replaces_by_identity() {
        let x = VariableDeclaration::user_defined("X");
        let y = VariableDeclaration::user_defined("X");

        let mut term = x_plus_one(&x);
        term.substitute(&y, &Term::Integer(5));
        assert_eq!(term, x_plus_one(&x));

        term.substitute(&x, &Term::Integer(5));
        assert_eq!(
            term,
            Term::BinaryOperation(
                BinaryOperator::Plus,
                Box::new(Term::Integer(5)),
                Box::new(Term::Integer(1)),
            )
        );
    }

    #[test]
    fn equality_distinguishes_declarations() {
        let x = VariableDeclaration::user_defined("X");
        let y = VariableDeclaration::user_defined("X");
        assert_eq!(Term::variable(&x), Term::variable(&x));
        assert_ne!(Term::variable(&x), Term::variable(&y));
    }
}
