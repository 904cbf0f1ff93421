/*! Defines an abstract syntax tree (AST) for first-order terms and formulas over the
vocabulary of a logic program, along with the declaration tables the tree refers to. */

pub mod declaration;
pub mod formula;
pub mod term;

pub use declaration::{
    Domain, FunctionDeclaration, FunctionDeclarations, PredicateDeclaration,
    PredicateDeclarations, Tristate, VariableDeclaration, VariableKind, VariableStack,
};
pub use formula::{ComparisonOperator, Formula, ScopedFormula};
pub use term::{BinaryOperator, SpecialInteger, Term, UnaryOperator};
