/*! Defines the abstract syntax tree of source programs as produced by the parser. */

pub use prism_fol::syntax::{BinaryOperator, ComparisonOperator};

/// Is a term of the source program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Term {
    Boolean(bool),
    Integer(i64),
    Infimum,
    Supremum,
    String(String),
    Constant(String),
    /// A variable; anonymous variables (`_`) carry no name.
    Variable(Option<String>),
    Function {
        name: String,
        arguments: Vec<Term>,
        external: bool,
    },
    UnaryOperation {
        operator: UnaryOperator,
        argument: Box<Term>,
    },
    BinaryOperation {
        operator: BinaryOperator,
        left: Box<Term>,
        right: Box<Term>,
    },
    Interval {
        from: Box<Term>,
        to: Box<Term>,
    },
    Pool(Vec<Term>),
}

/// Is a unary operator of the source language.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOperator {
    Minus,
    AbsoluteValue,
}

/// Is the sign in front of a literal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sign {
    None,
    Negation,
    DoubleNegation,
}

/// Is a predicate applied to a list of argument terms.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Atom {
    pub predicate: String,
    pub arguments: Vec<Term>,
}

impl Atom {
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}

/// Is a literal of the source program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Literal {
    Boolean(bool),
    Atom { sign: Sign, atom: Atom },
    Comparison {
        sign: Sign,
        operator: ComparisonOperator,
        left: Term,
        right: Term,
    },
}

/// Is one element of a rule body. Aggregates, theory atoms, and CSP literals are
/// recognized but rejected by the translation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BodyLiteral {
    Literal(Literal),
    Aggregate,
    TheoryAtom,
    CspLiteral,
}

/// Is the head of a rule.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Head {
    Literal(Literal),
    Disjunction(Vec<Literal>),
    Choice(Vec<Literal>),
    Aggregate,
}

/// Is a rule of the source program. Facts have an empty body; integrity constraints
/// have the head `#false`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    pub head: Head,
    pub body: Vec<BodyLiteral>,
}

/// Names a predicate by name and arity.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Signature {
    pub name: String,
    pub arity: usize,
}

/// Is one statement of the source program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Statement {
    Rule(Rule),
    /// A `#show name/arity.` statement.
    ShowSignature(Signature),
    /// A plain `#show.` statement, hiding all predicates.
    ShowNothing,
    /// An `#external name/arity.` statement.
    ExternalSignature(Signature),
}
