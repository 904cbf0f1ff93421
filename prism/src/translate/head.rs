/*! Classifies rule heads and routes them to the matching translation. */

use super::context::Context;
use crate::error::Error;
use crate::input;
use prism_fol::syntax::PredicateDeclaration;
use std::rc::Rc;

/// Is the head atom of a rule that defines a predicate.
pub struct HeadAtom<'a> {
    pub declaration: Rc<PredicateDeclaration>,
    pub arguments: &'a [input::Term],
}

/// Is the classification of a rule head.
pub enum HeadType<'a> {
    /// A single positive atom.
    SingleAtom(HeadAtom<'a>),
    /// A choice with exactly one positive atom.
    ChoiceSingleAtom(HeadAtom<'a>),
    /// The trivial head `#true`.
    Fact,
    /// The empty head `#false`.
    IntegrityConstraint,
}

/// Determines the head type of a rule, interning the head predicate if there is one.
pub fn determine_head_type<'a>(
    head: &'a input::Head,
    context: &mut Context,
) -> Result<HeadType<'a>, Error> {
    match head {
        input::Head::Literal(literal) => match literal {
            input::Literal::Boolean(true) => Ok(HeadType::Fact),
            input::Literal::Boolean(false) => Ok(HeadType::IntegrityConstraint),
            input::Literal::Atom { sign, atom } => Ok(HeadType::SingleAtom(head_atom(
                *sign, atom, context,
            )?)),
            input::Literal::Comparison { .. } => Err(Error::unsupported_head("comparison")),
        },
        input::Head::Disjunction(_) => Err(Error::unsupported_head("disjunction")),
        input::Head::Choice(literals) => match literals.as_slice() {
            [input::Literal::Atom { sign, atom }] => Ok(HeadType::ChoiceSingleAtom(head_atom(
                *sign, atom, context,
            )?)),
            _ => Err(Error::unsupported_head("choice with multiple elements")),
        },
        input::Head::Aggregate => Err(Error::unsupported_head("aggregate")),
    }
}

fn head_atom<'a>(
    sign: input::Sign,
    atom: &'a input::Atom,
    context: &mut Context,
) -> Result<HeadAtom<'a>, Error> {
    match sign {
        input::Sign::None => (),
        input::Sign::Negation => return Err(Error::unsupported_head("negated literal")),
        input::Sign::DoubleNegation => {
            return Err(Error::unsupported_head("double-negated literal"))
        }
    }

    let declaration = context.reference_predicate(&atom.predicate, atom.arity());

    Ok(HeadAtom {
        declaration,
        arguments: &atom.arguments,
    })
}
