/*! Translates rule body literals into formulas. */

use super::context::Context;
use super::term::translate_term_into_primitive;
use crate::error::Error;
use crate::input;
use prism_fol::syntax::{Formula, VariableStack};

/// Translates all body literals of a rule into the conjuncts of its body formula.
pub fn translate_body(
    body: &[input::BodyLiteral],
    context: &mut Context,
    variable_stack: &mut VariableStack,
) -> Result<Vec<Formula>, Error> {
    let mut conjuncts = vec![];

    for literal in body {
        conjuncts.extend(translate_body_literal(literal, context, variable_stack)?);
    }

    Ok(conjuncts)
}

// Every literal yields its own formula followed by the auxiliary conjuncts produced by
// elaborating its terms
fn translate_body_literal(
    literal: &input::BodyLiteral,
    context: &mut Context,
    variable_stack: &mut VariableStack,
) -> Result<Vec<Formula>, Error> {
    let literal = match literal {
        input::BodyLiteral::Aggregate => return Err(Error::unsupported_body("aggregate")),
        input::BodyLiteral::TheoryAtom => return Err(Error::unsupported_body("theory atom")),
        input::BodyLiteral::CspLiteral => return Err(Error::unsupported_body("CSP literal")),
        input::BodyLiteral::Literal(literal) => literal,
    };

    match literal {
        input::Literal::Boolean(value) => Ok(vec![Formula::Boolean(*value)]),
        input::Literal::Atom { sign, atom } => {
            if *sign == input::Sign::DoubleNegation {
                return Err(Error::unsupported_body("double-negated literal"));
            }

            let mut conjuncts = vec![];
            let mut arguments = Vec::with_capacity(atom.arity());

            for argument in &atom.arguments {
                let (translated, extra) =
                    translate_term_into_primitive(argument, context, variable_stack)?;
                arguments.push(translated);
                conjuncts.extend(extra);
            }

            let declaration = context.reference_predicate(&atom.predicate, atom.arity());
            let mut formula = Formula::predicate(&declaration, arguments);

            if *sign == input::Sign::Negation {
                formula = Formula::not(formula);
            }

            let mut result = vec![formula];
            result.extend(conjuncts);
            Ok(result)
        }
        input::Literal::Comparison {
            sign,
            operator,
            left,
            right,
        } => {
            if *sign == input::Sign::DoubleNegation {
                return Err(Error::unsupported_body("double-negated literal"));
            }

            let (left, mut conjuncts) =
                translate_term_into_primitive(left, context, variable_stack)?;
            let (right, right_conjuncts) =
                translate_term_into_primitive(right, context, variable_stack)?;
            conjuncts.extend(right_conjuncts);

            let mut formula = Formula::comparison(*operator, left, right);

            if *sign == input::Sign::Negation {
                formula = Formula::not(formula);
            }

            let mut result = vec![formula];
            result.extend(conjuncts);
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Atom, BodyLiteral, ComparisonOperator, Literal, Sign, Term};
    use prism_fol::syntax::ComparisonOperator as FolComparisonOperator;

    fn literal_atom(sign: Sign, name: &str, arguments: Vec<Term>) -> BodyLiteral {
        BodyLiteral::Literal(Literal::Atom {
            sign,
            atom: Atom {
                predicate: name.to_string(),
                arguments,
            },
        })
    }

    #[test]
    fn negated_atoms_translate_to_negations() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        let body = vec![
            literal_atom(Sign::None, "p", vec![Term::Variable(Some("X".to_string()))]),
            literal_atom(
                Sign::Negation,
                "q",
                vec![Term::Variable(Some("X".to_string()))],
            ),
        ];

        let conjuncts = translate_body(&body, &mut context, &mut stack).unwrap();
        assert_eq!(conjuncts.len(), 2);
        assert!(matches!(conjuncts[0], Formula::Predicate { .. }));
        assert!(matches!(conjuncts[1], Formula::Not(_)));

        let p = context.predicate_declarations.find("p", 1).unwrap();
        assert!(p.is_used.get());
    }

    #[test]
    fn comparison_with_compound_side_adds_helper_conjunct() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        let body = vec![BodyLiteral::Literal(Literal::Comparison {
            sign: Sign::None,
            operator: ComparisonOperator::Equal,
            left: Term::Variable(Some("X".to_string())),
            right: Term::Interval {
                from: Box::new(Term::Integer(1)),
                to: Box::new(Term::Integer(3)),
            },
        })];

        let conjuncts = translate_body(&body, &mut context, &mut stack).unwrap();

        // X = N followed by N in 1..3
        assert_eq!(conjuncts.len(), 2);
        assert!(matches!(
            conjuncts[0],
            Formula::Comparison {
                operator: FolComparisonOperator::Equal,
                ..
            }
        ));
        assert!(matches!(conjuncts[1], Formula::In { .. }));
        assert_eq!(stack.take_free_variables().len(), 2);
    }

    #[test]
    fn unsupported_body_literals_are_rejected() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        for literal in [
            BodyLiteral::Aggregate,
            BodyLiteral::TheoryAtom,
            BodyLiteral::CspLiteral,
        ] {
            assert!(matches!(
                translate_body(&[literal], &mut context, &mut stack),
                Err(Error::UnsupportedBody { .. })
            ));
        }

        let double_negated = literal_atom(Sign::DoubleNegation, "p", vec![]);
        assert!(matches!(
            translate_body(&[double_negated], &mut context, &mut stack),
            Err(Error::UnsupportedBody { .. })
        ));
    }
}
