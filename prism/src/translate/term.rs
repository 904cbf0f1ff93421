/*! Implements term elaboration: converting source terms into first-order terms,
allocating fresh variables for unknown names and for compound terms in positions that
require a primitive term. */

use super::context::Context;
use crate::error::Error;
use crate::input;
use prism_fol::syntax::{
    BinaryOperator, Domain, Formula, SpecialInteger, Term, UnaryOperator, VariableDeclaration,
    VariableKind, VariableStack,
};
use std::rc::Rc;

/// Translates a source term into a first-order term. Compound subterms in positions
/// that require a primitive term are replaced by fresh helper variables; the returned
/// conjuncts give those variables their meaning and must be added to the enclosing
/// conjunction.
pub fn translate_term(
    term: &input::Term,
    context: &mut Context,
    variable_stack: &mut VariableStack,
) -> Result<(Term, Vec<Formula>), Error> {
    match term {
        input::Term::Boolean(value) => Ok((Term::Boolean(*value), vec![])),
        input::Term::Integer(value) => Ok((Term::Integer(*value), vec![])),
        input::Term::Infimum => Ok((Term::SpecialInteger(SpecialInteger::Infimum), vec![])),
        input::Term::Supremum => Ok((Term::SpecialInteger(SpecialInteger::Supremum), vec![])),
        input::Term::String(text) => Ok((Term::String(text.clone()), vec![])),
        input::Term::Constant(name) => {
            let declaration = context.function_declarations.find_or_create(name, 0);
            Ok((Term::Constant(declaration), vec![]))
        }
        input::Term::Variable(None) => {
            let declaration = VariableDeclaration::new(VariableKind::Body, None);
            variable_stack.declare_free(Rc::clone(&declaration));
            Ok((Term::Variable(declaration), vec![]))
        }
        input::Term::Variable(Some(name)) => {
            let declaration = match variable_stack.find(name) {
                Some(declaration) => declaration,
                None => {
                    let declaration = VariableDeclaration::user_defined(name.clone());
                    variable_stack.declare_free(Rc::clone(&declaration));
                    declaration
                }
            };
            Ok((Term::Variable(declaration), vec![]))
        }
        input::Term::Function { external: true, .. } => {
            Err(Error::unsupported_term("external function"))
        }
        input::Term::Function {
            name, arguments, ..
        } => {
            let mut conjuncts = vec![];
            let mut translated_arguments = Vec::with_capacity(arguments.len());

            for argument in arguments {
                let (translated, extra) =
                    translate_term_into_primitive(argument, context, variable_stack)?;
                translated_arguments.push(translated);
                conjuncts.extend(extra);
            }

            let declaration = context
                .function_declarations
                .find_or_create(name, arguments.len());
            Ok((Term::Function(declaration, translated_arguments), conjuncts))
        }
        input::Term::UnaryOperation {
            operator: input::UnaryOperator::Minus,
            argument,
        } => {
            // -t is shorthand for 0 - t
            let minus = input::Term::BinaryOperation {
                operator: BinaryOperator::Minus,
                left: Box::new(input::Term::Integer(0)),
                right: argument.clone(),
            };
            translate_term(&minus, context, variable_stack)
        }
        input::Term::UnaryOperation {
            operator: input::UnaryOperator::AbsoluteValue,
            argument,
        } => {
            let (translated, conjuncts) =
                translate_term_into_primitive(argument, context, variable_stack)?;
            Ok((
                Term::UnaryOperation(UnaryOperator::AbsoluteValue, Box::new(translated)),
                conjuncts,
            ))
        }
        input::Term::BinaryOperation {
            operator,
            left,
            right,
        } => {
            let (left, mut conjuncts) =
                translate_term_into_primitive(left, context, variable_stack)?;
            let (right, right_conjuncts) =
                translate_term_into_primitive(right, context, variable_stack)?;
            conjuncts.extend(right_conjuncts);

            Ok((
                Term::BinaryOperation(*operator, Box::new(left), Box::new(right)),
                conjuncts,
            ))
        }
        input::Term::Interval { from, to } => {
            let (from, mut conjuncts) =
                translate_term_into_primitive(from, context, variable_stack)?;
            let (to, to_conjuncts) = translate_term_into_primitive(to, context, variable_stack)?;
            conjuncts.extend(to_conjuncts);

            Ok((Term::Interval(Box::new(from), Box::new(to)), conjuncts))
        }
        input::Term::Pool(_) => Err(Error::unsupported_term("pool")),
    }
}

/// Translates a source term and forces the result to be primitive. A compound result is
/// replaced by a fresh integer helper variable linked to the compound term by an
/// auxiliary conjunct.
pub fn translate_term_into_primitive(
    term: &input::Term,
    context: &mut Context,
    variable_stack: &mut VariableStack,
) -> Result<(Term, Vec<Formula>), Error> {
    let (translated, mut conjuncts) = translate_term(term, context, variable_stack)?;

    if translated.is_primitive() {
        return Ok((translated, conjuncts));
    }

    let helper = VariableDeclaration::new(VariableKind::Reserved, None);
    // Operations and intervals only take integer values
    helper.domain.set(Domain::Integer);
    variable_stack.declare_free(Rc::clone(&helper));

    let conjunct = match translated {
        interval @ Term::Interval(..) => Formula::in_set(Term::variable(&helper), interval),
        operation => Formula::equal(Term::variable(&helper), operation),
    };
    conjuncts.push(conjunct);

    Ok((Term::Variable(helper), conjuncts))
}

/// Builds the formula binding a head-atom parameter to the value of a head argument:
/// `V ∈ t` for intervals and `V = t'` otherwise, followed by the auxiliary conjuncts of
/// the elaboration.
pub fn bind_head_parameter(
    term: &input::Term,
    parameter: &Rc<VariableDeclaration>,
    context: &mut Context,
    variable_stack: &mut VariableStack,
) -> Result<Vec<Formula>, Error> {
    match term {
        input::Term::Interval { .. } => {
            let (interval, conjuncts) = translate_term(term, context, variable_stack)?;
            let mut result = vec![Formula::in_set(Term::variable(parameter), interval)];
            result.extend(conjuncts);
            Ok(result)
        }
        _ => {
            let (translated, conjuncts) =
                translate_term_into_primitive(term, context, variable_stack)?;
            let mut result = vec![Formula::equal(Term::variable(parameter), translated)];
            result.extend(conjuncts);
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_unknown_variable_declares_it_free() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        let (term, conjuncts) = translate_term(
            &input::Term::Variable(Some("X".to_string())),
            &mut context,
            &mut stack,
        )
        .unwrap();

        assert!(conjuncts.is_empty());
        let free = stack.take_free_variables();
        assert_eq!(free.len(), 1);
        assert_eq!(term, Term::variable(&free[0]));
        assert_eq!(free[0].kind, VariableKind::UserDefined);
    }

    #[test]
    fn known_variables_resolve_to_the_same_declaration() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        let source = input::Term::Variable(Some("X".to_string()));
        let (first, _) = translate_term(&source, &mut context, &mut stack).unwrap();
        let (second, _) = translate_term(&source, &mut context, &mut stack).unwrap();

        assert_eq!(first, second);
        assert_eq!(stack.take_free_variables().len(), 1);
    }

    #[test]
    fn compound_predicate_arguments_get_integer_helpers() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        let source = input::Term::BinaryOperation {
            operator: BinaryOperator::Plus,
            left: Box::new(input::Term::Variable(Some("X".to_string()))),
            right: Box::new(input::Term::Integer(1)),
        };

        let (term, conjuncts) =
            translate_term_into_primitive(&source, &mut context, &mut stack).unwrap();

        let free = stack.take_free_variables();
        assert_eq!(free.len(), 2);

        let helper = &free[1];
        assert_eq!(helper.kind, VariableKind::Reserved);
        assert_eq!(helper.domain.get(), Domain::Integer);
        assert_eq!(term, Term::variable(helper));

        assert_eq!(
            conjuncts,
            vec![Formula::equal(
                Term::variable(helper),
                Term::BinaryOperation(
                    BinaryOperator::Plus,
                    Box::new(Term::variable(&free[0])),
                    Box::new(Term::Integer(1)),
                ),
            )]
        );
    }

    #[test]
    fn unary_minus_rewrites_to_subtraction() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        let source = input::Term::UnaryOperation {
            operator: input::UnaryOperator::Minus,
            argument: Box::new(input::Term::Variable(Some("X".to_string()))),
        };

        let (term, _) = translate_term(&source, &mut context, &mut stack).unwrap();
        let free = stack.take_free_variables();

        assert_eq!(
            term,
            Term::BinaryOperation(
                BinaryOperator::Minus,
                Box::new(Term::Integer(0)),
                Box::new(Term::variable(&free[0])),
            )
        );
    }

    #[test]
    fn pools_and_external_functions_are_rejected() {
        let mut context = Context::new();
        let mut stack = VariableStack::new();

        let pool = input::Term::Pool(vec![input::Term::Integer(1), input::Term::Integer(2)]);
        assert!(matches!(
            translate_term(&pool, &mut context, &mut stack),
            Err(Error::UnsupportedTerm { .. })
        ));

        let external = input::Term::Function {
            name: "f".to_string(),
            arguments: vec![],
            external: true,
        };
        assert!(matches!(
            translate_term(&external, &mut context, &mut stack),
            Err(Error::UnsupportedTerm { .. })
        ));
    }
}
