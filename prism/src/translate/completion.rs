/*! Implements predicate completion: combining all definitions of a predicate into one
universally closed biconditional. */

use super::context::{Context, TranslationContext};
use prism_fol::output::{PredicateAnnotation, TypeAnnotations};
use prism_fol::syntax::{Formula, PredicateDeclaration, Term, VariableDeclaration};
use std::rc::Rc;
use tracing::warn;

/// Is the result of completing a translated program.
pub struct Completion {
    /// One completed definition per non-external predicate, in lexicographic order by
    /// (name, arity).
    pub definitions: Vec<(Rc<PredicateDeclaration>, Formula)>,
    pub integrity_constraints: Vec<Formula>,
    pub type_annotations: TypeAnnotations,
}

/// Builds the completed definition of every interned predicate. Predicates declared
/// external are left open and produce no formula; predicates without defining rules are
/// universally falsified.
pub fn complete(context: &mut Context, translation: TranslationContext) -> Completion {
    let mut translation = translation;
    let declarations = context.predicate_declarations.sorted();

    let mut definitions = Vec::with_capacity(declarations.len());
    let mut type_annotations = TypeAnnotations::default();

    for declaration in &declarations {
        if declaration.is_external.get() {
            if translation.take_definitions(declaration).is_some() {
                warn!(
                    "definitions of external predicate {} are ignored",
                    declaration
                );
            }

            type_annotations.predicates.push(PredicateAnnotation {
                declaration: Rc::clone(declaration),
                parameters: vec![],
            });
            continue;
        }

        let (parameters, formula) = match translation.take_definitions(declaration) {
            // The predicate holds if and only if one of its definitions fires
            Some(definitions) => {
                let parameters = definitions.head_atom_parameters;

                let disjuncts = definitions
                    .definitions
                    .into_iter()
                    .map(|definition| definition.existential_closure())
                    .collect::<Vec<_>>();

                let arguments = parameters.iter().map(Term::variable).collect();
                let biconditional = Formula::if_and_only_if(
                    Formula::predicate(declaration, arguments),
                    Formula::or(disjuncts),
                );

                (parameters, biconditional)
            }
            // A predicate without defining rules never holds
            None => {
                let parameters = (0..declaration.arity)
                    .map(|_| VariableDeclaration::head())
                    .collect::<Vec<_>>();

                let arguments = parameters.iter().map(Term::variable).collect();
                let negation = Formula::not(Formula::predicate(declaration, arguments));

                (parameters, negation)
            }
        };

        type_annotations.predicates.push(PredicateAnnotation {
            declaration: Rc::clone(declaration),
            parameters: parameters.clone(),
        });

        definitions.push((
            Rc::clone(declaration),
            Formula::for_all(parameters, formula),
        ));
    }

    type_annotations.functions = context.function_declarations.sorted();

    Completion {
        definitions,
        integrity_constraints: translation.integrity_constraints,
        type_annotations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_fol::syntax::ScopedFormula;

    #[test]
    fn complete_predicate_without_definitions() {
        let mut context = Context::new();
        let translation = TranslationContext::new();
        context.reference_predicate("p", 1);

        let completion = complete(&mut context, translation);

        assert_eq!(completion.definitions.len(), 1);
        let (declaration, formula) = &completion.definitions[0];
        assert_eq!(declaration.to_string(), "p/1");
        assert_eq!(formula.to_string(), "forall V1 (not p(V1))");
        assert!(formula.is_closed());
    }

    #[test]
    fn complete_merges_definitions_into_one_biconditional() {
        let mut context = Context::new();
        let mut translation = TranslationContext::new();

        let p = context.reference_predicate("p", 1);
        let definitions = translation.definitions_for(&p);
        let parameter = Rc::clone(&definitions.head_atom_parameters[0]);

        definitions.definitions.push(ScopedFormula {
            formula: Formula::equal(Term::variable(&parameter), Term::Integer(1)),
            free_variables: vec![],
        });
        definitions.definitions.push(ScopedFormula {
            formula: Formula::equal(Term::variable(&parameter), Term::Integer(2)),
            free_variables: vec![],
        });

        let completion = complete(&mut context, translation);
        let (_, formula) = &completion.definitions[0];
        assert_eq!(
            formula.to_string(),
            "forall V1 (p(V1) <-> V1 = 1 or V1 = 2)"
        );
    }

    #[test]
    fn external_predicates_are_not_completed() {
        let mut context = Context::new();
        let translation = TranslationContext::new();

        let p = context.reference_predicate("p", 1);
        p.is_external.set(true);

        let completion = complete(&mut context, translation);
        assert!(completion.definitions.is_empty());
        assert_eq!(completion.type_annotations.predicates.len(), 1);
    }

    #[test]
    fn completion_order_is_lexicographic() {
        let mut context = Context::new();
        let translation = TranslationContext::new();

        context.reference_predicate("q", 1);
        context.reference_predicate("p", 2);
        context.reference_predicate("p", 1);

        let completion = complete(&mut context, translation);
        let names = completion
            .definitions
            .iter()
            .map(|(declaration, _)| declaration.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["p/1", "p/2", "q/1"]);
    }
}
