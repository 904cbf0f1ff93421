/*! Implements the translation pipeline: statements are read into per-predicate
definitions and integrity constraints, the definitions are completed, domains are
optionally unified and refined, the result is simplified, and the formula stream is
written in the configured dialect. */

pub mod body;
pub mod completion;
pub mod context;
pub mod head;
pub mod term;

use crate::error::Error;
use crate::input::{Rule, Statement};
use crate::parser::parse_program;
use body::translate_body;
use completion::Completion;
use context::TranslationContext;
use head::{determine_head_type, HeadType};
use prism_fol::output::{human_readable, tptp, PredicateAnnotation, TypeAnnotations};
use prism_fol::syntax::{Formula, ScopedFormula, Term, Tristate, VariableStack};
use prism_fol::transform::{detect_integer_variables, simplify, unify_domains};
use std::{fs, io, path::Path};
use tracing::{debug, info, warn};

pub use context::{Context, Definitions, OutputFormat, SignatureEntry};

/// Translates the programs in the given files and writes the formula stream to
/// `output`. With completion enabled, at most one input is accepted.
pub fn translate<P: AsRef<Path>>(
    paths: &[P],
    context: &mut Context,
    output: &mut impl io::Write,
) -> Result<(), Error> {
    if context.perform_completion && paths.len() > 1 {
        return Err(Error::MultipleInputs);
    }

    let mut statements = vec![];

    for path in paths {
        let path = path.as_ref();
        info!("reading {}", path.display());

        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        statements.extend(parse_program(&path.display().to_string(), &source)?);
    }

    translate_statements(&statements, context, output)
}

/// Translates a program given as a string; used by tests and for streamed input.
pub fn translate_source(
    name: &str,
    source: &str,
    context: &mut Context,
    output: &mut impl io::Write,
) -> Result<(), Error> {
    let statements = parse_program(name, source)?;
    translate_statements(&statements, context, output)
}

fn translate_statements(
    statements: &[Statement],
    context: &mut Context,
    output: &mut impl io::Write,
) -> Result<(), Error> {
    let mut translation = TranslationContext::new();

    for statement in statements {
        match statement {
            Statement::Rule(rule) => read_rule(rule, context, &mut translation)?,
            Statement::ShowSignature(signature) => {
                // Interning here makes the predicate eligible for completion even if no
                // rule mentions it
                let declaration = context
                    .predicate_declarations
                    .find_or_create(&signature.name, signature.arity);
                declaration.visibility.set(Tristate::True);

                context
                    .visible_signatures
                    .get_or_insert_with(Vec::new)
                    .push(SignatureEntry::new(signature.clone()));
            }
            Statement::ShowNothing => {
                context.visible_signatures.get_or_insert_with(Vec::new);
            }
            Statement::ExternalSignature(signature) => {
                let declaration = context
                    .predicate_declarations
                    .find_or_create(&signature.name, signature.arity);
                declaration.is_external.set(true);

                context
                    .external_signatures
                    .get_or_insert_with(Vec::new)
                    .push(SignatureEntry::new(signature.clone()));
            }
        }
    }

    reconcile_signatures(context);

    if !context.perform_completion {
        return emit_without_completion(context, translation, output);
    }

    let completion = completion::complete(context, translation);
    audit_signatures(context);
    emit_completed(context, completion, output)
}

/// Translates one rule into either a recorded definition or an integrity constraint.
fn read_rule(
    rule: &Rule,
    context: &mut Context,
    translation: &mut TranslationContext,
) -> Result<(), Error> {
    let mut variable_stack = VariableStack::new();
    let head_type = determine_head_type(&rule.head, context)?;

    match head_type {
        HeadType::SingleAtom(head_atom) => {
            let parameters = translation
                .definitions_for(&head_atom.declaration)
                .head_atom_parameters
                .clone();
            variable_stack.push_scope(parameters.clone());

            let mut conjuncts = translate_body(&rule.body, context, &mut variable_stack)?;

            if head_atom.arguments.len() != parameters.len() {
                return Err(Error::internal(
                    "head atom arity does not match its declaration",
                ));
            }

            for (argument, parameter) in head_atom.arguments.iter().zip(&parameters) {
                conjuncts.extend(term::bind_head_parameter(
                    argument,
                    parameter,
                    context,
                    &mut variable_stack,
                )?);
            }

            variable_stack.pop_scope();

            let definition = ScopedFormula {
                formula: Formula::and(conjuncts),
                free_variables: variable_stack.take_free_variables(),
            };
            debug!(
                "translated definition of {}: {}",
                head_atom.declaration, definition.formula
            );

            translation
                .definitions_for(&head_atom.declaration)
                .definitions
                .push(definition);
            Ok(())
        }
        HeadType::IntegrityConstraint => {
            let conjuncts = translate_body(&rule.body, context, &mut variable_stack)?;

            let scoped = ScopedFormula {
                formula: Formula::not(Formula::and(conjuncts)),
                free_variables: variable_stack.take_free_variables(),
            };
            let constraint = scoped.universal_closure();
            debug!("translated integrity constraint: {}", constraint);

            translation.integrity_constraints.push(constraint);
            Ok(())
        }
        HeadType::ChoiceSingleAtom(_) => Err(Error::unsupported_feature(
            "choice rules with a single atom",
        )),
        HeadType::Fact => Err(Error::unsupported_feature("facts")),
    }
}

// Stamps visibility onto declarations not covered by any `#show` statement and records
// which declared signatures were actually used by the program
fn reconcile_signatures(context: &mut Context) {
    if context.visible_signatures.is_some() {
        for declaration in context.predicate_declarations.iter() {
            if declaration.visibility.get() == Tristate::Unknown {
                declaration.visibility.set(Tristate::False);
            }
        }
    }

    for entries in [&context.visible_signatures, &context.external_signatures] {
        let entries = match entries {
            Some(entries) => entries,
            None => continue,
        };

        for entry in entries {
            let used = context
                .predicate_declarations
                .find(&entry.signature.name, entry.signature.arity)
                .map(|declaration| declaration.is_used.get())
                .unwrap_or(false);
            entry.is_used.set(used);
        }
    }
}

fn audit_signatures(context: &Context) {
    if let Some(entries) = &context.visible_signatures {
        for entry in entries {
            if !entry.is_used.get() {
                warn!(
                    "#show declaration {}/{} matches no predicate used by the program",
                    entry.signature.name, entry.signature.arity
                );
            }
        }
    }

    if let Some(entries) = &context.external_signatures {
        for entry in entries {
            if !entry.is_used.get() {
                warn!(
                    "#external declaration {}/{} matches no predicate used by the program",
                    entry.signature.name, entry.signature.arity
                );
            }
        }
    }
}

fn emit_completed(
    context: &Context,
    completion: Completion,
    output: &mut impl io::Write,
) -> Result<(), Error> {
    let (declarations, mut definitions): (Vec<_>, Vec<_>) =
        completion.definitions.into_iter().unzip();
    let mut constraints = completion.integrity_constraints;

    if context.output_format == OutputFormat::Tptp {
        unify_domains(&definitions);
        unify_domains(&constraints);
    }

    if context.detect_integer_variables {
        detect_integer_variables(&definitions);
    }

    if context.perform_simplification {
        for formula in definitions.iter_mut().chain(constraints.iter_mut()) {
            simplify(formula);
        }
    }

    write_formulas(
        context,
        &completion.type_annotations,
        declarations
            .iter()
            .map(|declaration| format!("completed_definition_{}_{}", declaration.name, declaration.arity))
            .collect(),
        &definitions,
        &constraints,
        output,
    )
    .map_err(|source| Error::Io {
        path: "<output>".into(),
        source,
    })
}

// Without completion, every recorded definition is emitted as a universally closed
// implication from its body to its head atom
fn emit_without_completion(
    context: &Context,
    translation: TranslationContext,
    output: &mut impl io::Write,
) -> Result<(), Error> {
    if context.visible_signatures.is_some() {
        warn!("#show statements are ignored because completion is not enabled");
    }

    if context.external_signatures.is_some() {
        warn!("#external statements are ignored because completion is not enabled");
    }

    let mut formulas = vec![];

    for (declaration, definitions) in translation.definitions {
        let parameters = definitions.head_atom_parameters;

        for definition in definitions.definitions {
            let arguments = parameters.iter().map(Term::variable).collect();
            let head = Formula::predicate(&declaration, arguments);

            let mut variables = parameters.clone();
            variables.extend(definition.free_variables);

            formulas.push(Formula::for_all(
                variables,
                Formula::implies(definition.formula, head),
            ));
        }
    }

    formulas.extend(translation.integrity_constraints);

    if context.output_format == OutputFormat::Tptp {
        unify_domains(&formulas);
    }

    if context.perform_simplification {
        for formula in &mut formulas {
            simplify(formula);
        }
    }

    let type_annotations = TypeAnnotations {
        predicates: context
            .predicate_declarations
            .sorted()
            .into_iter()
            .map(|declaration| PredicateAnnotation {
                declaration,
                parameters: vec![],
            })
            .collect(),
        functions: context.function_declarations.sorted(),
    };

    let names = (1..=formulas.len())
        .map(|index| format!("axiom_{}", index))
        .collect();

    write_formulas(context, &type_annotations, names, &formulas, &[], output).map_err(|source| {
        Error::Io {
            path: "<output>".into(),
            source,
        }
    })
}

fn write_formulas(
    context: &Context,
    type_annotations: &TypeAnnotations,
    names: Vec<String>,
    formulas: &[Formula],
    constraints: &[Formula],
    output: &mut impl io::Write,
) -> io::Result<()> {
    match context.output_format {
        OutputFormat::HumanReadable => {
            human_readable::write_type_annotations(output, type_annotations)?;

            for formula in formulas.iter().chain(constraints.iter()) {
                human_readable::write_axiom(output, formula)?;
            }
        }
        OutputFormat::Tptp => {
            tptp::write_type_header(output)?;
            tptp::write_type_annotations(output, type_annotations)?;
            tptp::write_preamble(output)?;

            for (name, formula) in names.iter().zip(formulas.iter()) {
                tptp::write_axiom(output, name, formula)?;
            }

            for (index, constraint) in constraints.iter().enumerate() {
                let name = format!("integrity_constraint_{}", index + 1);
                tptp::write_axiom(output, &name, constraint)?;
            }
        }
    }

    Ok(())
}
