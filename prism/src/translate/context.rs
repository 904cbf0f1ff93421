/*! Defines the configuration and the mutable state threaded through a translation
run. */

use crate::input::Signature;
use prism_fol::syntax::{
    FunctionDeclarations, PredicateDeclaration, PredicateDeclarations, ScopedFormula,
    VariableDeclaration,
};
use std::{cell::Cell, rc::Rc, str::FromStr};

/// Is the output dialect of a translation run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    HumanReadable,
    Tptp,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_lowercase().as_str() {
            "human-readable" => Ok(Self::HumanReadable),
            "tptp" => Ok(Self::Tptp),
            _ => Err(format!("unknown output format '{}'", text)),
        }
    }
}

/// Is a predicate signature declared by a `#show` or `#external` statement, together
/// with the flag recording whether the program used the predicate.
pub struct SignatureEntry {
    pub signature: Signature,
    pub is_used: Cell<bool>,
}

impl SignatureEntry {
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            is_used: Cell::new(false),
        }
    }
}

/// Holds the configuration flags and the declaration tables of one translation run.
pub struct Context {
    pub perform_completion: bool,
    pub perform_simplification: bool,
    pub detect_integer_variables: bool,
    pub output_format: OutputFormat,

    pub predicate_declarations: PredicateDeclarations,
    pub function_declarations: FunctionDeclarations,

    /// Predicate signatures declared visible by `#show` statements; `Some` as soon as
    /// any `#show` statement occurred.
    pub visible_signatures: Option<Vec<SignatureEntry>>,
    /// Predicate signatures declared by `#external` statements.
    pub external_signatures: Option<Vec<SignatureEntry>>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            perform_completion: true,
            perform_simplification: true,
            detect_integer_variables: true,
            output_format: OutputFormat::HumanReadable,
            predicate_declarations: PredicateDeclarations::new(),
            function_declarations: FunctionDeclarations::new(),
            visible_signatures: None,
            external_signatures: None,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a predicate referenced by a rule and marks it used.
    pub fn reference_predicate(&mut self, name: &str, arity: usize) -> Rc<PredicateDeclaration> {
        let declaration = self.predicate_declarations.find_or_create(name, arity);
        declaration.is_used.set(true);
        declaration
    }
}

/// Collects the defining rules of one predicate. The head-atom parameters are shared
/// across all definitions so that completion can merge them into one biconditional.
pub struct Definitions {
    pub head_atom_parameters: Vec<Rc<VariableDeclaration>>,
    pub definitions: Vec<ScopedFormula>,
}

/// Accumulates the result of translating all rules of a program.
#[derive(Default)]
pub struct TranslationContext {
    pub definitions: Vec<(Rc<PredicateDeclaration>, Definitions)>,
    pub integrity_constraints: Vec<prism_fol::syntax::Formula>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the definitions entry for the given predicate, creating it with fresh
    /// head-atom parameters on first use.
    pub fn definitions_for(
        &mut self,
        declaration: &Rc<PredicateDeclaration>,
    ) -> &mut Definitions {
        if let Some(index) = self
            .definitions
            .iter()
            .position(|(other, _)| Rc::ptr_eq(other, declaration))
        {
            return &mut self.definitions[index].1;
        }

        let head_atom_parameters = (0..declaration.arity)
            .map(|_| VariableDeclaration::head())
            .collect();

        self.definitions.push((
            Rc::clone(declaration),
            Definitions {
                head_atom_parameters,
                definitions: vec![],
            },
        ));

        &mut self.definitions.last_mut().unwrap().1
    }

    pub fn find_definitions(
        &self,
        declaration: &Rc<PredicateDeclaration>,
    ) -> Option<&Definitions> {
        self.definitions
            .iter()
            .find(|(other, _)| Rc::ptr_eq(other, declaration))
            .map(|(_, definitions)| definitions)
    }

    /// Removes and returns the definitions recorded for the given predicate.
    pub fn take_definitions(
        &mut self,
        declaration: &Rc<PredicateDeclaration>,
    ) -> Option<Definitions> {
        self.definitions
            .iter()
            .position(|(other, _)| Rc::ptr_eq(other, declaration))
            .map(|index| self.definitions.remove(index).1)
    }
}
