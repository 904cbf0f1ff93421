/*! Provides the representation of classical first-order formulas produced by the prism
translator, together with the transformations (simplification, integer domain inference,
domain unification) and output dialects (human-readable, TPTP) applied to them. */

pub mod output;
pub mod syntax;
pub mod transform;
