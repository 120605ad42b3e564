//! This module provides a struct for representing reactions
use crate::configuration::{default_lower_bound, default_upper_bound};
use crate::io::gpr_parse::{parse_gpr, GprParseError};
use crate::metabolic_model::gene::Gpr;
use derive_builder::Builder;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// Represents a reaction in the metabolic model
///
/// The rule text and the bounds are only changed through [`crate::metabolic_model::model::Model`]
/// so that bounds ordering and rule well-formedness are checked first.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule, as written in the model file
    #[builder(default = "String::new()", setter(into))]
    pub(crate) gene_reaction_rule: String,
    /// Lower flux bound
    #[builder(default = "default_lower_bound()")]
    pub(crate) lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "default_upper_bound()")]
    pub(crate) upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<Value>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<Value>,
    /// Pin marking the reaction as production only
    ///
    /// ### Note
    /// While set, a negative lower bound is refused unless the caller explicitly
    /// overrides the pin.
    #[builder(default = "false")]
    pub(crate) forward_only: bool,
}

impl ReactionBuilder {
    fn validate(&self) -> Result<(), String> {
        let lower = self.lower_bound.unwrap_or_else(default_lower_bound);
        let upper = self.upper_bound.unwrap_or_else(default_upper_bound);
        if lower > upper {
            return Err(format!(
                "lower bound {} is greater than upper bound {}",
                lower, upper
            ));
        }
        if self.forward_only == Some(true) && lower < 0. {
            return Err(format!(
                "forward only reaction can not have negative lower bound {}",
                lower
            ));
        }
        Ok(())
    }
}

impl Reaction {
    /// The GPR rule text, empty when the reaction has no gene association
    pub fn gene_reaction_rule(&self) -> &str {
        &self.gene_reaction_rule
    }

    /// Parse the GPR rule
    pub fn gpr(&self) -> Result<Option<Gpr>, GprParseError> {
        parse_gpr(&self.gene_reaction_rule)
    }

    /// Ids of the genes named in the rule, empty if the rule is blank or malformed
    pub fn genes(&self) -> IndexSet<String> {
        match self.gpr() {
            Ok(Some(gpr)) => gpr.gene_ids(),
            _ => IndexSet::new(),
        }
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// `(lower, upper)`
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower_bound, self.upper_bound)
    }

    /// Whether the reaction is pinned as production only
    pub fn is_forward_only(&self) -> bool {
        self.forward_only
    }

    /// Whether the bounds allow flux in both directions
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0. && self.upper_bound > 0.
    }
}
