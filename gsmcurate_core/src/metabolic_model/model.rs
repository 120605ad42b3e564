//! This module provides the Model struct for representing an entire metabolic model
use std::fmt::{Display, Formatter};

use crate::io::gpr_parse::{parse_gpr, GprParseError};
use crate::metabolic_model::gene::{Gene, GeneActivity, Gpr};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

use indexmap::{IndexMap, IndexSet};
use log::{info, warn};
use thiserror::Error;

/// Represents a Genome Scale Metabolic Model
///
/// Reactions, genes and metabolites are owned records keyed by id. Every change
/// goes through a method returning `Result`, so the bounds ordering and rule
/// well-formedness are checked before the model is touched.
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub(crate) reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Gene Objects
    pub(crate) genes: IndexMap<String, Gene>,
    /// Map of metabolite ids to Metabolite Objects
    pub(crate) metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub(crate) objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

/// Counts of the records held by a model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSummary {
    pub reactions: usize,
    pub metabolites: usize,
    pub genes: usize,
}

impl Display for ModelSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} reactions, {} metabolites, {} genes",
            self.reactions, self.metabolites, self.genes
        )
    }
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
        }
    }

    // region Lookup

    pub fn reactions(&self) -> &IndexMap<String, Reaction> {
        &self.reactions
    }

    pub fn genes(&self) -> &IndexMap<String, Gene> {
        &self.genes
    }

    pub fn metabolites(&self) -> &IndexMap<String, Metabolite> {
        &self.metabolites
    }

    pub fn objective(&self) -> &IndexMap<String, f64> {
        &self.objective
    }

    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions.get(id)
    }

    pub fn gene(&self, id: &str) -> Option<&Gene> {
        self.genes.get(id)
    }

    pub fn metabolite(&self, id: &str) -> Option<&Metabolite> {
        self.metabolites.get(id)
    }

    /// Number of reactions, metabolites and genes
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            reactions: self.reactions.len(),
            metabolites: self.metabolites.len(),
            genes: self.genes.len(),
        }
    }

    // endregion Lookup

    // region Additions and Removals

    /// Add a reaction to the model
    ///
    /// Every metabolite in the stoichiometry must already be in the model, and genes
    /// named by the rule which the model does not know yet are added.
    ///
    /// # Examples
    /// ```rust
    /// use gsmcurate_core::metabolic_model::model::Model;
    /// use gsmcurate_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default()
    ///     .id("new_reaction".to_string())
    ///     .gene_reaction_rule("YALI0B02728g")
    ///     .build()
    ///     .unwrap();
    /// model.add_reaction(new_reaction).unwrap();
    /// assert_eq!(model.genes().len(), 1);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), ModelError> {
        if self.reactions.contains_key(&reaction.id) {
            return Err(ModelError::DuplicateReaction(reaction.id));
        }
        if let Some(missing) = reaction
            .metabolites
            .keys()
            .find(|met| !self.metabolites.contains_key(*met))
        {
            return Err(ModelError::UnknownMetabolite {
                reaction: reaction.id.clone(),
                metabolite: missing.clone(),
            });
        }
        check_bounds(&reaction.id, reaction.lower_bound, reaction.upper_bound)?;
        let gpr = parse_rule(&reaction.id, &reaction.gene_reaction_rule)?;
        if let Some(ref gpr) = gpr {
            self.register_genes(gpr);
        }
        info!(
            "Added reaction {} with {} metabolites",
            reaction.id,
            reaction.metabolites.len()
        );
        self.reactions.insert(reaction.id.clone(), reaction);
        Ok(())
    }

    /// Remove a reaction, returning it
    ///
    /// Genes only referenced by this reaction stay in the model, see
    /// [`Model::prune_unused_genes`].
    pub fn remove_reaction(&mut self, id: &str) -> Result<Reaction, ModelError> {
        let reaction = self
            .reactions
            .shift_remove(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))?;
        self.objective.shift_remove(id);
        info!("Removed reaction {}", id);
        Ok(reaction)
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> Result<(), ModelError> {
        if self.metabolites.contains_key(&metabolite.id) {
            return Err(ModelError::DuplicateMetabolite(metabolite.id));
        }
        info!("Added metabolite {}", metabolite.id);
        self.metabolites.insert(metabolite.id.clone(), metabolite);
        Ok(())
    }

    /// Add a gene to the model, replacing any gene with the same id
    ///
    /// # Examples
    /// ```rust
    /// use gsmcurate_core::metabolic_model::gene::GeneBuilder;
    /// use gsmcurate_core::metabolic_model::model::Model;
    /// let mut model = Model::new_empty();
    /// let new_gene = GeneBuilder::default().id("new_gene".to_string()).build().unwrap();
    /// model.add_gene(new_gene);
    /// ```
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// Remove genes which no reaction's rule references, returning their ids
    pub fn prune_unused_genes(&mut self) -> Vec<String> {
        let used: IndexSet<String> = self
            .reactions
            .values()
            .flat_map(|reaction| reaction.genes())
            .collect();
        let unused: Vec<String> = self
            .genes
            .keys()
            .filter(|gene| !used.contains(*gene))
            .cloned()
            .collect();
        for gene in &unused {
            self.genes.shift_remove(gene);
        }
        if !unused.is_empty() {
            info!("Pruned {} unused genes", unused.len());
        }
        unused
    }

    // endregion Additions and Removals

    // region Setters

    /// Replace the GPR rule of a reaction
    ///
    /// The new rule is parsed first and the reaction is left untouched if it is
    /// malformed. Genes the model does not know yet are added; genes no longer
    /// referenced are kept.
    pub fn set_gene_reaction_rule(&mut self, id: &str, rule: &str) -> Result<(), ModelError> {
        if !self.reactions.contains_key(id) {
            return Err(ModelError::ReactionNotFound(id.to_string()));
        }
        let gpr = parse_rule(id, rule)?;
        if let Some(ref gpr) = gpr {
            self.register_genes(gpr);
        }
        if let Some(reaction) = self.reactions.get_mut(id) {
            info!(
                "Reaction {} rule changed from `{}` to `{}`",
                id, reaction.gene_reaction_rule, rule
            );
            reaction.gene_reaction_rule = rule.to_string();
        }
        Ok(())
    }

    /// Set both flux bounds of a reaction
    ///
    /// Rejected when `lower > upper`, or when the reaction is pinned forward only
    /// and `lower` is negative.
    pub fn set_bounds(&mut self, id: &str, lower: f64, upper: f64) -> Result<(), ModelError> {
        let reaction = self
            .reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))?;
        check_bounds(id, lower, upper)?;
        if reaction.forward_only && lower < 0. {
            return Err(ModelError::IrreversibleReaction {
                reaction: id.to_string(),
                lower,
            });
        }
        reaction.lower_bound = lower;
        reaction.upper_bound = upper;
        info!("Reaction {} bounds set to ({}, {})", id, lower, upper);
        Ok(())
    }

    /// Set both flux bounds of a reaction, lifting a forward only pin if needed
    ///
    /// The bounds ordering is still enforced.
    pub fn set_bounds_overriding_irreversibility(
        &mut self,
        id: &str,
        lower: f64,
        upper: f64,
    ) -> Result<(), ModelError> {
        let reaction = self
            .reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))?;
        check_bounds(id, lower, upper)?;
        if reaction.forward_only && lower < 0. {
            warn!(
                "Reaction {} is forward only, overriding with bounds ({}, {})",
                id, lower, upper
            );
            reaction.forward_only = false;
        }
        reaction.lower_bound = lower;
        reaction.upper_bound = upper;
        info!("Reaction {} bounds set to ({}, {})", id, lower, upper);
        Ok(())
    }

    /// Pin a reaction as production only, its lower bound must already be non-negative
    pub fn mark_irreversible(&mut self, id: &str) -> Result<(), ModelError> {
        let reaction = self
            .reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))?;
        if reaction.lower_bound < 0. {
            return Err(ModelError::IrreversibleReaction {
                reaction: id.to_string(),
                lower: reaction.lower_bound,
            });
        }
        reaction.forward_only = true;
        Ok(())
    }

    // endregion Setters

    /// Check if a gene id exists as a key in genes, if it doesn't insert a new gene with that id
    fn register_genes(&mut self, gpr: &Gpr) {
        for gene_id in gpr.literals() {
            if !self.genes.contains_key(gene_id) {
                info!("Adding gene {} to the model", gene_id);
                self.genes.insert(gene_id.to_string(), Gene::new(gene_id));
            }
        }
    }
}

fn check_bounds(id: &str, lower: f64, upper: f64) -> Result<(), ModelError> {
    if lower > upper {
        return Err(ModelError::BoundsInvariant {
            reaction: id.to_string(),
            lower,
            upper,
        });
    }
    Ok(())
}

fn parse_rule(id: &str, rule: &str) -> Result<Option<Gpr>, ModelError> {
    parse_gpr(rule).map_err(|source| ModelError::MalformedRule {
        reaction: id.to_string(),
        source,
    })
}

/// Errors raised when a change to the model is refused
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Reaction {0} is not present in the model")]
    ReactionNotFound(String),
    #[error("Reaction {0} is already present in the model")]
    DuplicateReaction(String),
    #[error("Metabolite {0} is already present in the model")]
    DuplicateMetabolite(String),
    #[error("Reaction {reaction} uses metabolite {metabolite} which is not present in the model")]
    UnknownMetabolite { reaction: String, metabolite: String },
    #[error("Reaction {reaction} lower bound {lower} is greater than upper bound {upper}")]
    BoundsInvariant {
        reaction: String,
        lower: f64,
        upper: f64,
    },
    #[error("Reaction {reaction} is forward only, refusing lower bound {lower}")]
    IrreversibleReaction { reaction: String, lower: f64 },
    #[error("Reaction {reaction} has a malformed GPR rule")]
    MalformedRule {
        reaction: String,
        #[source]
        source: GprParseError,
    },
}

// region GPR Functionality

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GprError {
    #[error("Gene {0} in GPR is not present in the model")]
    GeneNotFound(String),
}

// Model associated functions for working with GPRs
impl Model {
    /// Evaluate whether a GPR evaluates to Active or Inactive using the model's gene activity
    pub fn eval_gpr(&self, gpr: &Gpr) -> Result<GeneActivity, GprError> {
        if let Some(missing) = gpr
            .literals()
            .into_iter()
            .find(|gene| !self.genes.contains_key(*gene))
        {
            return Err(GprError::GeneNotFound(missing.to_string()));
        }
        Ok(gpr.eval(&|gene: &str| {
            self.genes
                .get(gene)
                .map(|g| g.activity)
                .unwrap_or(GeneActivity::Inactive)
        }))
    }
}

// endregion GPR Functionality
