//! Module providing JSON IO for gsmcurate Models
//!
//! The format is the COBRA JSON layout: top level `metabolites`, `reactions` and
//! `genes` arrays plus optional `id`, `compartments` and `version`.
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{info, warn};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::io::gpr_parse::parse_gpr;
use crate::metabolic_model::gene::{Gene, GeneActivity};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    genes: Vec<JsonGene>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compartments: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compartment: Option<String>,
    #[serde(
        default,
        deserialize_with = "integral_charge",
        skip_serializing_if = "Option::is_none"
    )]
    charge: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    #[serde(default)]
    gene_reaction_rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    objective_coefficient: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subsystem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotation: Option<Value>,
}
/// Charges are integers, but some exporters write them as floats such as `-1.0`
fn integral_charge<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let charge: Option<f64> = Option::deserialize(deserializer)?;
    charge
        .map(|c| {
            if c.fract() == 0. && c >= i32::MIN as f64 && c <= i32::MAX as f64 {
                Ok(c as i32)
            } else {
                Err(D::Error::custom(format!("charge {} is not an integer", c)))
            }
        })
        .transpose()
}
// endregion JSON Model

// region Conversions
impl From<JsonGene> for Gene {
    fn from(g: JsonGene) -> Self {
        Self {
            id: g.id,
            name: g.name,
            activity: GeneActivity::Active, // All genes start as active
            notes: g.notes,
            annotation: g.annotation,
        }
    }
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge,
            formula: m.formula,
            notes: m.notes,
            annotation: m.annotation,
        }
    }
}

impl From<&Gene> for JsonGene {
    fn from(g: &Gene) -> Self {
        Self {
            id: g.id.clone(),
            name: g.name.clone(),
            notes: g.notes.clone(),
            annotation: g.annotation.clone(),
        }
    }
}

impl From<&Metabolite> for JsonMetabolite {
    fn from(m: &Metabolite) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            compartment: m.compartment.clone(),
            charge: m.charge,
            formula: m.formula.clone(),
            notes: m.notes.clone(),
            annotation: m.annotation.clone(),
        }
    }
}

impl Model {
    /// Read a COBRA JSON model file
    ///
    /// A malformed GPR rule does not fail the read, the text is kept so that
    /// [`crate::reconcile::scan`] can report it against its reaction.
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let path = path.as_ref();
        let model_str = fs::read_to_string(path).map_err(|source| JsonError::UnableToRead {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Model::from_json_str(&model_str)?;
        info!("Read model from {}: {}", path.display(), model.summary());
        Ok(model)
    }

    /// Write the model as COBRA JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let path = path.as_ref();
        let model_string = self.to_json_string()?;
        fs::write(path, model_string).map_err(|source| JsonError::UnableToWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote model to {}: {}", path.display(), self.summary());
        Ok(())
    }

    pub fn from_json_str(model_str: &str) -> Result<Model, JsonError> {
        let json_model = serde_json::from_str::<JsonModel>(model_str)?;
        Ok(Model::from_json(json_model))
    }

    pub fn to_json_string(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string(&self.to_json())?)
    }

    fn from_json(json_model: JsonModel) -> Self {
        let mut model = Model::new_empty();
        model.id = json_model.id;
        model.compartments = json_model.compartments;
        model.version = json_model.version;
        // Start by converting the genes and metabolites using the From methods
        for g in json_model.genes {
            let id = g.id.clone();
            if model.genes.insert(id.clone(), Gene::from(g)).is_some() {
                warn!("Gene {} appears more than once, keeping the last", id);
            }
        }
        for m in json_model.metabolites {
            let id = m.id.clone();
            if model.metabolites.insert(id.clone(), Metabolite::from(m)).is_some() {
                warn!("Metabolite {} appears more than once, keeping the last", id);
            }
        }
        /* Now, iterate through the reactions, checking the GPRs, and adding to
        the objective along the way. Problems are logged here and reported in
        full by a reconciliation scan.
        */
        for rxn in json_model.reactions {
            match parse_gpr(&rxn.gene_reaction_rule) {
                Ok(Some(gpr)) => {
                    for gene in gpr.literals() {
                        if !model.genes.contains_key(gene) {
                            warn!(
                                "Gene {} in reaction {} is missing from the gene list, adding it",
                                gene, rxn.id
                            );
                            model.genes.insert(gene.to_string(), Gene::new(gene));
                        }
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("Reaction {}: {}", rxn.id, err),
            }
            if rxn.lower_bound > rxn.upper_bound {
                warn!(
                    "Reaction {} has lower bound {} above upper bound {}",
                    rxn.id, rxn.lower_bound, rxn.upper_bound
                );
            }
            // Add the reaction to the objective function if desired
            if let Some(coef) = rxn.objective_coefficient {
                if coef != 0. {
                    model.objective.insert(rxn.id.clone(), coef);
                }
            }
            let reaction = Reaction {
                id: rxn.id.clone(),
                metabolites: rxn.metabolites,
                name: rxn.name,
                gene_reaction_rule: rxn.gene_reaction_rule,
                lower_bound: rxn.lower_bound,
                upper_bound: rxn.upper_bound,
                subsystem: rxn.subsystem,
                notes: rxn.notes,
                annotation: rxn.annotation,
                forward_only: false,
            };
            if model.reactions.insert(rxn.id.clone(), reaction).is_some() {
                warn!("Reaction {} appears more than once, keeping the last", rxn.id);
            }
        }
        model
    }

    fn to_json(&self) -> JsonModel {
        let json_genes: Vec<JsonGene> = self.genes.values().map(JsonGene::from).collect();
        let json_metabolites: Vec<JsonMetabolite> =
            self.metabolites.values().map(JsonMetabolite::from).collect();
        let json_reactions: Vec<JsonReaction> = self
            .reactions
            .values()
            .map(|r| JsonReaction {
                id: r.id.clone(),
                name: r.name.clone(),
                metabolites: r.metabolites.clone(),
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_reaction_rule: r.gene_reaction_rule.clone(),
                objective_coefficient: self.objective.get(&r.id).copied(),
                subsystem: r.subsystem.clone(),
                notes: r.notes.clone(),
                annotation: r.annotation.clone(),
            })
            .collect();

        JsonModel {
            metabolites: json_metabolites,
            reactions: json_reactions,
            genes: json_genes,
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read {path}: {source}")]
    UnableToRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to parse json due to {0}")]
    UnableToParse(#[from] serde_json::Error),
    #[error("Unable to write {path}: {source}")]
    UnableToWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

// endregion Conversions
