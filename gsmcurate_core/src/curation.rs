//! Batch curation of a model
//!
//! A [`CurationPlan`] is an ordered list of [`Correction`]s, usually read from a JSON
//! file. [`Curator::run`] applies them in order on a single owned model, recording
//! every correction which is refused without stopping, and [`curate_file`] only
//! writes the result when no fatal problem is left.
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::configuration::{default_lower_bound, default_upper_bound};
use crate::io::json::JsonError;
use crate::io::reference::{ReferenceError, ReferenceGeneSet};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::{Model, ModelError, ModelSummary};
use crate::metabolic_model::reaction::ReactionBuilder;
use crate::reconcile::{
    rewrite_rule, scan, GeneIdPattern, ReconcileError, ReconciliationReport, Substitutions,
};

// region Plan

/// A single change to make to the model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "correction", rename_all = "snake_case")]
pub enum Correction {
    /// Apply a substitution map to a reaction's rule
    RewriteRule {
        reaction: String,
        substitutions: Substitutions,
    },
    /// Replace a reaction's rule text
    SetRule { reaction: String, rule: String },
    /// Set both flux bounds, `allow_reversal` lifts a forward only pin
    SetBounds {
        reaction: String,
        lower_bound: f64,
        upper_bound: f64,
        #[serde(default)]
        allow_reversal: bool,
    },
    MarkIrreversible { reaction: String },
    AddMetabolite(NewMetabolite),
    AddReaction(NewReaction),
    RemoveReaction { reaction: String },
    /// Drop genes which no rule references
    PruneUnusedGenes,
}

impl Display for Correction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Correction::RewriteRule {
                reaction,
                substitutions,
            } => write!(
                f,
                "rewrite rule of {} ({} substitution(s))",
                reaction,
                substitutions.len()
            ),
            Correction::SetRule { reaction, rule } => {
                write!(f, "set rule of {} to `{}`", reaction, rule)
            }
            Correction::SetBounds {
                reaction,
                lower_bound,
                upper_bound,
                allow_reversal,
            } => {
                write!(
                    f,
                    "set bounds of {} to ({}, {})",
                    reaction, lower_bound, upper_bound
                )?;
                if *allow_reversal {
                    write!(f, " allowing reversal")?;
                }
                Ok(())
            }
            Correction::MarkIrreversible { reaction } => {
                write!(f, "mark {} irreversible", reaction)
            }
            Correction::AddMetabolite(met) => write!(f, "add metabolite {}", met.id),
            Correction::AddReaction(rxn) => write!(f, "add reaction {}", rxn.id),
            Correction::RemoveReaction { reaction } => write!(f, "remove reaction {}", reaction),
            Correction::PruneUnusedGenes => write!(f, "prune unused genes"),
        }
    }
}

/// Metabolite to add, in the same layout as a model file entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMetabolite {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub compartment: Option<String>,
    #[serde(default)]
    pub charge: Option<i32>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub notes: Option<Value>,
    #[serde(default)]
    pub annotation: Option<Value>,
}

impl From<NewMetabolite> for Metabolite {
    fn from(m: NewMetabolite) -> Self {
        Metabolite {
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

/// Reaction to add, bounds default to the configured ones
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewReaction {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metabolites: IndexMap<String, f64>,
    #[serde(default)]
    pub gene_reaction_rule: String,
    #[serde(default)]
    pub lower_bound: Option<f64>,
    #[serde(default)]
    pub upper_bound: Option<f64>,
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(default)]
    pub forward_only: bool,
    #[serde(default)]
    pub notes: Option<Value>,
    #[serde(default)]
    pub annotation: Option<Value>,
}

/// Ordered list of corrections
///
/// The JSON form is a bare array of tagged objects:
/// ```json
/// [
///   {"correction": "rewrite_rule", "reaction": "ACRNt",
///    "substitutions": {"YALI0D09229g": {"action": "deduplicate"}}},
///   {"correction": "set_bounds", "reaction": "CRNt",
///    "lower_bound": -1000, "upper_bound": 1000, "allow_reversal": true}
/// ]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurationPlan {
    pub corrections: Vec<Correction>,
}

impl CurationPlan {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, CurationError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CurationError::UnableToReadPlan {
            path: path.to_path_buf(),
            source,
        })?;
        let plan = CurationPlan::from_json_str(&text)?;
        info!(
            "Read {} corrections from {}",
            plan.corrections.len(),
            path.display()
        );
        Ok(plan)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CurationError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}

impl FromIterator<Correction> for CurationPlan {
    fn from_iter<T: IntoIterator<Item = Correction>>(iter: T) -> Self {
        CurationPlan {
            corrections: iter.into_iter().collect(),
        }
    }
}

// endregion Plan

// region Report

/// A correction which was refused, the model is as it was before it
#[derive(Debug)]
pub struct FailedCorrection {
    /// Position in the plan, starting at 1
    pub step: usize,
    pub correction: Correction,
    pub error: CurationError,
}

/// Outcome of a curation run
#[derive(Debug)]
pub struct CurationReport {
    pub before: ModelSummary,
    pub after: ModelSummary,
    /// Findings on the model as loaded
    pub initial: ReconciliationReport,
    /// Findings on the model after every correction
    pub remaining: ReconciliationReport,
    /// Descriptions of the applied corrections, in order
    pub applied: Vec<String>,
    /// Corrections which were accepted but left the model as it was
    pub unchanged: Vec<String>,
    pub failed: Vec<FailedCorrection>,
    /// Where the curated model was written, if it was
    pub output: Option<PathBuf>,
}

impl CurationReport {
    /// Whether saving must be refused
    pub fn has_fatal_errors(&self) -> bool {
        !self.failed.is_empty() || self.remaining.has_errors()
    }

    pub fn fatal_error_count(&self) -> usize {
        self.failed.len() + self.remaining.errors().count()
    }
}

impl Display for CurationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Before: {}", self.before)?;
        writeln!(f, "After:  {}", self.after)?;
        writeln!(f, "Applied {} correction(s)", self.applied.len())?;
        for change in &self.applied {
            writeln!(f, "  - {}", change)?;
        }
        if !self.unchanged.is_empty() {
            writeln!(f, "Unchanged by {} correction(s)", self.unchanged.len())?;
            for change in &self.unchanged {
                writeln!(f, "  - {}", change)?;
            }
        }
        if !self.failed.is_empty() {
            writeln!(f, "Failed {} correction(s)", self.failed.len())?;
            for failure in &self.failed {
                writeln!(
                    f,
                    "  - step {} ({}): {}",
                    failure.step, failure.correction, failure.error
                )?;
            }
        }
        let errors: Vec<_> = self.remaining.errors().collect();
        if !errors.is_empty() {
            writeln!(f, "Errors")?;
            for finding in errors {
                writeln!(f, "  - {}", finding)?;
            }
        }
        let warnings: Vec<_> = self.remaining.warnings().collect();
        if !warnings.is_empty() {
            writeln!(f, "Warnings")?;
            for finding in warnings {
                writeln!(f, "  - {}", finding)?;
            }
        }
        match &self.output {
            Some(path) => write!(f, "Saved to {}", path.display()),
            None if self.has_fatal_errors() => write!(
                f,
                "Not saved, {} fatal problem(s) outstanding",
                self.fatal_error_count()
            ),
            None => write!(f, "Not saved"),
        }
    }
}

// endregion Report

// region Curator

/// Applies curation plans, checking gene ids against a canonical pattern
#[derive(Clone, Debug)]
pub struct Curator {
    pattern: GeneIdPattern,
}

impl Curator {
    pub fn new(pattern: GeneIdPattern) -> Self {
        Curator { pattern }
    }

    /// Curator using the gene id pattern in [`crate::configuration::CONFIGURATION`]
    pub fn from_configuration() -> Result<Self, CurationError> {
        Ok(Curator::new(GeneIdPattern::from_configuration()?))
    }

    /// Scan `model`, apply every correction of `plan` in order, then scan again
    pub fn run(
        &self,
        model: &mut Model,
        plan: &CurationPlan,
        reference: &ReferenceGeneSet,
    ) -> CurationReport {
        let before = model.summary();
        let initial = scan(model, reference, &self.pattern);
        info!(
            "Model {}: {}, {} finding(s) before curation",
            model.id.as_deref().unwrap_or("<unnamed>"),
            before,
            initial.findings.len()
        );

        let mut applied = Vec::new();
        let mut unchanged = Vec::new();
        let mut failed = Vec::new();
        for (index, correction) in plan.corrections.iter().enumerate() {
            let step = index + 1;
            match apply_correction(model, correction) {
                Ok(Outcome::Applied) => {
                    info!("Step {}: {}", step, correction);
                    applied.push(correction.to_string());
                }
                Ok(Outcome::Unchanged) => {
                    warn!("Step {} ({}) changed nothing", step, correction);
                    unchanged.push(correction.to_string());
                }
                Err(err) => {
                    error!("Step {} ({}) refused: {}", step, correction, err);
                    failed.push(FailedCorrection {
                        step,
                        correction: correction.clone(),
                        error: err,
                    });
                }
            }
        }

        let remaining = scan(model, reference, &self.pattern);
        let after = model.summary();
        info!("After curation: {}", after);
        CurationReport {
            before,
            after,
            initial,
            remaining,
            applied,
            unchanged,
            failed,
            output: None,
        }
    }
}

enum Outcome {
    Applied,
    Unchanged,
}

fn apply_correction(model: &mut Model, correction: &Correction) -> Result<Outcome, CurationError> {
    match correction {
        Correction::RewriteRule {
            reaction,
            substitutions,
        } => {
            let current = model
                .reaction(reaction)
                .ok_or_else(|| ModelError::ReactionNotFound(reaction.clone()))?
                .gene_reaction_rule()
                .to_string();
            let rewritten = rewrite_rule(&current, substitutions).map_err(|err| match err {
                ReconcileError::MalformedRule(source) => {
                    CurationError::from(ModelError::MalformedRule {
                        reaction: reaction.clone(),
                        source,
                    })
                }
                other => CurationError::from(other),
            })?;
            if rewritten == current {
                return Ok(Outcome::Unchanged);
            }
            model.set_gene_reaction_rule(reaction, &rewritten)?;
        }
        Correction::SetRule { reaction, rule } => {
            model.set_gene_reaction_rule(reaction, rule)?;
        }
        Correction::SetBounds {
            reaction,
            lower_bound,
            upper_bound,
            allow_reversal,
        } => {
            if *allow_reversal {
                model.set_bounds_overriding_irreversibility(reaction, *lower_bound, *upper_bound)?;
            } else {
                model.set_bounds(reaction, *lower_bound, *upper_bound)?;
            }
        }
        Correction::MarkIrreversible { reaction } => model.mark_irreversible(reaction)?,
        Correction::AddMetabolite(met) => model.add_metabolite(Metabolite::from(met.clone()))?,
        Correction::AddReaction(rxn) => {
            let mut builder = ReactionBuilder::default();
            builder
                .id(rxn.id.clone())
                .name(rxn.name.clone())
                .metabolites(rxn.metabolites.clone())
                .gene_reaction_rule(rxn.gene_reaction_rule.as_str())
                .lower_bound(rxn.lower_bound.unwrap_or_else(default_lower_bound))
                .upper_bound(rxn.upper_bound.unwrap_or_else(default_upper_bound))
                .subsystem(rxn.subsystem.clone())
                .forward_only(rxn.forward_only)
                .notes(rxn.notes.clone())
                .annotation(rxn.annotation.clone());
            let reaction = builder
                .build()
                .map_err(|err| CurationError::InvalidReaction {
                    reaction: rxn.id.clone(),
                    message: err.to_string(),
                })?;
            model.add_reaction(reaction)?;
        }
        Correction::RemoveReaction { reaction } => {
            model.remove_reaction(reaction)?;
        }
        Correction::PruneUnusedGenes => {
            if model.prune_unused_genes().is_empty() {
                return Ok(Outcome::Unchanged);
            }
        }
    }
    Ok(Outcome::Applied)
}

/// Load a model, apply the plan and write the curated model to `output`
///
/// The curated model is only written when no correction was refused and the final
/// scan has no errors, see [`CurationReport::output`]. `output` must not be the
/// input file.
pub fn curate_file<P, Q, R, S>(
    input: P,
    output: Q,
    plan: R,
    reference: S,
) -> Result<CurationReport, CurationError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
    S: AsRef<Path>,
{
    let (input, output) = (input.as_ref(), output.as_ref());
    if same_file(input, output) {
        return Err(CurationError::OutputIsInput(output.to_path_buf()));
    }
    let mut model = Model::read_json(input)?;
    let plan = CurationPlan::read(plan)?;
    let reference = ReferenceGeneSet::read(reference)?;

    let mut report = Curator::from_configuration()?.run(&mut model, &plan, &reference);
    if report.has_fatal_errors() {
        error!(
            "{} fatal problem(s) outstanding, not writing {}",
            report.fatal_error_count(),
            output.display()
        );
        return Ok(report);
    }
    model.write_json(output)?;
    info!("Wrote curated model to {}", output.display());
    report.output = Some(output.to_path_buf());
    Ok(report)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// endregion Curator

#[derive(Debug, Error)]
pub enum CurationError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Reaction {reaction} could not be built: {message}")]
    InvalidReaction { reaction: String, message: String },
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("Unable to read curation plan {path}: {source}")]
    UnableToReadPlan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to parse curation plan due to {0}")]
    InvalidPlan(#[from] serde_json::Error),
    #[error("Refusing to write the curated model over its input {0}")]
    OutputIsInput(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{Finding, Substitution};

    fn test_data() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data")
    }

    fn fixture_model() -> Model {
        Model::read_json(test_data().join("test_models").join("yali_mini.json")).unwrap()
    }

    fn reference() -> ReferenceGeneSet {
        ReferenceGeneSet::read(test_data().join("reference_genes.txt")).unwrap()
    }

    fn curator() -> Curator {
        Curator::new(GeneIdPattern::new(r"^YALI0[A-F]\d{5}g$").unwrap())
    }

    fn plan_path() -> PathBuf {
        test_data().join("plans").join("carnitine_shuttle.json")
    }

    #[test]
    fn parse_every_correction() {
        let plan = CurationPlan::from_json_str(
            r#"[
  {"correction": "rewrite_rule", "reaction": "ACRNt",
   "substitutions": {"YALI0D09229g": {"action": "deduplicate"}}},
  {"correction": "set_rule", "reaction": "BAD_RULE", "rule": "YALI0E12345g"},
  {"correction": "set_bounds", "reaction": "CRNt", "lower_bound": -1000, "upper_bound": 1000},
  {"correction": "mark_irreversible", "reaction": "PYK"},
  {"correction": "add_metabolite", "id": "ggdp_c", "compartment": "c"},
  {"correction": "add_reaction", "id": "PHYTS", "metabolites": {"ggdp_c": -2}},
  {"correction": "remove_reaction", "reaction": "BIOMASS"},
  {"correction": "prune_unused_genes"}
]"#,
        )
        .unwrap();
        assert_eq!(plan.len(), 8);
        match &plan.corrections[0] {
            Correction::RewriteRule { substitutions, .. } => assert_eq!(
                substitutions.get("YALI0D09229g"),
                Some(&Substitution::Deduplicate)
            ),
            other => panic!("Expected a rule rewrite, got {:?}", other),
        }
        assert!(matches!(
            plan.corrections[2],
            Correction::SetBounds {
                allow_reversal: false,
                ..
            }
        ));
        match &plan.corrections[5] {
            Correction::AddReaction(rxn) => {
                assert_eq!(rxn.id, "PHYTS");
                assert_eq!(rxn.lower_bound, None);
                assert_eq!(rxn.gene_reaction_rule, "");
            }
            other => panic!("Expected a new reaction, got {:?}", other),
        }
        assert_eq!(plan.corrections[7], Correction::PruneUnusedGenes);
    }

    #[test]
    fn unknown_correction_is_rejected() {
        assert!(matches!(
            CurationPlan::from_json_str(r#"[{"correction": "optimize"}]"#),
            Err(CurationError::InvalidPlan(_))
        ));
    }

    #[test]
    fn carnitine_shuttle_plan() {
        let mut model = fixture_model();
        let plan = CurationPlan::read(plan_path()).unwrap();
        let report = curator().run(&mut model, &plan, &reference());

        assert!(report.failed.is_empty(), "{}", report);
        assert_eq!(report.applied.len(), plan.len());
        assert!(report.initial.has_errors());
        assert!(!report.has_fatal_errors(), "{}", report);

        assert_eq!(
            model.reaction("ACRNt").unwrap().gene_reaction_rule(),
            "YALI0B02728g or YALI0D09229g"
        );
        assert_eq!(
            model.reaction("CAT_m").unwrap().gene_reaction_rule(),
            "YALI0F26587g"
        );
        // Untouched rules keep their exact text
        assert_eq!(
            model.reaction("CRNt").unwrap().gene_reaction_rule(),
            "YALI0B02728g or YALI0D09229g"
        );

        let crnt = model.reaction("CRNt").unwrap();
        assert_eq!(crnt.bounds(), (-1000., 1000.));
        assert!(!crnt.is_forward_only());

        // Two metabolites and one reaction added
        assert_eq!(report.after.metabolites, report.before.metabolites + 2);
        assert_eq!(report.after.reactions, report.before.reactions + 1);
        // Four genes registered by the new rules, the misspelled one pruned
        assert_eq!(report.after.genes, report.before.genes + 3);
        assert!(model.gene("YALI00F26587g").is_none());
        assert!(model.gene("YALI0F26587g").is_some());

        // Unreferenced genes are only reported
        let unreferenced: Vec<&str> = report
            .remaining
            .findings
            .iter()
            .filter_map(|finding| match finding {
                Finding::Unreferenced { gene, .. } => Some(gene.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(unreferenced, vec!["YALI0F09185g", "YALI0E23456g"]);
        assert!(model.gene("YALI0F09185g").is_some());
    }

    #[test]
    fn refused_corrections_are_collected() {
        let mut model = fixture_model();
        let plan: CurationPlan = vec![
            Correction::MarkIrreversible {
                reaction: "CRNt".to_string(),
            },
            Correction::SetBounds {
                reaction: "CRNt".to_string(),
                lower_bound: -1000.,
                upper_bound: 1000.,
                allow_reversal: false,
            },
            Correction::SetBounds {
                reaction: "PYK".to_string(),
                lower_bound: 10.,
                upper_bound: -10.,
                allow_reversal: true,
            },
            Correction::RemoveReaction {
                reaction: "NOT_THERE".to_string(),
            },
            Correction::SetRule {
                reaction: "BAD_RULE".to_string(),
                rule: "YALI0E12345g and YALI0E23456g".to_string(),
            },
        ]
        .into_iter()
        .collect();
        let report = curator().run(&mut model, &plan, &reference());

        let steps: Vec<usize> = report.failed.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![2, 3, 4]);
        assert!(matches!(
            report.failed[0].error,
            CurationError::Model(ModelError::IrreversibleReaction { .. })
        ));
        assert!(matches!(
            report.failed[1].error,
            CurationError::Model(ModelError::BoundsInvariant { .. })
        ));
        assert!(matches!(
            report.failed[2].error,
            CurationError::Model(ModelError::ReactionNotFound(_))
        ));
        assert_eq!(report.applied.len(), 2);
        assert!(report.has_fatal_errors());
        assert_eq!(report.fatal_error_count(), 3);

        // Refused changes left the model as it was
        assert_eq!(model.reaction("CRNt").unwrap().bounds(), (0., 1000.));
        assert_eq!(model.reaction("PYK").unwrap().bounds(), (0., 1000.));
        assert_eq!(report.after.reactions, report.before.reactions);
        // The fixed rule is well formed, so nothing else is fatal
        assert!(!report.remaining.has_errors());
    }

    #[test]
    fn rewrite_of_malformed_rule_is_refused() {
        let mut model = fixture_model();
        let mut substitutions = Substitutions::new();
        substitutions.insert("YALI0E12345g".to_string(), Substitution::Remove);
        let plan: CurationPlan = vec![Correction::RewriteRule {
            reaction: "BAD_RULE".to_string(),
            substitutions,
        }]
        .into_iter()
        .collect();
        let report = curator().run(&mut model, &plan, &reference());
        assert!(matches!(
            &report.failed[0].error,
            CurationError::Model(ModelError::MalformedRule { reaction, .. }) if reaction == "BAD_RULE"
        ));
    }

    #[test]
    fn rename_to_an_expression_is_refused() {
        let mut model = fixture_model();
        let mut substitutions = Substitutions::new();
        substitutions.insert(
            "YALI00F26587g".to_string(),
            Substitution::Rename("YALI0F26587g or YALI0B02728g".to_string()),
        );
        let plan: CurationPlan = vec![Correction::RewriteRule {
            reaction: "CAT_m".to_string(),
            substitutions,
        }]
        .into_iter()
        .collect();
        let report = curator().run(&mut model, &plan, &reference());
        assert!(matches!(
            &report.failed[0].error,
            CurationError::Reconcile(ReconcileError::InvalidRename { gene, .. }) if gene == "YALI00F26587g"
        ));
        assert!(report.applied.is_empty());
        assert_eq!(
            model.reaction("CAT_m").unwrap().gene_reaction_rule(),
            "YALI00F26587g"
        );
    }

    #[test]
    fn corrections_changing_nothing_are_not_applied() {
        let mut model = fixture_model();
        let mut substitutions = Substitutions::new();
        substitutions.insert("YALI0D09229g".to_string(), Substitution::Deduplicate);
        let plan: CurationPlan = vec![
            Correction::RewriteRule {
                reaction: "CRNt".to_string(),
                substitutions,
            },
            Correction::PruneUnusedGenes,
        ]
        .into_iter()
        .collect();
        let report = curator().run(&mut model, &plan, &reference());
        assert!(report.applied.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(report.unchanged.len(), 2);
        assert_eq!(
            model.reaction("CRNt").unwrap().gene_reaction_rule(),
            "YALI0B02728g or YALI0D09229g"
        );
        assert!(report.to_string().contains("Unchanged by 2 correction(s)"));
    }

    #[test]
    fn invalid_new_reaction_is_refused() {
        let mut model = fixture_model();
        let plan: CurationPlan = vec![Correction::AddReaction(NewReaction {
            id: "PHYTS".to_string(),
            name: None,
            metabolites: IndexMap::new(),
            gene_reaction_rule: String::new(),
            lower_bound: None,
            upper_bound: None,
            subsystem: None,
            forward_only: true,
            notes: None,
            annotation: None,
        })]
        .into_iter()
        .collect();
        let report = curator().run(&mut model, &plan, &reference());
        assert!(matches!(
            report.failed[0].error,
            CurationError::InvalidReaction { .. }
        ));
        assert!(model.reaction("PHYTS").is_none());
    }

    #[test]
    fn curate_file_saves_curated_model() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("curated.json");
        let report = curate_file(
            test_data().join("test_models").join("yali_mini.json"),
            &output,
            plan_path(),
            test_data().join("reference_genes.txt"),
        )
        .unwrap();
        assert_eq!(report.output.as_deref(), Some(output.as_path()));

        let reloaded = Model::read_json(&output).unwrap();
        assert_eq!(reloaded.summary(), report.after);
        assert_eq!(
            reloaded.reaction("ACRNt").unwrap().gene_reaction_rule(),
            "YALI0B02728g or YALI0D09229g"
        );
        assert_eq!(reloaded.reaction("CRNt").unwrap().bounds(), (-1000., 1000.));
        assert!(report.to_string().contains("Saved to"));
    }

    #[test]
    fn curate_file_does_not_save_with_errors_outstanding() {
        let dir = tempfile::tempdir().unwrap();
        let plan = dir.path().join("empty_plan.json");
        fs::write(&plan, "[]").unwrap();
        let output = dir.path().join("curated.json");
        let report = curate_file(
            test_data().join("test_models").join("yali_mini.json"),
            &output,
            &plan,
            test_data().join("reference_genes.txt"),
        )
        .unwrap();
        // BAD_RULE is still malformed
        assert!(report.has_fatal_errors());
        assert!(report.output.is_none());
        assert!(!output.exists());
        assert!(report.to_string().contains("Not saved"));
    }

    #[test]
    fn curate_file_refuses_to_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("model.json");
        fs::copy(test_data().join("test_models").join("yali_mini.json"), &input).unwrap();
        let result = curate_file(
            &input,
            dir.path().join(".").join("model.json"),
            plan_path(),
            test_data().join("reference_genes.txt"),
        );
        assert!(matches!(result, Err(CurationError::OutputIsInput(_))));
    }
}
