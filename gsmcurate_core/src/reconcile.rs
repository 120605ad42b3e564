//! Reconciliation of GPR rules against a canonical gene id pattern and a reference gene set
//!
//! Detection ([`find_duplicates`], [`find_unreferenced`], [`find_typos`] and the whole
//! model [`scan`]) never changes anything. Rules only change through [`rewrite`] with an
//! explicit substitution map, and on a model only through the curation procedure.
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use indexmap::{IndexMap, IndexSet};
use log::{error, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::configuration::{default_gene_id_pattern, default_max_typo_distance};
use crate::io::gpr_parse::{is_gene_id, parse_gpr, GprParseError};
use crate::io::reference::ReferenceGeneSet;
use crate::metabolic_model::gene::{Gpr, GprOperation};
use crate::metabolic_model::model::Model;
use crate::utils::distance::levenshtein_with_max;

/// Canonical gene id convention, e.g. `^YALI0[A-F]\d{5}g$`
#[derive(Clone, Debug)]
pub struct GeneIdPattern {
    regex: Regex,
}

impl GeneIdPattern {
    pub fn new(pattern: &str) -> Result<Self, ReconcileError> {
        let regex = Regex::new(pattern).map_err(|source| ReconcileError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(GeneIdPattern { regex })
    }

    /// The pattern set in [`crate::configuration::CONFIGURATION`]
    pub fn from_configuration() -> Result<Self, ReconcileError> {
        GeneIdPattern::new(&default_gene_id_pattern())
    }

    pub fn is_match(&self, gene: &str) -> bool {
        self.regex.is_match(gene)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Invalid gene id pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("Can't rename {gene} to `{target}`, the new name must be a single gene id")]
    InvalidRename { gene: String, target: String },
    #[error(transparent)]
    MalformedRule(#[from] GprParseError),
}

// region Detection

/// Gene ids appearing more than once as direct operands of the same operation
///
/// `a or (b and b)` gives `{b}`, while `a or (a and b)` gives nothing since the two
/// `a` literals sit at different nesting levels.
pub fn find_duplicates(gpr: &Gpr) -> IndexSet<String> {
    let mut duplicates = IndexSet::new();
    collect_duplicates(gpr, &mut duplicates);
    duplicates
}

fn collect_duplicates(gpr: &Gpr, duplicates: &mut IndexSet<String>) {
    if let Gpr::Operation(op) = gpr {
        let mut seen = HashSet::new();
        for operand in &op.operands {
            match operand {
                Gpr::GeneNode(gene) => {
                    if !seen.insert(gene.as_str()) {
                        duplicates.insert(gene.clone());
                    }
                }
                Gpr::Operation(_) => collect_duplicates(operand, duplicates),
            }
        }
    }
}

/// Gene ids in the rule which are not in `reference`
pub fn find_unreferenced(gpr: &Gpr, reference: &ReferenceGeneSet) -> IndexSet<String> {
    gpr.gene_ids()
        .into_iter()
        .filter(|gene| !reference.contains(gene))
        .collect()
}

/// A gene id failing the canonical pattern, with valid ids close enough to be
/// what was meant
#[derive(Clone, Debug, PartialEq)]
pub struct TypoCandidate {
    pub identifier: String,
    /// Closest first
    pub suggestions: Vec<String>,
}

impl TypoCandidate {
    /// The correction when exactly one valid id is close enough
    pub fn unambiguous_correction(&self) -> Option<&str> {
        match self.suggestions.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Gene ids in the rule not matching `pattern`, each with the members of `universe`
/// within the configured edit distance
pub fn find_typos(
    gpr: &Gpr,
    pattern: &GeneIdPattern,
    universe: &IndexSet<String>,
) -> Vec<TypoCandidate> {
    find_typos_within(gpr, pattern, universe, default_max_typo_distance())
}

/// [`find_typos`] with an explicit maximum edit distance
pub fn find_typos_within(
    gpr: &Gpr,
    pattern: &GeneIdPattern,
    universe: &IndexSet<String>,
    max_distance: usize,
) -> Vec<TypoCandidate> {
    gpr.gene_ids()
        .into_iter()
        .filter(|gene| !pattern.is_match(gene))
        .map(|identifier| {
            let mut scored: Vec<(usize, &String)> = universe
                .iter()
                .filter(|candidate| pattern.is_match(candidate))
                .map(|candidate| {
                    (
                        levenshtein_with_max(&identifier, candidate, max_distance),
                        candidate,
                    )
                })
                .filter(|(distance, _)| *distance <= max_distance)
                .collect();
            scored.sort();
            TypoCandidate {
                suggestions: scored.into_iter().map(|(_, c)| c.clone()).collect(),
                identifier,
            }
        })
        .collect()
}

// endregion Detection

// region Rewriting

/// What to do with one gene id in [`rewrite`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "to", rename_all = "snake_case")]
pub enum Substitution {
    /// Replace the id text, the new text must itself be a single gene id
    Rename(String),
    /// Keep one occurrence among the operands of each operation, dropping the repeats
    Deduplicate,
    /// Delete every occurrence, changing what the rule means
    Remove,
}

/// Map of gene id to the substitution applied to it
pub type Substitutions = IndexMap<String, Substitution>;

/// Apply `substitutions` to a rule
///
/// An operation left with one operand collapses into it. Returns `None` when
/// every gene was removed.
pub fn rewrite(gpr: &Gpr, substitutions: &Substitutions) -> Option<Gpr> {
    match gpr {
        Gpr::GeneNode(gene) => match substitutions.get(gene) {
            Some(Substitution::Rename(new)) => Some(Gpr::new_gene_node(new)),
            Some(Substitution::Remove) => None,
            Some(Substitution::Deduplicate) | None => Some(gpr.clone()),
        },
        Gpr::Operation(op) => {
            let mut seen = HashSet::new();
            let mut operands = Vec::with_capacity(op.operands.len());
            for operand in &op.operands {
                if let Gpr::GeneNode(gene) = operand {
                    if substitutions.get(gene) == Some(&Substitution::Deduplicate)
                        && !seen.insert(gene.as_str())
                    {
                        continue;
                    }
                }
                if let Some(rewritten) = rewrite(operand, substitutions) {
                    operands.push(rewritten);
                }
            }
            if operands.len() > 1 {
                return Some(Gpr::Operation(GprOperation {
                    operator: op.operator,
                    operands,
                    parenthesized: op.parenthesized,
                }));
            }
            operands.pop()
        }
    }
}

/// Check that every rename target is a single gene id
///
/// A target such as `c or d` would turn one literal into new operators once the
/// rule is read back.
pub fn validate_substitutions(substitutions: &Substitutions) -> Result<(), ReconcileError> {
    for (gene, substitution) in substitutions {
        if let Substitution::Rename(target) = substitution {
            if !is_gene_id(target) {
                return Err(ReconcileError::InvalidRename {
                    gene: gene.clone(),
                    target: target.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Apply `substitutions` to rule text
///
/// Substitutions are checked with [`validate_substitutions`] first. When nothing in the rule is affected the text comes back byte for byte, otherwise
/// the rewritten rule is serialized with [`Gpr::to_string_id`]. A rule with every
/// gene removed becomes the empty rule.
///
/// # Examples
/// ```rust
/// use gsmcurate_core::reconcile::{rewrite_rule, Substitution, Substitutions};
/// let mut substitutions = Substitutions::new();
/// substitutions.insert("YALI0D09229g".to_string(), Substitution::Deduplicate);
/// let rule = rewrite_rule("YALI0B02728g or (YALI0D09229g and YALI0D09229g)", &substitutions).unwrap();
/// assert_eq!(rule, "YALI0B02728g or YALI0D09229g");
/// ```
pub fn rewrite_rule(rule: &str, substitutions: &Substitutions) -> Result<String, ReconcileError> {
    validate_substitutions(substitutions)?;
    let Some(gpr) = parse_gpr(rule)? else {
        return Ok(rule.to_string());
    };
    Ok(match rewrite(&gpr, substitutions) {
        Some(rewritten) if rewritten == gpr => rule.to_string(),
        Some(rewritten) => rewritten.to_string_id(),
        None => String::new(),
    })
}

// endregion Rewriting

// region Model Scan

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Needs a curator's judgement, never blocks saving
    Warning,
    /// Blocks saving until resolved
    Error,
}

/// Something a scan found on one reaction
#[derive(Clone, Debug, PartialEq)]
pub enum Finding {
    /// The same gene repeated under one operation, removable without changing the rule
    DuplicateLiteral { reaction: String, genes: Vec<String> },
    /// A gene id failing the canonical pattern
    UnknownIdentifier {
        reaction: String,
        candidate: TypoCandidate,
    },
    /// A gene missing from the reference set
    Unreferenced { reaction: String, gene: String },
    /// The rule text could not be parsed
    MalformedRule {
        reaction: String,
        rule: String,
        error: GprParseError,
    },
    /// Lower bound above upper bound
    InvertedBounds {
        reaction: String,
        lower: f64,
        upper: f64,
    },
}

impl Finding {
    pub fn reaction(&self) -> &str {
        match self {
            Finding::DuplicateLiteral { reaction, .. }
            | Finding::UnknownIdentifier { reaction, .. }
            | Finding::Unreferenced { reaction, .. }
            | Finding::MalformedRule { reaction, .. }
            | Finding::InvertedBounds { reaction, .. } => reaction,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Finding::MalformedRule { .. } | Finding::InvertedBounds { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::DuplicateLiteral { reaction, genes } => write!(
                f,
                "{}: duplicated gene(s) {}",
                reaction,
                genes.join(", ")
            ),
            Finding::UnknownIdentifier {
                reaction,
                candidate,
            } => {
                if candidate.suggestions.is_empty() {
                    write!(
                        f,
                        "{}: gene id {} does not match the canonical pattern",
                        reaction, candidate.identifier
                    )
                } else {
                    write!(
                        f,
                        "{}: gene id {} does not match the canonical pattern, did you mean {}?",
                        reaction,
                        candidate.identifier,
                        candidate.suggestions.join(" or ")
                    )
                }
            }
            Finding::Unreferenced { reaction, gene } => {
                write!(f, "{}: gene {} is not in the reference set", reaction, gene)
            }
            Finding::MalformedRule {
                reaction,
                rule,
                error,
            } => write!(f, "{}: `{}`: {}", reaction, rule, error),
            Finding::InvertedBounds {
                reaction,
                lower,
                upper,
            } => write!(
                f,
                "{}: lower bound {} is greater than upper bound {}",
                reaction, lower, upper
            ),
        }
    }
}

/// All findings of a scan, in reaction order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconciliationReport {
    pub findings: Vec<Finding>,
}

impl ReconciliationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn for_reaction<'a>(&'a self, reaction: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings
            .iter()
            .filter(move |f| f.reaction() == reaction)
    }

    /// Substitution maps which would drop every duplicated literal found
    ///
    /// Nothing is applied, the maps are meant to be handed to the curation procedure.
    pub fn duplicate_corrections(&self) -> IndexMap<String, Substitutions> {
        self.findings
            .iter()
            .filter_map(|finding| match finding {
                Finding::DuplicateLiteral { reaction, genes } => Some((
                    reaction.clone(),
                    genes
                        .iter()
                        .map(|gene| (gene.clone(), Substitution::Deduplicate))
                        .collect(),
                )),
                _ => None,
            })
            .collect()
    }
}

/// Run every detector over every reaction of `model`
///
/// A malformed rule is recorded against its reaction and the scan carries on.
/// Typo suggestions are drawn from the model's and the reference set's genes which
/// match `pattern`.
pub fn scan(
    model: &Model,
    reference: &ReferenceGeneSet,
    pattern: &GeneIdPattern,
) -> ReconciliationReport {
    let universe: IndexSet<String> = model
        .genes()
        .keys()
        .map(String::as_str)
        .chain(reference.iter())
        .filter(|gene| pattern.is_match(gene))
        .map(str::to_string)
        .collect();

    let mut findings = Vec::new();
    for (id, reaction) in model.reactions() {
        let (lower, upper) = reaction.bounds();
        if lower > upper {
            findings.push(Finding::InvertedBounds {
                reaction: id.clone(),
                lower,
                upper,
            });
        }
        let gpr = match reaction.gpr() {
            Ok(Some(gpr)) => gpr,
            Ok(None) => continue,
            Err(error) => {
                findings.push(Finding::MalformedRule {
                    reaction: id.clone(),
                    rule: reaction.gene_reaction_rule().to_string(),
                    error,
                });
                continue;
            }
        };
        let duplicates = find_duplicates(&gpr);
        if !duplicates.is_empty() {
            findings.push(Finding::DuplicateLiteral {
                reaction: id.clone(),
                genes: duplicates.into_iter().collect(),
            });
        }
        for candidate in find_typos(&gpr, pattern, &universe) {
            findings.push(Finding::UnknownIdentifier {
                reaction: id.clone(),
                candidate,
            });
        }
        for gene in find_unreferenced(&gpr, reference) {
            findings.push(Finding::Unreferenced {
                reaction: id.clone(),
                gene,
            });
        }
    }

    for finding in &findings {
        match finding.severity() {
            Severity::Error => error!("{}", finding),
            Severity::Warning => warn!("{}", finding),
        }
    }
    ReconciliationReport { findings }
}

// endregion Model Scan
