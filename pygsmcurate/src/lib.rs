use gsmcurate_core::curation::curate_file;
use gsmcurate_core::io::gpr_parse::parse_gpr;
use gsmcurate_core::io::reference::ReferenceGeneSet;
use gsmcurate_core::logging::{init_logging, parse_level};
use gsmcurate_core::metabolic_model::gene::Gpr;
use gsmcurate_core::reconcile::{self, GeneIdPattern, Substitution, Substitutions};
use indexmap::IndexSet;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

fn parse_rule(rule: &str) -> PyResult<Option<Gpr>> {
    parse_gpr(rule).map_err(|err| PyValueError::new_err(err.to_string()))
}

fn gene_id_pattern(pattern: Option<&str>) -> PyResult<GeneIdPattern> {
    let pattern = match pattern {
        Some(pattern) => GeneIdPattern::new(pattern),
        None => GeneIdPattern::from_configuration(),
    };
    pattern.map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Genes repeated under the same operator of a rule
#[pyfunction]
fn find_duplicates(rule: &str) -> PyResult<Vec<String>> {
    Ok(match parse_rule(rule)? {
        Some(gpr) => reconcile::find_duplicates(&gpr).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Genes of a rule missing from the reference genes
#[pyfunction]
fn find_unreferenced(rule: &str, reference: Vec<String>) -> PyResult<Vec<String>> {
    let reference: ReferenceGeneSet = reference.into_iter().collect();
    Ok(match parse_rule(rule)? {
        Some(gpr) => reconcile::find_unreferenced(&gpr, &reference)
            .into_iter()
            .collect(),
        None => Vec::new(),
    })
}

/// Gene ids not matching the pattern, as `(id, suggestions)` pairs
#[pyfunction]
#[pyo3(signature = (rule, valid_genes, pattern=None, max_distance=None))]
fn find_typos(
    rule: &str,
    valid_genes: Vec<String>,
    pattern: Option<&str>,
    max_distance: Option<usize>,
) -> PyResult<Vec<(String, Vec<String>)>> {
    let pattern = gene_id_pattern(pattern)?;
    let universe: IndexSet<String> = valid_genes.into_iter().collect();
    let Some(gpr) = parse_rule(rule)? else {
        return Ok(Vec::new());
    };
    let typos = match max_distance {
        Some(max) => reconcile::find_typos_within(&gpr, &pattern, &universe, max),
        None => reconcile::find_typos(&gpr, &pattern, &universe),
    };
    Ok(typos
        .into_iter()
        .map(|typo| (typo.identifier, typo.suggestions))
        .collect())
}

/// Rewrite a rule
///
/// `renames` maps old ids to new ones, `deduplicate` and `remove` list gene ids.
#[pyfunction]
#[pyo3(signature = (rule, renames=None, deduplicate=None, remove=None))]
fn rewrite_rule(
    rule: &str,
    renames: Option<Vec<(String, String)>>,
    deduplicate: Option<Vec<String>>,
    remove: Option<Vec<String>>,
) -> PyResult<String> {
    let mut substitutions = Substitutions::new();
    for (old, new) in renames.unwrap_or_default() {
        substitutions.insert(old, Substitution::Rename(new));
    }
    for gene in deduplicate.unwrap_or_default() {
        substitutions.insert(gene, Substitution::Deduplicate);
    }
    for gene in remove.unwrap_or_default() {
        substitutions.insert(gene, Substitution::Remove);
    }
    reconcile::rewrite_rule(rule, &substitutions).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Curate a model file, returning `(saved, report)`
#[pyfunction]
fn curate(input: &str, output: &str, plan: &str, reference: &str) -> PyResult<(bool, String)> {
    let report = curate_file(input, output, plan, reference)
        .map_err(|err| PyIOError::new_err(err.to_string()))?;
    Ok((report.output.is_some(), report.to_string()))
}

/// Send library log messages to stderr at `level`
#[pyfunction]
#[pyo3(signature = (level="info"))]
fn enable_logging(level: &str) -> PyResult<()> {
    let level = parse_level(level).map_err(|err| PyValueError::new_err(err.to_string()))?;
    init_logging(level).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(find_duplicates, m)?)?;
    m.add_function(wrap_pyfunction!(find_unreferenced, m)?)?;
    m.add_function(wrap_pyfunction!(find_typos, m)?)?;
    m.add_function(wrap_pyfunction!(rewrite_rule, m)?)?;
    m.add_function(wrap_pyfunction!(curate, m)?)?;
    m.add_function(wrap_pyfunction!(enable_logging, m)?)?;
    Ok(())
}
