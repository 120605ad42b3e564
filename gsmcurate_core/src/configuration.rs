use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Canonical Yarrowia lipolytica CLIB122 locus tag, e.g. `YALI0F26587g`
pub const YALI_GENE_ID_PATTERN: &str = r"^YALI0[A-F]\d{5}g$";

pub struct Configuration {
    /// Lower bound given to reactions built without one
    pub lower_bound: f64,
    /// Upper bound given to reactions built without one
    pub upper_bound: f64,
    /// Regular expression every well formed gene id must match
    pub gene_id_pattern: String,
    /// Largest edit distance at which a valid id is suggested as a typo correction
    pub max_typo_distance: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            gene_id_pattern: YALI_GENE_ID_PATTERN.to_string(),
            max_typo_distance: 1,
        }
    }
}

pub(crate) fn default_lower_bound() -> f64 {
    CONFIGURATION
        .read()
        .map(|c| c.lower_bound)
        .unwrap_or(-1000.)
}

pub(crate) fn default_upper_bound() -> f64 {
    CONFIGURATION
        .read()
        .map(|c| c.upper_bound)
        .unwrap_or(1000.)
}

pub(crate) fn default_gene_id_pattern() -> String {
    CONFIGURATION
        .read()
        .map(|c| c.gene_id_pattern.clone())
        .unwrap_or_else(|_| YALI_GENE_ID_PATTERN.to_string())
}

pub(crate) fn default_max_typo_distance() -> usize {
    CONFIGURATION
        .read()
        .map(|c| c.max_typo_distance)
        .unwrap_or(1)
}
