//! Reading the transcriptomic reference gene set
//!
//! The file is plain text with one gene id per line, or delimited rows (comma, tab
//! or semicolon) whose first column is the gene id. Blank lines and lines starting
//! with `#` are skipped, as is a header naming the id column.
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use log::info;
use thiserror::Error;

const HEADER_NAMES: [&str; 4] = ["gene", "gene_id", "id", "locus_tag"];

/// Set of gene ids found in an external dataset, only ever used for membership tests
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceGeneSet {
    genes: IndexSet<String>,
}

impl ReferenceGeneSet {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ReferenceError::UnableToRead {
            path: path.to_path_buf(),
            source,
        })?;
        let reference = ReferenceGeneSet::from_text(&text);
        if reference.is_empty() {
            return Err(ReferenceError::Empty(path.to_path_buf()));
        }
        info!(
            "Read {} reference genes from {}",
            reference.len(),
            path.display()
        );
        Ok(reference)
    }

    pub fn from_text(text: &str) -> Self {
        let mut header_checked = false;
        let mut genes = IndexSet::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let first = line
                .split([',', '\t', ';'])
                .next()
                .unwrap_or_default()
                .trim()
                .trim_matches('"');
            if !header_checked {
                header_checked = true;
                if HEADER_NAMES.contains(&first.to_lowercase().as_str()) {
                    continue;
                }
            }
            if !first.is_empty() {
                genes.insert(first.to_string());
            }
        }
        ReferenceGeneSet { genes }
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceGeneSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        ReferenceGeneSet {
            genes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Unable to read reference genes from {path}: {source}")]
    UnableToRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No gene ids found in {0}")]
    Empty(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_data(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join(name)
    }

    #[test]
    fn plain_list_with_header_and_comments() {
        let reference = ReferenceGeneSet::read(test_data("reference_genes.txt")).unwrap();
        assert_eq!(reference.len(), 5);
        assert!(reference.contains("YALI0B02728g"));
        assert!(!reference.contains("gene_id"));
        assert!(!reference.contains("YALI0F09185g"));
    }

    #[test]
    fn delimited_rows_use_first_column() {
        let reference = ReferenceGeneSet::read(test_data("reference_genes.csv")).unwrap();
        let genes: Vec<&str> = reference.iter().collect();
        assert_eq!(genes, vec!["YALI0B02728g", "YALI0D09229g", "YALI0F26587g"]);
    }

    #[test]
    fn first_row_kept_without_header() {
        let reference = ReferenceGeneSet::from_text("YALI0B02728g\tup\nYALI0D09229g\tdown\n");
        assert_eq!(reference.len(), 2);
        assert!(reference.contains("YALI0B02728g"));
    }

    #[test]
    fn exact_string_membership() {
        let reference: ReferenceGeneSet = ["YALI0B02728g"].into_iter().collect();
        assert!(reference.contains("YALI0B02728g"));
        assert!(!reference.contains("yali0b02728g"));
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "# nothing here\n\n").unwrap();
        assert!(matches!(
            ReferenceGeneSet::read(&path),
            Err(ReferenceError::Empty(_))
        ));
    }
}
