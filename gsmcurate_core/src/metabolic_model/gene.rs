//! This module provides the Gene struct, representing a gene, and the GPR struct, representing a
//! gene protein reaction rule
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use indexmap::IndexSet;
use serde_json::Value;

/// Structure Representing a Gene
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Gene {
    /// Used to identify the gene
    pub id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Whether this gene is currently active (see [`GeneActivity`])
    #[builder(default = "GeneActivity::Active")]
    pub activity: GeneActivity,
    /// Notes about the gene
    #[builder(default = "None")]
    pub notes: Option<Value>,
    /// Gene Annotations
    #[builder(default = "None")]
    pub annotation: Option<Value>,
}

impl Gene {
    /// Create an active gene with only an id
    pub fn new(id: &str) -> Gene {
        Gene {
            id: id.to_string(),
            name: None,
            activity: GeneActivity::Active,
            notes: None,
            annotation: None,
        }
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Whether a gene is active or not
#[derive(Clone, Debug, Hash, Eq, PartialEq, Copy)]
pub enum GeneActivity {
    /// Gene is considered active
    Active,
    /// Gene is considered inactive
    Inactive,
}

impl From<bool> for GeneActivity {
    fn from(present: bool) -> Self {
        if present {
            GeneActivity::Active
        } else {
            GeneActivity::Inactive
        }
    }
}

// region GPR Functionality
/// Representation of a Gene Protein Reaction Rule as an AST
///
/// Chains of the same operator at one nesting level are held as a single n-ary
/// [`GprOperation`], so `a or b or c` is one `Or` node with three operands.
#[derive(Clone, Debug, PartialEq)]
pub enum Gpr {
    /// Operation on two or more sub-rules (see [`GprOperation`])
    Operation(GprOperation),
    /// A terminal gene node, holding the gene id
    GeneNode(String),
}

/// An n-ary `and`/`or` over its operands
#[derive(Clone, Debug, PartialEq)]
pub struct GprOperation {
    pub operator: GprOperatorType,
    pub operands: Vec<Gpr>,
    /// The operation was wrapped in parentheses in the source rule
    pub parenthesized: bool,
}

/// Types of Allowed GPR Operations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GprOperatorType {
    /// Or, results in active if any operand is active
    Or,
    /// And, results in active if every operand is active
    And,
}

impl GprOperatorType {
    pub fn keyword(&self) -> &'static str {
        match self {
            GprOperatorType::Or => "or",
            GprOperatorType::And => "and",
        }
    }
}

impl Display for Gpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_id())
    }
}

impl Gpr {
    /// Create a new gene node
    pub fn new_gene_node(gene: &str) -> Gpr {
        Gpr::GeneNode(gene.to_string())
    }

    /// Join `left` and `right` with `operator`, extending `left` when it is an
    /// unparenthesized chain of the same operator
    pub fn new_binary_operation(left: Gpr, operator: GprOperatorType, right: Gpr) -> Gpr {
        match left {
            Gpr::Operation(mut op) if op.operator == operator && !op.parenthesized => {
                op.operands.push(right);
                Gpr::Operation(op)
            }
            left => Gpr::Operation(GprOperation {
                operator,
                operands: vec![left, right],
                parenthesized: false,
            }),
        }
    }

    /// Every gene literal in the rule, in order of appearance, repeats included
    pub fn literals(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.collect_literals(&mut found);
        found
    }

    fn collect_literals<'a>(&'a self, found: &mut Vec<&'a str>) {
        match self {
            Gpr::Operation(op) => op
                .operands
                .iter()
                .for_each(|operand| operand.collect_literals(found)),
            Gpr::GeneNode(gene) => found.push(gene),
        }
    }

    /// The distinct gene ids in the rule, in order of first appearance
    pub fn gene_ids(&self) -> IndexSet<String> {
        self.literals().into_iter().map(str::to_string).collect()
    }

    /// Evaluate the rule with the activity of each gene given by `activity`
    pub fn eval<F>(&self, activity: &F) -> GeneActivity
    where
        F: Fn(&str) -> GeneActivity,
    {
        match self {
            Gpr::Operation(op) => {
                let mut values = op.operands.iter().map(|operand| operand.eval(activity));
                let result = match op.operator {
                    GprOperatorType::Or => values.any(|v| v == GeneActivity::Active),
                    GprOperatorType::And => values.all(|v| v == GeneActivity::Active),
                };
                GeneActivity::from(result)
            }
            Gpr::GeneNode(gene) => activity(gene),
        }
    }

    /// Generate a GPR string with gene ids from the GPR AST
    ///
    /// Operators are written lowercase with single spaces, and parentheses are
    /// emitted where the source had them (or where an `or` sits under an `and`).
    pub fn to_string_id(&self) -> String {
        match self {
            Gpr::Operation(op) => {
                let separator = format!(" {} ", op.operator.keyword());
                let body = op
                    .operands
                    .iter()
                    .map(|operand| match operand {
                        Gpr::Operation(inner)
                            if op.operator == GprOperatorType::And
                                && inner.operator == GprOperatorType::Or
                                && !inner.parenthesized =>
                        {
                            format!("({})", operand.to_string_id())
                        }
                        _ => operand.to_string_id(),
                    })
                    .collect::<Vec<String>>()
                    .join(&separator);
                if op.parenthesized {
                    format!("({})", body)
                } else {
                    body
                }
            }
            Gpr::GeneNode(gene) => gene.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(id: &str) -> Gpr {
        Gpr::new_gene_node(id)
    }

    #[test]
    fn gene_builder_defaults() {
        let gene = GeneBuilder::default()
            .id("YALI0B02728g".to_string())
            .build()
            .unwrap();
        assert_eq!(gene.activity, GeneActivity::Active);
        assert_eq!(gene.name, None);
        assert_eq!(format!("{}", gene), "YALI0B02728g");
    }

    #[test]
    fn binary_chain_flattens() {
        let chain = Gpr::new_binary_operation(
            Gpr::new_binary_operation(gene("a"), GprOperatorType::Or, gene("b")),
            GprOperatorType::Or,
            gene("c"),
        );
        match chain {
            Gpr::Operation(op) => {
                assert_eq!(op.operator, GprOperatorType::Or);
                assert_eq!(op.operands, vec![gene("a"), gene("b"), gene("c")]);
            }
            Gpr::GeneNode(_) => panic!("Should have been an operation"),
        }
    }

    #[test]
    fn parenthesized_chain_does_not_flatten() {
        let mut inner = Gpr::new_binary_operation(gene("a"), GprOperatorType::Or, gene("b"));
        if let Gpr::Operation(ref mut op) = inner {
            op.parenthesized = true;
        }
        let outer = Gpr::new_binary_operation(inner, GprOperatorType::Or, gene("c"));
        assert_eq!(outer.to_string_id(), "(a or b) or c");
    }

    #[test]
    fn and_or_eval() {
        let rule = Gpr::new_binary_operation(
            Gpr::new_binary_operation(gene("a"), GprOperatorType::And, gene("b")),
            GprOperatorType::Or,
            gene("c"),
        );
        let only_c = |g: &str| GeneActivity::from(g == "c");
        let only_a = |g: &str| GeneActivity::from(g == "a");
        let a_and_b = |g: &str| GeneActivity::from(g != "c");
        assert_eq!(rule.eval(&only_c), GeneActivity::Active);
        assert_eq!(rule.eval(&only_a), GeneActivity::Inactive);
        assert_eq!(rule.eval(&a_and_b), GeneActivity::Active);
    }

    #[test]
    fn literals_keep_repeats() {
        let rule = Gpr::new_binary_operation(
            gene("a"),
            GprOperatorType::Or,
            Gpr::new_binary_operation(gene("b"), GprOperatorType::And, gene("a")),
        );
        assert_eq!(rule.literals(), vec!["a", "b", "a"]);
        let ids: Vec<String> = rule.gene_ids().into_iter().collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", gene("YALI0B02728g")), "YALI0B02728g");

        let and_rule = Gpr::new_binary_operation(gene("a"), GprOperatorType::And, gene("b"));
        let rule = Gpr::new_binary_operation(and_rule, GprOperatorType::Or, gene("c"));
        assert_eq!(format!("{}", rule), "a and b or c");

        // An unparenthesized `or` nested under an `and` still needs its grouping
        let or_rule = Gpr::new_binary_operation(gene("a"), GprOperatorType::Or, gene("b"));
        let rule = Gpr::Operation(GprOperation {
            operator: GprOperatorType::And,
            operands: vec![or_rule, gene("c")],
            parenthesized: false,
        });
        assert_eq!(format!("{}", rule), "(a or b) and c");
    }
}
