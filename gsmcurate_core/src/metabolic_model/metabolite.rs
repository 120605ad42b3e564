//! Metabolites referenced by reaction stoichiometries
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use serde_json::Value;

/// A chemical species in one compartment
///
/// The same compound in two compartments is two metabolites, e.g. `crn_c` and `crn_m`.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Metabolite {
    /// Unique id within the model
    pub id: String,
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Short compartment name, a key of [`crate::metabolic_model::model::Model::compartments`]
    #[builder(default = "None")]
    pub compartment: Option<String>,
    #[builder(default = "None")]
    pub charge: Option<i32>,
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Opaque, written back as read
    #[builder(default = "None")]
    pub notes: Option<Value>,
    /// Opaque, written back as read
    #[builder(default = "None")]
    pub annotation: Option<Value>,
}

impl Metabolite {
    /// Metabolite with only an id and a compartment
    pub fn new(id: &str, compartment: Option<&str>) -> Self {
        Metabolite {
            id: id.to_string(),
            name: None,
            compartment: compartment.map(str::to_string),
            charge: None,
            formula: None,
            notes: None,
            annotation: None,
        }
    }
}

impl Display for Metabolite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.name, &self.compartment) {
            (Some(name), Some(compartment)) => write!(f, "{} ({} [{}])", self.id, name, compartment),
            (Some(name), None) => write!(f, "{} ({})", self.id, name),
            (None, Some(compartment)) => write!(f, "{} [{}]", self.id, compartment),
            (None, None) => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_matches_new() {
        let built = MetaboliteBuilder::default()
            .id("crn_m".to_string())
            .compartment(Some("m".to_string()))
            .build()
            .unwrap();
        assert_eq!(built, Metabolite::new("crn_m", Some("m")));
    }

    #[test]
    fn display() {
        let mut met = Metabolite::new("crn_c", Some("c"));
        assert_eq!(met.to_string(), "crn_c [c]");
        met.name = Some("L-Carnitine".to_string());
        assert_eq!(met.to_string(), "crn_c (L-Carnitine [c])");
    }
}
