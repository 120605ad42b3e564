//! Core rust implementation of gsmcurate, a crate for curating the gene reaction
//! associations of genome scale metabolic models.
//!
//! - [`io`]: GPR rule parsing, COBRA JSON model files and reference gene sets
//! - [`metabolic_model`]: the model store
//! - [`reconcile`]: duplicate, typo and reference checks on GPR rules, and rule rewriting
//! - [`curation`]: batch application of corrections with a guarded save

pub mod configuration;
pub mod curation;
pub mod io;
pub mod logging;
pub mod metabolic_model;
pub mod reconcile;
mod utils;
