//! Module for reading and writing Models and the data used to curate them
pub mod gpr_parse;
pub mod json;
pub mod reference;
