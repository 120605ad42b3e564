//! The model store: reactions, metabolites and genes keyed by id, with the GPR
//! rule tree in [`gene`].

pub mod gene;
pub mod metabolite;
pub mod model;
pub mod reaction;
