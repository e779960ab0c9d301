pub mod bin;
pub mod difficulty;
pub mod float_ext;
pub mod poisson_binomial;
pub mod root_finding;
pub mod smoothing;
