pub mod extractors;
pub mod verifier;
