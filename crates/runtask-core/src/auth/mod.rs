pub mod signature;

pub use signature::SignatureVerifier;
