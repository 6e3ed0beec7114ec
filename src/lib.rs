pub mod algorithm;
pub mod config;
pub mod error;
pub mod loader;
pub mod matrix;
pub mod reduction;
pub mod verifier;
// cmd and reports are binary modules (see main.rs).

pub use algorithm::{FmmAlgorithm, MatrixRole};
pub use error::{FmmError, FmmResult};
pub use matrix::FmmMatrix;
pub use reduction::Strategy;
