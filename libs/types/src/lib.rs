//! Types library for the peanut vending machine
//!
//! Primitive value types shared by the contract and the simulation tooling.
//!
//! # Modules
//! - `ids`: Account identities (`Address`)
//! - `numeric`: Asset amounts in the smallest unit (`Wei`) and ether conversion
//! - `errors`: Parse/conversion error taxonomy

pub mod ids;
pub mod numeric;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::errors::*;
}
