// Domain module: resistor fitting model and the solver contract

pub mod catalog;
pub mod decoder;
pub mod fit_error;
pub mod formulation;
pub mod models;
pub mod solver_service;
pub mod transform;
pub mod value_objects;

pub use catalog::*;
pub use decoder::*;
pub use fit_error::*;
pub use formulation::*;
pub use models::*;
pub use solver_service::*;
pub use transform::*;
pub use value_objects::*;
