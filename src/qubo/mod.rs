//! QUBO modeling.
//!
//! Build a Hamiltonian from binary variables and placeholders with
//! [`Expr`], expand it with [`Expr::compile`], then feed placeholder values
//! through [`Model::to_qubo`] to obtain the numeric [`Qubo`] consumed by the
//! [sampler](crate::sampler).
//!
//! Only terms up to degree two are supported; higher-order reduction is out
//! of scope.

mod compile;
mod expr;
mod model;

pub use expr::{BinaryArray, Expr};
pub use model::{ConstraintReport, DecodedSample, FeedDict, Model, Qubo};
