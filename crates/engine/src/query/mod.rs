//! Query engine: predicate evaluation, logical combination and the
//! filter/order/limit pipeline

pub mod evaluator;
pub mod pipeline;

pub use evaluator::{combine, evaluate, matches};
pub use pipeline::{compare_records, filter, limit, order, run};
