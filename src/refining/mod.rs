//! Query refinement: refiners and the context that applies them

pub mod filter;
pub mod refine;
pub mod refiner;
pub mod sort;

pub use filter::Filter;
pub use refine::RefinementContext;
pub use refiner::{
    FilterOperator, Refinable, Refinement, RefinementKind, Refiner, RefinerInput, SortDirection,
};
pub use sort::Sort;
