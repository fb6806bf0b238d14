//! Two-phase nearest-color search: cheap prefilter, precise rerank, then
//! quality classification.

pub mod matcher;
pub mod prefilter;
pub mod rerank;
