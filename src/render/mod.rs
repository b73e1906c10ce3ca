pub mod compose;
pub mod index;
pub mod pipeline;
