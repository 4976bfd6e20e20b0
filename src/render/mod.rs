pub mod pipeline;
pub mod post;
