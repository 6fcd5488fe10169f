pub mod layout;
pub mod lsystem;
pub mod narrative;
pub mod pipeline;
pub mod render;
