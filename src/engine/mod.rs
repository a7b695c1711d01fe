pub mod aggregate;
pub mod lifecycle;
pub mod matcher;
pub mod queue;
