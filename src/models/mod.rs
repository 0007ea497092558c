pub mod postable;
pub mod tool;

pub use postable::{PathItem, Postable};
pub use tool::{Tool, ToolController};
