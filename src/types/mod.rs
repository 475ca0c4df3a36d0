mod models;
mod node;

pub use models::*;
pub use node::NodeKind;
