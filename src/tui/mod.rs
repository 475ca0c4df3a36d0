mod app;
mod tree;
mod ui;

pub use app::{App, Focus, InputMode, run_ui, show_error_dialog};
pub use tree::{TreeNode, TreeNodeKind};
