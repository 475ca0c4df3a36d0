use crate::hierarchy::{HierarchyNode, Section, Selection};
use crate::types::NodeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNodeKind {
    Location {
        kind: NodeKind,
        id: i64,
        name: String,
    },
    Unassigned,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: TreeNodeKind,
    pub depth: usize,
    pub expanded: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    #[must_use]
    pub fn unassigned() -> Self {
        Self {
            kind: TreeNodeKind::Unassigned,
            depth: 0,
            expanded: false,
            children: Vec::new(),
        }
    }

    fn from_hierarchy(node: &HierarchyNode, depth: usize) -> Self {
        Self {
            kind: TreeNodeKind::Location {
                kind: node.kind,
                id: node.id,
                name: node.name.clone(),
            },
            depth,
            expanded: false,
            children: node
                .children
                .iter()
                .map(|child| Self::from_hierarchy(child, depth + 1))
                .collect(),
        }
    }

    /// Selection event for this node; `None` for the unassigned group.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        match &self.kind {
            TreeNodeKind::Location { kind, id, .. } => Some(Selection {
                kind: *kind,
                id: *id,
            }),
            TreeNodeKind::Unassigned => None,
        }
    }

    /// Doors are leaves; every other node can be expanded.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        match &self.kind {
            TreeNodeKind::Location { kind, .. } => !kind.is_leaf(),
            TreeNodeKind::Unassigned => true,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            TreeNodeKind::Location { name, .. } => name,
            TreeNodeKind::Unassigned => "[Unassigned]",
        }
    }
}

/// Converts loaded sections into UI nodes, expanded down to floors.
pub fn build_tree(sections: &[Section]) -> Vec<TreeNode> {
    let mut tree: Vec<TreeNode> = sections
        .iter()
        .map(|section| match section {
            Section::Building(node) => TreeNode::from_hierarchy(node, 0),
            Section::Unassigned { rooms, doors } => {
                let mut unassigned = TreeNode::unassigned();
                unassigned.children = rooms
                    .iter()
                    .chain(doors)
                    .map(|node| TreeNode::from_hierarchy(node, 1))
                    .collect();
                unassigned
            }
        })
        .collect();

    expand_to_depth(&mut tree, 1);
    tree
}

/// Expands every expandable node whose depth is at most `max_depth`.
pub fn expand_to_depth(tree: &mut [TreeNode], max_depth: usize) {
    for node in tree {
        if node.is_expandable() && node.depth <= max_depth {
            node.expanded = true;
            expand_to_depth(&mut node.children, max_depth);
        }
    }
}

/// Visible nodes in display order: a node's children follow it only
/// while it is expanded.
#[must_use]
pub fn flatten_tree(tree: &[TreeNode]) -> Vec<&TreeNode> {
    fn push_visible<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a TreeNode>) {
        for node in nodes {
            out.push(node);
            if node.expanded {
                push_visible(&node.children, out);
            }
        }
    }

    let mut flat = Vec::new();
    push_visible(tree, &mut flat);
    flat
}

pub fn set_all_expanded(tree: &mut [TreeNode], expanded: bool) {
    for node in tree {
        if node.is_expandable() {
            node.expanded = expanded;
            set_all_expanded(&mut node.children, expanded);
        }
    }
}

#[must_use]
pub fn get_node_at(tree: &[TreeNode], index: usize) -> Option<&TreeNode> {
    flatten_tree(tree).get(index).copied()
}

/// Mutable access to the node shown at `index`, walking only expanded
/// branches.
fn node_at_mut(tree: &mut [TreeNode], index: usize) -> Option<&mut TreeNode> {
    fn walk<'a>(
        nodes: &'a mut [TreeNode],
        index: usize,
        seen: &mut usize,
    ) -> Option<&'a mut TreeNode> {
        for node in nodes {
            if *seen == index {
                return Some(node);
            }
            *seen += 1;
            if node.expanded {
                if let Some(found) = walk(&mut node.children, index, seen) {
                    return Some(found);
                }
            }
        }
        None
    }

    walk(tree, index, &mut 0)
}

/// Expands or collapses the node at `index`. False for doors and
/// out-of-range indexes.
pub fn set_expanded_at(tree: &mut [TreeNode], index: usize, expanded: bool) -> bool {
    match node_at_mut(tree, index) {
        Some(node) if node.is_expandable() => {
            node.expanded = expanded;
            true
        }
        _ => false,
    }
}

pub fn toggle_expanded_at(tree: &mut [TreeNode], index: usize) -> bool {
    let expanded = get_node_at(tree, index).is_some_and(|node| !node.expanded);
    set_expanded_at(tree, index, expanded)
}

/// Visible index of the node matching `selection`, if it is on screen.
#[must_use]
pub fn find_visible_index(tree: &[TreeNode], selection: Selection) -> Option<usize> {
    flatten_tree(tree)
        .iter()
        .position(|node| node.selection() == Some(selection))
}

#[must_use]
pub fn find_parent_index(tree: &[TreeNode], target_index: usize) -> Option<usize> {
    let flat = flatten_tree(tree);
    let target_depth = flat.get(target_index)?.depth;

    if target_depth == 0 {
        return None;
    }

    (0..target_index)
        .rev()
        .find(|&i| flat[i].depth == target_depth - 1 && flat[i].is_expandable())
}
