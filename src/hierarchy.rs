//! Location hierarchy: Building → Floor → Room → Door.
//!
//! The tree is loaded with one query per level per parent. Rooms without a
//! floor and doors without a room are gathered under a trailing
//! [`Section::Unassigned`] group.

use serde::Serialize;

use crate::error::Result;
use crate::store::Store;
use crate::types::NodeKind;

/// A node of the location tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub kind: NodeKind,
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    #[must_use]
    pub fn new(kind: NodeKind, id: i64, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            kind: self.kind,
            id: self.id,
        }
    }
}

/// Top-level grouping of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum Section {
    Building(HierarchyNode),
    /// Rooms with no floor and doors with no room.
    Unassigned {
        rooms: Vec<HierarchyNode>,
        doors: Vec<HierarchyNode>,
    },
}

/// The `(kind, id)` event emitted when a node is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub kind: NodeKind,
    pub id: i64,
}

/// What the rest of the UI should do with a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTarget {
    /// Show the door in the detail form.
    Door(i64),
    /// Filter the door list to one room.
    Room(i64),
    /// Buildings and floors have no consumer.
    Ignored,
}

impl Selection {
    #[must_use]
    pub fn target(self) -> SelectionTarget {
        match self.kind {
            NodeKind::Door => SelectionTarget::Door(self.id),
            NodeKind::Room => SelectionTarget::Room(self.id),
            NodeKind::Building | NodeKind::Floor => SelectionTarget::Ignored,
        }
    }
}

fn load_room<S: Store + ?Sized>(store: &S, id: i64, name: String) -> Result<HierarchyNode> {
    let mut room = HierarchyNode::new(NodeKind::Room, id, name);
    for door in store.list_doors(Some(id))? {
        room.children
            .push(HierarchyNode::new(NodeKind::Door, door.id, door.name));
    }
    Ok(room)
}

/// Loads the whole location tree, each level ordered by name.
pub fn load_hierarchy<S: Store + ?Sized>(store: &S) -> Result<Vec<Section>> {
    let mut sections = Vec::new();

    for building in store.list_buildings()? {
        let mut building_node = HierarchyNode::new(NodeKind::Building, building.id, building.name);

        for floor in store.list_floors(building.id)? {
            let mut floor_node = HierarchyNode::new(NodeKind::Floor, floor.id, floor.name);
            for room in store.list_rooms(floor.id)? {
                floor_node.children.push(load_room(store, room.id, room.name)?);
            }
            building_node.children.push(floor_node);
        }

        sections.push(Section::Building(building_node));
    }

    let rooms = store
        .list_unassigned_rooms()?
        .into_iter()
        .map(|room| load_room(store, room.id, room.name))
        .collect::<Result<Vec<_>>>()?;
    let doors: Vec<_> = store
        .list_unassigned_doors()?
        .into_iter()
        .map(|door| HierarchyNode::new(NodeKind::Door, door.id, door.name))
        .collect();

    if !rooms.is_empty() || !doors.is_empty() {
        sections.push(Section::Unassigned { rooms, doors });
    }

    tracing::debug!("Loaded location tree with {} sections", sections.len());
    Ok(sections)
}

/// Plain-text rendering, one node per line, indented by depth.
#[must_use]
pub fn render_text(sections: &[Section]) -> String {
    fn push_node(out: &mut String, node: &HierarchyNode, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} [{} {}]\n", node.name, node.kind, node.id));
        for child in &node.children {
            push_node(out, child, depth + 1);
        }
    }

    let mut out = String::new();
    for section in sections {
        match section {
            Section::Building(node) => push_node(&mut out, node, 0),
            Section::Unassigned { rooms, doors } => {
                out.push_str("[Unassigned]\n");
                for node in rooms.iter().chain(doors) {
                    push_node(&mut out, node, 1);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::types::{NewDoor, NewRoom};

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.seed().unwrap();
        store
    }

    fn building<'a>(sections: &'a [Section], name: &str) -> &'a HierarchyNode {
        sections
            .iter()
            .find_map(|s| match s {
                Section::Building(node) if node.name == name => Some(node),
                _ => None,
            })
            .expect("building not found")
    }

    #[test]
    fn test_seeded_tree_shape() {
        let store = seeded_store();
        let sections = load_hierarchy(&store).unwrap();

        assert_eq!(sections.len(), 2, "no unassigned section expected");

        let a = building(&sections, "Edificio A");
        let floors: Vec<_> = a.children.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(floors, ["Piano 1", "Piano Terra"]);

        let ced = &a.children[0].children[0];
        assert_eq!(ced.kind, NodeKind::Room);
        assert_eq!(ced.name, "Locale CED");
        assert_eq!(ced.children.len(), 1);
        assert_eq!(ced.children[0].name, "Porta Sala Server");
        assert_eq!(ced.children[0].kind, NodeKind::Door);

        let b = building(&sections, "Edificio B - Magazzino");
        assert_eq!(b.children.len(), 1);
        assert!(b.children[0].children.is_empty());
    }

    #[test]
    fn test_unassigned_section_collects_floating_rows() {
        let store = seeded_store();
        let room = store
            .create_room(&NewRoom {
                name: "Deposito".to_string(),
                ..Default::default()
            })
            .unwrap();
        store
            .create_door(&NewDoor {
                name: "Porta Deposito".to_string(),
                room_id: Some(room),
                notes: None,
            })
            .unwrap();
        store
            .create_door(&NewDoor {
                name: "Cancello".to_string(),
                ..Default::default()
            })
            .unwrap();

        let sections = load_hierarchy(&store).unwrap();
        let Some(Section::Unassigned { rooms, doors }) = sections.last() else {
            panic!("expected trailing unassigned section");
        };
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].children[0].name, "Porta Deposito");
        assert_eq!(doors.len(), 1);
        assert_eq!(doors[0].name, "Cancello");
    }

    #[test]
    fn test_selection_targets() {
        let door = HierarchyNode::new(NodeKind::Door, 7, "Porta");
        assert_eq!(door.selection().target(), SelectionTarget::Door(7));

        let room = HierarchyNode::new(NodeKind::Room, 3, "Locale");
        assert_eq!(room.selection().target(), SelectionTarget::Room(3));

        let floor = HierarchyNode::new(NodeKind::Floor, 1, "Piano 1");
        assert_eq!(floor.selection().target(), SelectionTarget::Ignored);
    }

    #[test]
    fn test_render_text() {
        let store = seeded_store();
        let sections = load_hierarchy(&store).unwrap();

        let text = render_text(&sections);
        assert!(text.starts_with("Edificio A [building 1]\n  Piano 1 [floor 1]\n"));
        assert!(text.contains("      Porta Sala Server [door 2]\n"));
    }
}
