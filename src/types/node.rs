use std::fmt;

use serde::{Deserialize, Serialize};

/// Level of a node in the location hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Building,
    Floor,
    Room,
    Door,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Floor => "floor",
            Self::Room => "room",
            Self::Door => "door",
        }
    }

    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Door)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_doors_are_leaves() {
        assert!(NodeKind::Door.is_leaf());
        assert!(!NodeKind::Room.is_leaf());
        assert!(!NodeKind::Building.is_leaf());
    }

    #[test]
    fn test_display_matches_serde_tag() {
        assert_eq!(NodeKind::Floor.to_string(), "floor");
        assert_eq!(
            serde_json::to_string(&NodeKind::Building).unwrap(),
            "\"building\""
        );
    }
}
