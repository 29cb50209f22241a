use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One node in the navigation menu hierarchy.
///
/// Entries form a strict containment tree through `children`. The
/// `parent_menu_id` field is a denormalized back-reference: on every non-root
/// entry it must equal the `menu_id` of the entry whose `children` contain it,
/// and it is absent on roots. [`validate_tree`] checks this.
///
/// Only `menu_id` and `menu_name` are guaranteed. Everything else is optional
/// and an absent value is a normal state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub menu_id: String,
    pub menu_name: String,
    /// Icon reference. An empty string means "no icon".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_icon: Option<String>,
    /// Path into the route table. An empty string marks a group node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_menu_id: Option<String>,
}

impl MenuEntry {
    pub fn new(menu_id: impl Into<String>, menu_name: impl Into<String>) -> Self {
        Self {
            menu_id: menu_id.into(),
            menu_name: menu_name.into(),
            menu_icon: None,
            menu_route: None,
            children: None,
            parent_menu_id: None,
        }
    }

    /// Icon reference, with the empty string folded into `None`.
    pub fn icon(&self) -> Option<&str> {
        self.menu_icon.as_deref().filter(|s| !s.is_empty())
    }

    /// Route path, with the empty string folded into `None`.
    pub fn route(&self) -> Option<&str> {
        self.menu_route.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_navigable(&self) -> bool {
        self.route().is_some()
    }

    /// An entry with at least one child.
    pub fn is_group(&self) -> bool {
        !self.children().is_empty()
    }

    pub fn children(&self) -> &[MenuEntry] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Visit every entry depth-first, parents before children.
pub fn walk<'a>(roots: &'a [MenuEntry], visit: &mut impl FnMut(&'a MenuEntry, usize)) {
    fn go<'a>(entries: &'a [MenuEntry], depth: usize, visit: &mut impl FnMut(&'a MenuEntry, usize)) {
        for entry in entries {
            visit(entry, depth);
            go(entry.children(), depth + 1, visit);
        }
    }
    go(roots, 0, visit);
}

/// Find an entry anywhere in the tree by its id.
pub fn find_entry<'a>(roots: &'a [MenuEntry], menu_id: &str) -> Option<&'a MenuEntry> {
    for entry in roots {
        if entry.menu_id == menu_id {
            return Some(entry);
        }
        if let Some(found) = find_entry(entry.children(), menu_id) {
            return Some(found);
        }
    }
    None
}

pub fn count_entries(roots: &[MenuEntry]) -> usize {
    let mut count = 0;
    walk(roots, &mut |_, _| count += 1);
    count
}

/// A broken shape invariant found by [`validate_tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuViolation {
    EmptyId { menu_name: String },
    DuplicateId { menu_id: String },
    ParentMismatch {
        menu_id: String,
        expected: Option<String>,
        found: Option<String>,
    },
}

impl fmt::Display for MenuViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId { menu_name } => write!(f, "entry '{}' has an empty menuId", menu_name),
            Self::DuplicateId { menu_id } => write!(f, "menuId '{}' appears more than once", menu_id),
            Self::ParentMismatch {
                menu_id,
                expected,
                found,
            } => write!(
                f,
                "entry '{}' has parentMenuId {:?} but is contained by {:?}",
                menu_id, found, expected
            ),
        }
    }
}

/// Check id uniqueness and `parentMenuId` consistency over a whole tree.
///
/// Returns every violation found, in depth-first order. Whether a node may
/// carry both a route and children is deliberately not checked.
pub fn validate_tree(roots: &[MenuEntry]) -> Result<(), Vec<MenuViolation>> {
    fn check(
        entries: &[MenuEntry],
        parent: Option<&str>,
        seen: &mut HashSet<String>,
        violations: &mut Vec<MenuViolation>,
    ) {
        for entry in entries {
            if entry.menu_id.is_empty() {
                violations.push(MenuViolation::EmptyId {
                    menu_name: entry.menu_name.clone(),
                });
            } else if !seen.insert(entry.menu_id.clone()) {
                violations.push(MenuViolation::DuplicateId {
                    menu_id: entry.menu_id.clone(),
                });
            }

            if entry.parent_menu_id.as_deref() != parent {
                violations.push(MenuViolation::ParentMismatch {
                    menu_id: entry.menu_id.clone(),
                    expected: parent.map(str::to_string),
                    found: entry.parent_menu_id.clone(),
                });
            }

            check(entry.children(), Some(entry.menu_id.as_str()), seen, violations);
        }
    }

    let mut seen = HashSet::new();
    let mut violations = Vec::new();
    check(roots, None, &mut seen, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(id: &str, parent: &str) -> MenuEntry {
        MenuEntry {
            parent_menu_id: Some(parent.to_string()),
            ..MenuEntry::new(id, id)
        }
    }

    #[test]
    fn empty_strings_are_absent() {
        let entry = MenuEntry {
            menu_icon: Some(String::new()),
            menu_route: Some(String::new()),
            ..MenuEntry::new("A", "A")
        };
        assert_eq!(entry.icon(), None);
        assert_eq!(entry.route(), None);
        assert!(!entry.is_navigable());
    }

    #[test]
    fn absent_children_read_as_empty() {
        let entry = MenuEntry::new("A", "A");
        assert!(entry.children().is_empty());
        assert!(!entry.is_group());
    }

    #[test]
    fn empty_tree_is_valid() {
        assert_eq!(validate_tree(&[]), Ok(()));
    }

    #[test]
    fn root_with_parent_id_is_rejected() {
        let root = child("A", "Z");
        let violations = validate_tree(&[root]).unwrap_err();
        assert_eq!(
            violations,
            vec![MenuViolation::ParentMismatch {
                menu_id: "A".to_string(),
                expected: None,
                found: Some("Z".to_string()),
            }]
        );
    }

    #[test]
    fn duplicate_ids_across_branches_are_rejected() {
        let mut root = MenuEntry::new("A", "A");
        root.children = Some(vec![child("B", "A"), child("B", "A")]);
        let violations = validate_tree(&[root]).unwrap_err();
        assert_eq!(
            violations,
            vec![MenuViolation::DuplicateId {
                menu_id: "B".to_string()
            }]
        );
    }

    #[test]
    fn find_entry_reaches_nested_nodes() {
        let mut mid = child("B", "A");
        mid.children = Some(vec![child("C", "B")]);
        let mut root = MenuEntry::new("A", "A");
        root.children = Some(vec![mid]);

        let roots = vec![root];
        assert_eq!(find_entry(&roots, "C").map(|e| e.menu_id.as_str()), Some("C"));
        assert!(find_entry(&roots, "D").is_none());
        assert_eq!(count_entries(&roots), 3);
    }
}
