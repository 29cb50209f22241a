//! The built-in menu tree served until a real menu source is configured.

use crate::models::MenuEntry;

fn entry(id: &str, name: &str, parent: Option<&str>, children: Option<Vec<MenuEntry>>) -> MenuEntry {
    MenuEntry {
        menu_id: id.to_string(),
        menu_name: name.to_string(),
        menu_icon: Some(String::new()),
        menu_route: Some(String::new()),
        children,
        parent_menu_id: parent.map(str::to_string),
    }
}

/// Four levels deep, six entries, mixing group and leaf nodes.
///
/// Ids are positional codes, except that `A001002`'s children reuse the
/// `A001001` prefix; the parent links follow containment, not the codes.
pub fn fixture_menus() -> Vec<MenuEntry> {
    vec![entry(
        "A001",
        "一级菜单A",
        None,
        Some(vec![
            entry("A001001", "二级菜单A-1", Some("A001"), None),
            entry(
                "A001002",
                "二级菜单A-2",
                Some("A001"),
                Some(vec![
                    entry(
                        "A001001001",
                        "三级菜单A-1-1",
                        Some("A001002"),
                        Some(vec![entry(
                            "A001001001001",
                            "四级菜单A-1-1-1",
                            Some("A001001001"),
                            None,
                        )]),
                    ),
                    entry("A001001002", "三级菜单A-1-2", Some("A001002"), None),
                ]),
            ),
        ]),
    )]
}
