use std::sync::Arc;

use job_admin::menu::*;
use job_admin::models::*;
use speculate2::speculate;

/// Collect (entry id, containing entry id) pairs for every entry.
fn containment(entries: &[MenuEntry], parent: Option<&str>, out: &mut Vec<(String, Option<String>)>) {
    for entry in entries {
        out.push((entry.menu_id.clone(), parent.map(str::to_string)));
        containment(entry.children(), Some(entry.menu_id.as_str()), out);
    }
}

speculate! {
    before {
        let menus = fixture_menus();
    }

    describe "fixture tree" {
        it "has six entries with unique ids" {
            let mut ids = Vec::new();
            walk(&menus, &mut |entry, _| ids.push(entry.menu_id.clone()));

            assert_eq!(ids.len(), 6);
            let mut unique = ids.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 6);
        }

        it "is four levels deep" {
            let mut max_depth = 0;
            walk(&menus, &mut |_, depth| max_depth = max_depth.max(depth));
            assert_eq!(max_depth, 3);
        }

        it "links every entry to its containing entry" {
            let mut pairs = Vec::new();
            containment(&menus, None, &mut pairs);

            for (id, container) in pairs {
                let entry = find_entry(&menus, &id).expect("entry should exist");
                assert_eq!(entry.parent_menu_id, container, "parent of {}", id);
            }
        }

        it "places the deepest entry under A001001001" {
            let deepest = find_entry(&menus, "A001001001001").expect("deepest entry");
            assert_eq!(deepest.parent_menu_id.as_deref(), Some("A001001001"));
            assert_eq!(deepest.menu_name, "四级菜单A-1-1-1");

            let container = find_entry(&menus, "A001001001").expect("container");
            assert_eq!(container.children()[0].menu_id, "A001001001001");
            assert_eq!(container.parent_menu_id.as_deref(), Some("A001002"));
        }

        it "passes validation" {
            assert_eq!(validate_tree(&menus), Ok(()));
        }

        it "has no icons or routes" {
            walk(&menus, &mut |entry, _| {
                assert!(entry.icon().is_none());
                assert!(!entry.is_navigable());
            });
        }
    }

    describe "validate_tree" {
        it "reports a dangling parent reference" {
            let mut broken = menus.clone();
            let children = broken[0].children.as_mut().expect("root has children");
            children[0].parent_menu_id = Some("NOPE".to_string());

            let violations = validate_tree(&broken).unwrap_err();
            assert_eq!(violations, vec![MenuViolation::ParentMismatch {
                menu_id: "A001001".to_string(),
                expected: Some("A001".to_string()),
                found: Some("NOPE".to_string()),
            }]);
        }

        it "reports a missing parent reference on a child" {
            let mut broken = menus.clone();
            let children = broken[0].children.as_mut().expect("root has children");
            children[1].parent_menu_id = None;

            let violations = validate_tree(&broken).unwrap_err();
            assert_eq!(violations.len(), 1);
            assert!(violations[0].to_string().contains("A001002"));
        }

        it "reports ids duplicated across levels" {
            let mut broken = menus.clone();
            broken.push(MenuEntry::new("A001001001001", "Copy"));

            let violations = validate_tree(&broken).unwrap_err();
            assert_eq!(violations, vec![MenuViolation::DuplicateId {
                menu_id: "A001001001001".to_string(),
            }]);
        }

        it "reports empty ids" {
            let violations = validate_tree(&[MenuEntry::new("", "Nameless id")]).unwrap_err();
            assert_eq!(violations, vec![MenuViolation::EmptyId {
                menu_name: "Nameless id".to_string(),
            }]);
        }

        it "accepts a node with both a route and children" {
            let mut root = MenuEntry::new("R", "Root");
            root.menu_route = Some("/home".to_string());
            root.children = Some(vec![MenuEntry {
                parent_menu_id: Some("R".to_string()),
                ..MenuEntry::new("C", "Child")
            }]);

            assert_eq!(validate_tree(&[root]), Ok(()));
        }
    }

    describe "serialization" {
        it "uses camelCase keys and omits absent fields" {
            let json = serde_json::to_value(MenuEntry::new("A", "Alpha")).unwrap();
            assert_eq!(json, serde_json::json!({ "menuId": "A", "menuName": "Alpha" }));
        }

        it "reads the console's menu format" {
            let entry: MenuEntry = serde_json::from_str(r#"{
                "menuId": "A001",
                "menuName": "Jobs",
                "menuIcon": "",
                "children": [
                    { "menuId": "A001001", "menuName": "List", "menuRoute": "/home", "parentMenuId": "A001" }
                ]
            }"#).unwrap();

            assert_eq!(entry.menu_icon.as_deref(), Some(""));
            assert!(entry.menu_route.is_none());
            assert!(entry.is_group());
            assert_eq!(entry.children()[0].route(), Some("/home"));
        }

        it "preserves empty strings" {
            let json = serde_json::to_string(&menus).unwrap();
            let back: Vec<MenuEntry> = serde_json::from_str(&json).unwrap();
            assert_eq!(back, menus);
        }
    }

    describe "fixture source" {
        it "serves the fixture tree" {
            let fetched = tokio_test::block_on(FixtureMenuSource::new().fetch_menus()).unwrap();
            assert_eq!(fetched, menus);
        }

        it "passes validation when loaded into a store" {
            let store = MenuStore::new(Arc::new(FixtureMenuSource::new()));
            let loaded = tokio_test::block_on(store.load_menus()).unwrap();

            assert_eq!(*loaded, menus);
            assert_eq!(store.status().entries, count_entries(&menus));
        }
    }
}
