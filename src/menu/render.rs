//! ASCII tree rendering for menu hierarchies.

use crate::models::MenuEntry;

const GROUP: char = '▸';
const LEAF: char = '•';

/// Render a menu tree as ASCII art.
///
/// Example output:
/// ```text
/// Jobs [A001]
/// ├── • Overview [A001001] -> /home
/// └── ▸ Schedules [A001002]
///     └── • Cron [A001002001]
/// ```
pub fn render_menu_tree(roots: &[MenuEntry]) -> String {
    let mut output = String::new();
    for (i, entry) in roots.iter().enumerate() {
        let is_last = i == roots.len() - 1;
        render_entry(&mut output, entry, "", is_last, true);
    }
    output
}

fn render_entry(output: &mut String, entry: &MenuEntry, prefix: &str, is_last: bool, is_root: bool) {
    if !is_root {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push(if entry.is_group() { GROUP } else { LEAF });
        output.push(' ');
    }

    output.push_str(&format!("{} [{}]", entry.menu_name, entry.menu_id));
    if let Some(route) = entry.route() {
        output.push_str(" -> ");
        output.push_str(route);
    }
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    let children = entry.children();
    for (i, child) in children.iter().enumerate() {
        render_entry(output, child, &child_prefix, i == children.len() - 1, false);
    }
}
