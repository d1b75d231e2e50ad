use crate::type_system::{TagKind, HIERARCHY};
use std::fmt::Write;

/// Renders the scitype hierarchy as an ASCII tree, one kind per line.
pub fn format_tree() -> String {
    let mut output = String::new();
    for root in HIERARCHY.roots() {
        let _ = writeln!(output, "{}", root);
        write_children(&mut output, root, "");
    }
    output
}

fn write_children(output: &mut String, kind: TagKind, prefix: &str) {
    let children = HIERARCHY.children(kind);
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "`-- " } else { "|-- " };
        let _ = writeln!(output, "{}{}{}", prefix, connector, child);
        let extension = if is_last { "    " } else { "|   " };
        write_children(output, child, &format!("{}{}", prefix, extension));
    }
}
