//! Tree view of the entries a run left alone.

use std::path::Path;

use declutter_core::EntryKind;

const TEE: &str = "├── ";
const LAST: &str = "└── ";
const BRANCH: &str = "│   ";
const SPACE: &str = "    ";

/// One level of the tree. Children keep insertion order.
#[derive(Debug, Default)]
pub struct TreeNode {
    pub is_dir: bool,
    pub children: Vec<(String, TreeNode)>,
}

impl TreeNode {
    fn child_mut(&mut self, name: &str) -> &mut TreeNode {
        let index = match self.children.iter().position(|(n, _)| n == name) {
            Some(i) => i,
            None => {
                self.children.push((name.to_string(), TreeNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

/// Builds a tree from paths below `root`. Paths outside `root` are ignored.
pub fn build_tree<'a, I>(root: &Path, entries: I) -> TreeNode
where
    I: IntoIterator<Item = &'a (std::path::PathBuf, EntryKind)>,
{
    let mut tree = TreeNode { is_dir: true, children: Vec::new() };
    for (path, kind) in entries {
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let mut node = &mut tree;
        for part in relative.iter() {
            node.is_dir = true;
            node = node.child_mut(&part.to_string_lossy());
        }
        if *kind == EntryKind::Dir {
            node.is_dir = true;
        }
    }
    tree
}

/// Renders the tree into lines, one per node, with box-drawing prefixes.
pub fn render_tree(node: &TreeNode) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(node, "", &mut lines);
    lines
}

fn render_into(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let pointer = if last { LAST } else { TEE };
        let slash = if child.is_dir { "/" } else { "" };
        lines.push(format!("{}{}{}{}", prefix, pointer, name, slash));
        if !child.children.is_empty() {
            let extension = if last { SPACE } else { BRANCH };
            render_into(child, &format!("{}{}", prefix, extension), lines);
        }
    }
}
