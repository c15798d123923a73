use crate::core::{
    node::{CheckState, Node, NodeId, WARNING_PREFIX},
    tree::FilterTree,
};

/// One visible line of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    pub depth: usize,
    pub text: String,
    pub is_folder: bool,
    pub is_fave: bool,
    pub warning: bool,
    pub expanded: bool,
    pub has_children: bool,
    pub check: Option<CheckState>,
}

impl FilterTree {
    /// Rows currently shown: top-level entries plus the contents of expanded
    /// folders. Empty while the model is disabled.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        if self.model_enabled {
            self.push_rows(self.root, 0, &mut rows);
        }
        rows
    }

    fn push_rows(&self, id: NodeId, depth: usize, rows: &mut Vec<Row>) {
        for &child in &self.get(id).children {
            let node = self.get(child);
            rows.push(Row {
                id: child,
                depth,
                text: node.display_name().to_string(),
                is_folder: node.is_folder(),
                is_fave: node.is_fave(),
                warning: node.warning,
                expanded: node.expanded,
                has_children: !node.children.is_empty(),
                check: node.check,
            });
            if node.is_folder() && node.expanded {
                self.push_rows(child, depth + 1, rows);
            }
        }
    }
}

/* ============================== Text rendering ============================== */

/// Box-drawing rendering of the tree. With `expanded_only`, collapsed folders
/// are shown without their contents.
#[must_use]
pub fn render_tree(tree: &FilterTree, expanded_only: bool) -> String {
    fn label(node: &Node) -> String {
        let mut out = String::new();
        match node.check {
            Some(CheckState::Checked) => out.push_str("[x] "),
            Some(CheckState::Unchecked) => out.push_str("[ ] "),
            Some(CheckState::Partial) => out.push_str("[~] "),
            None => {}
        }
        if node.warning {
            out.push(WARNING_PREFIX);
        }
        if node.is_fave() {
            out.push_str("* ");
        }
        out.push_str(node.display_name());
        if node.is_folder() {
            out.push('/');
        }
        out
    }

    fn render(
        tree: &FilterTree,
        id: NodeId,
        expanded_only: bool,
        prefix: &mut String,
        out: &mut String,
    ) {
        let children = tree.children(id);
        let len = children.len();
        for (idx, &child) in children.iter().enumerate() {
            let Some(node) = tree.node(child) else {
                continue;
            };
            let last = idx + 1 == len;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&label(node));
            out.push('\n');

            let descend = node.is_folder() && (node.expanded || !expanded_only);
            if descend && !node.children.is_empty() {
                let saved = prefix.len();
                prefix.push_str(if last { "    " } else { "│   " });
                render(tree, child, expanded_only, prefix, out);
                prefix.truncate(saved);
            }
        }
    }

    let mut out = String::new();
    if !tree.header().is_empty() {
        out.push_str(tree.header());
        out.push('\n');
    }
    let mut prefix = String::new();
    render(tree, tree.root(), expanded_only, &mut prefix, &mut out);
    out
}
