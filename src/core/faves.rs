use crate::core::{
    events::TreeEvent,
    node::{Node, NodeId, NodeKind, remove_warning_prefix, split_warning_prefix},
    text::{join_fave_path, make_unique_name},
    tree::FilterTree,
};

/* ============================ Fave folder root ============================= */

impl FilterTree {
    fn create_fave_folder(&mut self) -> NodeId {
        if let Some(id) = self.fave_root {
            return id;
        }
        let mut folder = Node::folder(&self.options.fave_folder_label);
        folder.kind = NodeKind::Folder {
            fave_root: true,
            fave_subfolder: false,
        };
        let id = self.append_child(self.root, folder);
        self.fave_root = Some(id);
        self.sort_top_level();
        log::debug!("fave folder created");
        id
    }

    pub(super) fn remove_fave_folder(&mut self) {
        if let Some(id) = self.fave_root.take() {
            self.remove_subtree(id);
            log::debug!("fave folder removed");
        }
    }

    /// Keeps the fave folder first without reordering anything below.
    fn sort_top_level(&mut self) {
        let root = self.root;
        let fave_root = self.fave_root;
        let children = &mut self.get_mut(root).children;
        if let Some(fave) = fave_root
            && let Some(pos) = children.iter().position(|c| *c == fave)
        {
            let id = children.remove(pos);
            children.insert(0, id);
        }
    }

    /// Subfolder of the fave folder at `path`; the fave folder itself for an
    /// empty path.
    #[must_use]
    pub fn fave_subfolder_from_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let fave_root = self.fave_root?;
        self.resolve_folder(fave_root, path)
    }

    /// Places or removes the placeholder so a fave subfolder is never empty
    /// and never mixes the placeholder with real entries.
    pub(super) fn update_null_item(&mut self, folder: NodeId) {
        let Some(node) = self.nodes.get(folder) else {
            return;
        };
        if !node.is_fave_subfolder() {
            return;
        }
        if node.children.is_empty() {
            self.append_child(folder, Node::fave_null());
            return;
        }
        if node.children.len() > 1 {
            let nulls: Vec<NodeId> = node
                .children
                .iter()
                .copied()
                .filter(|c| self.get(*c).is_fave_null())
                .collect();
            for null in nulls {
                self.remove_subtree(null);
            }
        }
    }

    /* =============================== Insertion ============================= */

    /// Adds a fave under the fave folder at `path`. An empty `name` only makes
    /// sure the folder exists.
    pub fn add_fave<S: AsRef<str>>(&mut self, name: &str, hash: &str, path: &[S]) -> Option<NodeId> {
        let visible = self.visibility.is_visible(hash);
        if !self.selection_mode && !visible && !name.is_empty() {
            return None;
        }
        let fave_root = self.create_fave_folder();
        let folder = match self.fave_subfolder_from_path(path) {
            Some(f) => f,
            None => {
                let created = self.resolve_or_create_folder(fave_root, path);
                self.update_null_item(created);
                created
            }
        };

        if name.is_empty() {
            self.update_null_item(folder);
            return None;
        }

        let leaf = Node::filter(name, hash, false, true);
        let id = self.append_leaf(folder, leaf, visible);
        self.update_null_item(folder);
        Some(id)
    }

    pub fn create_fave_subfolder<S: AsRef<str>>(&mut self, path: &[S]) -> NodeId {
        let fave_root = self.create_fave_folder();
        let folder = self.resolve_or_create_folder(fave_root, path);
        self.update_null_item(folder);
        self.sort_faves();
        folder
    }

    /// Depth-first search for a fave leaf, limited to the fave folder.
    #[must_use]
    pub fn find_fave(&self, hash: &str) -> Option<NodeId> {
        let fave_root = self.fave_root?;
        let mut stack = vec![fave_root];
        while let Some(id) = stack.pop() {
            for &child in self.get(id).children.iter().rev() {
                let node = self.get(child);
                if node.is_filter() && node.hash() == Some(hash) {
                    return Some(child);
                }
                if node.is_folder() {
                    stack.push(child);
                }
            }
        }
        None
    }

    /// Removes the fave with `hash`; the fave folder goes away once empty.
    pub fn remove_fave(&mut self, hash: &str) -> bool {
        let Some(fave) = self.find_fave(hash) else {
            return false;
        };
        let parent = self.get(fave).parent;
        self.remove_subtree(fave);
        if let Some(parent) = parent {
            self.update_null_item(parent);
            self.refresh_ancestor_checks(Some(parent));
        }
        if let Some(fave_root) = self.fave_root
            && self.get(fave_root).children.is_empty()
        {
            self.remove_fave_folder();
        }
        true
    }

    pub fn update_fave_item(&mut self, current_hash: &str, new_hash: &str, new_name: &str) -> bool {
        let Some(id) = self.find_fave(current_hash) else {
            return false;
        };
        let node = self.get_mut(id);
        node.name = new_name.to_string();
        if let NodeKind::Filter { hash, .. } = &mut node.kind {
            *hash = new_hash.to_string();
        }
        true
    }

    /// Applies a previously requested subfolder rename. The name is made
    /// unique among the sibling folders; a leading `!` becomes the warning
    /// flag as for created folders.
    pub fn rename_fave_subfolder<S: AsRef<str>>(&mut self, path: &[S], new_name: &str) -> bool {
        let (new_name, warning) = split_warning_prefix(new_name);
        if new_name.is_empty() {
            return false;
        }
        let Some(folder) = self.fave_subfolder_from_path(path) else {
            return false;
        };
        let node = self.get(folder);
        if !node.is_fave_subfolder() {
            return false;
        }
        let Some(parent) = node.parent else {
            return false;
        };
        let siblings: Vec<String> = self
            .get(parent)
            .children
            .iter()
            .filter(|c| **c != folder)
            .map(|c| self.get(*c))
            .filter(|n| n.is_folder())
            .map(|n| remove_warning_prefix(&n.name).to_string())
            .collect();
        let node = self.get_mut(folder);
        node.name = make_unique_name(new_name, &siblings);
        node.warning = warning;
        self.sort_faves();
        true
    }

    /* ========================== Requests (notify) ========================== */

    /// Asks the controller to create a "New folder" below the fave folder or
    /// a fave subfolder. Returns the requested fave path.
    pub fn request_fave_subfolder_creation(&mut self, folder: NodeId) -> Option<String> {
        let node = self.nodes.get(folder)?;
        if !node.is_fave_root() && !node.is_fave_subfolder() {
            return None;
        }
        let existing: Vec<String> = node
            .children
            .iter()
            .map(|c| self.get(*c))
            .filter(|n| n.is_folder())
            .map(|n| n.name.clone())
            .collect();
        let name = make_unique_name(&self.options.new_fave_folder_label, &existing);
        let mut path = self.fave_path_of(folder)?;
        path.push(name);
        let joined = join_fave_path(&path);
        self.emit(TreeEvent::FaveSubfolderCreationRequested(joined.clone()));
        Some(joined)
    }

    /// Starts an in-place edit of `id`. Only faves and fave subfolders are
    /// editable.
    pub fn begin_edit(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if !node.editable {
            return false;
        }
        self.editing = Some((id, node.name.clone()));
        self.set_current(crate::core::selection::Cell::label(id));
        true
    }

    pub fn begin_edit_selected(&mut self) -> bool {
        match self.selected_item().or_else(|| self.selected_folder()) {
            Some(id) => self.begin_edit(id),
            None => false,
        }
    }

    #[must_use]
    pub fn text_before_editing(&self) -> Option<&str> {
        self.editing.as_ref().map(|(_, text)| text.as_str())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Ends the edit and emits the rename request. The tree is left as is;
    /// the controller applies `update_fave_item` / `rename_fave_subfolder`.
    pub fn finish_rename(&mut self, new_text: &str) -> bool {
        let Some((id, old_name)) = self.editing.take() else {
            return false;
        };
        if new_text.is_empty() || new_text == old_name {
            return false;
        }
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if let Some(hash) = node.hash().filter(|_| node.is_fave()) {
            self.emit(TreeEvent::FaveRenamed {
                hash: hash.to_string(),
                new_name: new_text.to_string(),
            });
            return true;
        }
        if node.is_fave_subfolder() {
            let Some(path) = self.fave_path_of(id) else {
                return false;
            };
            self.emit(TreeEvent::FaveSubfolderRenamed {
                path: join_fave_path(&path),
                old_name,
                new_name: new_text.to_string(),
            });
            return true;
        }
        false
    }
}
