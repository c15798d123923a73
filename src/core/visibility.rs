use crate::core::{
    node::{CheckState, NodeId, NodeKind},
    selection::{Cell, Column},
    tree::FilterTree,
};

/* ============================ Mode switching =============================== */

impl FilterTree {
    #[must_use]
    pub fn is_selection_mode(&self) -> bool {
        self.selection_mode
    }

    #[must_use]
    pub fn is_model_enabled(&self) -> bool {
        self.model_enabled
    }

    /// Entries added from now on carry a checkbox. Callers rebuild the tree
    /// afterwards so hidden filters show up too.
    pub fn enable_selection_mode(&mut self) {
        self.selection_mode = true;
    }

    /// Persists every checkbox into the visibility store, then drops the
    /// checkbox column.
    pub fn disable_selection_mode(&mut self) {
        self.selection_mode = false;
        self.save_filters_visibility();
        for node in self.nodes.values_mut() {
            node.check = None;
        }
    }

    pub fn enable_model(&mut self) {
        if self.selection_mode {
            self.uncheck_fully_unchecked_folders();
        }
        self.model_enabled = true;
    }

    pub fn disable_model(&mut self) {
        self.model_enabled = false;
    }

    /* ============================ Checkbox state =========================== */

    #[must_use]
    pub fn check_state(&self, id: NodeId) -> Option<CheckState> {
        self.nodes.get(id).and_then(|n| n.check)
    }

    /// A leaf's checkbox when it has one, the stored visibility otherwise.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let node = self.get(id);
        match (node.check, node.hash()) {
            (Some(state), _) => state == CheckState::Checked,
            (None, Some(hash)) => self.visibility.is_visible(hash),
            (None, None) => true,
        }
    }

    /// Sets `id` and, for folders, every descendant checkbox; then recomputes
    /// the ancestors. No-op on nodes without a checkbox.
    pub fn set_visibility(&mut self, id: NodeId, visible: bool) {
        if self.get(id).check.is_none() {
            log::debug!("set_visibility on a node without checkbox ignored");
            return;
        }
        let state = CheckState::from_visible(visible);
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let node = self.get_mut(cur);
            if node.check.is_some() {
                node.check = Some(state);
            }
            stack.extend(node.children.iter().copied());
        }
        let parent = self.get(id).parent;
        self.refresh_ancestor_checks(parent);
    }

    /// User click on a checkbox: anything but fully checked becomes checked.
    pub fn toggle_visibility(&mut self, id: NodeId) {
        let checked = self.get(id).check == Some(CheckState::Checked);
        self.set_visibility(id, !checked);
    }

    /// A checkbox cell was edited by the user. Label cells are ignored.
    pub fn on_item_changed(&mut self, cell: Cell, checked: bool) {
        if cell.column != Column::Visibility {
            return;
        }
        if let Some(id) = self.cell_node(cell) {
            self.set_visibility(id, checked);
        }
    }

    /// Recomputes folder checkboxes from `start` upward. Stops as soon as a
    /// folder keeps its state since nothing above can change then.
    pub(super) fn refresh_ancestor_checks(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let node = self.get(id);
            let parent = node.parent;
            let Some(old) = node.check else {
                current = parent;
                continue;
            };

            let new = self.state_from_children(id).unwrap_or(old);
            if new == old {
                return;
            }
            self.get_mut(id).check = Some(new);
            current = parent;
        }
    }

    /// Forces unchecked every folder with no checked filter below it.
    pub fn uncheck_fully_unchecked_folders(&mut self) {
        let top: Vec<NodeId> = self.get(self.root).children.clone();
        for child in top {
            if self.get(child).is_folder() {
                self.uncheck_fully_unchecked_in(child);
            }
        }
    }

    /// Returns whether `folder` is fully unchecked.
    fn uncheck_fully_unchecked_in(&mut self, folder: NodeId) -> bool {
        let children = self.get(folder).children.clone();
        let mut fully_unchecked = true;
        for child in children {
            let (is_folder, checked) = {
                let node = self.get(child);
                (
                    matches!(node.kind, NodeKind::Folder { .. }),
                    node.is_filter() && node.check == Some(CheckState::Checked),
                )
            };
            if is_folder {
                if !self.uncheck_fully_unchecked_in(child) {
                    fully_unchecked = false;
                }
            } else if checked {
                fully_unchecked = false;
            }
        }
        let derived = if fully_unchecked {
            Some(CheckState::Unchecked)
        } else {
            self.state_from_children(folder)
        };
        let node = self.get_mut(folder);
        if let (Some(_), Some(state)) = (node.check, derived) {
            node.check = Some(state);
        }
        fully_unchecked
    }

    /// Folder state implied by the checkboxes of its direct children; `None`
    /// when no child has one.
    fn state_from_children(&self, id: NodeId) -> Option<CheckState> {
        let mut checked = false;
        let mut unchecked = false;
        let mut partial = false;
        for &child in &self.get(id).children {
            match self.get(child).check {
                Some(CheckState::Checked) => checked = true,
                Some(CheckState::Unchecked) => unchecked = true,
                Some(CheckState::Partial) => partial = true,
                None => {}
            }
        }
        match (checked, unchecked, partial) {
            (false, false, false) => None,
            (true, false, false) => Some(CheckState::Checked),
            (false, true, false) => Some(CheckState::Unchecked),
            _ => Some(CheckState::Partial),
        }
    }

    /// Writes every checkbox-bearing leaf into the visibility store.
    pub(super) fn save_filters_visibility(&mut self) {
        let mut states = Vec::new();
        self.walk(self.root, &mut |_, node| {
            if let (Some(hash), Some(state)) = (node.hash(), node.check) {
                states.push((hash.to_string(), state == CheckState::Checked));
            }
        });
        log::debug!("saving visibility of {} filters", states.len());
        for (hash, visible) in states {
            self.visibility.set_visibility(&hash, visible);
        }
    }
}
