use std::collections::HashSet;

use crate::core::{
    node::NodeId,
    store::{EXPANDED_FOLDERS_KEY, SettingsStore, StoreError},
    text::join_tree_path,
    tree::FilterTree,
};

impl FilterTree {
    /* ========================= Expand / collapse =========================== */

    #[must_use]
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.is_folder() && n.expanded)
    }

    pub fn expand(&mut self, id: NodeId) {
        self.set_expanded(id, true);
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.set_expanded(id, false);
    }

    pub fn toggle_expanded(&mut self, id: NodeId) {
        let expanded = self.is_expanded(id);
        self.set_expanded(id, !expanded);
    }

    fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.is_folder()
        {
            node.expanded = expanded;
        }
    }

    pub fn expand_all(&mut self) {
        self.set_all_expanded(true);
    }

    pub fn collapse_all(&mut self) {
        self.set_all_expanded(false);
    }

    fn set_all_expanded(&mut self, expanded: bool) {
        for node in self.nodes.values_mut() {
            if node.is_folder() {
                node.expanded = expanded;
            }
        }
    }

    pub fn expand_fave_folder(&mut self) {
        if let Some(id) = self.fave_root {
            self.expand(id);
        }
    }

    pub(super) fn expand_ancestors(&mut self, id: NodeId) {
        let mut current = self.get(id).parent;
        while let Some(cur) = current {
            self.set_expanded(cur, true);
            current = self.get(cur).parent;
        }
    }

    /* ======================= Expanded-path projection ====================== */

    /// Tab-joined paths of every expanded folder, depth first. While the
    /// model is disabled the last captured list is returned unchanged.
    pub fn capture_expanded_paths(&mut self) -> Vec<String> {
        if !self.model_enabled {
            return self.expanded_folder_paths.clone();
        }
        let mut paths = Vec::new();
        self.walk(self.root, &mut |id, node| {
            if node.is_folder() && node.expanded {
                paths.push(id);
            }
        });
        self.expanded_folder_paths = paths
            .into_iter()
            .map(|id| join_tree_path(&self.path_of(id)))
            .collect();
        self.expanded_folder_paths.clone()
    }

    /// Expands the folders listed in `paths` and collapses all the others.
    pub fn restore_expanded_paths(&mut self, paths: &[String]) {
        let wanted: HashSet<&str> = paths.iter().map(String::as_str).collect();
        let mut folders = Vec::new();
        self.walk(self.root, &mut |id, node| {
            if node.is_folder() {
                folders.push(id);
            }
        });
        for id in folders {
            let expanded = wanted.contains(join_tree_path(&self.path_of(id)).as_str());
            self.set_expanded(id, expanded);
        }
    }

    /// Re-applies the list captured last or read by `load_settings`.
    pub fn restore_expanded_folders(&mut self) {
        let paths = self.expanded_folder_paths.clone();
        self.restore_expanded_paths(&paths);
    }

    #[must_use]
    pub fn expanded_folder_paths(&self) -> &[String] {
        &self.expanded_folder_paths
    }

    /* =============================== Settings ============================== */

    pub fn load_settings(&mut self, settings: &dyn SettingsStore) -> Result<(), StoreError> {
        self.visibility.load()?;
        if let Some(paths) = settings.string_list(EXPANDED_FOLDERS_KEY) {
            self.expanded_folder_paths = paths;
        }
        Ok(())
    }

    pub fn save_settings(&mut self, settings: &mut dyn SettingsStore) -> Result<(), StoreError> {
        if self.selection_mode {
            self.save_filters_visibility();
        }
        let paths = self.capture_expanded_paths();
        log::debug!("saving {} expanded folder paths", paths.len());
        settings.set_string_list(EXPANDED_FOLDERS_KEY, paths);
        self.visibility.save()
    }
}
