//! Controller state and the main event loop.

pub mod sort;

mod popup;
mod render;
mod selection;
mod viewport;

use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;

use remdu_core::{display_path, Backend, BackendError};
use remdu_scan::{scan, Dir, Entry, ScanHandle};

use crate::event::KeyAction;
use crate::help::help_text;
use crate::theme::Theme;
use crate::TuiConfig;

use self::popup::{PendingAction, Popup, MENU_CONFIRM};
use self::selection::SelectionSet;
use self::sort::{compute_permutation, SortRow, SortState};
use self::viewport::{advance, ViewportMap};

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// The navigation controller: owns the current directory, the per-directory
/// viewport and selection state, and runs the event loop merging user input
/// with the discovery engine's channels.
pub struct App {
    backend: Arc<dyn Backend>,
    backend_name: String,
    theme: Theme,

    root: Option<Arc<Dir>>,
    current: Option<Arc<Dir>>,
    /// Display path of the current directory.
    path: String,
    /// Snapshot of the current directory's children, discovery order.
    entries: Vec<Entry>,
    /// Identity keys and attributes aligned with `entries`, refreshed on
    /// every re-sort.
    rows: Vec<SortRow>,
    /// Per-child read-error text aligned with `entries`.
    row_errors: Vec<Option<String>>,
    /// Display rank -> underlying index.
    sort_perm: Vec<usize>,
    /// Underlying index -> display rank, kept for O(1) rank lookups.
    #[allow(dead_code)]
    inv_sort_perm: Vec<usize>,
    sort: SortState,

    viewports: ViewportMap,
    selection: SelectionSet,
    popup: Option<Popup>,

    /// Rows available for the listing, re-derived on every draw.
    list_height: usize,
    /// Whether background discovery is still running.
    listing: bool,
    visual_select: bool,
    show_graph: bool,
    show_counts: bool,
    show_average: bool,
    human_readable: bool,

    clipboard: Option<arboard::Clipboard>,
    quit: bool,
    force_clear: bool,
    needs_redraw: bool,
}

impl App {
    /// Create an application with default config.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_config(backend, TuiConfig::default())
    }

    /// Create an application with custom config.
    pub fn with_config(backend: Arc<dyn Backend>, config: TuiConfig) -> Self {
        let backend_name = backend.name();
        Self {
            backend,
            backend_name,
            theme: Theme::default(),
            root: None,
            current: None,
            path: "Waiting for root...".to_string(),
            entries: Vec::new(),
            rows: Vec::new(),
            row_errors: Vec::new(),
            sort_perm: Vec::new(),
            inv_sort_perm: Vec::new(),
            sort: SortState::new(config.sort_key),
            viewports: ViewportMap::default(),
            selection: SelectionSet::default(),
            popup: None,
            list_height: 20, // updated on every draw
            listing: false,
            visual_select: false,
            show_graph: config.show_graph,
            show_counts: config.show_counts,
            show_average: config.show_average,
            human_readable: config.human_readable,
            clipboard: arboard::Clipboard::new().ok(),
            quit: false,
            force_clear: false,
            needs_redraw: true,
        }
    }

    /// Run the event loop until the user quits or discovery fails fatally.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        let ScanHandle {
            mut root,
            mut done,
            mut updates,
        } = scan(Arc::clone(&self.backend));
        self.listing = true;

        let mut events = EventStream::new();
        let mut root_pending = true;
        let mut done_pending = true;
        let mut updates_open = true;

        while !self.quit {
            if self.force_clear {
                terminal.clear()?;
                self.force_clear = false;
                self.needs_redraw = true;
            }
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                // input first keeps the UI responsive under update storms;
                // the remaining sources are each low-frequency
                biased;

                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_action(KeyAction::from_key_event(key));
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => return Err(err.into()),
                        None => self.quit = true,
                    }
                    self.needs_redraw = true;
                }

                received = &mut root, if root_pending => {
                    root_pending = false;
                    // the sender is dropped without a root on a fatal error;
                    // the done branch surfaces it
                    if let Ok(dir) = received {
                        self.root = Some(Arc::clone(&dir));
                        self.set_current_dir(dir);
                    }
                    self.needs_redraw = true;
                }

                finished = &mut done, if done_pending => {
                    done_pending = false;
                    match finished {
                        Ok(Err(err)) => return Err(err.into()),
                        Ok(Ok(())) | Err(_) => self.listing = false,
                    }
                    self.needs_redraw = true;
                }

                changed = updates.recv(), if updates_open => {
                    match changed {
                        // something changed somewhere: refresh the attrs of
                        // the displayed directory and re-sort, nothing else
                        Some(()) => self.sort_current_dir(),
                        None => updates_open = false,
                    }
                    self.needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    /// Make `dir` the active directory, re-deriving everything from the
    /// node's current state. Selection and visual-select mode never survive
    /// a directory change.
    fn set_current_dir(&mut self, dir: Arc<Dir>) {
        self.path = display_path(&self.backend_name, &dir.path());
        self.entries = dir.entries();
        self.current = Some(dir);
        self.selection.clear();
        self.visual_select = false;
        self.sort_current_dir();
        tracing::debug!(path = %self.path, entries = self.entries.len(), "directory changed");
    }

    /// Refresh the attribute snapshot for the current entries and recompute
    /// the sort permutation. Does not re-fetch children.
    fn sort_current_dir(&mut self) {
        self.rows.clear();
        self.row_errors.clear();
        if let Some(dir) = &self.current {
            for (index, entry) in self.entries.iter().enumerate() {
                let (attrs, error) = dir.attr_at(index);
                self.rows.push(SortRow {
                    key: entry.path(),
                    attrs,
                });
                self.row_errors.push(error);
            }
        }
        let (perm, inverse) = compute_permutation(&self.rows, self.sort);
        self.sort_perm = perm;
        self.inv_sort_perm = inverse;
    }

    /// Move the cursor by `delta` display rows. In visual-select mode the
    /// row the cursor leaves is toggled, so large jumps toggle only their
    /// departure row.
    fn move_cursor(&mut self, delta: isize) {
        if self.current.is_none() {
            return;
        }
        if self.visual_select {
            self.toggle_select_for_cursor();
        }
        let pos = self.viewports.get(&self.path);
        let pos = advance(pos, delta, self.entries.len(), self.list_height);
        self.viewports.set(&self.path, pos);
    }

    /// Toggle the cursor row in or out of the selection.
    fn toggle_select_for_cursor(&mut self) {
        let pos = self.viewports.get(&self.path);
        let Some(&underlying) = self.sort_perm.get(pos.entry) else {
            return;
        };
        let key = self.entries[underlying].path();
        self.selection.toggle(&key, pos);
    }

    /// Enter the directory under the cursor; no-op on leaves and empty
    /// listings.
    fn enter(&mut self) {
        let Some(current) = &self.current else {
            return;
        };
        let pos = self.viewports.get(&self.path);
        let Some(&underlying) = self.sort_perm.get(pos.entry) else {
            return;
        };
        if let Some(dir) = current.dir_at(underlying) {
            self.set_current_dir(dir);
        }
    }

    /// Go up to the parent directory; no-op at the root.
    fn ascend(&mut self) {
        let Some(parent) = self.current.as_ref().and_then(|d| d.parent()) else {
            return;
        };
        self.set_current_dir(parent);
    }

    /// Stage a deletion: the selection if one exists, else the cursor entry.
    fn delete(&mut self) {
        if self.current.is_none() || self.entries.is_empty() {
            return;
        }
        if self.selection.is_empty() {
            self.delete_single();
        } else {
            self.delete_selected();
        }
    }

    fn delete_single(&mut self) {
        let pos = self.viewports.get(&self.path);
        let Some(&underlying) = self.sort_perm.get(pos.entry) else {
            return;
        };
        let entry = &self.entries[underlying];
        let target = display_path(&self.backend_name, &entry.path());
        let text = if entry.is_dir() {
            vec![
                "Purge this directory?".to_string(),
                "ALL entries in it will be deleted".to_string(),
                target,
            ]
        } else {
            vec!["Delete this file?".to_string(), target]
        };
        self.popup = Some(Popup::staged(
            text,
            PendingAction::DeleteSingle { index: underlying },
        ));
    }

    fn delete_selected(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.popup = Some(Popup::staged(
            vec![
                "Delete selected entries?".to_string(),
                format!("ALL {} entries will be deleted", self.selection.len()),
            ],
            PendingAction::DeleteSelected,
        ));
    }

    /// Resolve the staged popup menu: run the pending action on confirm,
    /// then replace the popup with a result or error notice.
    fn handle_menu_confirm(&mut self) {
        let Some(popup) = self.popup.take() else {
            return;
        };
        let Some(menu) = popup.menu else {
            self.popup = Some(popup);
            return;
        };
        let result = if menu.selected == MENU_CONFIRM {
            match menu.action {
                PendingAction::DeleteSingle { index } => self.execute_delete_single(index),
                PendingAction::DeleteSelected => self.execute_delete_selected(),
            }
        } else {
            Ok("Aborted!".to_string())
        };
        self.popup = Some(match result {
            Ok(message) => Popup::notice(vec!["Finished:".to_string(), message]),
            Err(err) => Popup::notice(vec!["error:".to_string(), err.to_string()]),
        });
    }

    /// Delete the entry at `index`, synchronously. The UI is unresponsive
    /// for the duration; that is the accepted trade-off.
    fn execute_delete_single(&mut self, index: usize) -> Result<String, BackendError> {
        let Some(entry) = self.entries.get(index).cloned() else {
            return Ok("Aborted!".to_string());
        };
        let message = match &entry {
            Entry::File { path, .. } => {
                self.backend.delete_file(path)?;
                "Successfully deleted file!"
            }
            Entry::Dir { dir, .. } => {
                self.backend.purge(&dir.path())?;
                "Successfully purged directory!"
            }
        };
        self.remove_entry(index);
        self.clamp_cursor();
        Ok(message.to_string())
    }

    /// Delete every selected entry, resolving saved viewport positions
    /// through the current permutation. Aborts on the first backend error;
    /// entries deleted before the failure stay deleted on the backend. The
    /// in-memory tree is only updated once the whole batch succeeded,
    /// highest index first so the remaining indices stay valid.
    fn execute_delete_selected(&mut self) -> Result<String, BackendError> {
        let selected = self.selection.snapshot();
        let mut to_remove = Vec::with_capacity(selected.len());

        for (key, pos) in selected {
            let Some(&underlying) = self.sort_perm.get(pos.entry) else {
                continue;
            };
            match &self.entries[underlying] {
                Entry::File { path, .. } => self.backend.delete_file(path)?,
                Entry::Dir { dir, .. } => self.backend.purge(&dir.path())?,
            }
            self.selection.remove(&key);
            to_remove.push(underlying);
        }

        to_remove.sort_unstable_by(|a, b| b.cmp(a));
        if let Some(dir) = self.current.clone() {
            for index in to_remove {
                dir.remove_child_at(index);
            }
            self.set_current_dir(dir);
        }
        self.clamp_cursor();
        Ok("Successfully deleted all entries!".to_string())
    }

    /// Remove a child from the in-memory tree and re-derive the display
    /// state from the node.
    fn remove_entry(&mut self, index: usize) {
        if let Some(dir) = self.current.clone() {
            dir.remove_child_at(index);
            self.set_current_dir(dir);
        }
    }

    /// Step the cursor back onto a valid entry after deletions shrank the
    /// listing.
    fn clamp_cursor(&mut self) {
        let pos = self.viewports.get(&self.path);
        if pos.entry >= self.entries.len() {
            self.move_cursor(-1);
        }
    }

    /// Show `text`, or hide the popup when the same text is already showing.
    fn toggle_popup(&mut self, text: Vec<String>) {
        match &self.popup {
            Some(popup) if popup.text == text => self.popup = None,
            _ => self.popup = Some(Popup::notice(text)),
        }
    }

    fn copy_path(&mut self) {
        // degraded to a no-op when the capability is missing
        if let Some(clipboard) = self.clipboard.as_mut() {
            let _ = clipboard.set_text(self.path.clone());
        }
    }

    /// Dispatch one decoded key press.
    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit => {
                if self.popup.is_some() {
                    self.popup = None;
                } else {
                    self.quit = true;
                }
            }
            KeyAction::MoveDown => self.move_cursor(1),
            KeyAction::MoveUp => self.move_cursor(-1),
            KeyAction::PageDown => self.move_cursor(self.list_height as isize),
            KeyAction::PageUp => self.move_cursor(-(self.list_height as isize)),
            KeyAction::MoveLeft => {
                if let Some(popup) = &mut self.popup {
                    if let Some(menu) = &mut popup.menu {
                        menu.shift(-1);
                    }
                } else {
                    self.ascend();
                }
            }
            KeyAction::MoveRight => {
                if let Some(popup) = &mut self.popup {
                    if let Some(menu) = &mut popup.menu {
                        menu.shift(1);
                    }
                } else {
                    self.enter();
                }
            }
            KeyAction::Confirm => {
                if self.popup.as_ref().is_some_and(|p| p.menu.is_some()) {
                    self.handle_menu_confirm();
                } else {
                    self.enter();
                }
            }
            KeyAction::ToggleCounts => self.show_counts = !self.show_counts,
            KeyAction::ToggleGraph => self.show_graph = !self.show_graph,
            KeyAction::ToggleAverage => self.show_average = !self.show_average,
            KeyAction::ToggleHumanReadable => self.human_readable = !self.human_readable,
            KeyAction::SortByName => self.toggle_sort(sort::SortKey::Name),
            KeyAction::SortBySize => self.toggle_sort(sort::SortKey::Size),
            KeyAction::SortByCount => self.toggle_sort(sort::SortKey::Count),
            KeyAction::SortByAverageSize => self.toggle_sort(sort::SortKey::AverageSize),
            KeyAction::ToggleSelect => self.toggle_select_for_cursor(),
            KeyAction::ToggleVisualSelect => self.visual_select = !self.visual_select,
            KeyAction::Delete => self.delete(),
            KeyAction::DeleteSelected => self.delete_selected(),
            KeyAction::CopyPath => self.copy_path(),
            KeyAction::DisplayPath => {
                self.toggle_popup(vec!["Current path".to_string(), self.path.clone()]);
            }
            KeyAction::Help => self.toggle_popup(help_text(self.clipboard.is_some())),
            KeyAction::Refresh => self.force_clear = true,
            KeyAction::None => {}
        }
        self.needs_redraw = true;
    }

    fn toggle_sort(&mut self, key: sort::SortKey) {
        self.sort.toggle(key);
        self.sort_current_dir();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remdu_core::MemoryBackend;
    use remdu_scan::scan;

    fn sample_backend() -> Arc<MemoryBackend> {
        let backend = MemoryBackend::new("mem:");
        backend.add_file("a", Some(10));
        backend.add_file("b", Some(100));
        backend.add_file("c", Some(5));
        backend.add_file("docs/one.txt", Some(1));
        backend.add_file("docs/two.txt", Some(2));
        Arc::new(backend)
    }

    async fn scanned_app(backend: Arc<MemoryBackend>) -> App {
        let handle = scan(backend.clone() as Arc<dyn Backend>);
        handle.done.await.unwrap().unwrap();
        let root = handle.root.await.unwrap();
        let mut app = App::with_config(backend, TuiConfig::default());
        app.root = Some(Arc::clone(&root));
        app.set_current_dir(root);
        app
    }

    fn display_names(app: &App) -> Vec<String> {
        app.sort_perm
            .iter()
            .map(|&i| app.entries[i].name().to_string())
            .collect()
    }

    /// Move the cursor onto a display rank and toggle selection there.
    fn select_rank(app: &mut App, rank: usize) {
        let pos = app.viewports.get(&app.path);
        app.move_cursor(rank as isize - pos.entry as isize);
        app.handle_action(KeyAction::ToggleSelect);
    }

    #[tokio::test]
    async fn test_size_descending_is_the_default_order() {
        let app = scanned_app(sample_backend()).await;
        // docs holds 3 bytes, so: b(100), a(10), c(5), docs(3)
        assert_eq!(display_names(&app), ["b", "a", "c", "docs"]);
    }

    #[tokio::test]
    async fn test_enter_and_ascend_restore_viewports() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::SortByName);
        assert_eq!(display_names(&app), ["a", "b", "c", "docs"]);

        app.move_cursor(3); // onto docs
        app.handle_action(KeyAction::Confirm);
        assert_eq!(app.path, "mem:/docs");
        assert_eq!(app.entries.len(), 2);
        // fresh directory starts at the top
        assert_eq!(app.viewports.get(&app.path).entry, 0);

        app.move_cursor(1);
        app.handle_action(KeyAction::MoveLeft);
        assert_eq!(app.path, "mem:");
        // the parent's cursor survived the round trip
        assert_eq!(app.viewports.get(&app.path).entry, 3);

        app.handle_action(KeyAction::Confirm);
        assert_eq!(app.path, "mem:/docs");
        // and so did the child's
        assert_eq!(app.viewports.get(&app.path).entry, 1);
    }

    #[tokio::test]
    async fn test_enter_on_leaf_is_a_noop() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::Confirm); // cursor on "b", a file
        assert_eq!(app.path, "mem:");
    }

    #[tokio::test]
    async fn test_ascend_at_root_is_a_noop() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::MoveLeft);
        assert_eq!(app.path, "mem:");
        assert!(app.current.is_some());
    }

    #[tokio::test]
    async fn test_sort_toggle_flips_direction() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::SortBySize);
        // size was already active, so the second activation reverses it
        assert_eq!(display_names(&app), ["docs", "c", "a", "b"]);
        app.handle_action(KeyAction::SortBySize);
        assert_eq!(display_names(&app), ["b", "a", "c", "docs"]);
    }

    #[tokio::test]
    async fn test_single_delete_of_only_entry_clamps_cursor() {
        let backend = Arc::new(MemoryBackend::new("mem:"));
        backend.add_file("only.txt", Some(42));
        let mut app = scanned_app(backend.clone()).await;

        app.handle_action(KeyAction::Delete);
        assert!(app.popup.as_ref().is_some_and(|p| p.menu.is_some()));

        app.handle_action(KeyAction::MoveRight); // highlight "confirm"
        app.handle_action(KeyAction::Confirm);

        assert!(app.entries.is_empty());
        assert_eq!(app.viewports.get(&app.path).entry, 0);
        assert!(backend.list("").unwrap().is_empty());
        let popup = app.popup.as_ref().unwrap();
        assert!(popup.menu.is_none());
        assert_eq!(popup.text[0], "Finished:");
    }

    #[tokio::test]
    async fn test_cancel_leaves_everything_untouched() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::Delete);
        // "cancel" is the default selection
        app.handle_action(KeyAction::Confirm);

        assert_eq!(app.entries.len(), 4);
        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.text, ["Finished:", "Aborted!"]);
    }

    #[tokio::test]
    async fn test_purge_directory_through_menu() {
        let backend = sample_backend();
        let mut app = scanned_app(backend.clone()).await;
        app.handle_action(KeyAction::SortByName);

        app.move_cursor(3); // docs
        app.handle_action(KeyAction::Delete);
        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.text[0], "Purge this directory?");

        app.handle_action(KeyAction::MoveRight);
        app.handle_action(KeyAction::Confirm);

        assert_eq!(display_names(&app), ["a", "b", "c"]);
        assert!(backend.list("docs").is_err());
    }

    #[tokio::test]
    async fn test_batch_delete_leaves_unselected_entries_in_order() {
        let backend = Arc::new(MemoryBackend::new("mem:"));
        for (name, size) in [("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5), ("f", 6)] {
            backend.add_file(name, Some(size));
        }
        let mut app = scanned_app(backend.clone()).await;
        app.handle_action(KeyAction::SortByName); // identity permutation

        // selected underlying indices {2, 5, 1}; removal must run 5, 2, 1
        select_rank(&mut app, 2);
        select_rank(&mut app, 5);
        select_rank(&mut app, 1);
        assert_eq!(app.selection.len(), 3);

        app.handle_action(KeyAction::Delete);
        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.text[1], "ALL 3 entries will be deleted");

        app.handle_action(KeyAction::MoveRight);
        app.handle_action(KeyAction::Confirm);

        assert_eq!(display_names(&app), ["a", "d", "e"]);
        assert!(app.selection.is_empty());
        let remaining: Vec<String> = backend
            .list("")
            .unwrap()
            .iter()
            .map(|e| e.name.to_string())
            .collect();
        assert_eq!(remaining, ["a", "d", "e"]);
    }

    #[tokio::test]
    async fn test_batch_failure_shows_error_and_keeps_tree() {
        let backend = sample_backend();
        let mut app = scanned_app(backend.clone()).await;
        app.handle_action(KeyAction::SortByName);

        select_rank(&mut app, 0);
        // yank the file out from under the controller so the delete fails
        backend.delete_file("a").unwrap();

        app.handle_action(KeyAction::DeleteSelected);
        app.handle_action(KeyAction::MoveRight);
        app.handle_action(KeyAction::Confirm);

        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.text[0], "error:");
        assert!(popup.menu.is_none());
        // the in-memory tree was not touched
        assert_eq!(app.entries.len(), 4);
    }

    #[tokio::test]
    async fn test_visual_select_toggles_departure_rows() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::SortByName);
        app.handle_action(KeyAction::ToggleVisualSelect);

        app.handle_action(KeyAction::MoveDown); // leaves a, cursor on b
        app.handle_action(KeyAction::MoveDown); // leaves b, cursor on c

        assert!(app.selection.is_selected("a"));
        assert!(app.selection.is_selected("b"));
        assert!(!app.selection.is_selected("c"));

        // moving up leaves c (toggled on), then leaves b again (toggled off)
        app.handle_action(KeyAction::MoveUp);
        app.handle_action(KeyAction::MoveUp);
        assert!(app.selection.is_selected("c"));
        assert!(!app.selection.is_selected("b"));
        assert_eq!(app.selection.len(), 2);
    }

    #[tokio::test]
    async fn test_directory_change_clears_selection_and_visual_mode() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::SortByName);
        app.handle_action(KeyAction::ToggleVisualSelect);
        app.handle_action(KeyAction::MoveDown); // leaves a selected
        assert!(!app.selection.is_empty());

        app.move_cursor(2); // onto docs, leaving b selected on the way
        app.handle_action(KeyAction::Confirm); // enter docs

        assert!(app.selection.is_empty());
        assert!(!app.visual_select);
    }

    #[tokio::test]
    async fn test_display_path_popup_toggles_off() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::DisplayPath);
        assert!(app.popup.is_some());
        app.handle_action(KeyAction::DisplayPath);
        assert!(app.popup.is_none());
    }

    #[tokio::test]
    async fn test_quit_dismisses_popup_first() {
        let mut app = scanned_app(sample_backend()).await;
        app.handle_action(KeyAction::Delete);
        assert!(app.popup.is_some());

        app.handle_action(KeyAction::Quit);
        assert!(app.popup.is_none());
        assert!(!app.quit);

        app.handle_action(KeyAction::Quit);
        assert!(app.quit);
    }

    #[tokio::test]
    async fn test_update_resort_keeps_entries_but_refreshes_attrs() {
        let backend = sample_backend();
        let mut app = scanned_app(backend.clone()).await;
        let before = app.entries.len();

        // simulate a subtree-changed notification
        app.sort_current_dir();

        assert_eq!(app.entries.len(), before);
        assert_eq!(app.sort_perm.len(), before);
        for (rank, &index) in app.sort_perm.iter().enumerate() {
            assert_eq!(app.inv_sort_perm[index], rank);
        }
    }
}
