use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::door_form::{DoorForm, RoomChoice, room_choices};
use crate::error::Error;
use crate::hierarchy::{SelectionTarget, load_hierarchy};
use crate::store::Store;
use crate::types::Door;

use super::tree::{
    TreeNode, TreeNodeKind, build_tree, find_parent_index, find_visible_index, flatten_tree,
    get_node_at, set_all_expanded, set_expanded_at, toggle_expanded_at,
};
use super::ui;

const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub created_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingName,
    EditingNotes,
    /// Blocking dialog; any of Enter/Esc/q dismisses it.
    Message {
        title: String,
        text: String,
        is_error: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Doors,
    Detail,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Tree => Self::Doors,
            Self::Doors => Self::Detail,
            Self::Detail => Self::Tree,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Tree => Self::Detail,
            Self::Doors => Self::Tree,
            Self::Detail => Self::Doors,
        }
    }
}

pub struct App<S: Store> {
    pub running: bool,
    pub mode: InputMode,
    pub focus: Focus,
    pub tree: Vec<TreeNode>,
    pub selected_index: usize,
    pub all_expanded: bool,
    /// Room the door list is filtered by; `None` lists every door.
    pub door_filter: Option<i64>,
    pub doors: Vec<Door>,
    pub door_index: usize,
    pub form: Option<DoorForm>,
    pub room_choices: Vec<RoomChoice>,
    pub input_buffer: String,
    pub status: Option<StatusMessage>,
    store: S,
}

impl<S: Store> App<S> {
    pub fn new(store: S) -> Self {
        let mut app = Self {
            running: true,
            mode: InputMode::Normal,
            focus: Focus::Tree,
            tree: Vec::new(),
            selected_index: 0,
            all_expanded: false,
            door_filter: None,
            doors: Vec::new(),
            door_index: 0,
            form: None,
            room_choices: Vec::new(),
            input_buffer: String::new(),
            status: None,
            store,
        };
        app.reload();
        app
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            message: message.into(),
            created_at: Instant::now(),
        });
    }

    fn clear_expired_status(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TIMEOUT {
                self.status = None;
            }
        }
    }

    fn show_error(&mut self, err: &Error) {
        tracing::error!("{err}");
        self.mode = InputMode::Message {
            title: "Database Error".to_string(),
            text: err.to_string(),
            is_error: true,
        };
    }

    fn show_info(&mut self, title: &str, text: impl Into<String>) {
        self.mode = InputMode::Message {
            title: title.to_string(),
            text: text.into(),
            is_error: false,
        };
    }

    /// Reloads tree, door list and room selector from the store, keeping
    /// the current tree cursor and any unsaved form.
    pub fn reload(&mut self) {
        let previous = get_node_at(&self.tree, self.selected_index).and_then(TreeNode::selection);

        match load_hierarchy(&self.store) {
            Ok(sections) => {
                self.tree = build_tree(&sections);
                if self.all_expanded {
                    set_all_expanded(&mut self.tree, true);
                }
                self.selected_index = previous
                    .and_then(|sel| find_visible_index(&self.tree, sel))
                    .unwrap_or(0);
            }
            Err(e) => {
                self.show_error(&e);
                return;
            }
        }

        match room_choices(&self.store) {
            Ok(choices) => self.room_choices = choices,
            Err(e) => {
                self.show_error(&e);
                return;
            }
        }

        let door_index = self.door_index;
        if self.load_doors(self.door_filter) {
            self.door_index = door_index.min(self.doors.len().saturating_sub(1));
        }

        let clean_form = self
            .form
            .as_ref()
            .filter(|f| !f.is_dirty())
            .map(|f| f.door_id);
        if let Some(door_id) = clean_form {
            self.load_form(door_id);
        }
    }

    /// Repopulates the door list. Returns false when the query failed.
    fn load_doors(&mut self, room_id: Option<i64>) -> bool {
        match self.store.list_doors(room_id) {
            Ok(doors) => {
                self.door_filter = room_id;
                self.doors = doors;
                self.door_index = 0;
                true
            }
            Err(e) => {
                self.show_error(&e);
                false
            }
        }
    }

    fn load_form(&mut self, door_id: i64) {
        match DoorForm::load(&self.store, door_id) {
            Ok(form) => self.form = Some(form),
            Err(e) => {
                self.form = None;
                self.show_error(&e);
            }
        }
    }

    /// Dispatches the `(kind, id)` event of the node under the tree cursor.
    fn apply_tree_selection(&mut self) {
        let Some(node) = get_node_at(&self.tree, self.selected_index) else {
            return;
        };

        match node.selection().map(|sel| sel.target()) {
            Some(SelectionTarget::Door(door_id)) => self.load_form(door_id),
            Some(SelectionTarget::Room(room_id)) => {
                if self.load_doors(Some(room_id)) {
                    self.form = None;
                }
            }
            Some(SelectionTarget::Ignored) => {}
            None => {
                // The unassigned group shows every door again.
                if self.door_filter.is_some() && self.load_doors(None) {
                    self.form = None;
                }
            }
        }
    }

    fn apply_door_selection(&mut self) {
        if let Some(door_id) = self.doors.get(self.door_index).map(|d| d.id) {
            self.load_form(door_id);
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

        result
    }

    fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        while self.running {
            self.clear_expired_status();
            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match &self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EditingName | InputMode::EditingNotes => self.handle_input_key(key),
            InputMode::Message { .. } => self.handle_message_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Char('r') => {
                self.reload();
                if self.mode == InputMode::Normal {
                    self.set_status("Refreshed");
                }
            }
            KeyCode::Char('s') => self.save_form(),
            KeyCode::Char('i') => self.start_edit(InputMode::EditingName),
            KeyCode::Char('o') => self.start_edit(InputMode::EditingNotes),
            KeyCode::Char('[') => self.cycle_room(-1),
            KeyCode::Char(']') => self.cycle_room(1),
            _ => match self.focus {
                Focus::Tree => self.handle_tree_key(key),
                Focus::Doors => self.handle_doors_key(key),
                Focus::Detail => self.handle_detail_key(key),
            },
        }
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => {
                toggle_expanded_at(&mut self.tree, self.selected_index);
            }
            KeyCode::Char('h') | KeyCode::Left => self.collapse_or_go_to_parent(),
            KeyCode::Char('e') => self.toggle_expand_all(),
            _ => {}
        }
    }

    fn handle_doors_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.door_index + 1 < self.doors.len() {
                    self.door_index += 1;
                    self.apply_door_selection();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.door_index > 0 {
                    self.door_index -= 1;
                    self.apply_door_selection();
                }
            }
            KeyCode::Enter => self.apply_door_selection(),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.cycle_room(-1),
            KeyCode::Right => self.cycle_room(1),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                let value = std::mem::take(&mut self.input_buffer);
                let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
                if let Some(form) = self.form.as_mut() {
                    match mode {
                        InputMode::EditingName => form.set_name(value),
                        InputMode::EditingNotes => form.set_notes(value),
                        _ => {}
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.input_buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_message_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(' ')
        ) {
            self.mode = InputMode::Normal;
        }
    }

    fn move_selection_down(&mut self) {
        let flat_len = flatten_tree(&self.tree).len();
        if self.selected_index < flat_len.saturating_sub(1) {
            self.selected_index += 1;
            self.apply_tree_selection();
        }
    }

    fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.apply_tree_selection();
        }
    }

    fn collapse_or_go_to_parent(&mut self) {
        if let Some(node) = get_node_at(&self.tree, self.selected_index) {
            if node.is_expandable() && node.expanded {
                set_expanded_at(&mut self.tree, self.selected_index, false);
                return;
            }
        }

        if let Some(parent_idx) = find_parent_index(&self.tree, self.selected_index) {
            self.selected_index = parent_idx;
            self.apply_tree_selection();
        }
    }

    fn toggle_expand_all(&mut self) {
        self.all_expanded = !self.all_expanded;
        set_all_expanded(&mut self.tree, self.all_expanded);
        if !self.all_expanded {
            // The cursor returns to the first building, which filters
            // nothing: show every door again.
            self.selected_index = 0;
            if self.door_filter.is_some() {
                self.load_doors(None);
            }
            self.apply_tree_selection();
        }
    }

    fn start_edit(&mut self, mode: InputMode) {
        let Some(form) = &self.form else {
            self.set_status("Select a door first");
            return;
        };

        self.input_buffer = match mode {
            InputMode::EditingName => form.name.clone(),
            _ => form.notes.clone(),
        };
        self.mode = mode;
    }

    fn cycle_room(&mut self, delta: isize) {
        let Some(current) = self.form.as_ref().map(|f| f.room_id) else {
            return;
        };
        if self.room_choices.is_empty() {
            return;
        }

        let len = self.room_choices.len() as isize;
        let position = self
            .room_choices
            .iter()
            .position(|c| c.room_id == current)
            .unwrap_or(0) as isize;
        let next = (position + delta).rem_euclid(len) as usize;
        let room_id = self.room_choices[next].room_id;

        let result = match self.form.as_mut() {
            Some(form) => form.select_room(&self.store, room_id),
            None => return,
        };
        if let Err(e) = result {
            self.show_error(&e);
        }
    }

    fn save_form(&mut self) {
        let result = match self.form.as_mut() {
            Some(form) => form.save(&self.store),
            None => {
                self.set_status("Select a door first");
                return;
            }
        };

        match result {
            Ok(()) => {
                self.reload();
                if self.mode == InputMode::Normal {
                    self.show_info("Saved", "Door data saved.");
                }
            }
            Err(e) => self.show_error(&e),
        }
    }

    #[must_use]
    pub fn selected_node_kind(&self) -> Option<&TreeNodeKind> {
        get_node_at(&self.tree, self.selected_index).map(|n| &n.kind)
    }
}

/// Runs the terminal UI until the user quits.
pub fn run_ui<S: Store>(store: S) -> anyhow::Result<()> {
    let mut app = App::new(store);
    app.run()
}

/// Shows a blocking error dialog on its own screen, for failures that
/// happen before there is a store to browse.
pub fn show_error_dialog(text: &str) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = (|| -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| ui::draw_message_dialog(frame, "Database Error", text, true))?;
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q'))
                {
                    return Ok(());
                }
            }
        }
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::types::NodeKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn seeded_app() -> App<SqliteStore> {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.seed().unwrap();
        App::new(store)
    }

    fn type_text(app: &mut App<SqliteStore>, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    /// Moves the tree cursor onto a node, emitting its selection.
    fn select_in_tree(app: &mut App<SqliteStore>, kind: NodeKind, id: i64) {
        set_all_expanded(&mut app.tree, true);
        app.selected_index = 0;
        let target = find_visible_index(&app.tree, crate::hierarchy::Selection { kind, id })
            .expect("node not visible");
        for _ in 0..target {
            app.handle_key_event(key(KeyCode::Down));
        }
    }

    #[test]
    fn test_initial_state_lists_all_doors() {
        let app = seeded_app();
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.doors.len(), 2);
        assert_eq!(app.door_filter, None);
        assert!(app.form.is_none());
        assert!(matches!(
            app.selected_node_kind(),
            Some(TreeNodeKind::Location {
                kind: NodeKind::Building,
                ..
            })
        ));
    }

    #[test]
    fn test_room_selection_filters_doors() {
        let mut app = seeded_app();
        select_in_tree(&mut app, NodeKind::Room, 2);

        assert_eq!(app.door_filter, Some(2));
        assert_eq!(app.doors.len(), 1);
        assert_eq!(app.doors[0].name, "Ingresso Principale");
    }

    #[test]
    fn test_door_selection_loads_form() {
        let mut app = seeded_app();
        select_in_tree(&mut app, NodeKind::Door, 2);

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.name, "Porta Sala Server");
        assert_eq!(form.location, "Edificio A > Piano 1 > Locale CED");
    }

    #[test]
    fn test_door_list_navigation_loads_form() {
        let mut app = seeded_app();
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Doors);

        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.form.as_ref().unwrap().name, "Ingresso Principale");

        app.handle_key_event(key(KeyCode::Down));
        assert_eq!(app.form.as_ref().unwrap().name, "Porta Sala Server");
    }

    #[test]
    fn test_cycle_room_and_save() {
        let mut app = seeded_app();
        select_in_tree(&mut app, NodeKind::Door, 1);
        assert_eq!(app.form.as_ref().unwrap().room_id, Some(2));

        // Choices are None, Locale CED (1), Reception (2).
        app.handle_key_event(key(KeyCode::Char('[')));
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.room_id, Some(1));
        assert_eq!(form.location, "Edificio A > Piano 1 > Locale CED");
        assert!(form.is_dirty());

        app.handle_key_event(key(KeyCode::Char('s')));
        assert!(matches!(app.mode, InputMode::Message { is_error: false, .. }));
        assert_eq!(app.store().get_door(1).unwrap().unwrap().room_id, Some(1));

        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_name_and_notes() {
        let mut app = seeded_app();
        select_in_tree(&mut app, NodeKind::Door, 1);

        app.handle_key_event(key(KeyCode::Char('i')));
        assert_eq!(app.mode, InputMode::EditingName);
        for _ in 0.."Principale".len() {
            app.handle_key_event(key(KeyCode::Backspace));
        }
        type_text(&mut app, "Nord");
        app.handle_key_event(key(KeyCode::Enter));

        app.handle_key_event(key(KeyCode::Char('o')));
        type_text(&mut app, "Badge");
        app.handle_key_event(key(KeyCode::Enter));

        app.handle_key_event(key(KeyCode::Char('s')));
        let door = app.store().get_door(1).unwrap().unwrap();
        assert_eq!(door.name, "Ingresso Nord");
        assert_eq!(door.notes.as_deref(), Some("Badge"));
    }

    #[test]
    fn test_save_error_shows_dialog() {
        let mut app = seeded_app();
        select_in_tree(&mut app, NodeKind::Door, 1);

        app.handle_key_event(key(KeyCode::Char('i')));
        app.input_buffer = "Porta Sala Server".to_string();
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Char('s')));

        match &app.mode {
            InputMode::Message { is_error, text, .. } => {
                assert!(is_error);
                assert!(text.starts_with("already exists"));
            }
            other => panic!("expected error dialog, got {other:?}"),
        }
        assert_eq!(
            app.store().get_door(1).unwrap().unwrap().name,
            "Ingresso Principale"
        );
    }

    #[test]
    fn test_edit_without_door_sets_status() {
        let mut app = seeded_app();
        app.handle_key_event(key(KeyCode::Char('i')));
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(
            app.status.as_ref().map(|s| s.message.as_str()),
            Some("Select a door first")
        );
    }

    #[test]
    fn test_collapse_all_clears_room_filter() {
        let mut app = seeded_app();
        select_in_tree(&mut app, NodeKind::Room, 2);
        assert_eq!(app.door_filter, Some(2));

        // select_in_tree expanded everything by hand; sync the flag first.
        app.all_expanded = true;
        app.handle_key_event(key(KeyCode::Char('e')));

        assert!(!app.all_expanded);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.door_filter, None);
        assert_eq!(app.doors.len(), 2);
        assert_eq!(flatten_tree(&app.tree).len(), 2);
    }

    #[test]
    fn test_quit() {
        let mut app = seeded_app();
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.running);
    }
}
