//! Board state and control flow for the terminal UI.
//!
//! The app owns the foreground [`Controller`] and layers the interactive
//! state on top of it: which button is selected, the free-text index field,
//! the edit dialog, the sound picker and the status line. Picked files are
//! copied on a worker thread; the result comes back over a channel and is
//! applied on the UI thread.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, MediaKeyCode, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use log::{debug, error, info};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use super::edit_dialog::{EditDialog, EditFocus};
use super::picker::Picker;
use super::ui;
use crate::config::Config;
use crate::constants::{PRESS_FLASH_MS, STATUS_MESSAGE_SECS};
use crate::controller::Controller;
use crate::listener::keys;
use crate::logging::{self, UI_LOG_FILE};
use crate::playback::{AudioOutput, RodioOutput};
use crate::slots::parse_slot_index;
use crate::sounds::import_picked;
use crate::store::{ButtonStore, SqliteStore};

/// Longest text accepted by the index field
const INDEX_INPUT_MAX_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardFocus {
    Buttons,
    IndexField,
}

struct ImportOutcome {
    slot: usize,
    result: crate::Result<PathBuf>,
}

pub struct App<S: ButtonStore, O: AudioOutput> {
    pub controller: Controller<S, O>,
    pub should_quit: bool,
    pub selected: usize,
    pub focus: BoardFocus,
    pub index_input: String,
    pub edit_dialog: Option<EditDialog>,
    pub picker: Option<Picker>,
    pub status: Option<String>,
    status_timer: Option<Instant>,
    pressed: Option<(usize, Instant)>,
    pub importing: Option<usize>,
    import_rx: Option<Receiver<ImportOutcome>>,
    pub media_dir: PathBuf,
    /// Size of the last drawn frame, for mouse hit-testing
    pub screen: Rect,
}

impl<S: ButtonStore, O: AudioOutput> App<S, O> {
    pub fn new(controller: Controller<S, O>, media_dir: PathBuf) -> Self {
        Self {
            controller,
            should_quit: false,
            selected: 0,
            focus: BoardFocus::Buttons,
            index_input: String::new(),
            edit_dialog: None,
            picker: None,
            status: None,
            status_timer: None,
            pressed: None,
            importing: None,
            import_rx: None,
            media_dir,
            screen: Rect::default(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.status = Some(message);
        self.status_timer = Some(Instant::now());
    }

    pub fn is_flashing(&self, slot: usize) -> bool {
        matches!(self.pressed, Some((pressed, at))
            if pressed == slot && at.elapsed() < Duration::from_millis(PRESS_FLASH_MS))
    }

    pub fn is_playing_slot(&self, slot: usize) -> bool {
        match (self.controller.playing_path(), self.controller.slot(slot)) {
            (Some(playing), Ok(config)) => playing == config.sound_path,
            _ => false,
        }
    }

    fn flash(&mut self, slot: usize) {
        self.pressed = Some((slot, Instant::now()));
    }

    /// Play a slot. Playback failures are logged only.
    pub fn tap(&mut self, slot: usize) {
        self.selected = slot;
        self.flash(slot);
        match self.controller.tap(slot) {
            Ok(event) => debug!("{event:?}"),
            Err(e) => error!("Button {slot} did not play: {e}"),
        }
    }

    pub fn play_typed_index(&mut self) {
        self.flash(parse_slot_index(&self.index_input));
        match self.controller.play_typed_index(&self.index_input) {
            Ok(event) => debug!("{event:?}"),
            Err(e) => error!("Index {:?} did not play: {e}", self.index_input),
        }
    }

    pub fn stop(&mut self) {
        if let Some(event) = self.controller.stop() {
            debug!("{event:?}");
        }
    }

    /// 2×2 grid navigation; slot = row * 2 + column.
    pub fn move_selection(&mut self, columns: i8, rows: i8) {
        let column = (self.selected % 2) as i8 + columns;
        let row = (self.selected / 2) as i8 + rows;
        self.selected = (row.clamp(0, 1) * 2 + column.clamp(0, 1)) as usize;
    }

    pub fn open_edit(&mut self, slot: usize) {
        self.selected = slot;
        match self.controller.slot(slot) {
            Ok(config) => self.edit_dialog = Some(EditDialog::new(config)),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Write the dialog's label and color; invalid colors keep it open.
    pub fn save_edit(&mut self) {
        let Some((slot, label, color)) = self
            .edit_dialog
            .as_ref()
            .map(|d| (d.slot, d.label.clone(), d.parsed_color()))
        else {
            return;
        };

        let color = match color {
            Ok(color) => color,
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };

        let (current_text, current_color) = match self.controller.slot(slot) {
            Ok(config) => (config.text.clone(), config.color),
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };

        let mut result = Ok(());
        if label != current_text {
            result = self.controller.rename(slot, &label).map(|_| ());
        }
        if result.is_ok() && color != current_color {
            result = self.controller.recolor(slot, color).map(|_| ());
        }

        match result {
            Ok(()) => {
                self.edit_dialog = None;
                self.set_status(format!("Saved button {}", slot + 1));
            }
            Err(e) => {
                error!("Could not save button {slot}: {e}");
                self.set_status(format!("Could not save: {e}"));
            }
        }
    }

    pub fn open_picker(&mut self) {
        if self.importing.is_some() {
            self.set_status("An import is already running");
            return;
        }
        self.picker = Some(Picker::open(&self.media_dir));
    }

    /// Copy `source` for `slot` on a worker thread.
    pub fn start_import(&mut self, slot: usize, source: PathBuf) {
        let private_dir = self.controller.dirs().private.clone();
        let (tx, rx) = mpsc::channel();
        info!("Importing {} for button {slot}", source.display());

        thread::spawn(move || {
            let result = import_picked(&source, &private_dir);
            // The UI may already be gone
            let _ = tx.send(ImportOutcome { slot, result });
        });

        self.import_rx = Some(rx);
        self.importing = Some(slot);
    }

    /// Apply a finished import, if one has arrived.
    pub fn check_import(&mut self) {
        let received = match &self.import_rx {
            Some(rx) => rx.try_recv(),
            None => return,
        };

        let outcome = match received {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                self.import_rx = None;
                self.importing = None;
                self.set_status("Import stopped unexpectedly");
                return;
            }
        };
        self.import_rx = None;
        self.importing = None;

        let slot = outcome.slot;
        let assigned = outcome
            .result
            .and_then(|path| self.controller.assign_sound(slot, path).cloned());

        match assigned {
            Ok(config) => {
                if let Some(dialog) = self.edit_dialog.as_mut()
                    && dialog.slot == slot
                {
                    dialog.label = config.text.clone();
                    dialog.sound_path = config.sound_path.clone();
                }
                self.set_status(format!("Button {} now plays {}", slot + 1, config.text));
            }
            Err(e) => {
                error!("Import for button {slot} failed: {e}");
                self.set_status(format!("Import failed: {e}"));
            }
        }
    }

    pub fn show_listener_status(&mut self) {
        let devices = keys::probe();
        let message = if devices.is_empty() {
            format!("No readable volume-key device: {}", keys::permission_hint())
        } else {
            format!(
                "{} volume-key device(s) readable; run `horn listen` to start the listener",
                devices.len()
            )
        };
        self.set_status(message);
    }

    /// Per-frame housekeeping.
    pub fn tick(&mut self) {
        if let Some(event) = self.controller.poll() {
            debug!("{event:?}");
        }

        self.check_import();

        if let Some(timer) = self.status_timer
            && timer.elapsed() > Duration::from_secs(STATUS_MESSAGE_SECS)
        {
            self.status = None;
            self.status_timer.take();
        }

        if !self.pressed.is_some_and(|(slot, _)| self.is_flashing(slot)) {
            self.pressed = None;
        }
    }
}

pub fn run_board(config: &Config) -> Result<(), Box<dyn Error>> {
    let log_file = logging::init(&config.log_dir, UI_LOG_FILE, false)?;
    info!("Starting horn board, logging to {}", log_file.display());

    let store = SqliteStore::open(&config.database_path())?;
    let output = RodioOutput::open_default()?;
    let controller = Controller::start(store, output, config.sound_dirs())?;
    let mut app = App::new(controller, config.media_dir.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Media keys are only reported through the kitty keyboard protocol
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(stdout, PushKeyboardEnhancementFlags(media_key_flags()))?;
    } else {
        info!("Terminal has no keyboard enhancement; volume keys on the board need +/-");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = res {
        error!("Board stopped: {e}");
    }
    res
}

/// Keyboard protocol flags that make the terminal report media keys while
/// still delivering shifted characters such as `+` as themselves.
fn media_key_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
}

fn run_app<B, S, O>(terminal: &mut Terminal<B>, app: &mut App<S, O>) -> Result<(), Box<dyn Error>>
where
    B: ratatui::backend::Backend,
    S: ButtonStore,
    O: AudioOutput,
{
    loop {
        app.tick();

        let frame = terminal.draw(|f| ui::draw(f, app))?;
        app.screen = frame.area;

        // Poll for events with a short timeout to keep the flash and status timers moving
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => handle_key_event(app, key),
                Event::Mouse(mouse) => handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            app.stop();
            return Ok(());
        }
    }
}

pub fn handle_key_event<S: ButtonStore, O: AudioOutput>(app: &mut App<S, O>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.picker.is_some() {
        handle_picker_keys(app, key);
    } else if app.edit_dialog.is_some() {
        handle_edit_dialog_keys(app, key);
    } else {
        match app.focus {
            BoardFocus::Buttons => handle_board_keys(app, key),
            BoardFocus::IndexField => handle_index_keys(app, key),
        }
    }
}

fn is_volume_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Media(MediaKeyCode::RaiseVolume) | KeyCode::Media(MediaKeyCode::LowerVolume)
    )
}

fn handle_board_keys<S: ButtonStore, O: AudioOutput>(app: &mut App<S, O>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(c @ '1'..='4') => app.tap(c as usize - '1' as usize),
        KeyCode::Left | KeyCode::Char('h') => app.move_selection(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => app.tap(app.selected),
        KeyCode::Char('e') => app.open_edit(app.selected),
        KeyCode::Char('i') => app.focus = BoardFocus::IndexField,
        KeyCode::Char('+') | KeyCode::Char('-') => app.play_typed_index(),
        code if is_volume_key(code) => app.play_typed_index(),
        KeyCode::Char('s') => app.stop(),
        KeyCode::Char('a') => app.show_listener_status(),
        _ => {}
    }
}

fn handle_index_keys<S: ButtonStore, O: AudioOutput>(app: &mut App<S, O>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => app.focus = BoardFocus::Buttons,
        KeyCode::Enter => app.play_typed_index(),
        code if is_volume_key(code) => app.play_typed_index(),
        KeyCode::Backspace => {
            app.index_input.pop();
        }
        KeyCode::Char(c) if app.index_input.chars().count() < INDEX_INPUT_MAX_CHARS => {
            app.index_input.push(c);
        }
        _ => {}
    }
}

fn handle_edit_dialog_keys<S: ButtonStore, O: AudioOutput>(app: &mut App<S, O>, key: KeyEvent) {
    let Some(dialog) = app.edit_dialog.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => app.edit_dialog = None,
        KeyCode::Tab => dialog.next_focus(),
        KeyCode::BackTab => dialog.previous_focus(),
        KeyCode::Enter => {
            if dialog.focus == EditFocus::PickSound {
                app.open_picker();
            } else {
                app.save_edit();
            }
        }
        KeyCode::Backspace => dialog.pop_char(),
        KeyCode::Char(c) => dialog.push_char(c),
        _ => {}
    }
}

fn handle_picker_keys<S: ButtonStore, O: AudioOutput>(app: &mut App<S, O>, key: KeyEvent) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => app.picker = None,
        KeyCode::Up => picker.select_previous(),
        KeyCode::Down => picker.select_next(),
        KeyCode::Backspace => picker.pop_char(),
        KeyCode::Char(c) => picker.push_char(c),
        KeyCode::Enter => {
            let picked = picker.selected_path().map(|p| p.to_path_buf());
            let slot = app.edit_dialog.as_ref().map(|d| d.slot);
            if let (Some(source), Some(slot)) = (picked, slot) {
                app.picker = None;
                app.start_import(slot, source);
            }
        }
        _ => {}
    }
}

pub fn handle_mouse_event<S: ButtonStore, O: AudioOutput>(app: &mut App<S, O>, mouse: MouseEvent) {
    if app.edit_dialog.is_some() || app.picker.is_some() {
        return;
    }

    let MouseEventKind::Down(button) = mouse.kind else {
        return;
    };
    let Some(slot) = ui::button_at(app.screen, mouse.column, mouse.row) else {
        return;
    };

    match button {
        MouseButton::Left => app.tap(slot),
        MouseButton::Right => app.open_edit(slot),
        MouseButton::Middle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SoundDirs;
    use crate::playback::testing::{OutputEvent, Recorder, RecordingOutput};
    use crate::store::SqliteStore;
    use crossterm::event::KeyModifiers;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp_dir: TempDir,
        app: App<SqliteStore, RecordingOutput>,
        recorder: Recorder,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let dirs = SoundDirs {
            bundled: temp_dir.path().join("downloads/sounds"),
            private: temp_dir.path().join("data/sounds"),
        };
        let media_dir = temp_dir.path().join("music");
        fs::create_dir_all(&media_dir).unwrap();

        let (output, recorder) = RecordingOutput::new();
        let store = SqliteStore::open_in_memory().unwrap();
        let controller = Controller::start(store, output, dirs).unwrap();
        let mut app = App::new(controller, media_dir);
        app.screen = Rect::new(0, 0, 80, 30);

        Fixture {
            temp_dir,
            app,
            recorder,
        }
    }

    fn press(app: &mut App<SqliteStore, RecordingOutput>, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App<SqliteStore, RecordingOutput>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn started(recorder: &Recorder) -> Vec<PathBuf> {
        recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                OutputEvent::Started(path) => Some(path),
                OutputEvent::Stopped(_) => None,
            })
            .collect()
    }

    fn sound(app: &App<SqliteStore, RecordingOutput>, slot: usize) -> PathBuf {
        app.controller.slot(slot).unwrap().sound_path.clone()
    }

    #[test]
    fn test_number_keys_tap_and_flash() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();

        press(&mut app, KeyCode::Char('3'));

        assert_eq!(started(&recorder), vec![sound(&app, 2)]);
        assert_eq!(app.selected, 2);
        assert!(app.is_flashing(2));
        assert!(!app.is_flashing(1));
        assert!(app.is_playing_slot(2));
    }

    #[test]
    fn test_arrow_navigation_and_enter() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 3);
        // Clamped at the edge
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.selected, 3);
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected, 0);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(started(&recorder), vec![sound(&app, 2)]);
    }

    #[test]
    fn test_typed_index_plays_clamped_slot() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.focus, BoardFocus::IndexField);
        type_text(&mut app, "99");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.index_input, "99");

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Media(MediaKeyCode::RaiseVolume));

        assert_eq!(started(&recorder), vec![sound(&app, 0), sound(&app, 1)]);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, BoardFocus::Buttons);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_plus_and_minus_play_typed_index() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();
        app.index_input = "3".to_string();

        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('-'));

        assert_eq!(started(&recorder), vec![sound(&app, 3), sound(&app, 3)]);
        assert_eq!(recorder.max_live(), 1);
    }

    #[test]
    fn test_media_key_flags_report_media_and_shifted_keys() {
        let flags = media_key_flags();
        assert!(flags.contains(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES));
        assert!(flags.contains(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES));
        assert!(flags.contains(KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS));
    }

    #[test]
    fn test_volume_keys_and_shifted_plus_play_typed_index() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();
        app.index_input = "2".to_string();

        press(&mut app, KeyCode::Media(MediaKeyCode::LowerVolume));
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('+'), KeyModifiers::SHIFT),
        );

        assert_eq!(started(&recorder), vec![sound(&app, 2), sound(&app, 2)]);
    }

    #[test]
    fn test_stop_key() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();

        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('s'));

        assert_eq!(recorder.live(), 0);
        assert!(!app.controller.is_playing());
    }

    #[test]
    fn test_edit_dialog_saves_label_and_color() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            ..
        } = fixture();

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.edit_dialog.as_ref().unwrap().slot, 0);

        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "Trumpet!!!");
        press(&mut app, KeyCode::Tab);
        for _ in 0..7 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "#102030");
        press(&mut app, KeyCode::Enter);

        assert!(app.edit_dialog.is_none());
        let slot = app.controller.slot(0).unwrap();
        assert_eq!(slot.text, "Trumpet!");
        assert_eq!(slot.color, 0xFF10_2030);
    }

    #[test]
    fn test_edit_dialog_rejects_invalid_color() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            ..
        } = fixture();

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Z");
        press(&mut app, KeyCode::Enter);

        assert!(app.edit_dialog.is_some());
        assert!(app.status.as_deref().unwrap().contains("color"));
        assert_eq!(app.controller.slot(0).unwrap().color, 0xFFFF_6B6B);
    }

    #[test]
    fn test_edit_dialog_escape_discards() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            ..
        } = fixture();

        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "XYZ");
        press(&mut app, KeyCode::Esc);

        assert!(app.edit_dialog.is_none());
        assert_eq!(app.controller.slot(0).unwrap().text, "Honk");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_pick_sound_imports_on_worker() {
        let Fixture {
            temp_dir, mut app, ..
        } = fixture();
        let picked = app.media_dir.join("Tada.wav");
        fs::write(&picked, b"RIFF fake").unwrap();

        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(
            app.edit_dialog.as_ref().unwrap().focus,
            EditFocus::PickSound
        );
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.picker.as_ref().unwrap().filtered_len(), 1);

        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_none());
        assert_eq!(app.importing, Some(1));

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.importing.is_some() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
            app.tick();
        }

        let expected = temp_dir.path().join("data/sounds/Tada");
        let slot = app.controller.slot(1).unwrap();
        assert_eq!(slot.sound_path, expected);
        assert_eq!(slot.text, "Tada");
        assert_eq!(fs::read(&expected).unwrap(), b"RIFF fake");

        // The open dialog follows the import
        let dialog = app.edit_dialog.as_ref().unwrap();
        assert_eq!(dialog.label, "Tada");
        assert_eq!(dialog.sound_path, expected);
    }

    #[test]
    fn test_picker_escape_returns_to_dialog() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            ..
        } = fixture();

        press(&mut app, KeyCode::Char('e'));
        app.edit_dialog.as_mut().unwrap().focus = EditFocus::PickSound;
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_some());

        // Empty media dir: Enter has nothing to import
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_some());
        assert!(app.importing.is_none());

        press(&mut app, KeyCode::Esc);
        assert!(app.picker.is_none());
        assert!(app.edit_dialog.is_some());
    }

    #[test]
    fn test_mouse_left_taps_right_edits() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();
        let areas = ui::button_areas(ui::board_layout(app.screen).grid);
        let click = |kind, area: Rect| MouseEvent {
            kind,
            column: area.x + area.width / 2,
            row: area.y + area.height / 2,
            modifiers: KeyModifiers::NONE,
        };

        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Left), areas[3]));
        assert_eq!(started(&recorder), vec![sound(&app, 3)]);

        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Right), areas[1]));
        assert_eq!(app.edit_dialog.as_ref().unwrap().slot, 1);

        // Clicks are ignored while the dialog is open
        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Left), areas[0]));
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn test_release_events_ignored() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();

        handle_key_event(
            &mut app,
            KeyEvent::new_with_kind(KeyCode::Char('1'), KeyModifiers::NONE, KeyEventKind::Release),
        );
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            ..
        } = fixture();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            ..
        } = fixture();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_status_and_completion_cleared_by_tick() {
        let Fixture {
            temp_dir: _temp_dir,
            mut app,
            recorder,
        } = fixture();

        press(&mut app, KeyCode::Char('4'));
        recorder.finish_all();
        app.tick();
        assert!(!app.controller.is_playing());

        app.show_listener_status();
        assert!(app.status.is_some());
    }
}
