mod input;
mod view;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        MouseButton, MouseEvent, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use input::{AppAction, app_action, to_key_press};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Position};
use richpad_config::Config;
use richpad_engine::{Editor, EditorSettings, FileStore, KeyOutcome, SaveAck, StorageError};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};
use view::{Hitboxes, Notice, ui};

struct App {
    editor: Editor<FileStore>,
    storage_label: String,
    notice: Option<Notice>,
    hitboxes: Hitboxes,
    should_quit: bool,
}

impl App {
    fn new(editor: Editor<FileStore>) -> Self {
        let storage_label = editor.store().path().display().to_string();
        Self {
            editor,
            storage_label,
            notice: None,
            hitboxes: Hitboxes::default(),
            should_quit: false,
        }
    }

    fn save(&mut self) {
        let result = self.editor.save();
        self.show_save_result(result);
    }

    fn show_save_result(&mut self, result: Result<SaveAck, StorageError>) {
        self.notice = Some(match result {
            Ok(ack) => Notice::info(ack.message),
            Err(e) => {
                log::error!("save failed: {e}");
                Notice::error(format!("Save failed: {e}"))
            }
        });
    }

    fn on_key(&mut self, event: &KeyEvent) {
        if event.kind == KeyEventKind::Release {
            return;
        }
        // An open notice swallows the key that dismisses it
        if self.notice.take().is_some() {
            return;
        }

        match app_action(event) {
            Some(AppAction::Quit) => {
                self.should_quit = true;
                return;
            }
            Some(AppAction::Save) => {
                self.save();
                return;
            }
            None => {}
        }

        let Some(press) = to_key_press(event) else {
            return;
        };
        match self.editor.handle_key(&press) {
            Ok(KeyOutcome::Saved(ack)) => self.show_save_result(Ok(ack)),
            Ok(KeyOutcome::Handled | KeyOutcome::NotHandled) => {}
            Err(e) => self.show_save_result(Err(e)),
        }
    }

    fn on_mouse(&mut self, event: &MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.notice.take().is_some() {
            return;
        }
        if self
            .hitboxes
            .save_button
            .contains(Position::new(event.column, event.row))
        {
            self.save();
        }
    }
}

fn init_logging(log_path: Option<&Path>) -> Result<()> {
    // Logging to the terminal would draw over the editor, so it is only
    // enabled with a file to write to
    let Some(log_path) = log_path else {
        return Ok(());
    };
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    // Determine storage path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", config_path.display());
            process::exit(1);
        }
    };

    let storage_path = match args.len() {
        1 => config.storage_path.clone(),
        2 => PathBuf::from(&args[1]),
        _ => {
            eprintln!("Usage: {} [storage-file]", args[0]);
            process::exit(1);
        }
    };

    init_logging(config.log_path.as_deref())?;
    log::info!("starting with storage {}", storage_path.display());

    let settings = EditorSettings {
        placeholder: config.placeholder.clone(),
        ..EditorSettings::default()
    };
    let editor = match Editor::open(FileStore::new(&storage_path), settings) {
        Ok(editor) => editor,
        Err(e) => {
            log::error!("failed to open {}: {e}", storage_path.display());
            eprintln!(
                "Error: Could not load saved content from '{}': {e}",
                storage_path.display()
            );
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    // Without this Ctrl+Enter arrives as a plain Enter on most terminals
    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(editor);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    if enhanced_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| {
            app.hitboxes = ui(f, &app.editor, &app.storage_label, app.notice.as_ref());
        })?;

        match event::read()? {
            Event::Key(key) => app.on_key(&key),
            Event::Mouse(mouse) => app.on_mouse(&mouse),
            _ => {}
        }
    }
    Ok(())
}
