use std::path::PathBuf;

use chrono::Local;
use miernik_core::{Config, Session};
use ratatui::widgets::TableState;

pub enum InputMode {
    Normal,
    OpeningFile,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    Programs,
    Categories,
}

pub struct App {
    pub session: Session,
    pub months_state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub view: ResultView,
    pub status: Option<String>,
}

impl App {
    pub fn new(config: Config, file: Option<PathBuf>) -> App {
        let mut months_state = TableState::default();
        months_state.select(Some(0));

        let mut app = App {
            session: Session::new(config),
            months_state,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            view: ResultView::Programs,
            status: None,
        };
        if let Some(path) = file {
            app.open(path);
        }
        app
    }

    pub fn next(&mut self) {
        let i = match self.months_state.selected() {
            Some(i) if i >= 11 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.months_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let i = match self.months_state.selected() {
            Some(0) | None => 11,
            Some(i) => i - 1,
        };
        self.months_state.select(Some(i));
    }

    pub fn toggle_month(&mut self) {
        if let Some(i) = self.months_state.selected() {
            self.status = None;
            self.session.toggle_month(i as u32 + 1);
        }
    }

    pub fn select_all(&mut self) {
        self.status = None;
        self.session.select_all_months();
    }

    pub fn deselect_all(&mut self) {
        self.status = None;
        self.session.deselect_all_months();
    }

    pub fn process(&mut self) {
        self.status = None;
        if self.session.process() {
            if let Some(agg) = &self.session.aggregate {
                self.status = Some(format!(
                    "Przetworzono {} wierszy ({} pominiętych)",
                    agg.included_rows, agg.skipped_rows
                ));
            }
        }
    }

    pub fn export(&mut self) {
        let dir = self
            .session
            .config()
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        self.status = self
            .session
            .export(&dir, Local::now().date_naive())
            .map(|path| format!("Zapisano {}", path.display()));
    }

    pub fn switch_view(&mut self) {
        self.view = match self.view {
            ResultView::Programs => ResultView::Categories,
            ResultView::Categories => ResultView::Programs,
        };
    }

    pub fn enter_open_mode(&mut self) {
        self.input_mode = InputMode::OpeningFile;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_command(&mut self) {
        let path = self.input.trim().to_string();
        if !path.is_empty() {
            self.open(PathBuf::from(path));
        }
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn open(&mut self, path: PathBuf) {
        self.status = None;
        if self.session.load_file(&path) {
            self.status = Some(format!("Wczytano {} wierszy", self.session.records.len()));
        }
    }
}
