use anyhow::Result;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{debug, error, info, warn};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::api::ScheduleSource;
use crate::config::settings::{MAX_ROTATION_MINUTES, MIN_ROTATION_MINUTES};
use crate::config::{AppConfig, BackgroundMode};
use crate::error::ScheduleError;
use crate::models::location::choose_initial;
use crate::models::Location;
use crate::schedule::{
    format_schedule, minutes_of_day, Clock, DaySchedule, Highlight, Reconciler, RolloverOutcome,
    RolloverReply, RolloverRequest, ScheduleSink, SystemClock,
};
use crate::tui::events::{Event, EventHandler, LoadReply};
use crate::tui::picker::{LocationPicker, PickerAction};
use crate::tui::theme::Palette;
use crate::tui::timer::Interval;
use crate::tui::widgets::{header, locations, next_prayer, prayers, statusbar};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Failed(String),
}

/// The schedule as last committed by the reconciler; this is what gets drawn.
#[derive(Debug, Default)]
pub struct Board {
    pub schedule: Option<DaySchedule>,
}

impl ScheduleSink for Board {
    fn on_schedule_replaced(&mut self, schedule: &DaySchedule) {
        self.schedule = Some(schedule.clone());
    }

    fn on_schedule_cleared(&mut self) {
        self.schedule = None;
    }
}

pub struct App {
    pub config: AppConfig,
    pub board: Board,
    pub locations: Vec<Location>,
    pub selected: Option<Location>,
    pub load: LoadState,
    pub now: NaiveDateTime,
    pub picker: Option<LocationPicker>,
    pub show_help: bool,
    pub should_quit: bool,
    notice: Option<(String, NaiveDateTime)>,
    reconciler: Reconciler,
    load_generation: u64,
    source: Arc<dyn ScheduleSource>,
    clock: Box<dyn Clock>,
    tx: Sender<Event>,
    persist: bool,
    rotation: Option<Interval>,
}

impl App {
    pub fn new(config: AppConfig, source: Arc<dyn ScheduleSource>, clock: Box<dyn Clock>, tx: Sender<Event>) -> Self {
        let now = clock.now();
        App {
            config,
            board: Board::default(),
            locations: Vec::new(),
            selected: None,
            load: LoadState::Loading,
            now,
            picker: None,
            show_help: false,
            should_quit: false,
            notice: None,
            reconciler: Reconciler::new(),
            load_generation: 0,
            source,
            clock,
            tx,
            persist: true,
            rotation: None,
        }
    }

    /// Keep settings in memory only.
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Kick off the location list fetch and the background rotation timer.
    pub fn start(&mut self) {
        self.fetch_locations();
        self.restart_rotation();
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => self.tick(),
            Event::RotateBackground => self.rotate_background(),
            Event::LocationsLoaded(result) => self.on_locations(result),
            Event::ScheduleLoaded(reply) => self.on_schedule_loaded(reply),
            Event::Rollover(reply) => self.on_rollover(reply),
        }
    }

    // ─── Clock ───────────────────────────────────────────────────────────────

    fn tick(&mut self) {
        self.now = self.clock.now();
        if let Some(request) = self.reconciler.tick(self.now, &mut self.board) {
            self.spawn_rollover(request);
        }
        if self.notice.as_ref().is_some_and(|(_, until)| self.now >= *until) {
            self.notice = None;
        }
    }

    // ─── Fetching ────────────────────────────────────────────────────────────

    fn fetch_locations(&mut self) {
        self.load = LoadState::Loading;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(Event::LocationsLoaded(source.fetch_locations()));
        });
    }

    fn on_locations(&mut self, result: Result<Vec<Location>, crate::error::FetchError>) {
        match result {
            Ok(list) => {
                info!("Loaded {} locations", list.len());
                let initial = choose_initial(&list, self.config.location.id.as_deref()).cloned();
                self.locations = list;
                match initial {
                    Some(location) => self.select_location(location),
                    None => self.load = LoadState::Failed("Daftar lokasi kosong.".to_string()),
                }
            }
            Err(e) => {
                error!("Error loading locations: {}", e);
                self.load = LoadState::Failed("Gagal memuat daftar lokasi. Silakan coba lagi.".to_string());
            }
        }
    }

    fn select_location(&mut self, location: Location) {
        let changed = self.selected.as_ref().map(|l| l.id.as_str()) != Some(location.id.as_str());
        if changed {
            info!("Location set to {} ({})", location.name, location.id);
            self.reconciler.clear(&mut self.board);
        }
        self.selected = Some(location);
        self.load_today();
    }

    /// Fetch today's schedule for the selected location.
    fn load_today(&mut self) {
        let Some(location) = &self.selected else {
            return;
        };
        self.load_generation += 1;
        self.load = LoadState::Loading;

        let location_id = location.id.clone();
        let generation = self.load_generation;
        let date = self.clock.now().date();
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = source.fetch_daily_schedule(&location_id, date);
            let _ = tx.send(Event::ScheduleLoaded(LoadReply {
                location_id,
                generation,
                result,
            }));
        });
    }

    fn on_schedule_loaded(&mut self, reply: LoadReply) {
        let current = self.selected.as_ref().map(|l| l.id.as_str());
        if reply.generation != self.load_generation || current != Some(reply.location_id.as_str()) {
            debug!("Ignoring superseded schedule for {}", reply.location_id);
            return;
        }

        self.now = self.clock.now();
        let formatted = reply
            .result
            .map_err(ScheduleError::from)
            .and_then(|raw| {
                format_schedule(&raw, Highlight::At(minutes_of_day(&self.now))).map_err(ScheduleError::from)
            });

        match formatted {
            Ok(schedule) => {
                self.reconciler.replace(schedule, self.now.date(), &mut self.board);
                self.load = LoadState::Idle;
                self.remember_location();
                // Settle the highlight and start rollover right away if the day is already over.
                self.tick();
            }
            Err(e) => {
                error!("Error loading prayer times: {}", e);
                self.load = LoadState::Failed(e.user_message().to_string());
            }
        }
    }

    fn spawn_rollover(&self, request: RolloverRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let reply = request.execute(source.as_ref());
            let _ = tx.send(Event::Rollover(reply));
        });
    }

    fn on_rollover(&mut self, reply: RolloverReply) {
        self.now = self.clock.now();
        let selected = self.selected.as_ref().map(|l| l.id.as_str());
        match self.reconciler.complete_rollover(reply, selected, self.now, &mut self.board) {
            RolloverOutcome::Applied => debug!("Next day's schedule applied"),
            RolloverOutcome::Discarded => {}
            // The board keeps the passed schedule until [r].
            RolloverOutcome::Failed(e) => warn!("Could not load next day's schedule: {}", e),
        }
    }

    /// Manual reload: refetch whatever failed or is stale.
    fn reload(&mut self) {
        if self.locations.is_empty() {
            self.fetch_locations();
        } else {
            self.load_today();
        }
    }

    // ─── Settings ────────────────────────────────────────────────────────────

    fn remember_location(&mut self) {
        let Some(location) = &self.selected else {
            return;
        };
        if self.config.location.id.as_deref() == Some(location.id.as_str()) {
            return;
        }
        self.config.location.id = Some(location.id.clone());
        self.config.location.name = Some(location.name.clone());
        self.save_config();
    }

    fn save_config(&self) {
        if !self.persist {
            return;
        }
        if let Err(e) = self.config.save() {
            warn!("Could not save settings: {:#}", e);
        }
    }

    fn show_notice(&mut self, text: String) {
        self.notice = Some((text, self.now + ChronoDuration::seconds(3)));
    }

    /// (Re)create the rotation timer from the current background settings.
    fn restart_rotation(&mut self) {
        self.rotation = None;
        let bg = &self.config.background;
        if bg.rotates() {
            let period = bg.rotation_period();
            self.rotation = Some(Interval::start(
                "background",
                period,
                self.tx.clone(),
                || Event::RotateBackground,
            ));
        }
    }

    fn rotate_background(&mut self) {
        if !self.config.background.rotates() {
            return;
        }
        self.config.background.advance();
        debug!("Background image {}", self.config.background.current_index);
        self.save_config();
    }

    fn set_rotation_minutes(&mut self, minutes: u64) {
        let minutes = minutes.clamp(MIN_ROTATION_MINUTES, MAX_ROTATION_MINUTES);
        if minutes == self.config.background.rotation_minutes {
            return;
        }
        self.config.background.rotation_minutes = minutes;
        self.save_config();
        self.restart_rotation();
        self.show_notice(format!("Ganti latar tiap {} menit", minutes));
    }

    fn toggle_background_mode(&mut self) {
        self.config.background.mode = match self.config.background.mode {
            BackgroundMode::Auto => BackgroundMode::Static,
            BackgroundMode::Static => BackgroundMode::Auto,
        };
        self.save_config();
        self.restart_rotation();
        let label = match self.config.background.mode {
            BackgroundMode::Auto => "otomatis",
            BackgroundMode::Static => "statis",
        };
        self.show_notice(format!("Latar {}", label));
    }

    // ─── Keys ────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses; some terminals also send release/repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(picker) = self.picker.as_mut() {
            match picker.handle_key(key, &self.locations) {
                PickerAction::None => {}
                PickerAction::Cancel => self.picker = None,
                PickerAction::Choose(location) => {
                    self.picker = None;
                    self.select_location(location);
                }
            }
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('l') => {
                if self.locations.is_empty() {
                    self.show_notice("Daftar lokasi belum dimuat".to_string());
                } else {
                    let current = self.selected.as_ref().map(|l| l.id.as_str());
                    self.picker = Some(LocationPicker::open(&self.locations, current));
                }
            }
            KeyCode::Char('t') => {
                self.config.display.theme_color = self.config.display.theme_color.next();
                self.save_config();
                self.show_notice(format!("Tema {}", self.config.display.theme_color.as_str()));
            }
            KeyCode::Char('d') => {
                self.config.display.dark_mode = !self.config.display.dark_mode;
                self.save_config();
            }
            KeyCode::Char('1') => {
                self.config.display.show_terbit = !self.config.display.show_terbit;
                self.save_config();
            }
            KeyCode::Char('2') => {
                self.config.display.show_dhuha = !self.config.display.show_dhuha;
                self.save_config();
            }
            KeyCode::Char('n') => {
                self.config.display.show_next_label = !self.config.display.show_next_label;
                self.save_config();
            }
            KeyCode::Char('b') => self.toggle_background_mode(),
            KeyCode::Char('+') => self.set_rotation_minutes(self.config.background.rotation_minutes.saturating_add(1)),
            KeyCode::Char('-') => {
                self.set_rotation_minutes(self.config.background.rotation_minutes.saturating_sub(1))
            }
            _ => {}
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    pub fn draw(&self, frame: &mut Frame) {
        let palette = Palette::new(self.config.display.theme_color, self.config.display.dark_mode);
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(palette.base()), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let notice = self.notice.as_ref().map(|(text, _)| text.as_str());
        let notice = notice.or(match self.load {
            LoadState::Loading if self.board.schedule.is_some() => Some("Memuat..."),
            _ => None,
        });
        statusbar::render(frame, outer[1], &palette, self.config.background.current(), notice);

        let column = centered_column(outer[0], 60);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // header
                Constraint::Length(3), // next prayer
                Constraint::Min(0),    // schedule
            ])
            .split(column);

        let location_name = self.selected.as_ref().map(|l| l.name.as_str());
        header::render(
            frame,
            chunks[0],
            &palette,
            self.now,
            location_name,
            self.config.display.hijri_offset,
        );

        match (&self.board.schedule, &self.load) {
            (Some(schedule), LoadState::Idle | LoadState::Loading) => {
                let view = next_prayer::next_prayer_view(schedule, self.now);
                next_prayer::render(frame, chunks[1], &palette, view.as_ref());
                prayers::render(frame, chunks[2], &palette, schedule, &self.config.display);
            }
            (_, LoadState::Failed(message)) => {
                self.draw_message(frame, chunks[1].union(chunks[2]), &palette, message, true);
            }
            (None, _) => {
                self.draw_message(frame, chunks[1].union(chunks[2]), &palette, "Memuat jadwal shalat...", false);
            }
        }

        if let Some(picker) = &self.picker {
            locations::render(frame, &palette, picker, &self.locations);
        }
        if self.show_help {
            self.draw_help_overlay(frame, &palette);
        }
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, palette: &Palette, message: &str, is_error: bool) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                if is_error { palette.error() } else { palette.dim() },
            )),
        ];
        if is_error {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[r]", palette.accent().add_modifier(Modifier::BOLD)),
                Span::styled(" Coba Lagi", palette.bold()),
            ]));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border())
            .style(palette.surface());
        let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame, palette: &Palette) {
        let area = frame.area();

        // Center a help box
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).max(14).min(area.height),
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[l]", "Pilih lokasi"),
            ("[r]", "Muat ulang jadwal"),
            ("[t]", "Ganti warna tema"),
            ("[d]", "Mode gelap"),
            ("[1] / [2]", "Tampilkan Terbit / Dhuha"),
            ("[n]", "Label \"Berikutnya\""),
            ("[b]", "Latar otomatis / statis"),
            ("[+] / [-]", "Interval ganti latar"),
            ("[?]", "Bantuan"),
            ("[Esc]", "Keluar"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Tombol",
                palette.accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), palette.accent()),
                Span::styled(label, palette.dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Bantuan ", palette.accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.accent())
            .style(palette.surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

fn centered_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Run the board until the user quits.
pub fn run(config: AppConfig, source: Arc<dyn ScheduleSource>) -> Result<()> {
    let events = EventHandler::new();
    let mut app = App::new(config, source, Box::new(SystemClock), events.sender());
    app.start();

    let mut terminal = ratatui::init();
    events.spawn_input();
    let _clock = Interval::start("clock", TICK_PERIOD, events.sender(), || Event::Tick);

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;

            app.handle_event(events.next()?);
            if app.should_quit {
                return Ok(());
            }
        }
    })();

    ratatui::restore();
    result
}
