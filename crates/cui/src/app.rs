use crate::persistence::JsonFileStore;
use anyhow::{Context, Result};
use cropmatch_core::{
    Album, AlbumDetail, CardRecord, Catalog, DescriptionEntry, ImageRef, InputEvent, Judgment,
    Phase, ProblemPresentation, RenderCommand, RoundEngine, Session, SessionSummary, VideoLink,
};
use cropmatch_data::{
    load_catalog, load_descriptions, load_round_config, AssetDirResolver, CATALOG_FILE,
    DESCRIPTIONS_FILE,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub const DEFAULT_RUN_SEED: u64 = 0xC0FFEE;
const MAX_EVENT_LOG: usize = 200;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub assets: PathBuf,
    pub save_path: PathBuf,
    pub target: Option<String>,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Round,
    Album,
}

#[derive(Debug, Clone)]
pub struct DebugCard {
    pub index: usize,
    pub total: usize,
    pub problem: ProblemPresentation,
}

/// What the round screen currently shows, rebuilt from render commands.
#[derive(Debug, Clone, Default)]
pub struct RoundView {
    pub slots: Vec<CardRecord>,
    pub problem: Option<ProblemPresentation>,
    pub timer_text: Option<String>,
    pub judgment: Option<Judgment>,
    pub round_summary: Option<String>,
    pub session_summary: Option<SessionSummary>,
    pub paused: bool,
    pub debug_card: Option<DebugCard>,
    pub error: Option<String>,
}

impl RoundView {
    pub fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::ShowHand { slots } => {
                self.slots = slots.clone();
                self.debug_card = None;
                self.session_summary = None;
                self.error = None;
            }
            RenderCommand::ShowProblem(problem) => self.problem = Some(problem.clone()),
            RenderCommand::ShowTimer(text) => self.timer_text = Some(text.clone()),
            RenderCommand::HideTimer => self.timer_text = None,
            RenderCommand::ShowJudgment(judgment) => self.judgment = Some(*judgment),
            RenderCommand::ClearRoundPanel => {
                self.judgment = None;
                self.session_summary = None;
            }
            RenderCommand::ShowRoundSummary {
                round,
                rounds,
                score,
                combo,
            } => {
                self.round_summary = Some(format!(
                    "round {round}/{rounds} done | score {score} | combo {combo}"
                ));
            }
            RenderCommand::ShowSessionSummary(summary) => {
                self.session_summary = Some(summary.clone());
                self.slots.clear();
                self.problem = None;
                self.timer_text = None;
                self.round_summary = None;
            }
            RenderCommand::ShowPauseOverlay => self.paused = true,
            RenderCommand::HidePauseOverlay => self.paused = false,
            RenderCommand::HideRoundUi => {
                self.slots.clear();
                self.problem = None;
                self.timer_text = None;
                self.judgment = None;
                self.session_summary = None;
                self.paused = false;
            }
            RenderCommand::ShowDebugCard {
                index,
                total,
                problem,
            } => {
                self.debug_card = Some(DebugCard {
                    index: *index,
                    total: *total,
                    problem: problem.clone(),
                });
            }
            RenderCommand::ShowError(message) => {
                self.error = Some(message.clone());
                self.slots.clear();
                self.problem = None;
                self.debug_card = None;
            }
            RenderCommand::Quit => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlbumView {
    pub album: Album,
    pub cursor: usize,
    pub detail: Option<AlbumDetail>,
    pub video_prompt: Option<VideoLink>,
}

pub struct App {
    pub seed: u64,
    pub engine: RoundEngine<JsonFileStore>,
    pub album_catalog: Option<Catalog>,
    pub descriptions: Vec<DescriptionEntry>,
    pub view: RoundView,
    pub screen: Screen,
    pub album: AlbumView,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

struct Loaded {
    engine: RoundEngine<JsonFileStore>,
    album_catalog: Option<Catalog>,
    descriptions: Vec<DescriptionEntry>,
    startup_notes: Vec<String>,
}

fn build_engine(settings: &AppSettings) -> Result<Loaded> {
    let config = load_round_config(&settings.assets).context("load round config")?;
    let images = AssetDirResolver::new(&settings.assets);
    let catalog_path = settings.assets.join(CATALOG_FILE);
    let mut startup_notes = Vec::new();
    let catalog = match load_catalog(&catalog_path, &images, settings.target.as_deref()) {
        Ok((catalog, skipped)) => {
            for row in skipped {
                startup_notes.push(format!("skipped line {}: {}", row.line, row.reason));
            }
            catalog
        }
        Err(err) => {
            // An empty catalog halts the engine at setup and shows the error.
            tracing::error!(error = %format!("{err:#}"), "catalog unavailable");
            startup_notes.push(format!("error: {err:#}"));
            Catalog::default()
        }
    };
    // A target narrows the rounds only; the album keeps every card.
    let album_catalog = match settings.target.as_deref() {
        Some(_) => match load_catalog(&catalog_path, &images, None) {
            Ok((full, _)) => Some(full),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "album falls back to the round catalog");
                None
            }
        },
        None => None,
    };
    let descriptions = load_descriptions(&settings.assets.join(DESCRIPTIONS_FILE))
        .context("load descriptions")?;
    let session = Session::open(JsonFileStore::new(&settings.save_path));
    Ok(Loaded {
        engine: RoundEngine::new(config, catalog, session, settings.seed),
        album_catalog,
        descriptions,
        startup_notes,
    })
}

impl App {
    pub fn bootstrap(settings: &AppSettings) -> Result<Self> {
        let Loaded {
            engine,
            album_catalog,
            descriptions,
            startup_notes,
        } = build_engine(settings)?;
        let mut app = Self {
            seed: settings.seed,
            engine,
            album_catalog,
            descriptions,
            view: RoundView::default(),
            screen: Screen::Round,
            album: AlbumView::default(),
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            show_help: false,
            should_quit: false,
        };
        for line in startup_notes {
            app.push_event_line(line);
        }
        let save_line = format!("ready | save file {}", app.save_path().display());
        app.push_status(save_line);
        app.engine.start();
        app.flush_render();
        Ok(app)
    }

    pub fn on_tick(&mut self, delta: f32) {
        if self.screen == Screen::Album && self.engine.phase() == Phase::AwaitingInput {
            // A round that starts behind the album must not run its clock.
            self.send(InputEvent::TogglePause);
        }
        self.engine.tick(delta);
        self.flush_render();
    }

    pub fn send(&mut self, input: InputEvent) {
        self.engine.handle(input);
        self.flush_render();
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn save_path(&self) -> &Path {
        self.engine.session().store().path()
    }

    pub fn request_quit(&mut self) {
        self.send(InputEvent::Quit);
        if !self.should_quit {
            self.push_status("pause (p) first to quit, or finish the session");
        }
    }

    pub fn activate_primary(&mut self) {
        match self.engine.phase() {
            Phase::SessionEnd => self.send(InputEvent::Continue),
            Phase::Paused => self.send(InputEvent::Resume),
            _ => self.push_status(self.next_hint()),
        }
    }

    pub fn next_hint(&self) -> String {
        match self.engine.phase() {
            Phase::AwaitingInput => {
                format!("pick the matching card (1-{})", self.view.slots.len())
            }
            Phase::Paused => "paused: r resume | q quit".to_string(),
            Phase::Judging => "next round soon".to_string(),
            Phase::SessionEnd => "c continue | q quit".to_string(),
            Phase::DebugBrowse => "debug: left/right browse | F12 exit".to_string(),
            Phase::Halted => "fix the asset data and restart | q quit".to_string(),
            Phase::Setup | Phase::RoundEnd | Phase::Terminated => String::new(),
        }
    }

    pub fn toggle_album(&mut self) {
        match self.screen {
            Screen::Round => self.open_album(),
            Screen::Album => self.close_album(),
        }
    }

    pub fn open_album(&mut self) {
        if self.engine.phase() == Phase::AwaitingInput {
            self.send(InputEvent::TogglePause);
        }
        let catalog = self
            .album_catalog
            .as_ref()
            .unwrap_or_else(|| self.engine.catalog());
        let album = Album::build(
            catalog,
            self.descriptions.iter().cloned(),
            self.engine.session().record(),
        );
        self.album = AlbumView {
            album,
            ..AlbumView::default()
        };
        self.screen = Screen::Album;
        self.push_status(format!(
            "album: {}/{} unlocked",
            self.album.album.unlocked_count(),
            self.album.album.entries().len()
        ));
    }

    pub fn close_album(&mut self) {
        self.screen = Screen::Round;
        self.album.detail = None;
        self.album.video_prompt = None;
        self.push_status(self.next_hint());
    }

    pub fn album_move(&mut self, down: bool) {
        let len = self.album.album.entries().len();
        move_index(&mut self.album.cursor, len, down);
        self.album.detail = None;
        self.album.video_prompt = None;
    }

    pub fn album_show_detail(&mut self) {
        let Some(entry) = self.album.album.entries().get(self.album.cursor) else {
            return;
        };
        let detail = self.album.album.detail(&entry.variant_id);
        if let AlbumDetail::Locked(message) = &detail {
            self.push_status(*message);
        }
        self.album.detail = Some(detail);
    }

    pub fn album_video_prompt(&mut self) {
        if let Some(AlbumDetail::Unlocked {
            video: Some(video), ..
        }) = self.album.detail.as_ref()
        {
            self.album.video_prompt = Some(video.clone());
        }
    }

    pub fn album_confirm_video(&mut self) {
        if let Some(video) = self.album.video_prompt.take() {
            tracing::info!(url = %video.url, "video link confirmed");
            self.push_status(format!("open in a browser: {}", video.url));
        }
    }

    pub fn album_back(&mut self) {
        if self.album.video_prompt.take().is_some() {
            return;
        }
        if self.album.detail.take().is_some() {
            return;
        }
        self.close_album();
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    fn flush_render(&mut self) {
        let drained = self.engine.drain_render();
        for command in drained {
            if let Some(line) = format_command(&command) {
                self.push_event_line(line);
            }
            if command == RenderCommand::Quit {
                self.should_quit = true;
            }
            self.view.apply(&command);
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

fn move_index(value: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *value = 0;
        return;
    }
    if down {
        *value = (*value + 1) % len;
    } else if *value == 0 {
        *value = len - 1;
    } else {
        *value -= 1;
    }
}

fn format_command(command: &RenderCommand) -> Option<String> {
    let line = match command {
        RenderCommand::ShowHand { slots } => format!("dealt {} cards", slots.len()),
        RenderCommand::ShowJudgment(judgment) => format!(
            "{} +{} (combo {})",
            judgment.headline(),
            judgment.awarded,
            judgment.combo
        ),
        RenderCommand::ShowRoundSummary {
            round,
            rounds,
            score,
            ..
        } => format!("round {round}/{rounds} finished, score {score}"),
        RenderCommand::ShowSessionSummary(summary) => format!(
            "session over: {} (best {}){}",
            summary.final_score,
            summary.high_score,
            if summary.beaten { " new record" } else { "" }
        ),
        RenderCommand::ShowPauseOverlay => "paused".to_string(),
        RenderCommand::HidePauseOverlay => "resumed".to_string(),
        RenderCommand::HideRoundUi => "debug browse".to_string(),
        RenderCommand::ShowDebugCard { index, total, problem } => format!(
            "debug card {}/{}: {}",
            index + 1,
            total,
            problem.source.variant_id
        ),
        RenderCommand::ShowError(message) => format!("error: {message}"),
        RenderCommand::Quit => "quit".to_string(),
        RenderCommand::ShowProblem(_)
        | RenderCommand::ShowTimer(_)
        | RenderCommand::HideTimer
        | RenderCommand::ClearRoundPanel => return None,
    };
    Some(line)
}

pub fn image_label(image: &ImageRef) -> String {
    Path::new(image.as_str())
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.to_string())
}

pub fn slot_label(slot: usize, card: &CardRecord) -> String {
    format!("[{}] {}", slot + 1, image_label(&card.image))
}

pub fn problem_label(problem: &ProblemPresentation) -> String {
    format!("{} crop {}", image_label(&problem.source.image), problem.crop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropmatch_core::Rect;

    fn card(variant: &str) -> CardRecord {
        CardRecord::new(
            1,
            variant,
            ImageRef::new(format!("assets/units/{variant}.png")),
            Rect::new(2.0, 4.0, 60.0, 40.0),
        )
    }

    #[test]
    fn view_tracks_round_commands() {
        let mut view = RoundView::default();
        view.apply(&RenderCommand::ShowHand {
            slots: vec![card("a"), card("b")],
        });
        view.apply(&RenderCommand::ShowTimer("Time left: 9s".into()));
        view.apply(&RenderCommand::ShowPauseOverlay);
        assert_eq!(view.slots.len(), 2);
        assert!(view.paused);
        view.apply(&RenderCommand::HideRoundUi);
        assert!(view.slots.is_empty());
        assert!(view.timer_text.is_none());
        assert!(!view.paused);
    }

    #[test]
    fn session_summary_replaces_round_ui() {
        let mut view = RoundView::default();
        view.apply(&RenderCommand::ShowHand {
            slots: vec![card("a")],
        });
        view.apply(&RenderCommand::ShowSessionSummary(SessionSummary {
            final_score: 9000,
            high_score: 4000,
            beaten: true,
        }));
        assert!(view.slots.is_empty());
        assert_eq!(view.session_summary.as_ref().map(|s| s.final_score), Some(9000));
        view.apply(&RenderCommand::ClearRoundPanel);
        assert!(view.session_summary.is_none());
    }

    #[test]
    fn labels_hide_directories() {
        let record = card("knight_alt");
        assert_eq!(slot_label(0, &record), "[1] knight_alt");
        let problem = ProblemPresentation {
            source: record.clone(),
            crop: record.crop,
        };
        assert_eq!(problem_label(&problem), "knight_alt crop (2,4 60x40)");
    }

    fn unique_temp_dir() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "cropmatch_cui_app_test_{}_{}",
            std::process::id(),
            nanos
        ));
        std::fs::create_dir_all(dir.join("units")).expect("mkdir");
        dir
    }

    #[test]
    fn targeted_rounds_keep_the_full_album() {
        let dir = unique_temp_dir();
        for name in ["knight", "knight_alt", "archer"] {
            std::fs::write(dir.join("units").join(format!("{name}.png")), b"").expect("image");
        }
        std::fs::write(
            dir.join(CATALOG_FILE),
            "\
unitId,imagePath,variantId,cropX,cropY,cropWidth,cropHeight
1,units/knight,knight_a,0,0,120,80
1,units/knight_alt,knight_b,8,8,64,64
2,units/archer,archer_a,0,0,64,64
",
        )
        .expect("catalog");
        let settings = AppSettings {
            assets: dir.clone(),
            save_path: dir.join("save.json"),
            target: Some("knight_b".to_string()),
            seed: 3,
        };
        let mut app = App::bootstrap(&settings).expect("bootstrap");
        assert_eq!(app.engine.catalog().len(), 1);

        app.open_album();
        assert_eq!(app.screen, Screen::Album);
        let ids: Vec<_> = app
            .album
            .album
            .entries()
            .iter()
            .map(|entry| entry.variant_id.as_str())
            .collect();
        assert_eq!(ids, vec!["knight_a", "knight_b", "archer_a"]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn move_index_wraps() {
        let mut cursor = 0;
        move_index(&mut cursor, 3, false);
        assert_eq!(cursor, 2);
        move_index(&mut cursor, 3, true);
        assert_eq!(cursor, 0);
        move_index(&mut cursor, 0, true);
        assert_eq!(cursor, 0);
    }
}
