use ratatui::Frame;

use crate::{app::App, session::SessionState, ui};

/// A UI Screen boundary: one per session state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Start screen - empty lane with the instructions on top
pub struct WaitingScreen;

impl Screen for WaitingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let regions = ui::Regions::split(f.area(), false);
        let buf = f.buffer_mut();

        ui::render_title(regions.title, buf);
        ui::render_playfield(app, regions.playfield, buf);
        ui::render_instructions(app.session.config().round_secs, regions.playfield, buf);
        ui::render_input(app, regions.input, buf);
        ui::render_footer(SessionState::Waiting, regions.footer, buf);
    }
}

/// Round in progress
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let regions = ui::Regions::split(f.area(), true);
        let buf = f.buffer_mut();

        ui::render_title(regions.title, buf);
        ui::render_stats(app.session.stats(), regions.stats, buf);
        ui::render_playfield(app, regions.playfield, buf);
        ui::render_input(app, regions.input, buf);
        ui::render_footer(SessionState::Playing, regions.footer, buf);
    }
}

/// Final results over the frozen lane
pub struct GameOverScreen;

impl Screen for GameOverScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let regions = ui::Regions::split(f.area(), true);
        let buf = f.buffer_mut();

        ui::render_title(regions.title, buf);
        ui::render_stats(app.session.stats(), regions.stats, buf);
        ui::render_playfield(app, regions.playfield, buf);
        ui::render_summary(app.session.stats(), regions.playfield, buf);
        ui::render_input(app, regions.input, buf);
        ui::render_footer(SessionState::GameOver, regions.footer, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: SessionState) -> Box<dyn Screen> {
    match state {
        SessionState::Waiting => Box::new(WaitingScreen),
        SessionState::Playing => Box::new(PlayingScreen),
        SessionState::GameOver => Box::new(GameOverScreen),
    }
}
