//! Frame driver
//!
//! `Game` runs one simulation tick per host frame, hands the result to a
//! `Presenter` and reports whether another frame should be scheduled.

use crate::sim::{Entity, GameEvent, Outcome, Simulation};

/// Sound cues the game triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Shoot,
    Win,
    Loose,
}

impl Cue {
    pub const ALL: [Cue; 3] = [Cue::Shoot, Cue::Win, Cue::Loose];

    pub fn name(&self) -> &'static str {
        match self {
            Cue::Shoot => "shoot",
            Cue::Win => "win",
            Cue::Loose => "loose",
        }
    }

    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => Cue::Win,
            Outcome::Lost => Cue::Loose,
        }
    }
}

/// Everything the game needs from the host's screen and speakers
pub trait Presenter {
    /// Clear the previous frame and draw every entity as a filled box
    fn present(&mut self, entities: &[Entity]);
    /// Show the end-of-game message
    fn announce(&mut self, outcome: Outcome);
    /// Play a cue from the start (restarting it if already playing)
    fn play(&mut self, cue: Cue);
}

/// Presenter for headless runs: writes to the log instead
#[derive(Debug, Default)]
pub struct LogPresenter {
    frames: u64,
}

impl Presenter for LogPresenter {
    fn present(&mut self, entities: &[Entity]) {
        self.frames += 1;
        if self.frames % 600 == 0 {
            log::info!("Frame {}: {} entities", self.frames, entities.len());
        }
    }

    fn announce(&mut self, outcome: Outcome) {
        log::info!("{}", outcome.message());
    }

    fn play(&mut self, cue: Cue) {
        log::debug!("Cue: {}", cue.name());
    }
}

pub struct Game<P: Presenter> {
    sim: Simulation,
    presenter: P,
    frames: u64,
    /// Cues are dropped while set; drawing and announcements continue
    muted: bool,
}

impl<P: Presenter> Game<P> {
    pub fn new(sim: Simulation, presenter: P) -> Self {
        Self {
            sim,
            presenter,
            frames: 0,
            muted: false,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Drop cues until unmuted (e.g. while the page is in the background)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn cue(&mut self, cue: Cue) {
        if !self.muted {
            self.presenter.play(cue);
        }
    }

    /// Run one frame. Returns false once the session has ended and no
    /// further frames should be scheduled.
    pub fn frame(&mut self) -> bool {
        if self.sim.is_over() {
            return false;
        }
        self.frames += 1;
        self.sim.tick();

        let mut ended = None;
        for event in self.sim.drain_events() {
            match event {
                GameEvent::Shot { .. } => self.cue(Cue::Shoot),
                GameEvent::GameOver(outcome) => ended = Some(outcome),
            }
        }

        self.presenter.present(self.sim.entities());

        if let Some(outcome) = ended {
            self.presenter.announce(outcome);
            self.cue(Cue::for_outcome(outcome));
            return false;
        }
        true
    }

    /// Drive frames until the session ends or `max_frames` have run
    pub fn run(&mut self, max_frames: u64) -> Option<Outcome> {
        for _ in 0..max_frames {
            if !self.frame() {
                break;
            }
        }
        self.sim.outcome()
    }
}
