//! Turns user actions into propagation, projection and frames.

use crate::config::Settings;
use crate::epoch::{self, format_instant};
use crate::error::ViewerError;
use crate::projection::Projection;
use crate::propagation::Session;
use crate::render::{AssetStore, Background, Frame, Renderer};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use simulator::{PlanetarySystem, Propagator};
use time::PrimitiveDateTime;
use tracing::{debug, error, info, warn};

/// Half the plot width at zoom 1, in AU.
pub const BASE_HALF_RANGE: f64 = 0.020;
/// The zoom levels a frontend offers.
pub const ZOOM_PRESETS: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
/// The overlay shows up on one render in this many.
pub const CLOUD_ODDS: u32 = 20;

/// Half the plot width at `zoom`.
pub fn half_range(zoom: f64) -> f64 {
    BASE_HALF_RANGE / zoom
}

/// Something the user asked for.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Go to a typed instant
    Submit(String),
    /// Move the displayed instant by the configured hours
    TimeJump,
    Zoom(f64),
    Clouds(bool),
    WhiteBackground(bool),
    /// Integration step in days
    StepSize(f64),
    /// Hours per time jump
    JumpHours(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControllerState {
    Idle,
    Updating,
    /// A fatal fault happened. Nothing works any more.
    Aborted(ViewerError),
}

/// Display options, independent of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    pub zoom: f64,
    pub clouds: bool,
    pub background: Background,
    pub displayed: Option<PrimitiveDateTime>,
    pub jump_hours: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            zoom: 1.0,
            clouds: false,
            background: Background::Black,
            displayed: None,
            jump_hours: 12.0,
        }
    }
}

impl ViewConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        ViewConfig {
            clouds: settings.clouds,
            background: if settings.white_background {
                Background::White
            } else {
                Background::Black
            },
            jump_hours: settings.jump_hours,
            ..ViewConfig::default()
        }
    }

    pub fn half_range(&self) -> f64 {
        half_range(self.zoom)
    }

    pub fn time_label(&self) -> String {
        match self.displayed {
            Some(instant) => format!("{} UTC", format_instant(instant)),
            None => String::new(),
        }
    }
}

/// Decides whether the cloud overlay shows up on a render.
pub trait OverlayTrigger {
    fn roll(&mut self) -> bool;
}

impl<F: FnMut() -> bool> OverlayTrigger for F {
    fn roll(&mut self) -> bool {
        self()
    }
}

/// One chance in `CLOUD_ODDS`.
pub struct CloudTrigger {
    rng: SmallRng,
}

impl CloudTrigger {
    pub fn seeded(seed: u64) -> Self {
        CloudTrigger {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        CloudTrigger {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        match settings.seed {
            Some(seed) => CloudTrigger::seeded(seed),
            None => CloudTrigger::from_entropy(),
        }
    }
}

impl OverlayTrigger for CloudTrigger {
    fn roll(&mut self) -> bool {
        self.rng.gen_range(0, CLOUD_ODDS) < 1
    }
}

/// Owns a session and a renderer, and keeps them in step with the user.
pub struct Controller<R: Renderer, P: Propagator = PlanetarySystem> {
    session: Session<P>,
    renderer: R,
    view: ViewConfig,
    trigger: Box<dyn OverlayTrigger>,
    /// `None` once images are known not to work
    assets: Option<AssetStore>,
    state: ControllerState,
    /// Shown on every frame from the moment images are given up on
    notice: Option<String>,
    projection: Option<Projection>,
    frame: Option<Frame>,
}

impl<R: Renderer, P: Propagator> Controller<R, P> {
    /// Checks the images up front. Missing ones mean markers only.
    pub fn new(
        session: Session<P>,
        renderer: R,
        view: ViewConfig,
        assets: AssetStore,
        trigger: Box<dyn OverlayTrigger>,
    ) -> Self {
        let (assets, notice) = match assets.verify() {
            Ok(()) => (Some(assets), None),
            Err(err) => {
                warn!(%err, "drawing markers only");
                (None, Some(markers_only_notice(&err)))
            }
        };
        Controller {
            session,
            renderer,
            view,
            trigger,
            assets,
            state: ControllerState::Idle,
            notice,
            projection: None,
            frame: None,
        }
    }

    /// The first render: wherever the moons are right now.
    pub fn start(&mut self) -> Result<(), ViewerError> {
        let now = format_instant(epoch::now_utc());
        info!(%now, "starting at the current time");
        self.dispatch(Action::Submit(now))
    }

    /// Handle one action. Recoverable errors leave everything as it was;
    /// anything else aborts the controller for good.
    pub fn dispatch(&mut self, action: Action) -> Result<(), ViewerError> {
        if let ControllerState::Aborted(fault) = &self.state {
            return Err(fault.clone());
        }
        self.state = ControllerState::Updating;
        debug!(?action, "dispatching");

        let result = match action {
            Action::Submit(entry) => self.submit(&entry),
            Action::TimeJump => self.time_jump(),
            Action::Zoom(zoom) => self.zoom(zoom),
            Action::Clouds(on) => self.set_clouds(on),
            Action::WhiteBackground(on) => self.set_background(on),
            Action::StepSize(dt) => self.session.set_step_size(dt),
            Action::JumpHours(hours) => self.set_jump_hours(hours),
        };

        self.state = match &result {
            Err(err) if !err.is_recoverable() => {
                error!(%err, "giving up");
                ControllerState::Aborted(err.clone())
            }
            Err(err) => {
                warn!(%err, "ignored");
                ControllerState::Idle
            }
            Ok(()) => ControllerState::Idle,
        };
        result
    }

    fn submit(&mut self, entry: &str) -> Result<(), ViewerError> {
        let instant = self.session.advance_to(entry)?;
        self.view.displayed = Some(instant);
        self.refresh()
    }

    fn time_jump(&mut self) -> Result<(), ViewerError> {
        let displayed = self
            .view
            .displayed
            .ok_or_else(|| ViewerError::InvalidTimeFormat {
                input: String::new(),
            })?;
        let next = epoch::jump(&format_instant(displayed), self.view.jump_hours)?;
        self.submit(&next)
    }

    fn zoom(&mut self, zoom: f64) -> Result<(), ViewerError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(ViewerError::InvalidSetting {
                setting: "zoom",
                reason: format!("{} is not a positive number", zoom),
            });
        }
        self.view.zoom = zoom;
        match self.frame.take() {
            Some(frame) => self.publish(Frame {
                half_range: self.view.half_range(),
                ..frame
            }),
            None => Ok(()),
        }
    }

    /// Rolls for the overlay right away when switched on.
    fn set_clouds(&mut self, on: bool) -> Result<(), ViewerError> {
        self.view.clouds = on;
        let frame = match self.frame.take() {
            Some(frame) => frame,
            None => return Ok(()),
        };
        let show_cloud = on && self.trigger.roll();
        let overlay = match (&self.assets, &self.projection) {
            (Some(assets), Some(projection)) if show_cloud => {
                Some(assets.cloud_sprite(projection.primary().position))
            }
            _ => None,
        };
        self.publish(Frame { overlay, ..frame })
    }

    fn set_background(&mut self, white: bool) -> Result<(), ViewerError> {
        self.view.background = if white {
            Background::White
        } else {
            Background::Black
        };
        match self.view.displayed {
            Some(instant) => {
                self.session.advance_to_instant(instant)?;
                self.refresh()
            }
            None => Ok(()),
        }
    }

    fn set_jump_hours(&mut self, hours: f64) -> Result<(), ViewerError> {
        if !hours.is_finite() {
            return Err(ViewerError::InvalidSetting {
                setting: "jump hours",
                reason: format!("{} is not a number of hours", hours),
            });
        }
        self.view.jump_hours = hours;
        Ok(())
    }

    /// Project the current positions and draw them.
    fn refresh(&mut self) -> Result<(), ViewerError> {
        let projection = Projection::project(&self.session.positions(), self.session.bodies())?;
        let show_cloud = self.view.clouds && self.trigger.roll();
        let frame = Frame::compose(
            &projection,
            self.session.bodies(),
            &self.view,
            self.assets.as_ref(),
            show_cloud,
        );
        self.projection = Some(projection);
        self.publish(frame)
    }

    /// Hand a frame to the renderer. If images break it, drop them for good and try once more.
    fn publish(&mut self, mut frame: Frame) -> Result<(), ViewerError> {
        frame.notice = self.notice.clone();
        match self.renderer.render(&frame) {
            Ok(()) => {
                self.frame = Some(frame);
                Ok(())
            }
            Err(err) if frame.has_images() => {
                warn!(%err, "rendering without images from now on");
                self.assets = None;
                self.notice = Some(markers_only_notice(&err));
                let mut plain = frame.markers_only();
                plain.notice = self.notice.clone();
                self.renderer.render(&plain)?;
                self.frame = Some(plain);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    /// The last projection shown.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// The last frame shown.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn has_images(&self) -> bool {
        self.assets.is_some()
    }

    /// Why frames are plain markers, if they are.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

fn markers_only_notice(err: &ViewerError) -> String {
    format!("showing markers only ({})", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_presets_shrink_the_range() {
        let ranges: Vec<f64> = ZOOM_PRESETS.iter().map(|&z| half_range(z)).collect();
        assert_eq!(ranges, [0.020, 0.010, 0.020 / 3.0, 0.005]);
    }

    #[test]
    fn seeded_triggers_agree() {
        let mut a = CloudTrigger::seeded(42);
        let mut b = CloudTrigger::seeded(42);
        for _ in 0..500 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn clouds_are_rare() {
        let mut trigger = CloudTrigger::seeded(1);
        let hits = (0..20_000).filter(|_| trigger.roll()).count();
        assert!(hits > 700 && hits < 1300, "{} hits", hits);
    }

    #[test]
    fn closures_make_fixed_triggers() {
        let mut always = || true;
        let mut never = || false;
        assert!(OverlayTrigger::roll(&mut always));
        assert!(!OverlayTrigger::roll(&mut never));
    }

    #[test]
    fn time_label_has_utc() {
        let view = ViewConfig {
            displayed: Some(epoch::parse_instant("2024-07-19 00:00:00").unwrap()),
            ..ViewConfig::default()
        };
        assert_eq!(view.time_label(), "2024-07-19 00:00:00 UTC");
        assert_eq!(ViewConfig::default().time_label(), "");
    }

    #[test]
    fn settings_pick_the_background() {
        let settings = Settings {
            white_background: true,
            jump_hours: 6.0,
            ..Settings::default()
        };
        let view = ViewConfig::from_settings(&settings);
        assert_eq!(view.background, Background::White);
        assert_eq!(view.jump_hours, 6.0);
        assert_eq!(view.zoom, 1.0);
    }
}
