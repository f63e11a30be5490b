//! The windowed frontend.

use viewer::controller::{Action, Controller, ZOOM_PRESETS};
use viewer::render::{Frame, Renderer, Sprite};
use viewer::ViewerError;

use ggez::event::{self, EventHandler, KeyCode, KeyMods};
use ggez::nalgebra::{Point2, Vector2};
use ggez::{
    filesystem,
    graphics::{self, Color, DrawMode, DrawParam, Image, MeshBuilder, Text},
    Context, GameResult,
};

use std::collections::HashMap;
use std::ffi::OsString;
use tracing::warn;

/// Marker radius in pixels
const MARKER_RADIUS: f32 = 6.0;

/// Keeps whatever the controller last rendered, for `draw` to pick up.
#[derive(Default)]
pub struct FrameSlot {
    frame: Option<Frame>,
}

impl Renderer for FrameSlot {
    fn render(&mut self, frame: &Frame) -> Result<(), ViewerError> {
        self.frame = Some(frame.clone());
        Ok(())
    }
}

/// The window's state.
pub struct State {
    controller: Controller<FrameSlot>,
    /// The date being typed
    typed: String,
    /// Only the latest action survives until the next update
    pending: Option<Action>,
    /// Loaded images, by file name
    images: HashMap<OsString, Image>,
    /// Set once an image fails to load; markers from then on
    images_broken: bool,
    /// Why the images stopped
    image_notice: Option<String>,
    /// Last message for the user
    status: String,
    fault: Option<ViewerError>,
}

impl State {
    pub fn new(ctx: &mut Context, controller: Controller<FrameSlot>, assets_dir: &std::path::Path) -> Self {
        filesystem::mount(ctx, assets_dir, true);
        State {
            controller,
            typed: String::new(),
            pending: None,
            images: HashMap::new(),
            images_broken: false,
            image_notice: None,
            status: "type a date and press Return; j jumps, c clouds, b background, F1-F4 zoom"
                .to_string(),
            fault: None,
        }
    }

    pub fn start(&mut self) -> Result<(), ViewerError> {
        self.controller.start()
    }

    /// Whatever stopped the window, if anything did.
    pub fn fault(&self) -> Option<&ViewerError> {
        self.fault.as_ref()
    }

    /// Fix the screen space to always have (0, 0) in the corner and (w, h) in the other.
    fn fix_coordinates(&mut self, ctx: &mut Context, width: f32, height: f32) -> GameResult<()> {
        let rect = graphics::Rect::new(0.0, 0.0, width, height);
        graphics::set_screen_coordinates(ctx, rect)
    }

    fn image(&mut self, ctx: &mut Context, sprite: &Sprite) -> Option<Image> {
        let name = sprite.image.file_name()?.to_os_string();
        if let Some(image) = self.images.get(&name) {
            return Some(image.clone());
        }
        let mut path = std::path::PathBuf::from("/");
        path.push(&name);
        match Image::new(ctx, &path) {
            Ok(image) => {
                self.images.insert(name, image.clone());
                Some(image)
            }
            Err(err) => {
                warn!(%err, image = %sprite.image.display(), "drawing markers only");
                self.images_broken = true;
                self.image_notice = Some(format!(
                    "showing markers only ({} won't load)",
                    sprite.image.display()
                ));
                None
            }
        }
    }

    fn draw_sprite(&mut self, ctx: &mut Context, view: &View, sprite: &Sprite) -> GameResult<bool> {
        let image = match self.image(ctx, sprite) {
            Some(image) => image,
            None => return Ok(false),
        };
        let size = view.length(sprite.size);
        graphics::draw(
            ctx,
            &image,
            DrawParam::default()
                .dest(view.point(sprite.anchor.x, sprite.anchor.y))
                .offset(Point2::new(0.5, 0.5))
                .scale(Vector2::new(
                    size / image.width() as f32,
                    size / image.height() as f32,
                )),
        )?;
        Ok(true)
    }
}

/// Maps plot units onto the window, keeping the plot square.
struct View {
    center: Point2<f32>,
    pixels_per_unit: f32,
}

impl View {
    fn new(ctx: &Context, half_range: f64) -> Self {
        let (width, height) = graphics::drawable_size(ctx);
        View {
            center: Point2::new(width / 2.0, height / 2.0),
            pixels_per_unit: (width.min(height) / 2.0) / half_range as f32,
        }
    }

    fn point(&self, x: f64, y: f64) -> Point2<f32> {
        Point2::new(
            self.center.x + x as f32 * self.pixels_per_unit,
            self.center.y - y as f32 * self.pixels_per_unit,
        )
    }

    fn length(&self, length: f64) -> f32 {
        length as f32 * self.pixels_per_unit
    }
}

impl EventHandler for State {
    fn update(&mut self, ctx: &mut Context) -> GameResult<()> {
        if let Some(action) = self.pending.take() {
            match self.controller.dispatch(action) {
                Ok(()) => self.status.clear(),
                Err(err) if err.is_recoverable() => self.status = err.to_string(),
                Err(err) => {
                    self.fault = Some(err);
                    event::quit(ctx);
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult<()> {
        let frame = match self.controller.renderer().frame.clone() {
            Some(frame) => frame,
            None => {
                graphics::clear(ctx, Color::from_rgb_u32(0x000000));
                return graphics::present(ctx);
            }
        };
        let background = frame.background.rgb();
        let ink = Color::from_rgb_u32(background ^ 0xffffff);
        graphics::clear(ctx, Color::from_rgb_u32(background));
        let view = View::new(ctx, frame.half_range);

        let mut drew_images = !frame.sprites.is_empty() && !self.images_broken;
        if drew_images {
            for sprite in &frame.sprites {
                if !self.draw_sprite(ctx, &view, sprite)? {
                    drew_images = false;
                    break;
                }
            }
        }
        if !drew_images {
            graphics::clear(ctx, Color::from_rgb_u32(background));
            let mut mesh = MeshBuilder::new();
            for marker in frame.stacked_markers() {
                let pos = view.point(marker.position.x, marker.position.y);
                mesh.circle(
                    DrawMode::fill(),
                    pos,
                    MARKER_RADIUS,
                    0.1,
                    Color::from_rgb_u32(marker.color),
                )
                .circle(
                    DrawMode::stroke(MARKER_RADIUS / 4.0),
                    pos,
                    MARKER_RADIUS,
                    0.1,
                    Color::from_rgb_u32(marker.outline),
                );
            }
            let mesh = mesh.build(ctx)?;
            graphics::draw(ctx, &mesh, DrawParam::default())?;
        }
        if let (Some(overlay), false) = (&frame.overlay, self.images_broken) {
            self.draw_sprite(ctx, &view, overlay)?;
        }

        let mut lines = vec![
            format!("{}  {}", frame.title, frame.time_label),
            format!("> {}", self.typed),
            self.status.clone(),
        ];
        lines.extend(frame.notice.iter().chain(self.image_notice.iter()).cloned());
        lines.extend(frame.markers.iter().skip(1).map(|marker| marker.hover.clone()));
        for (row, line) in lines.iter().enumerate() {
            graphics::draw(
                ctx,
                &Text::new(line.as_str()),
                DrawParam::default()
                    .dest(Point2::new(10.0, 10.0 + 20.0 * row as f32))
                    .color(ink),
            )?;
        }

        graphics::present(ctx)
    }

    fn text_input_event(&mut self, _ctx: &mut Context, character: char) {
        match character {
            'j' => self.pending = Some(Action::TimeJump),
            'c' => self.pending = Some(Action::Clouds(!self.controller.view().clouds)),
            'b' => {
                let white = self.controller.view().background == viewer::render::Background::Black;
                self.pending = Some(Action::WhiteBackground(white));
            }
            c if c.is_ascii_digit() || "-:. ".contains(c) => self.typed.push(c),
            _ => {}
        }
    }

    fn key_down_event(&mut self, ctx: &mut Context, keycode: KeyCode, _keymods: KeyMods, _repeat: bool) {
        let preset = |index: usize| Some(Action::Zoom(ZOOM_PRESETS[index]));
        match keycode {
            KeyCode::Return => {
                self.pending = Some(Action::Submit(std::mem::take(&mut self.typed)));
            }
            KeyCode::Back => {
                self.typed.pop();
            }
            KeyCode::F1 => self.pending = preset(0),
            KeyCode::F2 => self.pending = preset(1),
            KeyCode::F3 => self.pending = preset(2),
            KeyCode::F4 => self.pending = preset(3),
            KeyCode::Escape => event::quit(ctx),
            _ => {}
        }
    }

    fn resize_event(&mut self, ctx: &mut Context, width: f32, height: f32) {
        if let Err(err) = self.fix_coordinates(ctx, width, height) {
            warn!(%err, "couldn't resize");
        }
    }
}
