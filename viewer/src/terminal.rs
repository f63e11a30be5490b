//! A dashboard for the terminal: frames as text, commands from stdin.

use crate::controller::{Action, Controller};
use crate::error::ViewerError;
use crate::projection::Layer;
use crate::render::{Frame, Renderer};

use simulator::Propagator;
use std::io::{BufRead, Write};
use tracing::info;

/// Columns in the side-on strip.
const STRIP_WIDTH: usize = 61;

pub const HELP: &str = "commands: date <YYYY-MM-DD HH:MM:SS[.ffffff]>, jump, zoom <z>, \
clouds on|off, white on|off, dt <days>, hours <h>, help, quit";

/// What a typed line asks for.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Act(Action),
    Help,
    Quit,
}

/// Parse one line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = match line.find(char::is_whitespace) {
        Some(split) => (&line[..split], line[split..].trim()),
        None => (line, ""),
    };
    let command = match word {
        "" => return Ok(None),
        "date" => Command::Act(Action::Submit(rest.to_string())),
        "jump" => Command::Act(Action::TimeJump),
        "zoom" => Command::Act(Action::Zoom(number(rest)?)),
        "clouds" => Command::Act(Action::Clouds(switch(rest)?)),
        "white" => Command::Act(Action::WhiteBackground(switch(rest)?)),
        "dt" => Command::Act(Action::StepSize(number(rest)?)),
        "hours" => Command::Act(Action::JumpHours(number(rest)?)),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command {:?}", other)),
    };
    Ok(Some(command))
}

fn number(arg: &str) -> Result<f64, String> {
    arg.parse()
        .map_err(|_| format!("expected a number, got {:?}", arg))
}

fn switch(arg: &str) -> Result<bool, String> {
    match arg {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        other => Err(format!("expected on or off, got {:?}", other)),
    }
}

/// Writes each frame as a table and a strip seen edge-on.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        TextRenderer { out }
    }

    fn write_frame(&mut self, frame: &Frame) -> std::io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}  {}  (range +-{:.5} AU, {} background{})",
            frame.title,
            frame.time_label,
            frame.half_range,
            frame.background.name(),
            if frame.overlay.is_some() { ", cloudy" } else { "" }
        )?;
        if let Some(notice) = &frame.notice {
            writeln!(self.out, "  ! {}", notice)?;
        }
        writeln!(self.out, "{}", strip(frame))?;
        for marker in &frame.markers {
            writeln!(
                self.out,
                "  {:<9} {:>+11.7} {:>+11.7}  {:<10} {}",
                marker.label,
                marker.position.x,
                marker.position.y,
                layer_name(marker.layer, marker.order),
                marker.hover
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame) -> Result<(), ViewerError> {
        self.write_frame(frame)
            .map_err(|err| ViewerError::RenderFault(err.to_string()))
    }
}

fn layer_name(layer: Layer, order: u8) -> &'static str {
    if order == 2 {
        return "primary";
    }
    match layer {
        Layer::Behind => "behind",
        Layer::TransitingDisk => "transit",
        Layer::Front => "front",
    }
}

/// One character per body along x, later markers painted over earlier ones.
fn strip(frame: &Frame) -> String {
    let mut cells = vec!['.'; STRIP_WIDTH];
    let span = 2.0 * frame.half_range;
    for marker in frame.stacked_markers() {
        let offset = (marker.position.x + frame.half_range) / span;
        if !(0.0..=1.0).contains(&offset) {
            continue;
        }
        let column = (offset * (STRIP_WIDTH - 1) as f64).round() as usize;
        let glyph = marker.label.chars().next().unwrap_or('?');
        cells[column] = if marker.layer == Layer::Behind {
            glyph.to_ascii_lowercase()
        } else {
            glyph
        };
    }
    format!("  [{}]", cells.into_iter().collect::<String>())
}

/// Read commands until `quit` or end of input. Returns on the first fatal fault.
pub fn run<R, P, I, O>(controller: &mut Controller<R, P>, input: I, mut prompt: O) -> Result<(), ViewerError>
where
    R: Renderer,
    P: Propagator,
    I: BufRead,
    O: Write,
{
    for line in input.lines() {
        let line = line.map_err(|err| ViewerError::ConfigurationFault(format!("reading input: {}", err)))?;
        let action = match parse_command(&line) {
            Ok(Some(Command::Act(action))) => action,
            Ok(Some(Command::Help)) => {
                let _ = writeln!(prompt, "{}", HELP);
                continue;
            }
            Ok(Some(Command::Quit)) => break,
            Ok(None) => continue,
            Err(message) => {
                let _ = writeln!(prompt, "{}", message);
                continue;
            }
        };
        match controller.dispatch(action) {
            Ok(()) => {}
            Err(err) if err.is_recoverable() => {
                let _ = writeln!(prompt, "{}", err);
            }
            Err(err) => return Err(err),
        }
    }
    info!("input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse_command("date 2024-07-18 22:30:30.55").unwrap(),
            Some(Command::Act(Action::Submit("2024-07-18 22:30:30.55".to_string())))
        );
        assert_eq!(
            parse_command("jump").unwrap(),
            Some(Command::Act(Action::TimeJump))
        );
        assert_eq!(
            parse_command(" zoom 3 ").unwrap(),
            Some(Command::Act(Action::Zoom(3.0)))
        );
        assert_eq!(
            parse_command("clouds on").unwrap(),
            Some(Command::Act(Action::Clouds(true)))
        );
        assert_eq!(
            parse_command("white off").unwrap(),
            Some(Command::Act(Action::WhiteBackground(false)))
        );
        assert_eq!(
            parse_command("dt 0.01").unwrap(),
            Some(Command::Act(Action::StepSize(0.01)))
        );
        assert_eq!(
            parse_command("hours -6").unwrap(),
            Some(Command::Act(Action::JumpHours(-6.0)))
        );
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn bad_lines_are_explained() {
        assert!(parse_command("warp 9").is_err());
        assert!(parse_command("zoom lots").is_err());
        assert!(parse_command("clouds maybe").is_err());
    }

    #[test]
    fn bad_dates_reach_the_controller() {
        // Validation belongs to the controller, so "date" passes anything through.
        assert_eq!(
            parse_command("date not-a-date").unwrap(),
            Some(Command::Act(Action::Submit("not-a-date".to_string())))
        );
    }

    fn frame(notice: Option<&str>) -> Frame {
        use crate::render::{Background, DISABLED_CONTROLS, TITLE};
        Frame {
            title: TITLE,
            time_label: "2024-07-19 00:00:00 UTC".to_string(),
            markers: Vec::new(),
            sprites: Vec::new(),
            overlay: None,
            half_range: 0.02,
            background: Background::Black,
            notice: notice.map(str::to_string),
            show_axes: false,
            disabled_controls: &DISABLED_CONTROLS,
        }
    }

    #[test]
    fn notices_are_printed_under_the_header() {
        let mut out = Vec::new();
        TextRenderer::new(&mut out)
            .render(&frame(Some("showing markers only (no pictures)")))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("Galilean Moons  2024-07-19 00:00:00 UTC"));
        assert_eq!(lines[2], "  ! showing markers only (no pictures)");

        let mut out = Vec::new();
        TextRenderer::new(&mut out).render(&frame(None)).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains(" ! "));
    }
}
