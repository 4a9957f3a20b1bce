//! Twister
//!
//! Demo front end for the home-screen puzzle: prints the faces of each
//! object, replays drag gestures through the router, and (with the `viewer`
//! feature) opens an interactive 3D window where right-button drags twist the
//! objects.

#[cfg(feature = "viewer")]
mod visualization;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use twister::layout::{Scene, ZoneKind, HOME_ZONES};
use twister::{MoveEvent, Point};

/// Drives the twisty-puzzle home screen from the command line.
#[derive(Parser)]
#[command(name = "twister")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print every face of one zone's object, or of all of them.
    Show {
        #[arg(long)]
        zone: Option<ZoneKind>,
    },
    /// Replay a straight drag across the home screen and print the outcome.
    Drag {
        /// Screen point where the gesture starts, as `x,y`.
        #[arg(long, value_parser = parse_point)]
        from: Point,
        /// Screen point where the gesture ends, as `x,y`.
        #[arg(long, value_parser = parse_point)]
        to: Point,
        /// Number of intermediate drag updates.
        #[arg(long, default_value_t = 10)]
        steps: usize,
    },
    /// Open the home screen in an interactive 3D viewer.
    #[cfg(feature = "viewer")]
    View,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Some(Command::Show { zone }) => run_show(zone),
        Some(Command::Drag { from, to, steps }) => run_drag(from, to, steps),
        #[cfg(feature = "viewer")]
        Some(Command::View) => Scene::home().map(visualization::display),
        None => run_show(None),
    };

    if let Err(e) = outcome {
        eprintln!("twister: {}", e);
        std::process::exit(1);
    }
}

/// Parses a screen point written as `x,y`.
fn parse_point(text: &str) -> Result<Point, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{text}`"))?;
    let coordinate = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate `{part}`: {e}"))
    };
    Ok(Point::new(coordinate(x)?, coordinate(y)?))
}

/// Prints the faces of the requested objects on a freshly built home screen.
fn run_show(zone: Option<ZoneKind>) -> twister::Result<()> {
    let scene = Scene::home()?;
    let kinds: Vec<ZoneKind> = zone.map_or_else(|| HOME_ZONES.to_vec(), |kind| vec![kind]);
    for kind in kinds {
        if let Some(object) = scene.object(kind) {
            println!("== {} ==", kind);
            print!("{}", object.format());
            println!();
        }
    }
    Ok(())
}

/// Replays a straight drag and prints what it did.
fn run_drag(from: Point, to: Point, steps: usize) -> twister::Result<()> {
    let mut scene = Scene::home()?;
    print!("{}", replay_drag(&mut scene, from, to, steps)?);
    Ok(())
}

/// Feeds `steps` evenly spaced updates from `from` to `to` through the
/// router, ends the gesture, and describes the outcome.
fn replay_drag(scene: &mut Scene, from: Point, to: Point, steps: usize) -> twister::Result<String> {
    let steps = steps.max(1);
    for step in 1..=steps {
        let t = step as f64 / steps as f64;
        let location = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        scene.router.on_changed(from, location)?;
    }
    scene.router.on_ended()?;

    let Some(kind) = scene.zone_at(from) else {
        return Ok(format!("{} is outside every zone, nothing turned\n", from));
    };

    let mut output = String::new();
    for (moved, object) in &scene.objects {
        let mut turned = 0;
        for event in object.drain_events() {
            match event {
                MoveEvent::Grabbed { direction, slice, .. } => {
                    let slice = slice.map_or_else(|| "whole body".to_string(), |s| s.to_string());
                    output.push_str(&format!("{}: grabbed {} {}\n", moved, direction, slice));
                }
                MoveEvent::Turned { .. } => turned += 1,
                MoveEvent::Snapped { turn, correction, .. } => {
                    output.push_str(&format!(
                        "{}: {} updates, settled {:?} (correction {:.3} rad)\n",
                        moved, turned, turn, correction
                    ));
                }
                MoveEvent::Rehomed { members, .. } => {
                    output.push_str(&format!("{}: re-homed {} elements\n", moved, members.len()));
                }
            }
        }
    }
    if let Some(object) = scene.object(kind) {
        output.push('\n');
        output.push_str(&object.format());
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("12.5, 300"), Ok(Point::new(12.5, 300.0)));
        assert!(parse_point("12.5").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_widget_cube_drag_snapshot() {
        let mut scene = Scene::home().unwrap();
        let output = replay_drag(
            &mut scene,
            Point::new(30.0, 200.0),
            Point::new(166.4, 200.0),
            8,
        )
        .unwrap();

        insta::assert_snapshot!(output, @r"
        top-left: grabbed row 0
        top-left: 8 updates, settled Forward (correction 0.314 rad)
        top-left: re-homed 1 elements

        front
        widget4

        right
        widget1

        back
        widget2

        left
        widget3

        top
        widget5

        bottom
        widget6
        ");
    }

    #[test]
    fn test_drag_outside_zones_turns_nothing() {
        let mut scene = Scene::home().unwrap();
        // runs up the left margin, left of every zone
        let output = replay_drag(
            &mut scene,
            Point::new(5.0, 800.0),
            Point::new(10.0, 200.0),
            4,
        )
        .unwrap();
        assert!(output.contains("outside every zone"));
        for (_, object) in &scene.objects {
            assert!(object.drain_events().is_empty());
        }
    }
}
