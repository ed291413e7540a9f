//! Rubik's Cube
//!
//! An animated 3x3x3 cube. Faces and the whole cube turn from the keyboard,
//! and catalog algorithms can be set up and then solved for practice. The
//! same engine runs headless for scripting and tests.

mod visualization;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use rubik::asset::{self, AssetFile, GeneratedCube, ModelLoader};
use rubik::{catalog, grid, notation, Cube, CubeConfig, LoadError};

/// Frame length used when running without a window.
const HEADLESS_FRAME: Duration = Duration::from_millis(16);

/// Turns a Rubik's Cube, interactively or from the command line.
#[derive(Parser)]
#[command(name = "rubik")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Load the cube model from a JSON asset instead of generating it.
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Animation speed multiplier.
    #[arg(long, global = true, default_value_t = 1.0)]
    speed: f32,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive 3D viewer.
    Play,
    /// Apply a move sequence, or a catalog algorithm by name, and print where
    /// every piece ended up.
    Run {
        algorithm: String,
        /// Undo the sequence afterwards and print the result again.
        #[arg(long)]
        undo: bool,
    },
    /// Print the inverse of a move sequence.
    Inverse { algorithm: String },
    /// List the algorithm catalog.
    List,
    /// Write the generated cube model as a JSON asset.
    ExportModel { path: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = CubeConfig::default().with_speed(cli.speed);

    match cli.command {
        Some(Command::Run { algorithm, undo }) => {
            let cube = open_cube(cli.model.as_deref(), config);
            print!("{}", run_headless(&cube, &algorithm, undo));
        }
        Some(Command::Inverse { algorithm }) => {
            println!("{}", notation::invert_sequence(&algorithm));
        }
        Some(Command::List) => print!("{}", catalog::format_catalog()),
        Some(Command::ExportModel { path }) => run_export_model(path),
        Some(Command::Play) | None => {
            let cube = open_cube(cli.model.as_deref(), config);
            println!("Controls: F B U D L R M E S turn (Shift reverses), arrows rotate the cube");
            println!("          Return sets up the next algorithm, Space solves, Backspace resets");
            visualization::play(cube);
        }
    }
}

/// Builds the cube from the given asset, or a generated one. Exits on failure.
fn open_cube(model: Option<&Path>, config: CubeConfig) -> Cube {
    let opened = match model {
        Some(path) => Cube::new(config, AssetFile::new(path)),
        None => Cube::new(config, GeneratedCube::default()),
    };
    opened.unwrap_or_else(|e| {
        eprintln!("Failed to load cube model: {}", e);
        process::exit(1);
    })
}

/// Runs `algorithm` to completion and reports the final grid.
///
/// A catalog name such as `sune` runs that entry's moves.
fn run_headless(cube: &Cube, algorithm: &str, undo: bool) -> String {
    let algorithm = catalog::find(algorithm.trim()).map_or(algorithm, |entry| entry.moves);
    let turn = cube.config().turn();
    let playback = cube.run_until_complete(cube.execute_algorithm(algorithm, turn), HEADLESS_FRAME);

    let mut output = format!("{} ({:?})\n", algorithm.trim(), playback);
    output.push_str(&report(cube));

    if undo {
        let solved = cube.run_until_complete(cube.solve(), HEADLESS_FRAME);
        output.push_str(&format!("\nundo ({:?})\n", solved));
        output.push_str(&report(cube));
    }

    output
}

fn report(cube: &Cube) -> String {
    cube.with_model(|model| grid::format_state(model, grid::layer_spacing(model)))
}

/// Writes the generated model so it can be edited and loaded with `--model`.
fn run_export_model(path: PathBuf) {
    let written: Result<(), LoadError> =
        GeneratedCube::default().load().and_then(|root| asset::save(&path, &root));
    match written {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => {
            eprintln!("Failed to write {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Cube {
        Cube::new(CubeConfig::default(), GeneratedCube::default()).unwrap()
    }

    #[test]
    fn test_catalog_snapshot() {
        let output = catalog::format_catalog();
        insta::assert_snapshot!(output);
    }

    #[test]
    fn test_headless_run() {
        let output = run_headless(&cube(), "R", false);
        let expected = "\
R (Completed)
z=-1 z=+0 z=+1
6FQ  7GN  8HK
3CP  4DM  5EJ
09O  1AL  2BI
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_headless_run_with_undo() {
        let output = run_headless(&cube(), "R U R' U'", true);
        let solved = "\
z=-1 z=+0 z=+1
6FO  7GP  8HQ
3CL  4DM  5EN
09I  1AJ  2BK
";
        assert!(output.contains("\nundo (Some(Completed))\n"));
        assert!(output.ends_with(solved));
    }

    #[test]
    fn test_headless_run_by_catalog_name() {
        let output = run_headless(&cube(), "Sune", true);
        assert!(output.starts_with("R U R' U R U2 R' (Completed)\n"));
        assert!(output.contains("\nundo (Some(Completed))\n"));
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::parse_from(["rubik", "run", "R U", "--undo", "--speed", "2"]);
        assert_eq!(cli.speed, 2.0);
        assert!(matches!(
            cli.command,
            Some(Command::Run { ref algorithm, undo: true }) if algorithm == "R U"
        ));
    }
}
