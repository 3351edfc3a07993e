// tinebox — music box cylinder generator CLI.
//
// Reads a MIDI file, encodes its note-on events as pins on a rotating
// cylinder, and writes a 3D-printable binary STL. The pipeline:
// MIDI decode → pitch adaptation (transposition + octave folding) →
// pin placement → mesh → STL.
//
// Usage:
//   tinebox --midi <file> --out <file> [OPTIONS]
//     --midi <file>         The MIDI file to use as a source
//     --out <file>          The .stl file to be written
//     --no-transpose        Do not transpose the input to maximize encoded notes
//     --config <file>       JSON box config (comb and cylinder dimensions)
//     --counterclockwise    Reverse the cylinder rotation direction
//
// Nothing is written when no notes can be encoded or when the user
// declines the data-loss confirmation.

mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use config::BoxConfig;
use tinebox_encode::encode::{EncodeOptions, EncodeOutcome, encode};
use tinebox_encode::midi::read_note_events;
use tinebox_encode::placement::RotationSense;
use tinebox_geom::cylinder::CylinderMesh;
use tinebox_geom::stl;

/// Octave search radius for transposing runs. `--no-transpose` narrows the
/// search to exact comb matches.
const DEFAULT_OCTAVE_RADIUS: u8 = 2;

/// How many unrecognized answers the confirmation prompt tolerates before
/// giving up. The prompt guards a data-loss decision, so running out of
/// attempts counts as "no".
const MAX_CONFIRM_ATTEMPTS: u32 = 8;

struct CliArgs {
    midi: PathBuf,
    out: PathBuf,
    no_transpose: bool,
    config: Option<PathBuf>,
    counterclockwise: bool,
}

fn main() {
    let args = parse_args();

    let config = match &args.config {
        Some(path) => match BoxConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => BoxConfig::default(),
    };

    println!("[1/4] Reading {}...", args.midi.display());
    let events = match read_note_events(&args.midi) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("  {e}");
            std::process::exit(1);
        }
    };
    println!("  Found {} note-on events.", events.len());

    println!(
        "[2/4] Encoding onto the {}-tine comb...",
        config.comb.notes.len()
    );
    let options = EncodeOptions {
        transpose: !args.no_transpose,
        octave_search_radius: if args.no_transpose {
            0
        } else {
            DEFAULT_OCTAVE_RADIUS
        },
        rotation: if args.counterclockwise {
            RotationSense::Counterclockwise
        } else {
            RotationSense::Clockwise
        },
    };

    let outcome = encode(&events, &config.comb, &options, |discarded, total| {
        confirm(&format!(
            "Result will exclude {discarded} of {total} notes. Continue?"
        ))
    });

    let encoding = match outcome {
        Ok(EncodeOutcome::Complete(encoding)) => encoding,
        Ok(EncodeOutcome::Declined { .. }) => {
            println!("Aborted. No file written.");
            return;
        }
        Err(e) => {
            eprintln!("  {e}. Exiting.");
            std::process::exit(1);
        }
    };

    if options.transpose && encoding.transposition != 0 {
        println!("  Transposed by {} semitones.", encoding.transposition);
    }
    if encoding.discarded > 0 {
        println!("  Dropped {} unencodable notes.", encoding.discarded);
    }
    println!(
        "  {} pins across one revolution ({:.1} s of song).",
        encoding.placements.len(),
        encoding.song_duration
    );

    println!("[3/4] Building the cylinder mesh...");
    let mut cylinder = CylinderMesh::build(&config.cylinder);
    for placement in &encoding.placements {
        cylinder.add_pin(placement.z_mm, placement.angle_rad);
    }
    let mesh = cylinder.into_mesh();
    println!("  {} triangles.", mesh.triangle_count());

    println!("[4/4] Writing {}...", args.out.display());
    if let Err(e) = write_stl(&mesh, &args.out) {
        eprintln!("  Error writing STL: {e}");
        std::process::exit(1);
    }
    println!("Done.");
}

fn write_stl(mesh: &tinebox_geom::mesh::MeshData, path: &std::path::Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    stl::write_binary(mesh, &mut writer)?;
    writer.into_inner()?.sync_all()
}

/// Ask a yes/no question on stdin. Empty input counts as yes. Retries on
/// unrecognized input a bounded number of times, then answers "no".
fn confirm(question: &str) -> bool {
    let stdin = io::stdin();
    for _ in 0..MAX_CONFIRM_ATTEMPTS {
        print!("{question} [Y/n] ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.read_line(&mut line).is_err() {
            return false;
        }
        match line.trim().to_lowercase().as_str() {
            "" | "y" | "ye" | "yes" => return true,
            "n" | "no" => return false,
            _ => println!("Please answer yes or no."),
        }
    }
    false
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching —
/// no clap dependency.
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut midi: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut no_transpose = false;
    let mut config: Option<PathBuf> = None;
    let mut counterclockwise = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--midi" | "-m" => {
                i += 1;
                midi = args.get(i).map(PathBuf::from).or_else(|| {
                    eprintln!("--midi requires a file path");
                    std::process::exit(1);
                });
            }
            "--out" | "-o" => {
                i += 1;
                out = args.get(i).map(PathBuf::from).or_else(|| {
                    eprintln!("--out requires a file path");
                    std::process::exit(1);
                });
            }
            "--config" => {
                i += 1;
                config = args.get(i).map(PathBuf::from).or_else(|| {
                    eprintln!("--config requires a file path");
                    std::process::exit(1);
                });
            }
            "--no-transpose" => no_transpose = true,
            "--counterclockwise" => counterclockwise = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let (Some(midi), Some(out)) = (midi, out) else {
        print_usage();
        std::process::exit(1);
    };

    CliArgs {
        midi,
        out,
        no_transpose,
        config,
        counterclockwise,
    }
}

fn print_usage() {
    println!("Usage: tinebox --midi <file> --out <file> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --midi, -m <file>     The MIDI file to use as a source");
    println!("  --out, -o <file>      The .stl file to be written");
    println!("  --no-transpose        Do not transpose the input to maximize encoded notes");
    println!("  --config <file>       JSON box config (comb and cylinder dimensions)");
    println!("  --counterclockwise    Reverse the cylinder rotation direction");
    println!("  --help, -h            Show this help");
}
