use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use sbbs_core::core_api::{Engine, Session};
use sbbs_core::sbbs::types::TEAM_COUNT;
use sbbs_render::{
    decode_logo_png, encode_logo_png, parse_team_json, render_team_json, render_team_listing,
    render_teams_json,
};
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "ROM")]
    path: PathBuf,
    /// Log filter, e.g. `debug` or `sbbs_core=trace`. Falls back to RUST_LOG, then `info`.
    #[arg(long = "log-level", value_name = "FILTER")]
    log_level: Option<String>,
    /// Commit all teams and logos and write the checksummed image here.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Write every team to DIR/team_{i}.json.
    #[arg(short = 'x', long = "export", value_name = "DIR")]
    export_dir: Option<PathBuf>,
    /// Read DIR/team_{i}.json for every team present.
    #[arg(short = 'i', long = "import", value_name = "DIR")]
    import_dir: Option<PathBuf>,
    /// Print every team's roster.
    #[arg(short = 'd', long = "dump", conflicts_with = "json")]
    dump: bool,
    #[arg(long = "export-logos", value_name = "DIR")]
    export_logos: Option<PathBuf>,
    #[arg(long = "import-logos", value_name = "DIR")]
    import_logos: Option<PathBuf>,
    /// Print all teams as one JSON array.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if (cli.import_dir.is_some() || cli.import_logos.is_some()) && cli.output.is_none() {
        eprintln!("--import and --import-logos require --output <PATH>");
        process::exit(2);
    }

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|e| {
            eprintln!("Invalid --log-level {level:?}: {e}");
            process::exit(2);
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .finish();
    let dispatch = Dispatch::new(subscriber);

    let engine = Engine::with_dispatch(dispatch.clone());
    tracing::dispatcher::with_default(&dispatch, || run(&cli, &engine));
}

fn run(cli: &Cli, engine: &Engine) {
    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let mut session = engine.open_bytes(bytes).unwrap_or_else(|e| {
        eprintln!("Error loading ROM: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    if let Some(dir) = &cli.import_dir {
        import_teams(&mut session, dir);
    }
    if let Some(dir) = &cli.import_logos {
        import_logos(&mut session, dir);
    }
    if let Some(dir) = &cli.export_dir {
        export_teams(&session, dir);
    }
    if let Some(dir) = &cli.export_logos {
        export_logos(&session, dir);
    }

    if cli.dump {
        for team in session.teams() {
            println!("{}", render_team_listing(team));
        }
    }

    if cli.json {
        let exports = (0..TEAM_COUNT)
            .map(|idx| session.export_team(idx))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_else(|e| {
                eprintln!("Error exporting teams: {e}");
                process::exit(1);
            });
        let rendered = render_teams_json(&exports).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
    }

    if let Some(out_path) = &cli.output {
        let edited = session.save().unwrap_or_else(|e| {
            eprintln!("Error committing edits: {e}");
            process::exit(1);
        });
        fs::write(out_path, edited).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        tracing::info!("wrote {}", out_path.display());
        if !cli.json {
            println!("Wrote edited ROM to {}", out_path.display());
        }
    }
}

fn team_path(dir: &Path, idx: usize) -> PathBuf {
    dir.join(format!("team_{idx}.json"))
}

fn logo_path(dir: &Path, idx: usize) -> PathBuf {
    dir.join(format!("logo_{idx}.png"))
}

fn create_dir(dir: &Path) {
    fs::create_dir_all(dir).unwrap_or_else(|e| {
        eprintln!("Error creating {}: {e}", dir.display());
        process::exit(1);
    });
}

fn read_if_present(path: &Path) -> Option<Vec<u8>> {
    if !path.exists() {
        tracing::debug!("{} not found, skipping", path.display());
        return None;
    }
    Some(fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    }))
}

fn import_teams(session: &mut Session, dir: &Path) {
    let mut imported = 0;
    let mut skipped = 0;
    for idx in 0..TEAM_COUNT {
        let path = team_path(dir, idx);
        let Some(bytes) = read_if_present(&path) else {
            skipped += 1;
            continue;
        };
        let text = String::from_utf8(bytes).unwrap_or_else(|e| {
            eprintln!("Error reading {}: not valid UTF-8 ({e})", path.display());
            process::exit(1);
        });
        let export = parse_team_json(&text).unwrap_or_else(|e| {
            eprintln!("Error parsing {}: {e}", path.display());
            process::exit(1);
        });
        session.import_team(idx, &export).unwrap_or_else(|e| {
            eprintln!("Error importing {}: {e}", path.display());
            process::exit(1);
        });
        imported += 1;
    }
    tracing::info!("imported {imported} teams from {} ({skipped} skipped)", dir.display());
}

fn import_logos(session: &mut Session, dir: &Path) {
    let mut imported = 0;
    let mut skipped = 0;
    for idx in 0..TEAM_COUNT {
        let path = logo_path(dir, idx);
        let Some(bytes) = read_if_present(&path) else {
            skipped += 1;
            continue;
        };
        let bitmap = decode_logo_png(&bytes).unwrap_or_else(|e| {
            eprintln!("Error decoding {}: {e}", path.display());
            process::exit(1);
        });
        session.import_logo(idx, &bitmap).unwrap_or_else(|e| {
            eprintln!("Error importing {}: {e}", path.display());
            process::exit(1);
        });
        imported += 1;
    }
    tracing::info!("imported {imported} logos from {} ({skipped} skipped)", dir.display());
}

fn export_teams(session: &Session, dir: &Path) {
    create_dir(dir);
    for idx in 0..TEAM_COUNT {
        let path = team_path(dir, idx);
        let rendered = session
            .export_team(idx)
            .and_then(|export| render_team_json(&export))
            .unwrap_or_else(|e| {
                eprintln!("Error exporting team {idx}: {e}");
                process::exit(1);
            });
        fs::write(&path, rendered).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", path.display());
            process::exit(1);
        });
    }
    tracing::info!("exported {TEAM_COUNT} teams to {}", dir.display());
}

fn export_logos(session: &Session, dir: &Path) {
    create_dir(dir);
    for idx in 0..TEAM_COUNT {
        let path = logo_path(dir, idx);
        let png = session
            .export_logo(idx)
            .and_then(|bitmap| encode_logo_png(&bitmap))
            .unwrap_or_else(|e| {
                eprintln!("Error exporting logo {idx}: {e}");
                process::exit(1);
            });
        fs::write(&path, png).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", path.display());
            process::exit(1);
        });
    }
    tracing::info!("exported {TEAM_COUNT} logos to {}", dir.display());
}
