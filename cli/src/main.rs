use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bumpalo::Bump;
use clap::Parser;
use undump::{Closure, LoadOptions, NoVerify, Proto, StringTable, render_error};

/// Undump - inspect precompiled chunks
#[derive(Parser, Debug)]
#[command(name = "undump")]
#[command(about = "Load precompiled chunks and describe what they contain", long_about = None)]
struct Args {
    /// Print the full listing of every function
    #[arg(short, long)]
    list: bool,

    /// Name used in error messages (defaults to @<path>)
    #[arg(long)]
    name: Option<String>,

    /// Maximum function nesting depth to accept
    #[arg(long, default_value_t = LoadOptions::default().max_depth)]
    max_depth: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Chunk files to load ("-" reads stdin)
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG wins; otherwise -v picks the level
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a whole chunk, reporting failures under the chunk's display name.
fn read_input(path: &Path, name: &str) -> Result<Vec<u8>, undump::Error> {
    let bytes = if is_stdin(path) {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf).map(|_| buf)
    } else {
        std::fs::read(path)
    };
    bytes.map_err(|source| undump::Error::Io {
        chunk: undump::chunk_name(name).to_string(),
        source,
    })
}

fn instruction_count(proto: &Proto<'_>) -> usize {
    proto.code.len() + proto.protos.iter().map(instruction_count).sum::<usize>()
}

fn describe(display: &str, closure: &Closure<'_>, list: bool) {
    if list {
        print!("{}", closure.proto.listing());
        return;
    }
    let proto = &closure.proto;
    println!(
        "{}: {} function(s), nesting depth {}, {} instruction(s), {} upvalue(s)",
        display,
        proto.count(),
        proto.depth(),
        instruction_count(proto),
        closure.upvalues.len()
    );
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = LoadOptions {
        max_depth: args.max_depth,
        ..LoadOptions::default()
    };

    let mut failed = false;
    for path in &args.files {
        let name = match &args.name {
            Some(name) => name.clone(),
            None if is_stdin(path) => "=stdin".to_string(),
            None => format!("@{}", path.display()),
        };
        let bytes = match read_input(path, &name) {
            Ok(bytes) => bytes,
            Err(err) => {
                render_error(&err);
                failed = true;
                continue;
            }
        };

        let arena = Bump::new();
        let strings = StringTable::new(&arena);
        match undump::load_with(strings, &bytes, &name, &options, &NoVerify) {
            Ok(closure) => describe(undump::chunk_name(&name), &closure, args.list),
            Err(err) => {
                render_error(&err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
