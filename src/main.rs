use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use htm::input::{self, InputError, VertexFormat};
use htm::output::{self, IdStyle, OutputFormat, TextOptions};
use htm::util::Timed;
use htm_index::{locate, CellId, Cover, CoverConfig, MAX_LEVEL};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliFormat {
    Text,
    Json,
}

/// htm - Hierarchical Triangular Mesh coverings on the sphere
#[derive(Parser, Debug)]
#[command(name = "htm", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cover a convex given by 3 or more vertices and print its id ranges
    Cover(CoverArgs),
    /// Check cells against a saved range file
    Contains(ContainsArgs),
    /// Print the cell containing a point
    Locate(LocateArgs),
}

#[derive(Args, Debug)]
struct CoverArgs {
    /// Maximum depth of the covering
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u32).range(0..=MAX_LEVEL as i64))]
    depth: u32,

    /// Vertices in counter-clockwise order, as x,y,z (or lat,lon with --latlon).
    /// Give this flag last when coordinates are negative.
    #[arg(
        long,
        num_args = 1..,
        allow_hyphen_values = true,
        required_unless_present = "input",
        conflicts_with = "input"
    )]
    points: Vec<String>,

    /// Read vertices from the first line of a file
    #[arg(short = 'i', long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Interpret vertices as latitude,longitude in degrees
    #[arg(long)]
    latlon: bool,

    /// Print numeric ids instead of names
    #[arg(short = 'l')]
    numeric: bool,

    /// Print all ranges on one line, separated by ';'
    #[arg(long)]
    compact: bool,

    /// Write ranges to a file instead of stdout (.gz is compressed)
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = CliFormat::Text)]
    format: CliFormat,

    /// Classify the 8 root subtrees in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Args, Debug)]
struct ContainsArgs {
    /// Range file in text or JSON form
    #[arg(short = 'r', long, value_name = "FILE")]
    ranges: PathBuf,

    /// Cell names or numeric ids
    #[arg(required = true)]
    cells: Vec<String>,
}

#[derive(Args, Debug)]
struct LocateArgs {
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u32).range(0..=MAX_LEVEL as i64))]
    depth: u32,

    /// Interpret the point as latitude,longitude in degrees
    #[arg(long)]
    latlon: bool,

    /// Point as x,y,z (or lat,lon with --latlon)
    #[arg(allow_hyphen_values = true)]
    point: String,
}

fn vertex_format(latlon: bool) -> VertexFormat {
    if latlon {
        VertexFormat::LatLon
    } else {
        VertexFormat::Cartesian
    }
}

fn run_cover(args: &CoverArgs) -> Result<(), InputError> {
    let tokens = match &args.input {
        Some(path) => input::read_vertex_file(path)?,
        None => args.points.clone(),
    };
    let convex = input::parse_convex(&tokens, vertex_format(args.latlon))?;
    log::debug!("convex of {} caps, sign {:?}", convex.caps().len(), convex.sign());

    let config = CoverConfig {
        max_level: args.depth,
        parallel: args.parallel,
    };
    let mut cover = Cover::with_config(&convex, config);
    {
        let _t = Timed::info(format!("cover to depth {}", args.depth));
        cover.run();
    }

    let ranges = cover.id_ranges(args.depth);
    log::info!(
        "{} full, {} partial, {} ranges over {} cells",
        cover.full_cells().len(),
        cover.partial_cells().len(),
        ranges.len(),
        ranges.cell_count()
    );

    let format = match args.format {
        CliFormat::Text => OutputFormat::Text(TextOptions {
            style: if args.numeric {
                IdStyle::Numeric
            } else {
                IdStyle::Name
            },
            compact: args.compact,
        }),
        CliFormat::Json => OutputFormat::Json,
    };

    match &args.file {
        Some(path) => {
            output::save(path, &ranges, format).map_err(|e| InputError::io(path, e))?;
            println!("ranges saved to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            output::write_ranges(&mut stdout, &ranges, format)
                .map_err(|e| InputError::io("<stdout>", e))?;
        }
    }
    Ok(())
}

fn run_contains(args: &ContainsArgs) -> Result<(), InputError> {
    let ranges = input::read_ranges(&args.ranges)?;
    log::debug!(
        "loaded {} ranges at level {} from {}",
        ranges.len(),
        ranges.level(),
        args.ranges.display()
    );

    for token in &args.cells {
        let id: CellId = token.parse()?;
        println!(
            "{} {} contains={} overlaps={}",
            id,
            id.id(),
            ranges.contains(id),
            ranges.overlaps(id)
        );
    }
    Ok(())
}

fn run_locate(args: &LocateArgs) -> Result<(), InputError> {
    let point = input::parse_vertex(&args.point, vertex_format(args.latlon))?;
    let id = locate(point, args.depth);
    println!("{} {}", id, id.id());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Cover(args) => run_cover(args),
        Command::Contains(args) => run_contains(args),
        Command::Locate(args) => run_locate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
