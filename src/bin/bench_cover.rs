//! Benchmark convex covering over random spherical squares.
//!
//! Run with: cargo run --release --bin bench_cover
//!
//! Usage:
//!   bench_cover                 Default depths (6, 8, 10) with 1k convexes
//!   bench_cover 8 12            Run selected depths
//!   bench_cover -c 10k          Cover 10k convexes per depth
//!   bench_cover --size 2        Squares with a 2 degree half-diagonal

use clap::Parser;
use glam::DVec3;
use htm::util::{format_rate, parse_count};
use htm_index::{Convex, Cover, CoverConfig, MAX_LEVEL};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::{self, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "bench_cover")]
#[command(about = "Benchmark HTM covering at various depths")]
struct Args {
    /// Depths to benchmark
    #[arg(value_parser = clap::value_parser!(u32).range(0..=MAX_LEVEL as i64))]
    depths: Vec<u32>,

    /// Convexes per depth (e.g., 500, 10k)
    #[arg(short, long, value_parser = parse_count, default_value = "1k")]
    count: usize,

    /// Half-diagonal of each square, in degrees
    #[arg(long, default_value_t = 5.0)]
    size: f64,

    /// Random seed
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Also time the parallel traversal
    #[arg(long)]
    parallel: bool,
}

fn random_unit<R: Rng>(rng: &mut R) -> DVec3 {
    use std::f64::consts::PI;
    let z: f64 = rng.gen_range(-1.0..1.0);
    let theta: f64 = rng.gen_range(0.0..2.0 * PI);
    let r = (1.0 - z * z).sqrt();
    DVec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Counter-clockwise square centred on a random point.
fn random_square<R: Rng>(rng: &mut R, half_diagonal: f64) -> Option<Convex> {
    let c = random_unit(rng);
    let helper = if c.z.abs() < 0.9 { DVec3::Z } else { DVec3::X };
    let t1 = helper.cross(c).normalize();
    let t2 = c.cross(t1);
    let spin: f64 = rng.gen_range(0.0..std::f64::consts::FRAC_PI_2);
    let reach = half_diagonal.tan();

    let vertices: Vec<DVec3> = (0..4)
        .map(|k| {
            let phi = spin + k as f64 * std::f64::consts::FRAC_PI_2;
            (c + reach * (phi.cos() * t1 + phi.sin() * t2)).normalize()
        })
        .collect();
    Convex::from_vertices(&vertices).ok()
}

struct BenchResult {
    time_ms: f64,
    cells: usize,
    ranges: usize,
}

fn run_benchmark(convexes: &[Convex], depth: u32, parallel: bool) -> BenchResult {
    let config = CoverConfig {
        max_level: depth,
        parallel,
    };
    let mut cells = 0usize;
    let mut ranges = 0usize;

    let t0 = Instant::now();
    for convex in convexes {
        let mut cover = Cover::with_config(convex, config);
        cover.run();
        cells += cover.full_cells().len() + cover.partial_cells().len();
        ranges += cover.id_ranges(depth).len();
    }
    let time_ms = t0.elapsed().as_secs_f64() * 1000.0;

    BenchResult {
        time_ms,
        cells,
        ranges,
    }
}

fn print_result(label: &str, n: usize, result: &BenchResult) {
    println!(
        "  {:<10} {:>9.1}ms  {:>10}  cells/convex {:>8.1}  ranges/convex {:>7.1}",
        label,
        result.time_ms,
        format_rate(n, result.time_ms),
        result.cells as f64 / n.max(1) as f64,
        result.ranges as f64 / n.max(1) as f64,
    );
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("HTM Cover Benchmark");
    println!("===================\n");

    let depths: Vec<u32> = if args.depths.is_empty() {
        vec![6, 8, 10]
    } else {
        args.depths.clone()
    };

    print!(
        "Generating {} squares ({:.1} deg, seed {})... ",
        args.count, args.size, args.seed
    );
    io::stdout().flush().ok();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let half_diagonal = args.size.to_radians();
    let convexes: Vec<Convex> = (0..args.count)
        .filter_map(|_| random_square(&mut rng, half_diagonal))
        .collect();
    println!("{} built\n", convexes.len());

    for depth in depths {
        println!("Depth {}:", depth);
        let sequential = run_benchmark(&convexes, depth, false);
        print_result("sequential", convexes.len(), &sequential);

        if args.parallel {
            let parallel = run_benchmark(&convexes, depth, true);
            print_result("parallel", convexes.len(), &parallel);
            println!(
                "  speedup    {:>9.2}x",
                sequential.time_ms / parallel.time_ms.max(f64::EPSILON)
            );
        }
        println!();
    }
}
