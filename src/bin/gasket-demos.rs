use clap::Parser;
use gasket_demos::{
    demos::{self, Demo, Overrides},
    flow,
};

/// Graphics teaching demos: gaskets, cubes, planets and the painter's algorithm.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Which demo to run
    #[arg(value_enum, default_value_t = Demo::Gasket)]
    demo: Demo,

    /// Number of chaos-game points of the gasket
    #[arg(long)]
    points: Option<usize>,

    /// Subdivision depth of the gasket or the spheres
    #[arg(long)]
    depth: Option<u32>,

    /// Seed for random points, materials and textures
    #[arg(long)]
    seed: Option<u64>,

    /// Distance of the orbit camera from its target
    #[arg(long)]
    radius: Option<f32>,

    /// Camera angle around the y axis in degrees
    #[arg(long, allow_hyphen_values = true)]
    theta: Option<f32>,

    /// Camera elevation in degrees
    #[arg(long, allow_hyphen_values = true)]
    phi: Option<f32>,

    /// Use an orthographic projection
    #[arg(long, conflicts_with = "perspective")]
    orthographic: bool,

    /// Use a perspective projection
    #[arg(long)]
    perspective: bool,

    /// Speed factor of the earth-moon and hsr animations
    #[arg(long, allow_hyphen_values = true)]
    time_scale: Option<f32>,

    /// Show a banded gas giant with this palette instead of the earth (planet demo)
    #[arg(long)]
    palette: Option<usize>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        let orthographic = match (self.orthographic, self.perspective) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Overrides {
            points: self.points,
            depth: self.depth,
            seed: self.seed,
            radius: self.radius,
            theta: self.theta,
            phi: self.phi,
            orthographic,
            time_scale: self.time_scale,
            palette: self.palette,
        }
    }
}

fn main() {
    let args = Args::parse();
    flow::init_logger();
    let constructor = match demos::constructor(args.demo, &args.overrides()) {
        Ok(constructor) => constructor,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };
    if let Err(e) = flow::run(vec![constructor]) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
