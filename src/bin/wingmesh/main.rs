//! Wingmesh CLI - load polygon-list files, inspect them and pick faces.
//!
//! Usage: wingmesh <COMMAND> [OPTIONS] <FILES>...
//!
//! Run `wingmesh --help` for available commands.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use nalgebra::{Point3, Vector3};

use wingmesh::algo::{NormalOptions, PickOptions, Ray};
use wingmesh::error::MeshError;
use wingmesh::mesh::DEFAULT_COLOR;
use wingmesh::scene::{LoadOptions, Scene};

const HIGHLIGHT_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

#[derive(Parser)]
#[command(name = "wingmesh")]
#[command(author, version, about = "Half-edge mesh loader and picker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// Pick the face hit by a ray
    Pick {
        #[command(flatten)]
        load: LoadArgs,

        /// Ray origin as x,y,z
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        origin: [f64; 3],

        /// Ray direction as x,y,z
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        direction: [f64; 3],

        /// Choose the first surface along the ray
        #[arg(long)]
        nearest: bool,
    },

    /// Print the flattened per-corner records
    Dump {
        #[command(flatten)]
        load: LoadArgs,

        /// Color the corners of this face differently
        #[arg(long)]
        highlight: Option<usize>,
    },
}

#[derive(Args)]
struct LoadArgs {
    /// Input files, appended in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Skip the normal smoothing pass
    #[arg(long)]
    no_smooth: bool,

    /// Keep positions as read instead of reboxing
    #[arg(long)]
    no_rebox: bool,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,
}

impl LoadArgs {
    fn options(&self) -> LoadOptions {
        let normals = NormalOptions::default()
            .with_smoothing(!self.no_smooth)
            .with_parallel(!self.sequential);
        let options = LoadOptions::default().with_normals(normals);
        if self.no_rebox {
            options.without_rebox()
        } else {
            options
        }
    }

    fn load(&self) -> Result<Scene, Box<dyn std::error::Error>> {
        let mut scene = Scene::with_options(self.options());
        let start = Instant::now();
        for path in &self.files {
            scene.load(path)?;
        }
        log::debug!("loaded {} files in {:.2?}", self.files.len(), start.elapsed());
        Ok(scene)
    }
}

fn parse_triple(s: &str) -> Result<[f64; 3], String> {
    let fields: Vec<&str> = s.split(',').collect();
    if fields.len() != 3 {
        return Err(format!("expected x,y,z but got {:?}", s));
    }

    let mut out = [0.0; 3];
    for (slot, field) in out.iter_mut().zip(&fields) {
        *slot = field
            .trim()
            .parse()
            .map_err(|_| format!("invalid number {:?}", field))?;
    }
    Ok(out)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { load } => cmd_info(&load)?,

        Commands::Pick {
            load,
            origin,
            direction,
            nearest,
        } => cmd_pick(&load, origin, direction, nearest)?,

        Commands::Dump { load, highlight } => cmd_dump(&load, highlight)?,
    }

    Ok(())
}

fn cmd_info(load: &LoadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scene = load.load()?;
    let mesh = scene.mesh();

    for path in &load.files {
        println!("File: {}", path.display());
    }
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());

    let twinned = mesh
        .halfedge_ids()
        .filter(|&he| mesh.twin(he).is_some())
        .count();
    println!("Interior edges: {}", twinned / 2);
    println!("Boundary half-edges: {}", mesh.num_halfedges() - twinned);

    let boundary_verts = mesh
        .vertex_ids()
        .filter(|&v| mesh.is_boundary_vertex(v))
        .count();
    if boundary_verts == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary vertices)", boundary_verts);
    }

    println!("Surface area: {:.6}", mesh.surface_area());
    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let missing = mesh
        .vertex_ids()
        .filter(|&v| mesh.vertex_normal(v).is_none())
        .count();
    if missing > 0 {
        println!("Vertices without a normal: {}", missing);
    }

    if !mesh.warnings().is_empty() {
        println!("\nWarnings ({}):", mesh.warnings().len());
        for warning in mesh.warnings() {
            println!("  {}", warning);
        }
    }

    Ok(())
}

fn cmd_pick(
    load: &LoadArgs,
    origin: [f64; 3],
    direction: [f64; 3],
    nearest: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let scene = load.load()?;

    let ray = Ray::new(Point3::from(origin), Vector3::from(direction));
    let options = if nearest {
        PickOptions::default().nearest()
    } else {
        PickOptions::default()
    };

    match scene.intersect_with(&ray, &options) {
        Some(hit) => {
            let [a, b, c] = scene.mesh().face_triangle(hit.face);
            let p = ray.at(hit.distance);
            println!("Face: {}", hit.face.index());
            println!("Corners: {} {} {}", a.index(), b.index(), c.index());
            println!(
                "Barycentric: {:.6} {:.6} {:.6}",
                hit.barycentric[0], hit.barycentric[1], hit.barycentric[2]
            );
            println!("Point: ({:.6}, {:.6}, {:.6})", p.x, p.y, p.z);
            println!("Distance: {:.6}", hit.distance);
        }
        None => println!("No face hit"),
    }

    Ok(())
}

fn cmd_dump(load: &LoadArgs, highlight: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let scene = load.load()?;
    if let Some(face) = highlight {
        if face >= scene.mesh().num_faces() {
            return Err(MeshError::invalid_param("highlight", face, "no such face").into());
        }
    }
    let flat = scene.flatten_with(|f, _, _| {
        if Some(f.index()) == highlight {
            HIGHLIGHT_COLOR
        } else {
            DEFAULT_COLOR
        }
    });

    let corners = flat
        .positions
        .chunks_exact(3)
        .zip(flat.normals.chunks_exact(3))
        .zip(flat.colors.chunks_exact(3));
    for (i, ((p, n), c)) in corners.enumerate() {
        println!(
            "{:6} p {:10.6} {:10.6} {:10.6}  n {:9.6} {:9.6} {:9.6}  c {:.3} {:.3} {:.3}",
            i, p[0], p[1], p[2], n[0], n[1], n[2], c[0], c[1], c[2]
        );
    }

    Ok(())
}
