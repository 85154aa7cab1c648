//! CLI utility for building and inspecting level geometry meshes

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use levelmesh::{
    decode_ring_stream, encode_ring, split_self_intersecting, triangulate_simple, BuildContext,
    MeshBuilder, PipelineConfig, MESH_NULL_IDX,
};
use levelmesh_common::{PolygonSet, Ring};

/// A CLI utility for building navigation meshes from 2D level geometry
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a convex navigation mesh from a polygon file
    Build {
        /// Input polygon file (one ring per line, "x,y x,y x,y ...")
        #[clap(long, value_parser)]
        input: PathBuf,

        /// Output mesh file
        #[clap(long, value_parser)]
        output: PathBuf,

        /// The maximum number of vertices allowed for merged polygons
        #[clap(long, default_value = "6")]
        max_verts_per_poly: usize,

        /// Translation applied to x before quantizing to the 16-bit grid
        #[clap(long, default_value = "0")]
        offset_x: i32,

        /// Translation applied to y before quantizing to the 16-bit grid
        #[clap(long, default_value = "0")]
        offset_y: i32,

        /// Print per-stage timing after the build
        #[clap(long)]
        timings: bool,
    },

    /// Split self-intersecting polygons into simple rings
    Split {
        /// Input polygon file
        #[clap(long, value_parser)]
        input: PathBuf,
    },

    /// Triangulate each polygon and report triangle counts and areas
    Triangulate {
        /// Input polygon file
        #[clap(long, value_parser)]
        input: PathBuf,
    },

    /// Union all polygons in the file into a minimal ring set
    Merge {
        /// Input polygon file
        #[clap(long, value_parser)]
        input: PathBuf,

        /// Fixed-point up-scale factor for the clipper
        #[clap(long, default_value = "1024")]
        clip_scale: f32,
    },

    /// Grow (or shrink, with a negative distance) each polygon
    Offset {
        /// Input polygon file
        #[clap(long, value_parser)]
        input: PathBuf,

        /// Signed offset distance
        #[clap(long)]
        distance: f32,

        /// Fixed-point up-scale factor for the clipper
        #[clap(long, default_value = "1024")]
        clip_scale: f32,
    },

    /// Encode polygons to the binary ring format
    Encode {
        /// Input polygon file
        #[clap(long, value_parser)]
        input: PathBuf,

        /// Output binary file
        #[clap(long, value_parser)]
        output: PathBuf,
    },

    /// Decode a binary ring file and print its polygons
    Decode {
        /// Input binary file
        #[clap(long, value_parser)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Build {
            input,
            output,
            max_verts_per_poly,
            offset_x,
            offset_y,
            timings,
        } => build(
            &input,
            &output,
            max_verts_per_poly,
            offset_x,
            offset_y,
            timings,
        ),
        Commands::Split { input } => split(&input),
        Commands::Triangulate { input } => triangulate(&input),
        Commands::Merge { input, clip_scale } => merge(&input, clip_scale),
        Commands::Offset {
            input,
            distance,
            clip_scale,
        } => offset(&input, distance, clip_scale),
        Commands::Encode { input, output } => encode(&input, &output),
        Commands::Decode { input } => decode(&input),
    }
}

/// Parse one "x,y" pair
fn parse_point(s: &str) -> Result<Vec2> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("point must be \"x,y\", got \"{s}\""))?;
    Ok(Vec2::new(
        x.trim().parse::<f32>()?,
        y.trim().parse::<f32>()?,
    ))
}

/// Loads a polygon set from a text file, one ring per non-empty line
fn load_polygons(path: &Path) -> Result<PolygonSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut set = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let points: Result<Vec<Vec2>> = line.split_whitespace().map(parse_point).collect();
        let points = points.with_context(|| format!("line {}", lineno + 1))?;
        set.push(Ring::new(points));
    }
    Ok(set)
}

fn print_rings(rings: &[Ring]) {
    for (i, ring) in rings.iter().enumerate() {
        let coords: Vec<String> = ring
            .points()
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect();
        println!("ring {}: {}", i, coords.join(" "));
    }
}

fn build(
    input: &Path,
    output: &Path,
    max_verts_per_poly: usize,
    offset_x: i32,
    offset_y: i32,
    timings: bool,
) -> Result<()> {
    let polygons = load_polygons(input)?;
    println!("Loaded {} polygons from {}", polygons.len(), input.display());

    let config = PipelineConfig {
        max_verts_per_poly,
        offset_x,
        offset_y,
        ..PipelineConfig::default()
    };

    let builder = MeshBuilder::new(config);
    let mut context = BuildContext::new();
    let mesh = builder
        .build_from_polygons(&polygons, &mut context)
        .map_err(|e| anyhow!("failed to build mesh: {e}"))?;

    println!(
        "Mesh built: {} vertices, {} polygons",
        mesh.nverts, mesh.npolys
    );

    let mut file = fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    writeln!(file, "nvp {}", mesh.nvp)?;
    writeln!(file, "offset {} {}", mesh.offset_x, mesh.offset_y)?;
    for i in 0..mesh.nverts {
        let (x, y) = mesh.vertex(i);
        writeln!(file, "v {x} {y}")?;
    }
    for p in 0..mesh.npolys {
        let verts: Vec<String> = mesh
            .poly_verts(p)
            .iter()
            .filter(|&&v| v != MESH_NULL_IDX)
            .map(|v| v.to_string())
            .collect();
        let neighbors: Vec<String> = mesh
            .poly_neighbors(p)
            .iter()
            .map(|&n| {
                if n == MESH_NULL_IDX {
                    "-".to_string()
                } else {
                    n.to_string()
                }
            })
            .collect();
        writeln!(file, "p {} | {}", verts.join(" "), neighbors.join(" "))?;
    }
    println!("Mesh written to {}", output.display());

    if timings {
        context.print_timer_summary();
    }
    Ok(())
}

fn split(input: &Path) -> Result<()> {
    let polygons = load_polygons(input)?;
    let simple = split_self_intersecting(&polygons);
    println!(
        "{} input rings resolved into {} simple rings",
        polygons.len(),
        simple.len()
    );
    print_rings(&simple);
    Ok(())
}

fn triangulate(input: &Path) -> Result<()> {
    let polygons = load_polygons(input)?;
    for (i, ring) in polygons.iter().enumerate() {
        match triangulate_simple(ring) {
            Ok(soup) => println!(
                "ring {}: {} triangles, total area {:.3}",
                i,
                soup.triangle_count(),
                soup.total_area()
            ),
            Err(e) => println!("ring {i}: failed: {e}"),
        }
    }
    Ok(())
}

fn merge(input: &Path, clip_scale: f32) -> Result<()> {
    let polygons = load_polygons(input)?;
    let builder = MeshBuilder::new(PipelineConfig {
        clip_scale,
        ..PipelineConfig::default()
    });
    let merged = builder
        .merge_polygons(&polygons)
        .map_err(|e| anyhow!("merge failed: {e}"))?;
    println!(
        "{} input rings merged into {} rings",
        polygons.len(),
        merged.len()
    );
    print_rings(&merged);
    Ok(())
}

fn offset(input: &Path, distance: f32, clip_scale: f32) -> Result<()> {
    let polygons = load_polygons(input)?;
    let builder = MeshBuilder::new(PipelineConfig {
        clip_scale,
        ..PipelineConfig::default()
    });
    let grown: Vec<Ring> = polygons
        .iter()
        .map(|ring| builder.offset_polygon(ring, distance))
        .collect();
    print_rings(&grown);
    Ok(())
}

fn encode(input: &Path, output: &Path) -> Result<()> {
    let polygons = load_polygons(input)?;
    let mut buf = Vec::new();
    for ring in &polygons {
        encode_ring(ring, &mut buf).map_err(|e| anyhow!("encode failed: {e}"))?;
    }
    fs::write(output, &buf)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Encoded {} rings ({} bytes) to {}",
        polygons.len(),
        buf.len(),
        output.display()
    );
    Ok(())
}

fn decode(input: &Path) -> Result<()> {
    let bytes =
        fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;

    let rings = decode_ring_stream(&bytes).map_err(|e| anyhow!("decode failed: {e}"))?;
    println!("Decoded {} rings", rings.len());
    print_rings(&rings);
    Ok(())
}
