//! Level geometry pipeline for 2D navigation meshes
//!
//! Takes raw author polygons, resolves self-intersections, triangulates,
//! and welds the result into a convex polygon mesh suitable for
//! pathfinding. Polygon boolean/offset helpers and a binary codec for
//! points and rings sit alongside the pipeline.

mod clip;
mod codec;
mod config;
mod context;
mod earclip;
mod polymesh;
mod region;
mod resolver;

pub use clip::{merge_polygons, merge_polygons_scaled, offset_polygon, offset_polygon_scaled};
pub use codec::{
    decode_point, decode_ring, decode_ring_stream, encode_point, encode_ring, RING_CODEC_VERSION,
};
pub use config::{PipelineConfig, DEFAULT_CLIP_SCALE};
pub use context::{
    BuildContext, LogEntry, LogLevel, ProgressInfo, TimerCategory, TimerEntry, TimerGuard,
};
pub use earclip::triangulate_simple;
pub use polymesh::{build_mesh, build_mesh_with_config, PolyMesh, MESH_NULL_IDX};
pub use region::triangulate_region;
pub use resolver::{split_ring, split_self_intersecting};

use levelmesh_common::{close_enough, Bounds, PolygonSet, Result, Ring, TriangleSoup, Vec2};

/// Builder running the full polygon-to-navigation-mesh pipeline
#[derive(Debug)]
pub struct MeshBuilder {
    /// Configuration for mesh generation
    config: PipelineConfig,
}

impl MeshBuilder {
    /// Creates a new MeshBuilder with the specified configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Gets a reference to the configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Builds a navigation mesh from a set of author polygons.
    ///
    /// Rings are split into simple polygons, ear-clipped one by one, and
    /// the combined triangle soup is welded and merged into convex
    /// polygons. Rings that fail triangulation are logged and skipped
    /// rather than failing the whole build.
    pub fn build_from_polygons(
        &self,
        polygons: &PolygonSet,
        context: &mut BuildContext,
    ) -> Result<PolyMesh> {
        self.config.validate()?;
        context.start_timer(TimerCategory::Total);

        context.start_timer(TimerCategory::SelfIntersection);
        let simple = split_self_intersecting(polygons);
        context.stop_timer(TimerCategory::SelfIntersection);
        context.log_debug(format!(
            "{} input rings resolved into {} simple rings",
            polygons.len(),
            simple.len()
        ));

        context.start_timer(TimerCategory::Triangulation);
        let mut soup = TriangleSoup::new();
        for ring in &simple {
            let ring = weld_ring_points(ring, self.config.weld_epsilon);
            match triangulate_simple(&ring) {
                Ok(triangles) => soup.extend(&triangles),
                Err(e) => {
                    context.log_warning(format!("skipping {}-point ring: {e}", ring.len()));
                }
            }
        }
        context.stop_timer(TimerCategory::Triangulation);

        let mesh = self.finish(soup, context)?;
        context.stop_timer(TimerCategory::Total);
        Ok(mesh)
    }

    /// Builds a navigation mesh for a bounded region with polygon
    /// boundaries and holes, using constrained triangulation.
    pub fn build_from_region(
        &self,
        bounds: Bounds,
        rings: &[Ring],
        context: &mut BuildContext,
    ) -> Result<PolyMesh> {
        self.config.validate()?;
        context.start_timer(TimerCategory::Total);

        context.start_timer(TimerCategory::SelfIntersection);
        let simple = split_self_intersecting(&rings.to_vec());
        context.stop_timer(TimerCategory::SelfIntersection);

        context.start_timer(TimerCategory::Triangulation);
        let soup = triangulate_region(bounds, &simple)?;
        context.stop_timer(TimerCategory::Triangulation);

        let mesh = self.finish(soup, context)?;
        context.stop_timer(TimerCategory::Total);
        Ok(mesh)
    }

    /// Unions a polygon set using the configured fixed-point clip scale.
    pub fn merge_polygons(&self, set: &PolygonSet) -> Result<PolygonSet> {
        merge_polygons_scaled(set, self.config.clip_scale)
    }

    /// Offsets a ring using the configured fixed-point clip scale.
    pub fn offset_polygon(&self, ring: &Ring, distance: f32) -> Ring {
        offset_polygon_scaled(ring, distance, self.config.clip_scale)
    }

    fn finish(&self, soup: TriangleSoup, context: &mut BuildContext) -> Result<PolyMesh> {
        context.start_timer(TimerCategory::MeshBuild);
        let mesh = build_mesh_with_config(&soup, &self.config);
        context.stop_timer(TimerCategory::MeshBuild);

        if let Ok(mesh) = &mesh {
            context.log_info(format!(
                "mesh built: {} triangles in, {} polygons, {} vertices out",
                soup.triangle_count(),
                mesh.npolys,
                mesh.nverts
            ));
        }
        mesh
    }
}

/// Drops consecutive points closer together than `epsilon`, keeping the
/// first of each run. The closing edge is checked too.
fn weld_ring_points(ring: &Ring, epsilon: f32) -> Ring {
    if epsilon <= 0.0 || ring.len() < 2 {
        return ring.clone();
    }
    let mut kept: Vec<Vec2> = Vec::with_capacity(ring.len());
    for &p in ring.points() {
        if kept.last().map_or(true, |&last| !close_enough(last, p, epsilon)) {
            kept.push(p);
        }
    }
    if kept.len() > 1 && close_enough(kept[0], *kept.last().unwrap(), epsilon) {
        kept.pop();
    }
    Ring::new(kept)
}
