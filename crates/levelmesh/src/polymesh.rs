//! Convex polygon mesh construction
//!
//! Welds a triangle soup into a deduplicated vertex buffer and greedily
//! merges adjacent convex polygons into larger convex polygons, producing
//! the navigation mesh consumed by pathfinding.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use levelmesh_common::{float_to_int, Error, Result, TriangleSoup};

use crate::config::PipelineConfig;

/// Vertex bucket count for spatial hashing
const VERTEX_BUCKET_COUNT: usize = 1 << 12;

/// Null index marking unused polygon vertex slots and open edges
pub const MESH_NULL_IDX: u16 = 0xffff;

/// A convex polygon mesh over 16-bit quantized coordinates.
///
/// Vertices are stored as `[x, y]` pairs. Each polygon occupies a row of
/// `nvp * 2` entries: the first `nvp` are vertex indices (unused slots
/// hold [`MESH_NULL_IDX`]), the second `nvp` are the neighbor polygon
/// index across each edge ([`MESH_NULL_IDX`] for boundary edges).
#[derive(Debug, Clone)]
pub struct PolyMesh {
    /// Mesh vertices `[x, y]` * nverts
    pub verts: Vec<u16>,
    /// Polygon and neighbor data, `nvp * 2` per polygon
    pub polys: Vec<u16>,
    /// Number of vertices
    pub nverts: usize,
    /// Number of polygons
    pub npolys: usize,
    /// Polygon capacity the arrays were sized for
    pub maxpolys: usize,
    /// Max vertices per polygon
    pub nvp: usize,
    /// Translation applied to x before quantizing
    pub offset_x: i32,
    /// Translation applied to y before quantizing
    pub offset_y: i32,
}

impl PolyMesh {
    /// Creates a new empty polygon mesh
    pub fn new(nvp: usize) -> Self {
        Self {
            verts: Vec::new(),
            polys: Vec::new(),
            nverts: 0,
            npolys: 0,
            maxpolys: 0,
            nvp,
            offset_x: 0,
            offset_y: 0,
        }
    }

    /// Returns a polygon's vertex slots (length `nvp`, unused slots are
    /// [`MESH_NULL_IDX`])
    pub fn poly_verts(&self, poly: usize) -> &[u16] {
        &self.polys[poly * self.nvp * 2..poly * self.nvp * 2 + self.nvp]
    }

    /// Returns a polygon's per-edge neighbor slots (length `nvp`)
    pub fn poly_neighbors(&self, poly: usize) -> &[u16] {
        &self.polys[poly * self.nvp * 2 + self.nvp..poly * self.nvp * 2 + self.nvp * 2]
    }

    /// Counts the used vertex slots of a polygon
    pub fn poly_vertex_count(&self, poly: usize) -> usize {
        count_poly_verts(self.poly_verts(poly), self.nvp)
    }

    /// Returns a vertex as quantized `(x, y)`
    pub fn vertex(&self, index: usize) -> (u16, u16) {
        (self.verts[index * 2], self.verts[index * 2 + 1])
    }
}

/// Builds a convex polygon mesh from a triangle soup with default
/// quantization offsets.
pub fn build_mesh(soup: &TriangleSoup, max_verts_per_poly: usize) -> Result<PolyMesh> {
    let config = PipelineConfig {
        max_verts_per_poly,
        ..PipelineConfig::default()
    };
    build_mesh_with_config(soup, &config)
}

/// Builds a convex polygon mesh from a triangle soup.
///
/// Steps: weld vertices onto the 16-bit integer grid, turn each
/// non-degenerate triangle into a polygon row, then merge pairs of
/// polygons sharing an edge, longest shared edge first, as long as the
/// result stays convex and within `max_verts_per_poly` vertices. Vertex
/// or polygon counts beyond 16 bits are logged as warnings; the mesh is
/// still returned but its indices are numerically truncated.
pub fn build_mesh_with_config(soup: &TriangleSoup, config: &PipelineConfig) -> Result<PolyMesh> {
    config.validate()?;
    let nvp = config.max_verts_per_poly;

    let mut mesh = PolyMesh::new(nvp);
    mesh.offset_x = config.offset_x;
    mesh.offset_y = config.offset_y;

    let ntris = soup.triangle_count();
    if ntris == 0 {
        return Ok(mesh);
    }

    let max_vertices = ntris * 3;
    mesh.verts = vec![0; max_vertices * 2];

    // Spatial hashing for vertex welding; first writer wins for a
    // coordinate, later triangles resolve to the existing index
    let mut first_vert = vec![-1i32; VERTEX_BUCKET_COUNT];
    let mut next_vert = vec![0i32; max_vertices];

    // Working polygon rows, vertex slots only
    let mut polys = vec![MESH_NULL_IDX; ntris * nvp];
    let mut npolys = 0;
    let mut bounds: Vec<[u16; 4]> = Vec::with_capacity(ntris);

    for [a, b, c] in soup.iter_triangles() {
        let ia = add_vertex(
            quantize(a.x, config.offset_x),
            quantize(a.y, config.offset_y),
            &mut mesh.verts,
            &mut first_vert,
            &mut next_vert,
            &mut mesh.nverts,
        );
        let ib = add_vertex(
            quantize(b.x, config.offset_x),
            quantize(b.y, config.offset_y),
            &mut mesh.verts,
            &mut first_vert,
            &mut next_vert,
            &mut mesh.nverts,
        );
        let ic = add_vertex(
            quantize(c.x, config.offset_x),
            quantize(c.y, config.offset_y),
            &mut mesh.verts,
            &mut first_vert,
            &mut next_vert,
            &mut mesh.nverts,
        );

        // Triangles collapsed by welding are dropped here
        if ia == ib || ia == ic || ib == ic {
            continue;
        }

        polys[npolys * nvp] = ia;
        polys[npolys * nvp + 1] = ib;
        polys[npolys * nvp + 2] = ic;
        bounds.push(poly_bounds(&polys[npolys * nvp..(npolys + 1) * nvp], &mesh.verts, nvp));
        npolys += 1;
    }

    if npolys == 0 {
        mesh.verts.truncate(mesh.nverts * 2);
        return Ok(mesh);
    }

    if nvp > 3 {
        merge_polys(&mut polys, npolys, &bounds, &mesh.verts, nvp);
    }

    // Compact live rows into the final vert+neighbor layout
    mesh.polys = vec![MESH_NULL_IDX; npolys * nvp * 2];
    let mut live = 0;
    for i in 0..npolys {
        let row = &polys[i * nvp..(i + 1) * nvp];
        if row[0] == MESH_NULL_IDX {
            continue;
        }
        mesh.polys[live * nvp * 2..live * nvp * 2 + nvp].copy_from_slice(row);
        live += 1;
    }
    mesh.npolys = live;
    mesh.maxpolys = npolys;
    mesh.polys.truncate(live * nvp * 2);
    mesh.verts.truncate(mesh.nverts * 2);

    build_mesh_adjacency(&mut mesh)?;

    if mesh.nverts > 0xffff {
        log::warn!(
            "mesh has {} vertices, over the 16-bit limit; indices are truncated and the mesh should not be used for navigation",
            mesh.nverts
        );
    }
    if mesh.npolys > 0xffff {
        log::warn!(
            "mesh has {} polygons, over the 16-bit limit; neighbor indices are truncated",
            mesh.npolys
        );
    }

    log::debug!(
        "mesh build complete: {} triangles in, {} polygons, {} vertices",
        ntris,
        mesh.npolys,
        mesh.nverts
    );
    Ok(mesh)
}

fn quantize(coord: f32, offset: i32) -> u16 {
    // Out-of-range coordinates wrap silently; keeping level content in
    // range via the offsets is the caller's responsibility
    (float_to_int(coord) + offset) as u16
}

/// Adds a vertex with spatial hashing, reusing an existing index for an
/// exact coordinate match.
fn add_vertex(
    x: u16,
    y: u16,
    verts: &mut [u16],
    first_vert: &mut [i32],
    next_vert: &mut [i32],
    nv: &mut usize,
) -> u16 {
    let bucket = compute_vertex_hash(x as i32, y as i32);
    let mut i = first_vert[bucket];

    while i != -1 {
        let v = &verts[i as usize * 2..];
        if v[0] == x && v[1] == y {
            return i as u16;
        }
        i = next_vert[i as usize];
    }

    // Could not find, create new
    i = *nv as i32;
    *nv += 1;
    let v = &mut verts[i as usize * 2..];
    v[0] = x;
    v[1] = y;
    next_vert[i as usize] = first_vert[bucket];
    first_vert[bucket] = i;

    i as u16
}

fn compute_vertex_hash(x: i32, y: i32) -> usize {
    const H1: u32 = 0x8da6b343;
    const H2: u32 = 0xd8163841;
    let n = H1
        .wrapping_mul(x as u32)
        .wrapping_add(H2.wrapping_mul(y as u32));
    (n & (VERTEX_BUCKET_COUNT as u32 - 1)) as usize
}

fn poly_bounds(poly: &[u16], verts: &[u16], nvp: usize) -> [u16; 4] {
    let mut b = [u16::MAX, u16::MAX, 0, 0];
    for &v in poly.iter().take(nvp) {
        if v == MESH_NULL_IDX {
            break;
        }
        let x = verts[v as usize * 2];
        let y = verts[v as usize * 2 + 1];
        b[0] = b[0].min(x);
        b[1] = b[1].min(y);
        b[2] = b[2].max(x);
        b[3] = b[3].max(y);
    }
    b
}

fn bounds_overlap(a: &[u16; 4], b: &[u16; 4]) -> bool {
    a[0] <= b[2] && b[0] <= a[2] && a[1] <= b[3] && b[1] <= a[3]
}

/// A candidate pair of polygon rows, ordered by squared shared-edge
/// length so the longest shared edge merges first.
#[derive(Debug, PartialEq, Eq)]
struct MergeCandidate {
    value: i32,
    a: usize,
    b: usize,
}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| other.a.cmp(&self.a))
            .then_with(|| other.b.cmp(&self.b))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Union-find over polygon rows with path compression. An absorbed row
/// resolves, transitively, to the row that absorbed it.
struct PolyRemap {
    parent: Vec<usize>,
}

impl PolyRemap {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn absorb(&mut self, absorbed: usize, absorber: usize) {
        let root = self.find(absorber);
        let victim = self.find(absorbed);
        self.parent[victim] = root;
    }
}

/// Greedy priority merge of adjacent convex polygons.
///
/// Candidates come from a bounding-rectangle precheck; a candidate whose
/// rows changed since discovery is re-validated through the remap table
/// and silently dropped when no longer mergeable.
fn merge_polys(polys: &mut [u16], npolys: usize, bounds: &[[u16; 4]], verts: &[u16], nvp: usize) {
    let mut heap = BinaryHeap::new();
    for i in 0..npolys {
        for j in i + 1..npolys {
            if !bounds_overlap(&bounds[i], &bounds[j]) {
                continue;
            }
            let pa = &polys[i * nvp..(i + 1) * nvp];
            let pb = &polys[j * nvp..(j + 1) * nvp];
            if let Some((ea, _)) = find_shared_edge(pa, pb, nvp) {
                let na = count_poly_verts(pa, nvp);
                let va = pa[ea] as usize;
                let vb = pa[(ea + 1) % na] as usize;
                let dx = verts[va * 2] as i32 - verts[vb * 2] as i32;
                let dy = verts[va * 2 + 1] as i32 - verts[vb * 2 + 1] as i32;
                heap.push(MergeCandidate {
                    value: dx * dx + dy * dy,
                    a: i,
                    b: j,
                });
            }
        }
    }

    let mut remap = PolyRemap::new(npolys);
    let mut tmp = vec![MESH_NULL_IDX; nvp];

    while let Some(candidate) = heap.pop() {
        let a = remap.find(candidate.a);
        let b = remap.find(candidate.b);
        if a == b {
            continue;
        }

        let pa = polys[a * nvp..(a + 1) * nvp].to_vec();
        let pb = polys[b * nvp..(b + 1) * nvp].to_vec();
        if pa[0] == MESH_NULL_IDX || pb[0] == MESH_NULL_IDX {
            continue;
        }

        let (value, ea, eb) = get_poly_merge_value(&pa, &pb, verts, nvp);
        if value <= 0 {
            continue;
        }

        merge_poly_verts(&pa, &pb, ea, eb, &mut tmp, nvp);
        polys[a * nvp..(a + 1) * nvp].copy_from_slice(&tmp);

        // Void the absorbed row and record its redirection
        polys[b * nvp..(b + 1) * nvp].fill(MESH_NULL_IDX);
        remap.absorb(b, a);
    }
}

/// Scores a merge of two polygons.
///
/// Returns the squared length of the shared edge and the local edge
/// index in each polygon, or a non-positive score when the pair shares
/// no edge, the result would exceed `nvp` vertices, or the merged
/// polygon would not be convex.
fn get_poly_merge_value(pa: &[u16], pb: &[u16], verts: &[u16], nvp: usize) -> (i32, usize, usize) {
    let na = count_poly_verts(pa, nvp);
    let nb = count_poly_verts(pb, nvp);

    // If the merged polygon would be too big, do not merge
    if na + nb - 2 > nvp {
        return (-1, 0, 0);
    }

    let Some((ea, eb)) = find_shared_edge(pa, pb, nvp) else {
        return (-1, 0, 0);
    };

    // Check that the vertices flanking the shared edge keep turning left
    let va = pa[(ea + na - 1) % na];
    let vb = pa[ea];
    let vc = pb[(eb + 2) % nb];
    if !uleft(
        &verts[va as usize * 2..],
        &verts[vb as usize * 2..],
        &verts[vc as usize * 2..],
    ) {
        return (-1, 0, 0);
    }

    let va = pb[(eb + nb - 1) % nb];
    let vb = pb[eb];
    let vc = pa[(ea + 2) % na];
    if !uleft(
        &verts[va as usize * 2..],
        &verts[vb as usize * 2..],
        &verts[vc as usize * 2..],
    ) {
        return (-1, 0, 0);
    }

    let va = pa[ea];
    let vb = pa[(ea + 1) % na];
    let dx = verts[va as usize * 2] as i32 - verts[vb as usize * 2] as i32;
    let dy = verts[va as usize * 2 + 1] as i32 - verts[vb as usize * 2 + 1] as i32;

    (dx * dx + dy * dy, ea, eb)
}

/// Finds the one shared edge between two polygons, if any, as local edge
/// indices.
fn find_shared_edge(pa: &[u16], pb: &[u16], nvp: usize) -> Option<(usize, usize)> {
    let na = count_poly_verts(pa, nvp);
    let nb = count_poly_verts(pb, nvp);

    for i in 0..na {
        let mut va0 = pa[i];
        let mut va1 = pa[(i + 1) % na];
        if va0 > va1 {
            std::mem::swap(&mut va0, &mut va1);
        }
        for j in 0..nb {
            let mut vb0 = pb[j];
            let mut vb1 = pb[(j + 1) % nb];
            if vb0 > vb1 {
                std::mem::swap(&mut vb0, &mut vb1);
            }
            if va0 == vb0 && va1 == vb1 {
                return Some((i, j));
            }
        }
    }
    None
}

fn count_poly_verts(p: &[u16], nvp: usize) -> usize {
    p.iter()
        .take(nvp)
        .position(|&x| x == MESH_NULL_IDX)
        .unwrap_or(nvp)
}

/// Strict left turn in quantized coordinates; counter-clockwise polygons
/// stay convex when every corner passes this.
fn uleft(a: &[u16], b: &[u16], c: &[u16]) -> bool {
    (b[0] as i32 - a[0] as i32) * (c[1] as i32 - a[1] as i32)
        - (c[0] as i32 - a[0] as i32) * (b[1] as i32 - a[1] as i32)
        > 0
}

/// Writes the union of two polygons sharing edge `(ea, eb)` into `tmp`.
fn merge_poly_verts(pa: &[u16], pb: &[u16], ea: usize, eb: usize, tmp: &mut [u16], nvp: usize) {
    let na = count_poly_verts(pa, nvp);
    let nb = count_poly_verts(pb, nvp);

    tmp.fill(MESH_NULL_IDX);
    let mut n = 0;

    for i in 0..na - 1 {
        tmp[n] = pa[(ea + 1 + i) % na];
        n += 1;
    }
    for i in 0..nb - 1 {
        tmp[n] = pb[(eb + 1 + i) % nb];
        n += 1;
    }
}

/// Fills the per-edge neighbor slots from an edge-record pass.
///
/// Based on code by Eric Lengyel: every edge is recorded once from its
/// lower-indexed vertex, then matched from the other side. Boundary
/// edges keep [`MESH_NULL_IDX`].
fn build_mesh_adjacency(mesh: &mut PolyMesh) -> Result<()> {
    let nvp = mesh.nvp;
    let npolys = mesh.npolys;
    let nverts = mesh.nverts;

    if npolys == 0 {
        return Ok(());
    }

    let max_edge_count = npolys
        .checked_mul(nvp)
        .ok_or_else(|| Error::MeshBuild("edge table size overflow".to_string()))?;
    let mut first_edge = vec![MESH_NULL_IDX; nverts];
    let mut next_edge = vec![0u16; max_edge_count];
    let mut edge_count = 0;

    #[derive(Default, Clone)]
    struct Edge {
        vert: [u16; 2],
        poly_edge: [u16; 2],
        poly: [u16; 2],
    }

    let mut edges = vec![Edge::default(); max_edge_count];

    // First pass: collect edges keyed by their lower vertex
    for i in 0..npolys {
        let t = &mesh.polys[i * nvp * 2..];
        for j in 0..nvp {
            if t[j] == MESH_NULL_IDX {
                break;
            }
            let v0 = t[j];
            let v1 = if j + 1 >= nvp || t[j + 1] == MESH_NULL_IDX {
                t[0]
            } else {
                t[j + 1]
            };

            if v0 < v1 {
                let edge = &mut edges[edge_count];
                edge.vert[0] = v0;
                edge.vert[1] = v1;
                edge.poly[0] = i as u16;
                edge.poly_edge[0] = j as u16;
                edge.poly[1] = i as u16;
                edge.poly_edge[1] = 0;

                next_edge[edge_count] = first_edge[v0 as usize];
                first_edge[v0 as usize] = edge_count as u16;
                edge_count += 1;
            }
        }
    }

    // Second pass: match edges traversed the opposite way
    for i in 0..npolys {
        let t = &mesh.polys[i * nvp * 2..];
        for j in 0..nvp {
            if t[j] == MESH_NULL_IDX {
                break;
            }
            let v0 = t[j];
            let v1 = if j + 1 >= nvp || t[j + 1] == MESH_NULL_IDX {
                t[0]
            } else {
                t[j + 1]
            };

            if v0 > v1 {
                let mut e = first_edge[v1 as usize];
                while e != MESH_NULL_IDX {
                    let edge = &mut edges[e as usize];
                    if edge.vert[1] == v0 && edge.poly[0] == edge.poly[1] {
                        edge.poly[1] = i as u16;
                        edge.poly_edge[1] = j as u16;
                        break;
                    }
                    e = next_edge[e as usize];
                }
            }
        }
    }

    // Store adjacency for edges owned by two different polygons
    for edge in edges.iter().take(edge_count) {
        if edge.poly[0] != edge.poly[1] {
            let poly0 = edge.poly[0] as usize;
            let poly1 = edge.poly[1] as usize;
            let edge0 = edge.poly_edge[0] as usize;
            let edge1 = edge.poly_edge[1] as usize;

            mesh.polys[poly0 * nvp * 2 + nvp + edge0] = edge.poly[1];
            mesh.polys[poly1 * nvp * 2 + nvp + edge1] = edge.poly[0];
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn soup_of(triangles: &[[(f32, f32); 3]]) -> TriangleSoup {
        let mut soup = TriangleSoup::new();
        for t in triangles {
            soup.push_triangle(
                Vec2::new(t[0].0, t[0].1),
                Vec2::new(t[1].0, t[1].1),
                Vec2::new(t[2].0, t[2].1),
            );
        }
        soup
    }

    /// Two counter-clockwise triangles of a unit square.
    fn square_soup() -> TriangleSoup {
        soup_of(&[
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        ])
    }

    #[test]
    fn test_empty_soup_builds_empty_mesh() {
        let mesh = build_mesh(&TriangleSoup::new(), 6).unwrap();
        assert_eq!(mesh.npolys, 0);
        assert_eq!(mesh.nverts, 0);
    }

    #[test]
    fn test_square_merges_into_one_quad() {
        let mesh = build_mesh(&square_soup(), 6).unwrap();
        assert_eq!(mesh.nverts, 4);
        assert_eq!(mesh.npolys, 1);
        assert_eq!(mesh.poly_vertex_count(0), 4);
        // A lone polygon has no neighbors
        assert!(mesh.poly_neighbors(0).iter().all(|&n| n == MESH_NULL_IDX));
    }

    #[test]
    fn test_nvp_three_keeps_triangles() {
        let mesh = build_mesh(&square_soup(), 3).unwrap();
        assert_eq!(mesh.npolys, 2);
        assert_eq!(mesh.poly_vertex_count(0), 3);
        assert_eq!(mesh.poly_vertex_count(1), 3);
    }

    #[test]
    fn test_vertex_welding_deduplicates() {
        // 2 triangles, 6 input points, 4 distinct coordinates
        let mesh = build_mesh(&square_soup(), 3).unwrap();
        assert_eq!(mesh.nverts, 4);
    }

    #[test]
    fn test_degenerate_triangle_dropped_after_welding() {
        // The second triangle's first two points land on the same grid
        // coordinate after rounding
        let soup = soup_of(&[
            [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)],
            [(10.0, 10.0), (10.1, 10.2), (14.0, 10.0)],
        ]);
        let mesh = build_mesh(&soup, 6).unwrap();
        assert_eq!(mesh.npolys, 1);
    }

    #[test]
    fn test_two_squares_adjacency() {
        // Two unit squares side by side, four triangles total; the
        // diagonals merge first (squared length 2 beats the shared
        // boundary's 1), leaving two quads that cannot merge under nvp=4
        let soup = soup_of(&[
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            [(1.0, 0.0), (2.0, 0.0), (2.0, 1.0)],
            [(1.0, 0.0), (2.0, 1.0), (1.0, 1.0)],
        ]);
        let mesh = build_mesh(&soup, 4).unwrap();
        assert_eq!(mesh.npolys, 2);
        assert_eq!(mesh.nverts, 6);

        // Each quad sees the other across exactly one edge
        let n0: Vec<u16> = mesh
            .poly_neighbors(0)
            .iter()
            .copied()
            .filter(|&n| n != MESH_NULL_IDX)
            .collect();
        let n1: Vec<u16> = mesh
            .poly_neighbors(1)
            .iter()
            .copied()
            .filter(|&n| n != MESH_NULL_IDX)
            .collect();
        assert_eq!(n0, vec![1]);
        assert_eq!(n1, vec![0]);
    }

    #[test]
    fn test_merged_polygons_stay_convex() {
        // An L of three unit squares: merging must stop before producing
        // a concave polygon
        let soup = soup_of(&[
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            [(1.0, 0.0), (2.0, 0.0), (2.0, 1.0)],
            [(1.0, 0.0), (2.0, 1.0), (1.0, 1.0)],
            [(0.0, 1.0), (1.0, 1.0), (1.0, 2.0)],
            [(0.0, 1.0), (1.0, 2.0), (0.0, 2.0)],
        ]);
        let mesh = build_mesh(&soup, 6).unwrap();

        for p in 0..mesh.npolys {
            let nv = mesh.poly_vertex_count(p);
            let pv = mesh.poly_verts(p);
            for i in 0..nv {
                let a = &mesh.verts[pv[(i + nv - 1) % nv] as usize * 2..];
                let b = &mesh.verts[pv[i] as usize * 2..];
                let c = &mesh.verts[pv[(i + 1) % nv] as usize * 2..];
                let cross = (b[0] as i32 - a[0] as i32) * (c[1] as i32 - a[1] as i32)
                    - (c[0] as i32 - a[0] as i32) * (b[1] as i32 - a[1] as i32);
                assert!(cross >= 0, "polygon {p} has a reflex corner");
            }
        }
    }

    #[test]
    fn test_quantization_offsets_applied() {
        let soup = soup_of(&[[(-5.0, -5.0), (-1.0, -5.0), (-1.0, -1.0)]]);
        let config = PipelineConfig {
            max_verts_per_poly: 6,
            offset_x: 10,
            offset_y: 10,
            ..PipelineConfig::default()
        };
        let mesh = build_mesh_with_config(&soup, &config).unwrap();
        assert_eq!(mesh.nverts, 3);
        assert_eq!(mesh.vertex(0), (5, 5));
        assert_eq!(mesh.vertex(1), (9, 5));
        assert_eq!(mesh.vertex(2), (9, 9));
    }

    #[test]
    fn test_invalid_nvp_rejected() {
        assert!(build_mesh(&square_soup(), 2).is_err());
    }
}
