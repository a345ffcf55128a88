//! Vertex arena and builder.
//!
//! # Data layout
//!
//! Vertices are addressed by a dense [`VertexId`] over passable cells.  Every
//! other structure in the workspace (configs, distance tables, scatter paths)
//! stores `VertexId`s, never references, so the graph is the single owner of
//! vertex data.
//!
//! Adjacency uses **Compressed Sparse Row (CSR)** format.  Given a vertex
//! `v`, its neighbours occupy the slice:
//!
//! ```text
//! neighbor_to[ neighbor_start[v] .. neighbor_start[v+1] ]
//! ```
//!
//! Neighbour order is the insertion order of edges for that vertex.  Grid
//! graphs insert left, right, `y+1`, `y-1`, so BFS layers and PIBT candidate
//! lists are reproducible across runs.
//!
//! # Cell index
//!
//! Each vertex also carries its row-major cell index `width * y + x`, which
//! counts obstacle cells.  `cells[index]` maps a cell back to its vertex
//! (`VertexId::INVALID` for obstacles).

use mapf_core::VertexId;

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Undirected, unweighted graph in CSR format.
///
/// Fields are `pub` for direct indexed access on hot paths.  Do not construct
/// directly; use [`GraphBuilder`] or [`Graph::grid`].
pub struct Graph {
    /// Grid width in cells (0 for non-grid graphs).
    pub width: u32,
    /// Grid height in cells (0 for non-grid graphs).
    pub height: u32,

    // ── Vertex data (indexed by VertexId) ─────────────────────────────────
    /// Row-major cell index of each vertex.
    pub vertex_cell: Vec<u32>,
    /// `(x, y)` coordinates of each vertex.
    pub vertex_pos: Vec<(u32, u32)>,

    // ── Cell data (indexed by cell index, holes for obstacles) ────────────
    /// Vertex occupying each cell, or `VertexId::INVALID` for an obstacle.
    pub cells: Vec<VertexId>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// CSR row pointer.  Length = `size() + 1`.
    pub neighbor_start: Vec<u32>,
    /// Neighbour lists, concatenated in vertex order.
    pub neighbor_to: Vec<VertexId>,
}

impl Graph {
    /// Build a 4-connected grid of `width × height` cells.
    ///
    /// `passable(x, y)` decides which cells become vertices.  Vertex ids are
    /// assigned in row-major scan order.
    pub fn grid(width: u32, height: u32, passable: impl Fn(u32, u32) -> bool) -> Self {
        let mut b = GraphBuilder::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if passable(x, y) {
                    b.add_vertex(x, y);
                }
            }
        }

        for y in 0..height {
            for x in 0..width {
                let Some(v) = b.vertex_at_xy(x, y) else { continue };
                // left, right, down-the-rows, up-the-rows
                let around = [
                    (x > 0).then(|| (x - 1, y)),
                    (x + 1 < width).then(|| (x + 1, y)),
                    (y + 1 < height).then(|| (x, y + 1)),
                    (y > 0).then(|| (x, y - 1)),
                ];
                for (nx, ny) in around.into_iter().flatten() {
                    if let Some(u) = b.vertex_at_xy(nx, ny) {
                        b.add_directed_edge(v, u);
                    }
                }
            }
        }
        b.build()
    }

    /// A grid with no obstacles.
    pub fn empty_grid(width: u32, height: u32) -> Self {
        Self::grid(width, height, |_, _| true)
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    /// Number of passable vertices (`|V|`).
    #[inline]
    pub fn size(&self) -> usize {
        self.vertex_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_cell.is_empty()
    }

    /// Number of cells including obstacles (`|U|`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterator over every `VertexId` in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.size() as u32).map(VertexId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Neighbours of `v` in insertion order.
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        let start = self.neighbor_start[v.index()] as usize;
        let end   = self.neighbor_start[v.index() + 1] as usize;
        &self.neighbor_to[start..end]
    }

    #[inline]
    pub fn degree(&self, v: VertexId) -> usize {
        let start = self.neighbor_start[v.index()] as usize;
        let end   = self.neighbor_start[v.index() + 1] as usize;
        end - start
    }

    /// `true` if `u` and `v` are adjacent.
    pub fn is_adjacent(&self, v: VertexId, u: VertexId) -> bool {
        self.neighbors(v).contains(&u)
    }

    // ── Vertex lookups ────────────────────────────────────────────────────

    #[inline]
    pub fn cell_index(&self, v: VertexId) -> u32 {
        self.vertex_cell[v.index()]
    }

    #[inline]
    pub fn coords(&self, v: VertexId) -> (u32, u32) {
        self.vertex_pos[v.index()]
    }

    /// Vertex at row-major cell `index`; `None` for obstacles and
    /// out-of-range indices.
    pub fn vertex_at(&self, index: u32) -> Option<VertexId> {
        self.cells
            .get(index as usize)
            .copied()
            .filter(|v| v.is_valid())
    }

    /// Vertex at `(x, y)`; `None` for obstacles and out-of-range coordinates.
    pub fn vertex_at_xy(&self, x: u32, y: u32) -> Option<VertexId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.vertex_at(self.width * y + x)
    }

    /// Manhattan distance between two vertices' coordinates.
    pub fn manhattan(&self, a: VertexId, b: VertexId) -> u32 {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        ax.abs_diff(bx) + ay.abs_diff(by)
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// Vertices are placed on a `width × height` cell grid (which fixes their cell
/// index) but edges are arbitrary, so any unweighted graph embedded in a grid
/// can be expressed.
///
/// # Example
///
/// ```
/// use mapf_graph::GraphBuilder;
///
/// let mut b = GraphBuilder::new(3, 1);
/// let a = b.add_vertex(0, 0);
/// let c = b.add_vertex(2, 0);
/// b.add_edge(a, c);
/// let g = b.build();
/// assert_eq!(g.size(), 2);
/// assert_eq!(g.neighbors(a), &[c]);
/// ```
pub struct GraphBuilder {
    width:     u32,
    height:    u32,
    positions: Vec<(u32, u32)>,
    cells:     Vec<VertexId>,
    raw_edges: Vec<(VertexId, VertexId)>,
}

impl GraphBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            positions: Vec::new(),
            cells:     vec![VertexId::INVALID; (width as usize) * (height as usize)],
            raw_edges: Vec::new(),
        }
    }

    /// Add a vertex at `(x, y)` and return its `VertexId` (sequential from 0).
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the grid.
    pub fn add_vertex(&mut self, x: u32, y: u32) -> VertexId {
        assert!(x < self.width && y < self.height, "cell ({x},{y}) outside {}x{} grid", self.width, self.height);
        let id = VertexId(self.positions.len() as u32);
        self.positions.push((x, y));
        self.cells[(self.width * y + x) as usize] = id;
        id
    }

    /// Vertex previously added at `(x, y)`, if any.
    pub fn vertex_at_xy(&self, x: u32, y: u32) -> Option<VertexId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[(self.width * y + x) as usize]).filter(|v| v.is_valid())
    }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// MAPF graphs are symmetric; use this only when inserting both
    /// directions yourself in a specific neighbour order.
    pub fn add_directed_edge(&mut self, from: VertexId, to: VertexId) {
        self.raw_edges.push((from, to));
    }

    /// Add an undirected edge (both directions).
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) {
        self.add_directed_edge(a, b);
        self.add_directed_edge(b, a);
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`Graph`].
    ///
    /// Time complexity: O(E log E) for the (stable) edge sort.
    pub fn build(self) -> Graph {
        let vertex_count = self.positions.len();

        // Stable sort keeps per-vertex insertion order = neighbour order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|&(from, _)| from.0);

        let neighbor_to: Vec<VertexId> = raw.iter().map(|&(_, to)| to).collect();

        let mut neighbor_start = vec![0u32; vertex_count + 1];
        for &(from, _) in &raw {
            neighbor_start[from.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            neighbor_start[i] += neighbor_start[i - 1];
        }
        debug_assert_eq!(neighbor_start[vertex_count] as usize, neighbor_to.len());

        let vertex_cell = self
            .positions
            .iter()
            .map(|&(x, y)| self.width * y + x)
            .collect();

        Graph {
            width: self.width,
            height: self.height,
            vertex_cell,
            vertex_pos: self.positions,
            cells: self.cells,
            neighbor_start,
            neighbor_to,
        }
    }
}
