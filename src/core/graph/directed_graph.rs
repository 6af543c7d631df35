//! Directed graph with first-cycle discovery
//!
//! The graph is built once from an ordered list of `(from, to, edge data)`
//! definitions and then searched for a cycle. It knows nothing about locks or
//! threads: vertex keys are any hashable value and edge data is borrowed from
//! the caller.
//!
//! # How it works
//!
//! 1. *Vertex discovery*: keys are interned in the order they first appear in
//!    the edge list (`from` before `to`, edge by edge). That order fixes the
//!    vertex indices, and therefore which cycle is reported first.
//! 2. *Adjacency matrix*: edges are stored densely, one slot per ordered vertex
//!    pair. A later definition for the same pair overwrites the earlier one.
//! 3. *Cycle search*: three-color DFS (white/grey/black) run iteratively with an
//!    explicit stack of resume points, so long wait chains cannot overflow the
//!    call stack.

use fxhash::FxHashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Prompt used by [`Path::to_cycle_string`]
pub const DEFAULT_PROMPT: &str = "L: ";
/// Terminator used by [`Path::to_cycle_string`]
pub const DEFAULT_TERMINATOR: &str = "|";
/// Edge rendering used by [`Path::to_cycle_string`]
pub const DEFAULT_EDGE_ARROW: &str = " <- ";

/// Edge definition: `(from, to, edge data)`
pub type EdgeDef<'a, V, E> = (V, V, &'a E);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet
    White,
    /// On the current DFS path
    Grey,
    /// Fully explored, no cycle goes through it
    Black,
}

#[derive(Debug)]
struct Vertex<V> {
    key: V,
    color: Color,
}

/// Resume point of the iterative DFS: the vertex being scanned and the next
/// destination index to try.
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    next_child: usize,
}

enum DfsAction {
    /// Descended into a white child, restart the scan from it
    Descend,
    /// The child at `next_child` is grey
    CycleFound,
    /// All children scanned
    Exhausted,
}

/// A cycle (or nothing) found in a [`Graph`]
///
/// Alternating sequence `v0, e0, v1, e1, ..., vk` with `vk == v0`. `edges[i]`
/// is the edge going *from* `vertices[i + 1]` *to* `vertices[i]`, so the path
/// reads against the edge direction. An empty path means "no cycle".
///
/// Edge data is borrowed from whatever the graph was built from, so a path
/// cannot outlive the caller's edge data.
#[derive(Debug, PartialEq, Eq)]
pub struct Path<'a, V, E> {
    /// Vertex keys, first and last being the same vertex
    pub vertices: Vec<V>,
    /// Edge data between consecutive vertices
    pub edges: Vec<&'a E>,
}

impl<V, E> Default for Path<'_, V, E> {
    fn default() -> Self {
        Path {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<V: Clone, E> Clone for Path<'_, V, E> {
    fn clone(&self) -> Self {
        Path {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<V, E> Path<'_, V, E> {
    /// True if no cycle was found
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of edges in the cycle
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// A path is renderable only if it has vertices and exactly one edge less
    /// than it has vertices
    pub fn is_well_formed(&self) -> bool {
        !self.vertices.is_empty() && self.edges.len() + 1 == self.vertices.len()
    }

    /// Render the path as `prompt v0 e0 v1 e1 ... vk terminator`
    ///
    /// Returns an empty string for an empty or malformed path.
    pub fn render<VR, ER>(
        &self,
        prompt: &str,
        terminator: &str,
        vertex_renderer: VR,
        edge_renderer: ER,
    ) -> String
    where
        VR: Fn(&V) -> String,
        ER: Fn(&E) -> String,
    {
        if !self.is_well_formed() {
            return String::new();
        }

        let mut result = String::from(prompt);
        let mut edges = self.edges.iter();
        for vertex in &self.vertices {
            result.push_str(&vertex_renderer(vertex));
            if let Some(edge) = edges.next() {
                result.push_str(&edge_renderer(*edge));
            }
        }
        result.push_str(terminator);
        result
    }

    /// Render the path with the default prompt, terminator and arrows
    pub fn to_cycle_string(&self) -> String
    where
        V: Display,
    {
        self.render(
            DEFAULT_PROMPT,
            DEFAULT_TERMINATOR,
            |vertex| vertex.to_string(),
            |_| DEFAULT_EDGE_ARROW.to_string(),
        )
    }
}

/// Directed graph built from an edge list
pub struct Graph<'a, V, E> {
    vertices: Vec<Vertex<V>>,
    /// Vertex key to its position in `vertices`
    index: FxHashMap<V, usize>,
    /// `edges[from][to]`, `None` when there is no edge
    edges: Vec<Vec<Option<&'a E>>>,
}

impl<'a, V, E> Graph<'a, V, E>
where
    V: Clone + Eq + Hash,
{
    /// Build a graph from edge definitions
    ///
    /// Vertices are created the first time their key appears. If two
    /// definitions share the same `(from, to)` pair, the later one wins.
    pub fn new<I>(edge_defs: I) -> Self
    where
        I: IntoIterator<Item = EdgeDef<'a, V, E>>,
    {
        let mut index: FxHashMap<V, usize> = FxHashMap::default();
        let mut vertices = Vec::new();

        let resolved: Vec<(usize, usize, &'a E)> = edge_defs
            .into_iter()
            .map(|(from, to, data)| {
                let from_idx = Self::intern(&mut index, &mut vertices, from);
                let to_idx = Self::intern(&mut index, &mut vertices, to);
                (from_idx, to_idx, data)
            })
            .collect();

        let n = vertices.len();
        let mut edges = vec![vec![None; n]; n];
        for (from_idx, to_idx, data) in resolved {
            edges[from_idx][to_idx] = Some(data);
        }

        Graph {
            vertices,
            index,
            edges,
        }
    }

    fn intern(index: &mut FxHashMap<V, usize>, vertices: &mut Vec<Vertex<V>>, key: V) -> usize {
        if let Some(&idx) = index.get(&key) {
            return idx;
        }
        let idx = vertices.len();
        index.insert(key.clone(), idx);
        vertices.push(Vertex {
            key,
            color: Color::White,
        });
        idx
    }

    /// A graph is usable only with at least one vertex and a square matrix
    pub fn is_valid(&self) -> bool {
        let n = self.edges.len();
        n != 0 && n == self.vertices.len() && self.edges.iter().all(|row| row.len() == n)
    }

    /// Number of distinct vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex keys in discovery order
    pub fn vertex_keys(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter().map(|v| &v.key)
    }

    /// Edge data stored for `from -> to`, if both vertices exist and are connected
    pub fn edge(&self, from: &V, to: &V) -> Option<&'a E> {
        let from_idx = *self.index.get(from)?;
        let to_idx = *self.index.get(to)?;
        self.edges[from_idx][to_idx]
    }

    /// Find the first cycle, seeding the DFS from vertices in discovery order
    ///
    /// # Returns
    /// The cycle, or an empty [`Path`] if the graph is invalid or acyclic
    pub fn find_first_cycle(&mut self) -> Path<'a, V, E> {
        if !self.is_valid() {
            return Path::default();
        }

        // Each search starts from a clean coloring
        for vertex in &mut self.vertices {
            vertex.color = Color::White;
        }

        for seed in 0..self.vertex_count() {
            if self.vertices[seed].color != Color::White {
                continue;
            }
            let cycle = self.run_dfs_from(seed);
            if !cycle.is_empty() {
                return cycle;
            }
        }
        Path::default()
    }

    fn run_dfs_from(&mut self, seed: usize) -> Path<'a, V, E> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut frame = Frame {
            vertex: seed,
            next_child: 0,
        };

        loop {
            self.vertices[frame.vertex].color = Color::Grey;
            match self.visit_children(&mut stack, &mut frame) {
                DfsAction::CycleFound => return self.build_cycle(stack, frame),
                DfsAction::Descend => continue,
                DfsAction::Exhausted => {}
            }

            self.vertices[frame.vertex].color = Color::Black;
            match stack.pop() {
                Some(parent) => frame = parent,
                None => return Path::default(),
            }
        }
    }

    fn visit_children(&self, stack: &mut Vec<Frame>, frame: &mut Frame) -> DfsAction {
        let n = self.vertex_count();
        while frame.next_child < n {
            let child = frame.next_child;
            if self.edges[frame.vertex][child].is_some() {
                match self.vertices[child].color {
                    Color::Black => {}
                    Color::Grey => return DfsAction::CycleFound,
                    Color::White => {
                        stack.push(Frame {
                            vertex: frame.vertex,
                            next_child: child + 1,
                        });
                        *frame = Frame {
                            vertex: child,
                            next_child: 0,
                        };
                        return DfsAction::Descend;
                    }
                }
            }
            frame.next_child += 1;
        }
        DfsAction::Exhausted
    }

    /// Walk the DFS stack back up to the grey vertex that closed the cycle
    fn build_cycle(&self, mut stack: Vec<Frame>, frame: Frame) -> Path<'a, V, E> {
        let origin = frame.next_child;
        let mut vertices = vec![
            self.vertices[origin].key.clone(),
            self.vertices[frame.vertex].key.clone(),
        ];
        let mut edges = vec![self.edges[frame.vertex][origin]];

        // A self-loop is already closed
        let mut prev = frame.vertex;
        if prev != origin {
            while let Some(parent) = stack.pop() {
                vertices.push(self.vertices[parent.vertex].key.clone());
                edges.push(self.edges[parent.vertex][prev]);
                prev = parent.vertex;
                if parent.vertex == origin {
                    break;
                }
            }
        }

        match edges.into_iter().collect::<Option<Vec<_>>>() {
            Some(edges) => Path { vertices, edges },
            None => Path::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of<'a>(defs: &[(u32, u32)], labels: &'a [&'a str]) -> Graph<'a, u32, &'a str> {
        Graph::new(
            defs.iter()
                .zip(labels.iter())
                .map(|(&(from, to), label)| (from, to, label)),
        )
    }

    #[test]
    fn test_empty_graph_is_invalid() {
        let mut graph: Graph<u32, &str> = Graph::new(Vec::new());
        assert!(!graph.is_valid());
        assert!(graph.find_first_cycle().is_empty());
    }

    #[test]
    fn test_vertices_discovered_in_edge_order() {
        let labels = ["a", "b", "c"];
        let graph = graph_of(&[(5, 3), (3, 9), (9, 5)], &labels);
        let keys: Vec<u32> = graph.vertex_keys().copied().collect();
        assert_eq!(keys, vec![5, 3, 9]);
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn test_edge_lookup_by_key() {
        let labels = ["a", "b", "c"];
        let graph = graph_of(&[(40, 10), (10, 30), (30, 40)], &labels);
        assert_eq!(graph.edge(&40, &10), Some(&"a"));
        assert_eq!(graph.edge(&10, &30), Some(&"b"));
        assert_eq!(graph.edge(&30, &40), Some(&"c"));
        assert_eq!(graph.edge(&10, &40), None);
        assert_eq!(graph.edge(&99, &40), None);
    }

    #[test]
    fn test_duplicate_edge_last_write_wins() {
        let labels = ["first", "second"];
        let graph = graph_of(&[(1, 2), (1, 2)], &labels);
        assert_eq!(graph.edge(&1, &2), Some(&"second"));
        assert_eq!(graph.edge(&2, &1), None);
        assert_eq!(graph.edge(&1, &7), None);
    }

    #[test]
    fn test_chain_has_no_cycle() {
        let labels = ["a", "b", "c"];
        let mut graph = graph_of(&[(1, 2), (2, 3), (3, 4)], &labels);
        assert!(graph.is_valid());
        assert!(graph.find_first_cycle().is_empty());
    }

    #[test]
    fn test_diamond_has_no_cycle() {
        let labels = ["a", "b", "c", "d"];
        let mut graph = graph_of(&[(1, 2), (1, 3), (2, 4), (3, 4)], &labels);
        assert!(graph.find_first_cycle().is_empty());
    }

    #[test]
    fn test_two_cycle_reads_against_edges() {
        let labels = ["A", "B"];
        let mut graph = graph_of(&[(2, 1), (1, 2)], &labels);
        let cycle = graph.find_first_cycle();
        assert_eq!(cycle.vertices, vec![2, 1, 2]);
        assert_eq!(cycle.edges, vec![&"B", &"A"]);
    }

    #[test]
    fn test_self_loop_seed() {
        let labels = ["self"];
        let mut graph = graph_of(&[(1, 1)], &labels);
        let cycle = graph.find_first_cycle();
        assert_eq!(cycle.vertices, vec![1, 1]);
        assert_eq!(cycle.len(), 1);
    }

    #[test]
    fn test_self_loop_below_seed() {
        let labels = ["down", "self"];
        let mut graph = graph_of(&[(1, 2), (2, 2)], &labels);
        let cycle = graph.find_first_cycle();
        assert_eq!(cycle.vertices, vec![2, 2]);
        assert_eq!(cycle.edges, vec![&"self"]);
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        // 1 -> 2 is a dead end, the cycle 3 -> 4 -> 5 -> 3 hangs off 1
        let labels = ["a", "b", "c", "d", "e"];
        let mut graph = graph_of(&[(1, 2), (1, 3), (3, 4), (4, 5), (5, 3)], &labels);
        let cycle = graph.find_first_cycle();
        assert_eq!(cycle.vertices, vec![3, 5, 4, 3]);
        assert_eq!(cycle.edges, vec![&"e", &"d", &"c"]);
    }

    #[test]
    fn test_search_is_repeatable() {
        let labels = ["a", "b", "c"];
        let mut graph = graph_of(&[(1, 2), (2, 3), (3, 1)], &labels);
        let first = graph.find_first_cycle();
        let second = graph.find_first_cycle();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_long_chain_is_iterative() {
        let n = 1500u32;
        let labels: Vec<String> = (0..n).map(|i| format!("L{i}")).collect();
        let mut graph: Graph<u32, String> =
            Graph::new((0..n).map(|i| (i, (i + 1) % n, &labels[i as usize])));
        let cycle = graph.find_first_cycle();
        assert_eq!(cycle.len(), n as usize);
        assert_eq!(cycle.vertices.first(), cycle.vertices.last());
    }

    #[test]
    fn test_render_guards_malformed_path() {
        let label = "x";
        let path: Path<u32, &str> = Path {
            vertices: vec![1, 2],
            edges: vec![&label, &label],
        };
        assert_eq!(path.to_cycle_string(), "");

        let empty: Path<u32, &str> = Path::default();
        assert_eq!(empty.to_cycle_string(), "");
    }

    #[test]
    fn test_default_rendering() {
        let labels = ["A", "B"];
        let mut graph = graph_of(&[(2, 1), (1, 2)], &labels);
        let cycle = graph.find_first_cycle();
        assert_eq!(cycle.to_cycle_string(), "L: 2 <- 1 <- 2|");
        assert_eq!(
            cycle.render("", "", |v| format!("T{v}"), |e| format!("[{e}]")),
            "T2[B]T1[A]T2"
        );
    }
}
