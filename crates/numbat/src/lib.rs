//! Tidy tree layout.
//!
//! Baseline: d3-hierarchy `tree()` (Buchheim, Jünger and Leipert's linear-time refinement of
//! Walker's algorithm, itself an extension of Reingold-Tilford).
//!
//! Coordinates follow d3: `x` is the breadth axis (siblings are spread along it) and `y` is the
//! depth axis. Callers that want a horizontal tree swap the axes when projecting.

use serde::{Deserialize, Serialize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An ordered rooted tree stored as parallel vectors.
///
/// The root is always node `0`; nodes are appended with [`Hierarchy::add_child`], so a parent
/// always precedes its children.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    parent: Vec<Option<NodeIndex>>,
    children: Vec<Vec<NodeIndex>>,
    depth: Vec<usize>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    pub fn new() -> Self {
        Self {
            parent: vec![None],
            children: vec![Vec::new()],
            depth: vec![0],
        }
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    pub fn add_child(&mut self, parent: NodeIndex) -> NodeIndex {
        let idx = NodeIndex(self.parent.len());
        let depth = self.depth[parent.0] + 1;
        self.parent.push(Some(parent));
        self.children.push(Vec::new());
        self.depth.push(depth);
        self.children[parent.0].push(idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Always false: a hierarchy owns at least its root.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.parent[node.0]
    }

    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.children[node.0]
    }

    pub fn depth(&self, node: NodeIndex) -> usize {
        self.depth[node.0]
    }

    /// Depth of the deepest node.
    pub fn height(&self) -> usize {
        self.depth.iter().copied().max().unwrap_or(0)
    }

    /// Nodes in pre-order (parent before children, children left to right).
    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![self.root()];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }
}

/// Horizontal distance between two adjacent nodes, in units of the breadth axis before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Separation {
    pub siblings: f64,
    pub cousins: f64,
}

impl Default for Separation {
    fn default() -> Self {
        Self {
            siblings: 1.0,
            cousins: 2.0,
        }
    }
}

impl Separation {
    fn between(&self, h: &Hierarchy, a: usize, b: usize) -> f64 {
        if h.parent[a] == h.parent[b] {
            self.siblings
        } else {
            self.cousins
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sizing {
    /// Scale the result so the tree exactly spans `width` × `height` (d3 `tree.size`).
    Fit { width: f64, height: f64 },
    /// Fixed per-node spacing (d3 `tree.nodeSize`); the root sits at the origin.
    NodeSize { dx: f64, dy: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub sizing: Sizing,
    pub separation: Separation,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            sizing: Sizing::Fit {
                width: 1.0,
                height: 1.0,
            },
            separation: Separation::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Per-node scratch state of the Buchheim walk. Index `n` (one past the last real node) is a
/// synthetic parent of the root so that the root needs no special casing.
struct Walker<'a> {
    h: &'a Hierarchy,
    separation: Separation,
    parent: Vec<usize>,
    children: Vec<Vec<usize>>,
    number: Vec<usize>,
    ancestor: Vec<usize>,
    default_ancestor: Vec<Option<usize>>,
    prelim: Vec<f64>,
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    thread: Vec<Option<usize>>,
}

impl<'a> Walker<'a> {
    fn new(h: &'a Hierarchy, separation: Separation) -> Self {
        let n = h.len();
        let mut parent = Vec::with_capacity(n + 1);
        let mut children = Vec::with_capacity(n + 1);
        let mut number = vec![0; n + 1];
        for i in 0..n {
            parent.push(h.parent[i].map(|p| p.0).unwrap_or(n));
            let kids: Vec<usize> = h.children[i].iter().map(|c| c.0).collect();
            for (k, c) in kids.iter().enumerate() {
                number[*c] = k;
            }
            children.push(kids);
        }
        parent.push(n);
        children.push(vec![0]);

        Self {
            h,
            separation,
            parent,
            children,
            number,
            ancestor: (0..=n).collect(),
            default_ancestor: vec![None; n + 1],
            prelim: vec![0.0; n + 1],
            modifier: vec![0.0; n + 1],
            change: vec![0.0; n + 1],
            shift: vec![0.0; n + 1],
            thread: vec![None; n + 1],
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children[v].first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children[v].last().copied().or(self.thread[v])
    }

    fn sep(&self, a: usize, b: usize) -> f64 {
        self.separation.between(self.h, a, b)
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let change = shift / (self.number[wp] as f64 - self.number[wm] as f64);
        self.change[wp] -= change;
        self.shift[wp] += shift;
        self.change[wm] += change;
        self.prelim[wp] += shift;
        self.modifier[wp] += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.children[v].len()).rev() {
            let w = self.children[v][i];
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.ancestor[vim];
        if self.parent[a] == self.parent[v] {
            a
        } else {
            ancestor
        }
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };

        let mut vip = Some(v);
        let mut vop = v;
        let mut vim = Some(w);
        let mut vom = self.children[self.parent[v]][0];
        let mut sip = self.modifier[v];
        let mut sop = self.modifier[v];
        let mut sim = self.modifier[w];
        let mut som = self.modifier[vom];

        loop {
            vim = vim.and_then(|n| self.next_right(n));
            vip = vip.and_then(|n| self.next_left(n));
            let (Some(im), Some(ip)) = (vim, vip) else {
                break;
            };
            // Both contours continue one level deeper, so the outer ones do as well.
            let Some(om) = self.next_left(vom) else {
                break;
            };
            let Some(op) = self.next_right(vop) else {
                break;
            };
            vom = om;
            vop = op;
            self.ancestor[vop] = v;
            let shift = self.prelim[im] + sim - self.prelim[ip] - sip + self.sep(im, ip);
            if shift > 0.0 {
                let wm = self.next_ancestor(im, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.modifier[im];
            sip += self.modifier[ip];
            som += self.modifier[vom];
            sop += self.modifier[vop];
        }

        if let Some(im) = vim {
            if self.next_right(vop).is_none() {
                self.thread[vop] = Some(im);
                self.modifier[vop] += sim - sop;
            }
        }
        if let Some(ip) = vip {
            if self.next_left(vom).is_none() {
                self.thread[vom] = Some(ip);
                self.modifier[vom] += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn first_walk(&mut self, v: usize) {
        let p = self.parent[v];
        let i = self.number[v];
        let w = (i > 0).then(|| self.children[p][i - 1]);

        if let (Some(&first), Some(&last)) = (self.children[v].first(), self.children[v].last()) {
            self.execute_shifts(v);
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            if let Some(w) = w {
                self.prelim[v] = self.prelim[w] + self.sep(v, w);
                self.modifier[v] = self.prelim[v] - midpoint;
            } else {
                self.prelim[v] = midpoint;
            }
        } else if let Some(w) = w {
            self.prelim[v] = self.prelim[w] + self.sep(v, w);
        }

        let fallback = self.children[p][0];
        let ancestor = self.default_ancestor[p].unwrap_or(fallback);
        let ancestor = self.apportion(v, w, ancestor);
        self.default_ancestor[p] = Some(ancestor);
    }

    fn post_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.h.len());
        let mut stack = vec![(0usize, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                out.push(v);
                continue;
            }
            stack.push((v, true));
            for &c in self.children[v].iter().rev() {
                stack.push((c, false));
            }
        }
        out
    }

    fn run(mut self) -> Vec<f64> {
        let n = self.h.len();
        for v in self.post_order() {
            self.first_walk(v);
        }
        self.modifier[n] = -self.prelim[0];

        let mut x = vec![0.0; n];
        for node in self.h.pre_order() {
            let v = node.0;
            let p = self.parent[v];
            x[v] = self.prelim[v] + self.modifier[p];
            self.modifier[v] += self.modifier[p];
        }
        x
    }
}

/// Lays out `h`, returning one point per node indexed like the hierarchy.
pub fn layout(h: &Hierarchy, options: &TreeLayout) -> Vec<Point> {
    let raw_x = Walker::new(h, options.separation).run();

    match options.sizing {
        Sizing::NodeSize { dx, dy } => (0..h.len())
            .map(|v| Point {
                x: raw_x[v] * dx,
                y: h.depth[v] as f64 * dy,
            })
            .collect(),
        Sizing::Fit { width, height } => {
            let mut left = h.root().0;
            let mut right = left;
            let mut bottom = left;
            for n in h.pre_order() {
                let v = n.0;
                if raw_x[v] < raw_x[left] {
                    left = v;
                }
                if raw_x[v] > raw_x[right] {
                    right = v;
                }
                if h.depth[v] > h.depth[bottom] {
                    bottom = v;
                }
            }

            let s = if left == right {
                1.0
            } else {
                options.separation.between(h, left, right) / 2.0
            };
            let tx = s - raw_x[left];
            let kx = width / (raw_x[right] + s + tx);
            let ky = height / h.depth[bottom].max(1) as f64;

            (0..h.len())
                .map(|v| Point {
                    x: (raw_x[v] + tx) * kx,
                    y: h.depth[v] as f64 * ky,
                })
                .collect()
        }
    }
}
