use kaiviz_common::{QueueResources, QueueView};

/// One queue as a row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFlatNode {
    pub expandable: bool,
    pub name: String,
    /// Depth in the source tree; roots are 0.
    pub level: usize,
    pub weight: i32,
    pub resources: QueueResources,
}

/// Pre-order flattening of a queue forest: every node is followed directly
/// by its whole subtree, so `level` is enough to indent and fold rows.
pub fn flatten(roots: &[QueueView]) -> Vec<QueueFlatNode> {
    let mut out = Vec::new();
    let mut stack: Vec<(&QueueView, usize)> = roots.iter().rev().map(|q| (q, 0)).collect();
    while let Some((queue, level)) = stack.pop() {
        out.push(QueueFlatNode {
            expandable: !queue.children.is_empty(),
            name: queue.name.clone(),
            level,
            weight: queue.weight,
            resources: queue.resources.clone(),
        });
        stack.extend(queue.children.iter().rev().map(|child| (child, level + 1)));
    }
    out
}

/// Flattened queue tree plus per-row expansion state.
///
/// Rebuilt from scratch on every refresh, starting fully expanded; earlier
/// expand/collapse choices do not survive a refresh.
#[derive(Debug, Clone, Default)]
pub struct QueueTree {
    nodes: Vec<QueueFlatNode>,
    expanded: Vec<bool>,
}

impl QueueTree {
    pub fn from_roots(roots: &[QueueView]) -> Self {
        let nodes = flatten(roots);
        let mut tree = Self {
            expanded: vec![false; nodes.len()],
            nodes,
        };
        tree.expand_all();
        tree
    }

    pub fn nodes(&self) -> &[QueueFlatNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Leaf rows and out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.nodes.get(index) {
            Some(node) if node.expandable => {
                self.expanded[index] = !self.expanded[index];
                true
            }
            _ => false,
        }
    }

    pub fn expand_all(&mut self) {
        for (flag, node) in self.expanded.iter_mut().zip(&self.nodes) {
            *flag = node.expandable;
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.iter_mut().for_each(|flag| *flag = false);
    }

    /// Rows whose ancestors are all expanded, with their index in `nodes()`.
    pub fn visible(&self) -> Vec<(usize, &QueueFlatNode)> {
        let mut out = Vec::new();
        let mut folded_at: Option<usize> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(level) = folded_at {
                if node.level > level {
                    continue;
                }
                folded_at = None;
            }
            out.push((index, node));
            if node.expandable && !self.expanded[index] {
                folded_at = Some(node.level);
            }
        }
        out
    }
}
