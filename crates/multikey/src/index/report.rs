use super::{MapNode, Table};

use std::fmt;

/// Structural summary of a [`MapNode`]: one line per level with its profile,
/// the number of nodes at that level and the keys they hold.
pub struct Report<'a, V> {
    node: &'a MapNode<V>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LevelStats {
    nodes: usize,
    keys: usize,
}

impl<'a, V> Report<'a, V> {
    pub(super) fn new(node: &'a MapNode<V>) -> Report<'a, V> {
        Report { node }
    }

    fn stats(&self) -> Vec<LevelStats> {
        let mut stats = vec![LevelStats::default(); self.node.depth()];
        collect_stats(self.node, 0, &mut stats);
        stats
    }
}

fn collect_stats<V>(node: &MapNode<V>, level: usize, stats: &mut [LevelStats]) {
    stats[level].nodes += 1;

    match &node.table {
        Table::Bottom(map) => stats[level].keys += map.len(),
        Table::Middle(map) => {
            stats[level].keys += map.len();
            for child in map.values() {
                collect_stats(child, level + 1, stats);
            }
        }
    }
}

impl<V> fmt::Display for Report<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "index over {} levels, {} entries",
            self.node.depth(),
            self.node.len()
        )?;

        for (level, (profile, stats)) in self.node.profiles().iter().zip(self.stats()).enumerate() {
            writeln!(
                f,
                "  level {level}: {profile} nodes={} keys={}",
                stats.nodes, stats.keys
            )?;
        }

        Ok(())
    }
}

/// Every leaf of a [`MapNode`] as `{<key>; ...} => value`, one per line, in
/// composite-key order.
pub struct Dump<'a, V> {
    node: &'a MapNode<V>,
}

impl<'a, V> Dump<'a, V> {
    pub(super) fn new(node: &'a MapNode<V>) -> Dump<'a, V> {
        Dump { node }
    }
}

impl<V: fmt::Debug> fmt::Display for Dump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.node.entries() {
            writeln!(f, "{} => {:?}", entry.key(), entry.value())?;
        }
        Ok(())
    }
}
