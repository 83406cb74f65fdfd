//! Table filter: name / mount point lookup over flattened entries.
//!
//! Matching is substring based (with optional case sensitivity).  Results are
//! ranked so that the most specific hit comes first; ties keep table order.

use std::cmp::Ordering;

use super::entry::DeviceTableEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RankKey {
    exact: bool,
    prefix: bool,
    /// The hit is in the device name rather than the mount point.
    on_name: bool,
    match_pos: usize,
    len: usize,
}

impl RankKey {
    fn cmp_better(self, other: Self) -> Ordering {
        // "Better" should come first in ascending sort.
        other
            .exact
            .cmp(&self.exact)
            .then_with(|| other.prefix.cmp(&self.prefix))
            .then_with(|| other.on_name.cmp(&self.on_name))
            .then_with(|| self.match_pos.cmp(&other.match_pos))
            .then_with(|| self.len.cmp(&other.len))
    }

    fn new(haystack: &str, needle: &str, on_name: bool) -> Option<Self> {
        let pos = haystack.find(needle)?;
        Some(Self {
            exact: haystack == needle,
            prefix: pos == 0,
            on_name,
            match_pos: pos,
            len: haystack.chars().count(),
        })
    }
}

/// Entries whose name or mount point contains `query`, best hit first.
pub fn filter_entries<'e, 'a>(
    entries: &[&'e DeviceTableEntry<'a>],
    query: &str,
    case_sensitive: bool,
) -> Vec<&'e DeviceTableEntry<'a>> {
    let q = query.trim();
    if q.is_empty() {
        return entries.to_vec();
    }
    let needle = if case_sensitive {
        q.to_string()
    } else {
        q.to_lowercase()
    };
    let fold = |s: &str| {
        if case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };

    let mut ranked: Vec<(RankKey, usize, &'e DeviceTableEntry<'a>)> = Vec::new();
    for (order, &entry) in entries.iter().enumerate() {
        let name = fold(&entry.name());
        let by_name = RankKey::new(&name, &needle, true);
        let by_mount = entry
            .mount_point()
            .and_then(|mp| RankKey::new(&fold(mp), &needle, false));
        let best = match (by_name, by_mount) {
            (Some(a), Some(b)) => Some(if a.cmp_better(b) == Ordering::Greater { b } else { a }),
            (a, b) => a.or(b),
        };
        if let Some(rank) = best {
            ranked.push((rank, order, entry));
        }
    }

    ranked.sort_by(|(a_rank, a_order, _), (b_rank, b_order, _)| {
        a_rank.cmp_better(*b_rank).then_with(|| a_order.cmp(b_order))
    });
    ranked.into_iter().map(|(_, _, e)| e).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::device::{FsType, PartitionType};
    use crate::core::devicegraph::testing::GraphBuilder;

    #[test]
    fn filter_matches_names_and_mount_points() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .partition(3, 1, 2, PartitionType::Primary)
            .fs(4, FsType::Ext4, &[2], Some("/home"))
            .fs(5, FsType::Xfs, &[3], Some("/srv/HOME2"))
            .build();
        let root = DeviceTableEntry::for_device(&graph, graph.find_device(1).unwrap(), true);
        let entries = root.all_entries();

        let hits: Vec<String> = filter_entries(&entries, "home", false)
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(hits, vec!["/dev/sda1", "/dev/sda2"]);

        assert!(filter_entries(&entries, "HOME", true)
            .iter()
            .all(|e| e.name() == "/dev/sda2"));

        let hits: Vec<String> = filter_entries(&entries, "sda2", false)
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(hits, vec!["/dev/sda2"]);
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .build();
        let root = DeviceTableEntry::for_device(&graph, graph.find_device(1).unwrap(), false);
        let entries = root.all_entries();
        assert_eq!(filter_entries(&entries, "  ", false).len(), 2);
    }

    #[test]
    fn prefix_hits_rank_before_inner_hits() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .partition(3, 1, 2, PartitionType::Primary)
            .fs(4, FsType::Ext4, &[2], Some("/data/var"))
            .fs(5, FsType::Ext4, &[3], Some("/var"))
            .build();
        let root = DeviceTableEntry::for_device(&graph, graph.find_device(1).unwrap(), true);
        let entries = root.all_entries();
        let hits: Vec<String> = filter_entries(&entries, "/var", false)
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(hits, vec!["/dev/sda2", "/dev/sda1"]);
    }
}
