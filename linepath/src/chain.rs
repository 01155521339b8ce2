//! Orders the unordered connections of a line into a single path.

use crate::{
    error::LineError,
    record::{Connection, EnrichedSpan},
};
use log::debug;
use std::collections::HashSet;

/// Code prefix of a line's originating substation port.
pub const ORIGIN_MARKER: &str = "PORT";

/// Anything with a start and end structure code.
pub trait Link {
    fn start_code(&self) -> &str;
    fn end_code(&self) -> &str;
}

impl Link for Connection {
    fn start_code(&self) -> &str {
        &self.start.code
    }

    fn end_code(&self) -> &str {
        &self.end.code
    }
}

impl Link for EnrichedSpan {
    fn start_code(&self) -> &str {
        &self.start.code
    }

    fn end_code(&self) -> &str {
        &self.end.code
    }
}

/// What to do when a structure has several unused outgoing links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BranchPolicy {
    /// Follow the first candidate in start-code order.
    #[default]
    FirstMatch,

    /// Fail with [`LineError::AmbiguousBranch`].
    Reject,
}

#[derive(Debug, Clone)]
pub struct ChainBuilder {
    origin_marker: String,
    branch_policy: BranchPolicy,
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self {
            origin_marker: ORIGIN_MARKER.to_owned(),
            branch_policy: BranchPolicy::default(),
        }
    }
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start code prefix of the chain's first link (defaults to
    /// `PORT`).
    #[must_use]
    pub fn origin_marker(mut self, marker: impl Into<String>) -> Self {
        self.origin_marker = marker.into();
        self
    }

    /// Branch tie-break (defaults to [`BranchPolicy::FirstMatch`]).
    #[must_use]
    pub fn branch_policy(mut self, policy: BranchPolicy) -> Self {
        self.branch_policy = policy;
        self
    }

    /// Returns `links` ordered from the origin to the line's terminal
    /// structure.
    ///
    /// Links are first sorted by start code. The origin is the first
    /// link whose start code carries the origin marker; from there the
    /// chain repeatedly follows the unused link starting where the
    /// previous one ended. Running out of matches ends the walk. Every
    /// link must be reached and no structure visited twice, otherwise
    /// the topology is rejected.
    pub fn build<L: Link>(&self, mut links: Vec<L>) -> Result<Vec<L>, LineError> {
        let total = links.len();
        links.sort_by(|a, b| a.start_code().cmp(b.start_code()));

        let origin = links
            .iter()
            .position(|link| link.start_code().starts_with(&self.origin_marker))
            .ok_or_else(|| LineError::NoOriginFound {
                marker: self.origin_marker.clone(),
            })?;

        let cyclic = |ordered: usize| LineError::DisconnectedOrCyclicTopology { ordered, total };

        let mut used = vec![false; total];
        let mut order = Vec::with_capacity(total);
        let mut visited = HashSet::from([links[origin].start_code()]);
        if !visited.insert(links[origin].end_code()) {
            return Err(cyclic(0));
        }
        used[origin] = true;
        order.push(origin);

        let mut tail = origin;
        loop {
            let tail_code = links[tail].end_code();
            let (next, ambiguous) = {
                let mut candidates = links
                    .iter()
                    .enumerate()
                    .filter(|(idx, link)| !used[*idx] && link.start_code() == tail_code)
                    .map(|(idx, _)| idx);
                (candidates.next(), candidates.next().is_some())
            };
            let Some(next) = next else {
                break;
            };
            if ambiguous && self.branch_policy == BranchPolicy::Reject {
                return Err(LineError::AmbiguousBranch {
                    code: tail_code.to_owned(),
                });
            }
            if !visited.insert(links[next].end_code()) {
                debug!("chain; cycle at {}", links[next].end_code());
                return Err(cyclic(order.len()));
            }
            used[next] = true;
            order.push(next);
            tail = next;
        }

        debug!("chain; ordered: {}, total: {}", order.len(), total);

        if order.len() != total {
            return Err(cyclic(order.len()));
        }

        let mut slots: Vec<Option<L>> = links.into_iter().map(Some).collect();
        Ok(order.into_iter().filter_map(|idx| slots[idx].take()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{BranchPolicy, ChainBuilder, Link, LineError};

    #[derive(Debug, Clone, PartialEq)]
    struct Edge(&'static str, &'static str);

    impl Link for Edge {
        fn start_code(&self) -> &str {
            self.0
        }

        fn end_code(&self) -> &str {
            self.1
        }
    }

    fn assert_chained(chain: &[Edge]) {
        assert!(chain[0].start_code().starts_with("PORT"));
        for pair in chain.windows(2) {
            assert_eq!(pair[0].end_code(), pair[1].start_code());
        }
    }

    #[test]
    fn test_orders_shuffled_chain() {
        let links = vec![
            Edge("TW-003", "TW-004"),
            Edge("TW-001", "TW-002"),
            Edge("TW-004", "PORT-B"),
            Edge("PORT-A", "TW-001"),
            Edge("TW-002", "TW-003"),
        ];
        let chain = ChainBuilder::new().build(links).unwrap();
        assert_eq!(chain.len(), 5);
        assert_chained(&chain);
        assert_eq!(chain[0], Edge("PORT-A", "TW-001"));
        assert_eq!(chain[4], Edge("TW-004", "PORT-B"));
    }

    #[test]
    fn test_first_port_alphabetically_is_origin() {
        // Both terminals are ports; only PORT-A's link leads anywhere
        // that covers the whole line.
        let links = vec![
            Edge("PORT-Z", "TW-9"),
            Edge("TW-1", "PORT-Z"),
            Edge("PORT-A", "TW-1"),
        ];
        let chain = ChainBuilder::new().build(links).unwrap();
        assert_eq!(
            chain,
            vec![
                Edge("PORT-A", "TW-1"),
                Edge("TW-1", "PORT-Z"),
                Edge("PORT-Z", "TW-9")
            ]
        );
    }

    #[test]
    fn test_single_span() {
        let chain = ChainBuilder::new()
            .build(vec![Edge("PORT-1", "PORT-2")])
            .unwrap();
        assert_eq!(chain, vec![Edge("PORT-1", "PORT-2")]);
    }

    #[test]
    fn test_no_origin() {
        let links = vec![Edge("TW-1", "TW-2"), Edge("TW-2", "TW-3")];
        assert_eq!(
            ChainBuilder::new().build(links),
            Err(LineError::NoOriginFound {
                marker: "PORT".into()
            })
        );
        assert!(matches!(
            ChainBuilder::new().build(Vec::<Edge>::new()),
            Err(LineError::NoOriginFound { .. })
        ));
    }

    #[test]
    fn test_custom_origin_marker() {
        let links = vec![Edge("TW-1", "TW-2"), Edge("SE-1", "TW-1")];
        let chain = ChainBuilder::new().origin_marker("SE").build(links).unwrap();
        assert_eq!(chain[0], Edge("SE-1", "TW-1"));
    }

    #[test]
    fn test_broken_links_are_reported() {
        // Three of the five links start at codes no other link ends at.
        let links = vec![
            Edge("PORT-A", "TW-1"),
            Edge("TW-1", "TW-2"),
            Edge("TW-7", "TW-8"),
            Edge("TW-8", "TW-9"),
            Edge("TW-9", "PORT-B"),
        ];
        assert_eq!(
            ChainBuilder::new().build(links),
            Err(LineError::DisconnectedOrCyclicTopology {
                ordered: 2,
                total: 5
            })
        );
    }

    #[test]
    fn test_cycle_terminates() {
        let links = vec![
            Edge("PORT-A", "TW-1"),
            Edge("TW-1", "TW-2"),
            Edge("TW-2", "TW-1"),
            Edge("TW-3", "TW-4"),
        ];
        assert_eq!(
            ChainBuilder::new().build(links),
            Err(LineError::DisconnectedOrCyclicTopology {
                ordered: 2,
                total: 4
            })
        );
    }

    #[test]
    fn test_cycle_covering_all_links() {
        // Every link is reachable once, but TW-1 is visited twice.
        let links = vec![
            Edge("PORT-A", "TW-1"),
            Edge("TW-1", "TW-2"),
            Edge("TW-2", "TW-1"),
        ];
        assert_eq!(
            ChainBuilder::new().build(links),
            Err(LineError::DisconnectedOrCyclicTopology {
                ordered: 2,
                total: 3
            })
        );

        let ring = vec![Edge("TW-1", "PORT-A"), Edge("PORT-A", "TW-1")];
        assert!(matches!(
            ChainBuilder::new().build(ring),
            Err(LineError::DisconnectedOrCyclicTopology { .. })
        ));

        let self_loop = vec![Edge("PORT-A", "PORT-A")];
        assert_eq!(
            ChainBuilder::new().build(self_loop),
            Err(LineError::DisconnectedOrCyclicTopology {
                ordered: 0,
                total: 1
            })
        );
    }

    #[test]
    fn test_branch_policy() {
        let links = vec![
            Edge("PORT-A", "TW-1"),
            Edge("TW-1", "TW-3"),
            Edge("TW-1", "TW-2"),
        ];

        // First match in start-code order; the stable sort keeps
        // input order among equal start codes.
        assert_eq!(
            ChainBuilder::new().build(links.clone()),
            Err(LineError::DisconnectedOrCyclicTopology {
                ordered: 2,
                total: 3
            })
        );

        assert_eq!(
            ChainBuilder::new()
                .branch_policy(BranchPolicy::Reject)
                .build(links),
            Err(LineError::AmbiguousBranch {
                code: "TW-1".into()
            })
        );
    }
}
