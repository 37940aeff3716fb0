use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

/// Nodes that could not be placed in any tier.
///
/// Holds every node still waiting on a prerequisite when the sort stalled,
/// in graph order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cycle<N> {
    pub(crate) nodes: Vec<N>,
}

/// Layered topological sort (Kahn's algorithm, one tier per round).
///
/// `graph` maps each node to its dependents: an entry `a => {b}` means `a`
/// must be output before `b`. Nodes only mentioned as dependents are added
/// implicitly. Each tier holds every node whose prerequisites were output in
/// earlier tiers, in graph order.
pub(crate) fn toposort<N>(graph: &IndexMap<N, IndexSet<N>>) -> Result<Vec<Vec<N>>, Cycle<N>>
where
    N: Copy + Eq + Hash,
{
    let mut in_degree: IndexMap<N, usize> = IndexMap::with_capacity(graph.len());

    for (node, dependents) in graph {
        in_degree.entry(*node).or_insert(0);

        for dependent in dependents {
            *in_degree.entry(*dependent).or_insert(0) += 1;
        }
    }

    let mut tiers = vec![];
    let mut tier: Vec<N> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(node, _)| *node)
        .collect();
    let mut placed = 0;

    while !tier.is_empty() {
        placed += tier.len();

        let mut next = vec![];

        for node in &tier {
            let Some(dependents) = graph.get(node) else {
                continue;
            };

            for dependent in dependents {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;

                    if *degree == 0 {
                        next.push(*dependent);
                    }
                }
            }
        }

        // Keep the tier in graph order rather than discovery order
        next.sort_by_key(|node| in_degree.get_index_of(node));

        tiers.push(std::mem::replace(&mut tier, next));
    }

    if placed < in_degree.len() {
        return Err(Cycle {
            nodes: in_degree
                .into_iter()
                .filter(|(_, degree)| *degree > 0)
                .map(|(node, _)| node)
                .collect(),
        });
    }

    Ok(tiers)
}
