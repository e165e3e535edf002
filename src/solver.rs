//! The top-level fixed-point loop (spec §4.G): visit each SCC of the
//! constraint graph in predecessor-first order, running a singleton fast
//! path or the full warm-up/widen/narrow sequence for a genuine cycle.

use tracing::{debug, trace};

use crate::expr::ExprAlgebra;
use crate::graph::vertex::VertexKind;
use crate::graph::{Graph, VertexId};

/// Runs the solver to a fixed point over every SCC of `graph`, in
/// predecessor-first order. The graph must already be frozen.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn run<E: ExprAlgebra>(graph: &mut Graph<E>) {
    debug_assert!(graph.is_frozen(), "solver::run requires a frozen graph");
    let sccs = graph.scc_order();
    debug!(scc_count = sccs.len(), "solving constraint graph");
    for mut scc in sccs {
        if scc.len() == 1 {
            solve_singleton(graph, scc[0]);
        } else {
            scc.sort();
            solve_cycle(graph, &scc);
        }
    }
}

fn solve_singleton<E: ExprAlgebra>(graph: &mut Graph<E>, id: VertexId) {
    trace!(?id, "singleton vertex");
    graph.eval_it(id);
    if matches!(graph.vertex(id).kind(), VertexKind::Sigma(_)) {
        graph.eval_narrow(id);
    }
}

/// The full sequence for a genuine (multi-vertex) SCC: two warm-up passes,
/// one widening pass, then a narrowing pass that rotates to start at the
/// SCC's first sigma vertex (spec §4.G).
fn solve_cycle<E: ExprAlgebra>(graph: &mut Graph<E>, scc: &[VertexId]) {
    debug!(size = scc.len(), "solving strongly-connected component");

    for _ in 0..2 {
        for &id in scc {
            graph.eval_it(id);
        }
    }

    for &id in scc {
        graph.eval_it_and_widen(id);
    }

    let rotated = rotate_to_first_sigma(graph, scc);
    for &id in &rotated {
        if matches!(graph.vertex(id).kind(), VertexKind::Sigma(_)) {
            graph.eval_narrow(id);
        } else {
            graph.eval_it(id);
        }
    }
}

/// Rotates `scc` (already sorted by vertex id) so that its first sigma
/// vertex, if any, is visited first during narrowing; vertices before it
/// in id order are moved to the end, preserving relative order otherwise.
/// An SCC with no sigma vertex is narrowed in its existing order.
fn rotate_to_first_sigma<E: ExprAlgebra>(graph: &Graph<E>, scc: &[VertexId]) -> Vec<VertexId> {
    let Some(pivot) = scc.iter().position(|&id| matches!(graph.vertex(id).kind(), VertexKind::Sigma(_))) else {
        return scc.to_vec();
    };
    let mut rotated = Vec::with_capacity(scc.len());
    rotated.extend_from_slice(&scc[pivot..]);
    rotated.extend_from_slice(&scc[..pivot]);
    rotated
}
