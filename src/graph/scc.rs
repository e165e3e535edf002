//! Tarjan's strongly-connected-components algorithm over the constraint
//! graph (spec §9 "Graph and SCCs": self-contained rather than delegated
//! to a host library).

use super::vertex::VertexId;

struct TarjanState {
    index_counter: usize,
    indices: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    /// Completed components, in the order Tarjan closes them: a vertex's
    /// successors are always closed before the vertex itself, so this is
    /// successors-first ("reverse topological" in the classical sense).
    result: Vec<Vec<VertexId>>,
}

/// Returns the graph's SCCs with predecessors-first ordering: if vertex
/// `a` is a predecessor of vertex `b` in different components, `a`'s
/// component appears before `b`'s. This is what spec §4.G calls "reverse
/// topological order (predecessors first)" and is the reverse of Tarjan's
/// own closing order, which surfaces sinks first.
pub fn predecessor_first_sccs(successors: &[Vec<VertexId>]) -> Vec<Vec<VertexId>> {
    let n = successors.len();
    let mut state = TarjanState {
        index_counter: 0,
        indices: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        result: Vec::new(),
    };
    for v in 0..n {
        if state.indices[v].is_none() {
            strongconnect(v, successors, &mut state);
        }
    }
    state.result.reverse();
    state.result
}

fn strongconnect(v: usize, successors: &[Vec<VertexId>], state: &mut TarjanState) {
    state.indices[v] = Some(state.index_counter);
    state.lowlink[v] = state.index_counter;
    state.index_counter += 1;
    state.stack.push(v);
    state.on_stack[v] = true;

    for &succ in &successors[v] {
        let w = succ.index();
        if state.indices[w].is_none() {
            strongconnect(w, successors, state);
            state.lowlink[v] = state.lowlink[v].min(state.lowlink[w]);
        } else if state.on_stack[w] {
            state.lowlink[v] = state.lowlink[v].min(state.indices[w].expect("visited"));
        }
    }

    if state.lowlink[v] == state.indices[v].expect("visited") {
        let mut component = Vec::new();
        loop {
            let w = state.stack.pop().expect("component root is on the stack");
            state.on_stack[w] = false;
            component.push(VertexId(w));
            if w == v {
                break;
            }
        }
        state.result.push(component);
    }
}
