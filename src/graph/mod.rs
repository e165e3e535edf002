//! The constraint graph: an arena of [`Vertex`] plus the edges (predecessor
//! lists) and evaluation dispatch the solver drives.

pub mod scc;
pub mod vertex;

use rustc_hash::FxHashMap;

use crate::algebra::{self, Predicate};
use crate::error::{SraError, SraResult};
use crate::expr::ExprAlgebra;
use crate::range::Range;
use crate::transfer;
pub use vertex::VertexId;
use vertex::{BinOp, Changed, Vertex, VertexKind};

/// The clamp applied to both a symbolic bound's AST-node count and a Phi's
/// predecessor arity (spec §4.C/§4.F: the same constant, `K = 8`).
pub const SIZE_CLAMP: usize = 8;

/// The e-SSA constraint graph: a vertex arena plus a name index. Built
/// through [`crate::builder::Builder`], then frozen and solved.
#[derive(Debug)]
pub struct Graph<E: ExprAlgebra> {
    vertices: Vec<Vertex<E>>,
    by_name: FxHashMap<String, VertexId>,
    frozen: bool,
}

impl<E: ExprAlgebra> Default for Graph<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExprAlgebra> Graph<E> {
    pub fn new() -> Self {
        Graph {
            vertices: Vec::new(),
            by_name: FxHashMap::default(),
            frozen: false,
        }
    }

    pub fn node(&self, name: &str) -> SraResult<VertexId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SraError::UnknownName(name.to_string()))
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex<E> {
        &self.vertices[id.index()]
    }

    pub fn vertices(&self) -> &[Vertex<E>] {
        &self.vertices
    }

    fn insert(&mut self, name: String, kind: VertexKind, expr: E, state: Range<E>) -> SraResult<VertexId> {
        if self.by_name.contains_key(&name) {
            return Err(SraError::DuplicateName(name));
        }
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            id,
            name: name.clone(),
            expr,
            state,
            assumption: E::true_(),
            preds: Vec::new(),
            changed: Changed::default(),
            kind,
            single_initial_value: None,
        });
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub(crate) fn insert_const(&mut self, name: impl Into<String>, value: i64) -> SraResult<VertexId> {
        let name = name.into();
        let expr = E::of_int(value);
        let state = Range::point(E::of_int(value));
        self.insert(name, VertexKind::Const, expr, state)
    }

    pub(crate) fn insert_inf(&mut self, name: impl Into<String>) -> SraResult<VertexId> {
        let name = name.into();
        self.insert(name.clone(), VertexKind::Const, E::of_name(name), Range::full())
    }

    pub(crate) fn insert_phi(&mut self, name: impl Into<String>) -> SraResult<VertexId> {
        let name = name.into();
        let expr = E::of_name(name.clone());
        self.insert(name, VertexKind::Phi, expr, Range::bottom())
    }

    pub(crate) fn insert_sigma(&mut self, name: impl Into<String>, pred: Predicate) -> SraResult<VertexId> {
        let name = name.into();
        let expr = E::of_name(name.clone());
        self.insert(name, VertexKind::Sigma(pred), expr, Range::bottom())
    }

    pub(crate) fn insert_binop(&mut self, name: impl Into<String>, op: BinOp) -> SraResult<VertexId> {
        let name = name.into();
        let expr = E::of_name(name.clone());
        self.insert(name, VertexKind::Binop(op), expr, Range::bottom())
    }

    pub(crate) fn add_edge(&mut self, from: VertexId, to: VertexId) {
        self.vertices[to.index()].preds.push(from);
    }

    /// Validates predecessor arity for every vertex and locks the graph
    /// against further structural edits. Must succeed before `solve` runs.
    pub(crate) fn freeze(&mut self) -> SraResult<()> {
        for v in &self.vertices {
            let got = v.preds.len();
            match v.kind {
                VertexKind::Const => {
                    if got != 0 {
                        return Err(SraError::LeafArity { name: v.name.clone(), got });
                    }
                }
                VertexKind::Sigma(_) => {
                    if got != 2 {
                        return Err(SraError::SigmaArity { name: v.name.clone(), got });
                    }
                }
                VertexKind::Binop(_) => {
                    if got != 2 {
                        return Err(SraError::BinopArity { name: v.name.clone(), got });
                    }
                }
                VertexKind::Phi => {}
            }
        }
        self.frozen = true;
        Ok(())
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The graph's SCCs, predecessor-first (spec §4.G).
    pub(crate) fn scc_order(&self) -> Vec<Vec<VertexId>> {
        let successors = self.successor_adjacency();
        scc::predecessor_first_sccs(&successors)
    }

    fn successor_adjacency(&self) -> Vec<Vec<VertexId>> {
        let mut successors = vec![Vec::new(); self.vertices.len()];
        for v in &self.vertices {
            for &p in &v.preds {
                successors[p.index()].push(v.id);
            }
        }
        successors
    }

    fn state(&self, id: VertexId) -> &Range<E> {
        &self.vertices[id.index()].state
    }

    /// Installs a freshly computed state, recording which bounds moved
    /// (spec §4.F: "changed" is tracked before the size clamp is applied,
    /// so a clamp never itself counts as a change) and clamping any bound
    /// whose symbolic size exceeds [`SIZE_CLAMP`] to its infinite sentinel.
    fn set_state(&mut self, id: VertexId, fresh: Range<E>) {
        let v = &mut self.vertices[id.index()];
        let prior = v.state.clone();
        let (prior_lo, prior_hi) = match &prior {
            Range::Bottom => (None, None),
            Range::Interval(lo, hi) => (Some(lo.clone()), Some(hi.clone())),
        };
        let (new_lo, new_hi) = match &fresh {
            Range::Bottom => (None, None),
            Range::Interval(lo, hi) => (Some(lo.clone()), Some(hi.clone())),
        };
        v.changed = Changed::new(new_lo != prior_lo, new_hi != prior_hi);
        let clamped = match fresh {
            Range::Bottom => Range::Bottom,
            Range::Interval(lo, hi) => {
                let lo = if lo.size() > SIZE_CLAMP { E::neg_inf() } else { lo };
                let hi = if hi.size() > SIZE_CLAMP { E::pos_inf() } else { hi };
                Range::Interval(lo, hi)
            }
        };
        v.state = clamped;
    }

    /// Plain fixed-point transfer, without widening (spec §4.G's warm-up
    /// passes and the narrowing pass's non-sigma vertices). `state` is
    /// installed before `assumption` is recomputed, since the Phi
    /// assumption rule reads the `changed` flags this same step produces.
    pub(crate) fn eval_it(&mut self, id: VertexId) {
        let fresh = self.transfer_state(id);
        self.set_state(id, fresh);
        self.update_assumption(id);
    }

    /// Transfer, then widen the result against the vertex's current state
    /// (spec §4.G's widening pass), then recompute the assumption against
    /// the `changed` flags the widened `set_state` produced.
    pub(crate) fn eval_it_and_widen(&mut self, id: VertexId) {
        let fresh = self.transfer_state(id);
        let widened = algebra::widen(self.state(id), fresh);
        self.set_state(id, widened);
        self.update_assumption(id);
    }

    /// Sigma's narrowing transfer: tighten against the bound predecessor's
    /// state using the branch predicate. Non-sigma vertices have no
    /// narrowing transfer; callers only invoke this on sigma vertices.
    pub(crate) fn eval_narrow(&mut self, id: VertexId) {
        let v = &self.vertices[id.index()];
        let VertexKind::Sigma(pred) = v.kind else {
            self.eval_it(id);
            return;
        };
        let incoming_id = v.preds[0];
        let bound_id = v.preds[1];
        let incoming = self.state(incoming_id).clone();
        let bound = self.state(bound_id).clone();
        let fresh = transfer::op_sigma_narrow(pred, &incoming, &bound);
        self.set_state(id, fresh);

        cfg_if::cfg_if! {
            if #[cfg(feature = "assumptions")] {
                let incoming_expr = self.vertices[incoming_id.index()].expr.clone();
                let incoming_asmp = self.vertices[incoming_id.index()].assumption.clone();
                let bound_expr = self.vertices[bound_id.index()].expr.clone();
                let bound_asmp = self.vertices[bound_id.index()].assumption.clone();
                let self_expr = self.vertices[id.index()].expr.clone();
                let asmp = transfer::op_asmp_sigma_narrow(
                    pred,
                    &self_expr,
                    &incoming_expr,
                    &incoming_asmp,
                    &bound_expr,
                    &bound_asmp,
                );
                self.vertices[id.index()].assumption = asmp;
            }
        }
    }

    /// Computes the fresh `Range` a plain (non-narrowing) transfer produces,
    /// without touching `assumption` — callers install it via `set_state`
    /// and only then call `update_assumption`, since the Phi rule depends
    /// on the `changed` flags that installation produces.
    fn transfer_state(&mut self, id: VertexId) -> Range<E> {
        let v = &self.vertices[id.index()];
        match v.kind {
            VertexKind::Const => transfer::op_const(&v.state),
            VertexKind::Phi => {
                let states: Vec<Range<E>> = v.preds.iter().map(|&p| self.state(p).clone()).collect();
                transfer::op_phi(&states)
            }
            VertexKind::Sigma(_) => {
                let incoming = v.preds[0];
                transfer::op_sigma(self.state(incoming))
            }
            VertexKind::Binop(op) => {
                let l = self.state(v.preds[0]).clone();
                let r = self.state(v.preds[1]).clone();
                transfer::op_binop(op, &l, &r)
            }
        }
    }

    /// Recomputes `assumption` for `id` from its predecessors' current
    /// `expr`/`assumption`/`state` and (for Phi) the `changed` flags the
    /// preceding `set_state` call just installed (spec §4.D).
    ///
    /// Gated behind the `assumptions` feature (spec §9: "a simple build
    /// option MAY disable the assumption algebra for callers that do not
    /// need it"); with the feature off every vertex keeps its `true_()`
    /// assumption and this is a no-op, so the interval lattice alone still
    /// reaches the same fixed point.
    fn update_assumption(&mut self, id: VertexId) {
        cfg_if::cfg_if! {
            if #[cfg(feature = "assumptions")] {
                let kind = self.vertices[id.index()].kind();
                match kind {
                    VertexKind::Const => {
                        self.vertices[id.index()].assumption = transfer::op_asmp_const();
                    }
                    VertexKind::Phi => self.update_phi_assumption(id),
                    VertexKind::Sigma(_) => self.update_sigma_assumption(id),
                    VertexKind::Binop(op) => self.update_binop_assumption(id, op),
                }
            } else {
                let _ = id;
            }
        }
    }

    #[cfg(feature = "assumptions")]
    fn update_phi_assumption(&mut self, id: VertexId) {
        use itertools::Itertools;

        let preds = self.vertices[id.index()].preds.clone();
        let non_bottom: Vec<(E, E)> = preds
            .iter()
            .filter(|&&p| !self.state(p).is_bottom())
            .map(|&p| {
                let pv = &self.vertices[p.index()];
                (pv.expr.clone(), pv.assumption.clone())
            })
            .collect_vec();

        let v = &self.vertices[id.index()];
        let single_initial = match v.single_initial_value {
            Some(recorded) => recorded,
            None => {
                let non_bottom_ids = preds
                    .iter()
                    .filter(|&&p| !self.state(p).is_bottom())
                    .copied()
                    .collect_vec();
                if non_bottom_ids.len() == 1 {
                    Some(non_bottom_ids[0])
                } else {
                    None
                }
            }
        };
        self.vertices[id.index()].single_initial_value = Some(single_initial);

        let self_expr = self.vertices[id.index()].expr.clone();
        let changed = self.vertices[id.index()].changed;
        let single_initial_expr = single_initial.map(|p| self.vertices[p.index()].expr.clone());
        let asmp = transfer::op_asmp_phi(&self_expr, &non_bottom, single_initial_expr.as_ref(), changed);
        self.vertices[id.index()].assumption = asmp;
    }

    /// The plain (non-narrowing) Sigma assumption, used during warm-up and
    /// widening passes; `eval_narrow` installs `op_asmp_sigma_narrow`
    /// instead once narrowing actually applies the branch predicate.
    #[cfg(feature = "assumptions")]
    fn update_sigma_assumption(&mut self, id: VertexId) {
        let v = &self.vertices[id.index()];
        let (incoming_id, bound_id) = (v.preds[0], v.preds[1]);
        let self_expr = v.expr.clone();
        let incoming = &self.vertices[incoming_id.index()];
        let (incoming_expr, incoming_asmp) = (incoming.expr.clone(), incoming.assumption.clone());
        let bound_asmp = self.vertices[bound_id.index()].assumption.clone();
        let asmp = transfer::op_asmp_sigma(&self_expr, &incoming_expr, &incoming_asmp, &bound_asmp);
        self.vertices[id.index()].assumption = asmp;
    }

    #[cfg(feature = "assumptions")]
    fn update_binop_assumption(&mut self, id: VertexId, op: BinOp) {
        let v = &self.vertices[id.index()];
        let (l_id, r_id) = (v.preds[0], v.preds[1]);
        let self_expr = v.expr.clone();
        let l = &self.vertices[l_id.index()];
        let (l_expr, l_asmp) = (l.expr.clone(), l.assumption.clone());
        let r = &self.vertices[r_id.index()];
        let (r_expr, r_asmp) = (r.expr.clone(), r.assumption.clone());
        let asmp = transfer::op_asmp_binop(&self_expr, op, &l_expr, &l_asmp, &r_expr, &r_asmp);
        self.vertices[id.index()].assumption = asmp;
    }
}

impl<E: ExprAlgebra + std::fmt::Display> std::fmt::Display for Graph<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for v in &self.vertices {
            writeln!(f, "{}: {} = {}", v.name, v.state, v.assumption)?;
        }
        Ok(())
    }
}
