use super::{Row, prepare, project, satisfies};
use crate::SolverConfig;
use clarabel::{algebra::*, solver::*};
use mga_core::{
    models::{ConstraintSet, Dimension, FeasibleRegion, RequestError, Sense, Solution},
    ports::{Oracle, Solve},
};
use tracing::{Level, event};

/// An LP oracle backed by the Clarabel interior point solver.
///
/// Clarabel solves conic programs of the form `min ½xᵀPx + qᵀx` subject to
/// `Ax + s = b`, `s ∈ K`. Here `P = 0`, `x` is the weight vector and `K` is a
/// zero cone (the simplex row and any pinned dimensions) followed by a
/// nonnegative cone (one-sided bounds and `λ ≥ 0`).
#[derive(Clone, Debug)]
pub struct ClarabelOracle {
    settings: DefaultSettings<f64>,
    tolerance: f64,
}

impl Default for ClarabelOracle {
    fn default() -> Self {
        Self::from(&SolverConfig::default())
    }
}

impl From<&SolverConfig> for ClarabelOracle {
    fn from(config: &SolverConfig) -> Self {
        let mut settings = DefaultSettings::default();
        settings.verbose = config.verbose;
        settings.time_limit = config.time_limit.as_secs_f64();
        settings.max_iter = config.max_iter;
        Self {
            settings,
            tolerance: config.tolerance,
        }
    }
}

impl ClarabelOracle {
    /// Use Clarabel settings directly, accepting uncertified solutions within `tolerance`
    pub fn new(settings: DefaultSettings<f64>, tolerance: f64) -> Self {
        Self {
            settings,
            tolerance,
        }
    }
}

/// The ways a Clarabel-backed query can fail outright
#[derive(Debug, thiserror::Error)]
pub enum ClarabelError {
    /// The request referenced something outside the region
    #[error(transparent)]
    Request(#[from] RequestError),
    /// Clarabel refused to set up the problem
    #[error("clarabel rejected the problem: {0}")]
    Setup(String),
}

impl Oracle for ClarabelOracle {
    type Error = ClarabelError;

    fn optimize(
        &self,
        region: &FeasibleRegion,
        constraints: &ConstraintSet,
        objective: &Dimension,
        sense: Sense,
    ) -> Result<Solve, Self::Error> {
        let (objective_index, rows) = prepare(region, constraints, objective)?;
        let m = region.samples();

        // Each linear row is (dimension, sign, rhs); a missing dimension is
        // the simplex row. Equalities come first, since the zero cone has to
        // precede the nonnegative cone in b and s.
        let mut equalities = vec![(None, 1.0, 1.0)];
        let mut inequalities = Vec::new();
        for Row { index, bound } in rows.iter() {
            if bound.is_equality() {
                equalities.push((Some(*index), 1.0, bound.or_neg_inf()));
                continue;
            }
            // The signs on the lower bound are flipped because s ≥ 0 is the
            // only inequality the cone specification offers.
            if let Some(lower) = bound.lower() {
                inequalities.push((Some(*index), -1.0, -lower));
            }
            if let Some(upper) = bound.upper() {
                inequalities.push((Some(*index), 1.0, upper));
            }
        }
        let nzero = equalities.len();
        let linear = equalities
            .into_iter()
            .chain(inequalities)
            .collect::<Vec<(Option<usize>, f64, f64)>>();

        // After the linear rows come the m rows -λ_j + s = 0.
        let b = linear
            .iter()
            .map(|(_, _, rhs)| *rhs)
            .chain(std::iter::repeat_n(0.0, m))
            .collect::<Vec<f64>>();
        let cones = [ZeroConeT(nzero), NonnegativeConeT(b.len() - nzero)];

        // Clarabel's matrix input is CSC, so we walk the weights column by
        // column and emit rows in ascending order.
        let mut a_colptr = Vec::with_capacity(m + 1);
        let mut a_rowval = Vec::new();
        let mut a_nzval = Vec::new();
        for j in 0..m {
            a_colptr.push(a_nzval.len());
            for (row, (dimension, sign, _)) in linear.iter().enumerate() {
                let a = match dimension {
                    Some(d) => region.column(*d)[j],
                    None => 1.0,
                };
                if a != 0.0 {
                    a_rowval.push(row);
                    a_nzval.push(sign * a);
                }
            }
            a_rowval.push(linear.len() + j);
            a_nzval.push(-1.0);
        }
        a_colptr.push(a_nzval.len());

        let a_matrix = CscMatrix::new(b.len(), m, a_colptr, a_rowval, a_nzval);
        let p_matrix = CscMatrix::new(m, m, vec![0; m + 1], Vec::new(), Vec::new());

        // Maximization is minimization of the negated objective
        let q = region
            .column(objective_index)
            .iter()
            .map(|a| sense.sign() * a)
            .collect::<Vec<f64>>();

        let mut solver =
            DefaultSolver::new(&p_matrix, &q, &a_matrix, &b, &cones, self.settings.clone())
                .map_err(|e| ClarabelError::Setup(format!("{e:?}")))?;
        solver.solve();

        let status = solver.solution.status;
        event!(
            Level::DEBUG,
            objective = %objective,
            ?sense,
            ?status,
            iterations = solver.solution.iterations,
            rows = b.len()
        );

        let outcome = match status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => {
                let weights = project(solver.solution.x.clone());
                Solve::Optimal(Solution {
                    point: region.combine(&weights),
                    weights,
                })
            }
            SolverStatus::PrimalInfeasible
            | SolverStatus::AlmostPrimalInfeasible
            | SolverStatus::DualInfeasible
            | SolverStatus::AlmostDualInfeasible => Solve::Infeasible,
            SolverStatus::MaxTime => {
                event!(Level::WARN, objective = %objective, "solver time limit reached");
                Solve::TimedOut
            }
            _ => {
                // Degenerate programs (e.g. a bound sitting exactly on a
                // sample's value) can stall the interior point method short of
                // a certificate; accept the iterate if it is feasible anyway.
                let weights = project(solver.solution.x.clone());
                if satisfies(region, &rows, &weights, self.tolerance) {
                    event!(Level::WARN, ?status, "accepting uncertified solution");
                    Solve::Optimal(Solution {
                        point: region.combine(&weights),
                        weights,
                    })
                } else {
                    event!(Level::WARN, ?status, "treating unfinished solve as infeasible");
                    Solve::Infeasible
                }
            }
        };

        Ok(outcome)
    }
}
