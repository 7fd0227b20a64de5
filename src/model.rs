//! Decision-variable factory for the roster model.
//!
//! The core decision is the boolean `x[p,d,s]`: person `p` works shift `s`
//! on day `d`. The worked-day indicator `w[p,d]` is a binary channelled to
//! `Σ_s x[p,d,s]` by the constraint builder; its 0/1 bound doubles as the
//! at-most-one-shift-per-day rule. Night runs need no variables of their
//! own: the sequencing rules are posted as direct linear inequalities.

use good_lp::{variable, Expression, ProblemVariables, Variable};

use crate::domain::ShiftType;

/// All decision variables of one solve, indexed `[person][day]`.
pub struct DecisionVars {
    pub x: Vec<Vec<[Variable; 3]>>,
    pub worked: Vec<Vec<Variable>>,
    /// Lower bound on every shift-role person's load (objective helper).
    pub load_min: Variable,
    /// Upper bound on every shift-role person's load (objective helper).
    pub load_max: Variable,
}

impl DecisionVars {
    pub fn allocate(vars: &mut ProblemVariables, num_personnel: usize, num_days: usize) -> Self {
        let x = (0..num_personnel)
            .map(|_| {
                (0..num_days)
                    .map(|_| {
                        [
                            vars.add(variable().binary()),
                            vars.add(variable().binary()),
                            vars.add(variable().binary()),
                        ]
                    })
                    .collect()
            })
            .collect();
        let worked = (0..num_personnel)
            .map(|_| (0..num_days).map(|_| vars.add(variable().binary())).collect())
            .collect();
        let load_min = vars.add(variable().integer().min(0).max(num_days as f64));
        let load_max = vars.add(variable().integer().min(0).max(num_days as f64));
        Self {
            x,
            worked,
            load_min,
            load_max,
        }
    }

    #[inline]
    pub fn shift(&self, person: usize, day: usize, shift: ShiftType) -> Variable {
        self.x[person][day][shift.index()]
    }

    /// `Σ_s x[p,d,s]` for one day.
    pub fn day_load(&self, person: usize, day: usize) -> Expression {
        self.x[person][day].iter().copied().map(Expression::from).sum()
    }

    /// `Σ_{d,s} x[p,d,s]` over the whole month.
    pub fn person_load(&self, person: usize) -> Expression {
        self.x[person]
            .iter()
            .flat_map(|day| day.iter().copied())
            .map(Expression::from)
            .sum()
    }

    pub fn num_personnel(&self) -> usize {
        self.x.len()
    }

    pub fn num_days(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    /// Total variable count, for logging.
    pub fn len(&self) -> usize {
        self.num_personnel() * self.num_days() * 4 + 2
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
