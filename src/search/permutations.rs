use super::params::{SearchParams, MAX_SLOTS};

/// GP casings are enumerated in hundredths.
pub const GP_STEPS_PER_CASING: i64 = 100;

/// One point of the search space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleCountTuple {
    pub gauge: u32,
    pub head: usize,
    pub var0: u32,
    pub var1: u32,
    pub gp_hundredths: u32,
    pub rg: u32,
}

impl ModuleCountTuple {
    #[inline(always)]
    pub fn gp_casings(&self) -> f64 {
        self.gp_hundredths as f64 / GP_STEPS_PER_CASING as f64
    }

    /// Slots used by the variable part of the shell, in hundredths.
    pub fn variable_slots_hundredths(&self) -> u64 {
        (self.var0 as u64 + self.var1 as u64 + self.rg as u64) * GP_STEPS_PER_CASING as u64
            + self.gp_hundredths as u64
    }
}

/// Outer (head, gauge) cell. Partitions are independent units of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub head: usize,
    pub gauge: u32,
}

/// Bounds of the enumeration. Iteration is lazy and can be restarted by
/// calling `iter` again.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationSpace {
    pub min_gauge: u32,
    pub max_gauge: u32,
    pub heads: Vec<usize>,
    pub fixed_total: u32,
    pub variable: [usize; 2],
    pub max_gp: f64,
    pub max_rg: u32,
}

impl From<&SearchParams> for PermutationSpace {
    fn from(p: &SearchParams) -> Self {
        Self {
            min_gauge: p.min_gauge,
            max_gauge: p.max_gauge,
            heads: p.heads.clone(),
            fixed_total: p.fixed_total,
            variable: p.variable,
            max_gp: p.max_gp,
            max_rg: p.max_rg,
        }
    }
}

/// `start..=end` over i64 that is simply empty when `end < start`.
#[inline(always)]
fn inclusive(start: i64, end: i64) -> std::ops::Range<i64> {
    start..end.saturating_add(1).max(start)
}

impl PermutationSpace {
    /// Whole slots left for variable modules and casings.
    #[inline(always)]
    fn variable_budget(&self) -> i64 {
        MAX_SLOTS as i64 - self.fixed_total as i64
    }

    #[inline(always)]
    fn max_gp_hundredths(&self) -> i64 {
        // NaN casts to 0; negative caps yield an empty GP axis.
        (self.max_gp * GP_STEPS_PER_CASING as f64).round() as i64
    }

    #[inline(always)]
    fn duplicate_variables(&self) -> bool {
        self.variable[0] == self.variable[1]
    }

    pub fn partitions(&self) -> impl Iterator<Item = Partition> + '_ {
        let gauges = self.min_gauge..=self.max_gauge;
        self.heads
            .iter()
            .flat_map(move |&head| gauges.clone().map(move |gauge| Partition { head, gauge }))
    }

    pub fn partition_count(&self) -> usize {
        let gauges = if self.max_gauge >= self.min_gauge {
            (self.max_gauge - self.min_gauge) as usize + 1
        } else {
            0
        };
        self.heads.len() * gauges
    }

    /// Every tuple, head → gauge → var0 → var1 → gp → rg.
    pub fn iter(&self) -> impl Iterator<Item = ModuleCountTuple> + '_ {
        self.partitions().flat_map(move |p| self.iter_partition(p))
    }

    /// Tuples of a single (head, gauge) cell.
    pub fn iter_partition(&self, p: Partition) -> impl Iterator<Item = ModuleCountTuple> {
        let budget = self.variable_budget();
        let max_gp = self.max_gp_hundredths();
        let max_rg = self.max_rg as i64;
        let duplicate = self.duplicate_variables();

        inclusive(0, budget).flat_map(move |var0| {
            let var1_max = if duplicate { 0 } else { budget - var0 };
            inclusive(0, var1_max).flat_map(move |var1| {
                let remaining = (budget - var0 - var1) * GP_STEPS_PER_CASING;
                inclusive(0, remaining.min(max_gp)).flat_map(move |gp| {
                    let rg_max = ((remaining - gp) / GP_STEPS_PER_CASING).min(max_rg);
                    inclusive(0, rg_max).map(move |rg| ModuleCountTuple {
                        gauge: p.gauge,
                        head: p.head,
                        var0: var0 as u32,
                        var1: var1 as u32,
                        gp_hundredths: gp as u32,
                        rg: rg as u32,
                    })
                })
            })
        })
    }

    /// Number of tuples in one partition, without enumerating rg.
    pub fn tuples_per_partition(&self) -> u64 {
        let budget = self.variable_budget();
        let max_gp = self.max_gp_hundredths();
        let max_rg = self.max_rg as i64;
        let mut total: u64 = 0;

        for var0 in inclusive(0, budget) {
            let var1_max = if self.duplicate_variables() { 0 } else { budget - var0 };
            for var1 in inclusive(0, var1_max) {
                let remaining = (budget - var0 - var1) * GP_STEPS_PER_CASING;
                for gp in inclusive(0, remaining.min(max_gp)) {
                    let rg_max = ((remaining - gp) / GP_STEPS_PER_CASING).min(max_rg);
                    total += inclusive(0, rg_max).count() as u64;
                }
            }
        }
        total
    }

    pub fn total_tuples(&self) -> u64 {
        self.tuples_per_partition() * self.partition_count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_range_is_empty_when_inverted() {
        assert_eq!(inclusive(0, -1).count(), 0);
        assert_eq!(inclusive(0, 0).count(), 1);
        assert_eq!(inclusive(0, 3).count(), 4);
    }

    #[test]
    fn gp_upper_bound_is_reached_exactly() {
        let space = PermutationSpace {
            min_gauge: 100,
            max_gauge: 100,
            heads: vec![0],
            fixed_total: 19,
            variable: [1, 1],
            max_gp: 1.0,
            max_rg: 0,
        };
        let gps: Vec<u32> = space.iter().map(|t| t.gp_hundredths).collect();
        // var0 = 0 leaves one slot for GP: 0.00..=1.00. var0 = 1 leaves no room.
        assert_eq!(gps.len(), 102);
        assert_eq!(gps[100], 100);
    }
}
