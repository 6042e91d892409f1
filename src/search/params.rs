use crate::catalog::ModuleCatalog;
use crate::error::{SfResult, ShellForgeError};
use crate::shell::DamageType;
use serde::{Deserialize, Serialize};

/// Module slots available to every shell, casings included.
pub const MAX_SLOTS: u32 = 20;

/// Resolved, catalog-indexed parameters of one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub min_gauge: u32,
    pub max_gauge: u32,
    pub heads: Vec<usize>,
    pub base: Option<usize>,
    /// Count of each module present on every shell, indexed like the catalog.
    pub fixed_counts: Vec<u32>,
    /// Slots taken before any variable module or casing is added.
    pub fixed_total: u32,
    pub variable: [usize; 2],
    pub max_gp: f64,
    pub max_rg: u32,
    pub max_length: f64,
    pub max_draw: f64,
    pub min_velocity: f64,
    pub min_range: f64,
    pub target_ac: f64,
    pub damage_type: DamageType,
    pub labels: bool,
}

impl SearchParams {
    /// Checks every module reference against `catalog`. Empty or inverted
    /// numeric ranges are not errors; they just produce no candidates.
    pub fn validate(&self, catalog: &ModuleCatalog) -> SfResult<()> {
        let check = |index: usize, what: &str| -> SfResult<()> {
            if index < catalog.len() {
                Ok(())
            } else {
                Err(ShellForgeError::Validation(format!(
                    "{} index {} is outside the catalog ({} modules)",
                    what,
                    index,
                    catalog.len()
                )))
            }
        };

        for &head in &self.heads {
            check(head, "Head module")?;
        }
        if let Some(base) = self.base {
            check(base, "Base module")?;
        }
        for &var in &self.variable {
            check(var, "Variable module")?;
        }

        if self.fixed_counts.len() > catalog.len() {
            return Err(ShellForgeError::Validation(format!(
                "{} fixed module counts given for a catalog of {} modules",
                self.fixed_counts.len(),
                catalog.len()
            )));
        }

        let fixed_sum = self
            .fixed_counts
            .iter()
            .try_fold(0u32, |acc, &c| acc.checked_add(c))
            .ok_or_else(|| {
                ShellForgeError::Validation("Fixed module counts overflow".to_string())
            })?;
        if fixed_sum > self.fixed_total {
            return Err(ShellForgeError::Validation(format!(
                "Fixed modules use {} slots but the fixed total is only {}",
                fixed_sum, self.fixed_total
            )));
        }

        Ok(())
    }

    /// True when the draw-based (rail) evaluation path is in effect.
    pub fn uses_draw(&self) -> bool {
        self.max_draw > 0.0
    }
}
