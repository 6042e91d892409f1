use crate::catalog::ModuleCatalog;
use crate::error::{SfResult, ShellForgeError};
use crate::search::{DrawStrategy, SearchParams};
use crate::shell::DamageType;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub shell: ShellLayout,
    #[command(flatten)]
    pub limits: Limits,
    #[command(flatten)]
    pub run: RunSettings,
}

/// Which shells are enumerated. Modules are referenced by catalog name
/// (case-insensitive) or index.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellLayout {
    #[arg(long, default_value_t = 18)]
    pub min_gauge: u32,
    #[arg(long, default_value_t = 500)]
    pub max_gauge: u32,

    /// Comma-separated head modules to try.
    #[arg(long, value_delimiter = ',', default_value = "Solid head")]
    pub heads: Vec<String>,

    #[arg(long)]
    pub base: Option<String>,

    /// Modules present on every shell, as NAME or NAME=COUNT.
    #[arg(long, value_delimiter = ',')]
    pub fixed: Vec<String>,

    /// Slots taken before variable modules. Defaults to the fixed modules
    /// plus head and base.
    #[arg(long)]
    pub fixed_total: Option<u32>,

    #[arg(long, default_value = "Solid body")]
    pub var0: String,
    #[arg(long, default_value = "Sabot body")]
    pub var1: String,

    #[arg(long, default_value_t = 1.0)]
    pub max_gp: f64,
    #[arg(long, default_value_t = 0)]
    pub max_rg: u32,
}

/// Hard constraints and the scoring target.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    #[arg(long, default_value_t = 8000.0)]
    pub max_length: f64,
    /// Rail draw cap. 0 disables rail draw entirely.
    #[arg(long, default_value_t = 0.0)]
    pub max_draw: f64,
    #[arg(long, default_value_t = 0.0)]
    pub min_velocity: f64,
    #[arg(long, default_value_t = 0.0)]
    pub min_range: f64,
    #[arg(long, default_value_t = 20.0)]
    pub target_ac: f64,
    #[arg(long, value_enum, default_value_t = DamageType::Kinetic)]
    pub damage_type: DamageType,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Worker threads; 0 uses every available core.
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
    #[arg(long, value_enum, default_value_t = DrawStrategy::Bisection)]
    pub draw_strategy: DrawStrategy,
    /// Stop starting new partitions after this many seconds.
    #[arg(short = 'T', long)]
    pub time_limit: Option<u64>,
    /// Print one labelled table per bracket instead of a single table.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub labels: bool,
}

impl Default for ShellLayout {
    fn default() -> Self {
        Self {
            min_gauge: 18,
            max_gauge: 500,
            heads: vec!["Solid head".to_string()],
            base: None,
            fixed: Vec::new(),
            fixed_total: None,
            var0: "Solid body".to_string(),
            var1: "Sabot body".to_string(),
            max_gp: 1.0,
            max_rg: 0,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_length: 8000.0,
            max_draw: 0.0,
            min_velocity: 0.0,
            min_range: 0.0,
            target_ac: 20.0,
            damage_type: DamageType::Kinetic,
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            threads: 0,
            draw_strategy: DrawStrategy::Bisection,
            time_limit: None,
            labels: true,
        }
    }
}

/// Splits `NAME=COUNT`; a bare `NAME` counts once.
fn parse_fixed_entry(entry: &str) -> SfResult<(&str, u32)> {
    match entry.split_once('=') {
        None => Ok((entry.trim(), 1)),
        Some((name, count)) => {
            let count = count.trim().parse::<u32>().map_err(|e| {
                ShellForgeError::Config(format!("Bad count in fixed module '{}': {}", entry, e))
            })?;
            Ok((name.trim(), count))
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every argument the user typed on the command line over the
    /// values loaded from a parameter file.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(shell.min_gauge);
        update_if_present!(shell.max_gauge);
        update_if_present!(shell.heads);
        update_if_present!(shell.base);
        update_if_present!(shell.fixed);
        update_if_present!(shell.fixed_total);
        update_if_present!(shell.var0);
        update_if_present!(shell.var1);
        update_if_present!(shell.max_gp);
        update_if_present!(shell.max_rg);

        update_if_present!(limits.max_length);
        update_if_present!(limits.max_draw);
        update_if_present!(limits.min_velocity);
        update_if_present!(limits.min_range);
        update_if_present!(limits.target_ac);
        update_if_present!(limits.damage_type);

        update_if_present!(run.threads);
        update_if_present!(run.draw_strategy);
        update_if_present!(run.time_limit);
        update_if_present!(run.labels);
    }

    /// Turns module references into catalog indices.
    pub fn resolve(&self, catalog: &ModuleCatalog) -> SfResult<SearchParams> {
        let lookup = |reference: &str, role: &str| -> SfResult<usize> {
            catalog.find(reference).ok_or_else(|| {
                ShellForgeError::Config(format!("Unknown {} module '{}'", role, reference))
            })
        };

        let heads = self
            .shell
            .heads
            .iter()
            .map(|h| lookup(h, "head"))
            .collect::<SfResult<Vec<_>>>()?;

        let base = self
            .shell
            .base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty() && !b.eq_ignore_ascii_case("none"))
            .map(|b| lookup(b, "base"))
            .transpose()?;

        let overflow =
            || ShellForgeError::Config("Fixed module counts are too large".to_string());

        let mut fixed_counts = vec![0u32; catalog.len()];
        for entry in &self.shell.fixed {
            let (name, count) = parse_fixed_entry(entry)?;
            let slot = &mut fixed_counts[lookup(name, "fixed")?];
            *slot = slot.checked_add(count).ok_or_else(overflow)?;
        }

        let fixed_total = match self.shell.fixed_total {
            Some(total) => total,
            None => fixed_counts
                .iter()
                .try_fold(1 + u32::from(base.is_some()), |acc, &c| acc.checked_add(c))
                .ok_or_else(overflow)?,
        };

        Ok(SearchParams {
            min_gauge: self.shell.min_gauge,
            max_gauge: self.shell.max_gauge,
            heads,
            base,
            fixed_counts,
            fixed_total,
            variable: [
                lookup(&self.shell.var0, "variable")?,
                lookup(&self.shell.var1, "variable")?,
            ],
            max_gp: self.shell.max_gp,
            max_rg: self.shell.max_rg,
            max_length: self.limits.max_length,
            max_draw: self.limits.max_draw,
            min_velocity: self.limits.min_velocity,
            min_range: self.limits.min_range,
            target_ac: self.limits.target_ac,
            damage_type: self.limits.damage_type,
            labels: self.run.labels,
        })
    }
}
