pub mod physics;
pub mod types;

pub use self::types::{Computed, DamageType, ShellStats};
use crate::catalog::ModuleCatalog;

/// Smallest draws satisfying each minimum separately. Either value exceeds
/// the `max_draw` it was computed against when that floor is unreachable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumDraw {
    pub for_velocity: f64,
    pub for_range: f64,
}

impl MinimumDraw {
    /// Smallest draw meeting both minimums.
    #[inline(always)]
    pub fn combined(&self) -> f64 {
        self.for_velocity.max(self.for_range)
    }
}

/// One candidate configuration and everything derived from it.
///
/// Computation steps must run in dependency order:
///
/// 1. `calculate_lengths`
/// 2. `calculate_modifiers`, `calculate_recoil`, `calculate_max_draw`,
///    `calculate_reload_time`
/// 3. `minimum_draw` (needs modifiers and recoil)
/// 4. `calculate_volume`, `calculate_velocity`
/// 5. `calculate_effective_range`, `calculate_armor_pierce`,
///    `calculate_kinetic_damage` (need velocity), `calculate_chem_damage`
/// 6. `calculate_kinetic_dps` / `calculate_chem_dps` (need damage and volume)
///
/// Changing the configuration invalidates every step; `set_rail_draw` only
/// invalidates steps 4-6, so one shell can be re-probed at many draws.
/// Out-of-order calls trip a debug assertion.
#[derive(Debug, Clone)]
pub struct Shell<'c> {
    catalog: &'c ModuleCatalog,
    gauge: f64,
    head: usize,
    base: Option<usize>,
    body_counts: Vec<u32>,
    gp_casings: f64,
    rg_casings: f64,
    rail_draw: f64,
    stats: ShellStats,
    computed: Computed,
}

impl<'c> Shell<'c> {
    pub fn new(catalog: &'c ModuleCatalog, gauge: f64, head: usize, base: Option<usize>) -> Self {
        Self {
            catalog,
            gauge,
            head,
            base,
            body_counts: vec![0; catalog.len()],
            gp_casings: 0.0,
            rg_casings: 0.0,
            rail_draw: 0.0,
            stats: ShellStats::default(),
            computed: Computed::NONE,
        }
    }

    // --- Configuration ---

    /// Overwrites all body counts. Missing trailing entries are zero.
    pub fn set_body_counts(&mut self, counts: &[u32]) {
        self.body_counts.iter_mut().for_each(|c| *c = 0);
        for (dst, &src) in self.body_counts.iter_mut().zip(counts) {
            *dst = src;
        }
        self.computed = Computed::NONE;
    }

    pub fn add_body_modules(&mut self, index: usize, count: u32) {
        self.body_counts[index] = self.body_counts[index].saturating_add(count);
        self.computed = Computed::NONE;
    }

    pub fn set_casings(&mut self, gp_casings: f64, rg_casings: f64) {
        self.gp_casings = gp_casings;
        self.rg_casings = rg_casings;
        self.computed = Computed::NONE;
    }

    pub fn set_rail_draw(&mut self, draw: f64) {
        self.rail_draw = draw;
        self.computed.remove(Computed::DRAW_DEPENDENT);
    }

    // --- Accessors ---

    pub fn catalog(&self) -> &'c ModuleCatalog {
        self.catalog
    }

    pub fn gauge(&self) -> f64 {
        self.gauge
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn base(&self) -> Option<usize> {
        self.base
    }

    pub fn body_counts(&self) -> &[u32] {
        &self.body_counts
    }

    pub fn gp_casings(&self) -> f64 {
        self.gp_casings
    }

    pub fn rg_casings(&self) -> f64 {
        self.rg_casings
    }

    pub fn rail_draw(&self) -> f64 {
        self.rail_draw
    }

    pub fn stats(&self) -> &ShellStats {
        &self.stats
    }

    pub fn is_computed(&self, steps: Computed) -> bool {
        self.computed.contains(steps)
    }

    /// Total module slots used, casings included.
    pub fn module_count(&self) -> f64 {
        let body: u32 = self.body_counts.iter().sum();
        body as f64
            + 1.0
            + self.base.map_or(0.0, |_| 1.0)
            + self.gp_casings
            + self.rg_casings
    }

    #[inline(always)]
    fn require(&self, needed: Computed, step: &str) {
        debug_assert!(
            self.computed.contains(needed),
            "Shell::{} called before its prerequisite steps ran",
            step
        );
    }

    // --- Computation steps ---

    pub fn calculate_lengths(&mut self) {
        let gauge = self.gauge;
        let catalog = self.catalog;

        let body_length: f64 = self
            .body_counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(i, &count)| catalog[i].length_at(gauge) * count as f64)
            .sum();

        let s = &mut self.stats;
        s.head_length = catalog[self.head].length_at(gauge);
        s.base_length = self.base.map_or(0.0, |b| catalog[b].length_at(gauge));
        s.body_length = body_length;
        s.casing_length = (self.gp_casings + self.rg_casings) * gauge;
        s.projectile_length = s.head_length + s.body_length + s.base_length;
        s.total_length = s.projectile_length + s.casing_length;
        s.effective_module_count = physics::ratio(s.projectile_length, gauge);

        self.computed = Computed::LENGTHS;
    }

    /// Body modifiers are averaged by module length; head and base modifiers
    /// apply on top.
    pub fn calculate_modifiers(&mut self) {
        self.require(Computed::LENGTHS, "calculate_modifiers");
        let gauge = self.gauge;
        let catalog = self.catalog;

        let mut weight = 0.0;
        let mut velocity = 0.0;
        let mut kinetic = 0.0;
        let mut armor_pierce = 0.0;
        let mut airtime = 0.0;
        let mut chem = 0.0;

        for (i, &count) in self.body_counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let module = &catalog[i];
            let len = module.length_at(gauge) * count as f64;
            weight += len;
            velocity += module.velocity_mod * len;
            kinetic += module.kinetic_mod * len;
            armor_pierce += module.armor_pierce_mod * len;
            airtime += module.airtime_mod * len;
            chem += module.chem_payload * physics::ratio(len, gauge);
        }

        let average = |sum: f64| if weight > 0.0 { sum / weight } else { 1.0 };
        let head = &catalog[self.head];

        let s = &mut self.stats;
        s.velocity_mod = average(velocity) * head.velocity_mod;
        s.kinetic_mod = average(kinetic) * head.kinetic_mod;
        s.armor_pierce_mod = average(armor_pierce) * head.armor_pierce_mod;
        s.airtime_mod = average(airtime) * head.airtime_mod;
        s.chem_payload =
            chem + head.chem_payload * physics::ratio(head.length_at(gauge), gauge);

        if let Some(b) = self.base {
            let base = &catalog[b];
            s.velocity_mod *= base.velocity_mod;
            s.kinetic_mod *= base.kinetic_mod;
            s.armor_pierce_mod *= base.armor_pierce_mod;
            s.airtime_mod *= base.airtime_mod;
            s.chem_payload += base.chem_payload * physics::ratio(base.length_at(gauge), gauge);
        }

        self.computed.insert(Computed::MODIFIERS);
    }

    pub fn calculate_recoil(&mut self) {
        self.require(Computed::LENGTHS, "calculate_recoil");
        self.stats.gp_recoil = physics::gp_recoil(self.gauge, self.gp_casings);
        self.stats.total_recoil = self.stats.gp_recoil + self.rail_draw;
        self.computed.insert(Computed::RECOIL);
    }

    pub fn calculate_max_draw(&mut self) {
        self.require(Computed::LENGTHS, "calculate_max_draw");
        self.stats.max_draw = physics::max_draw(
            self.gauge,
            self.stats.effective_module_count,
            self.rg_casings,
        );
        self.computed.insert(Computed::MAX_DRAW);
    }

    pub fn calculate_reload_time(&mut self) {
        self.require(Computed::LENGTHS, "calculate_reload_time");
        let s = &mut self.stats;
        s.reload_time = physics::reload_time(
            self.gauge,
            s.effective_module_count,
            self.gp_casings + self.rg_casings,
        );
        s.reload_time_belt = physics::belt_reload_time(self.gauge, s.reload_time);
        self.computed.insert(Computed::RELOAD);
    }

    /// Smallest draws reaching `min_velocity` and `min_range`. Unreachable
    /// floors are reported as `max_draw + 1`.
    pub fn minimum_draw(&self, min_velocity: f64, min_range: f64, max_draw: f64) -> MinimumDraw {
        self.require(
            Computed::MODIFIERS.union(Computed::RECOIL),
            "minimum_draw",
        );
        let unreachable = max_draw.max(0.0) + 1.0;
        let s = &self.stats;

        let draw_for = |target_velocity: Option<f64>| -> f64 {
            target_velocity
                .and_then(|v| {
                    physics::recoil_for_velocity(v, self.gauge, s.projectile_length, s.velocity_mod)
                })
                .map(|recoil| (recoil - s.gp_recoil).max(0.0).ceil().min(unreachable))
                .unwrap_or(unreachable)
        };

        MinimumDraw {
            for_velocity: draw_for(Some(min_velocity)),
            for_range: draw_for(physics::velocity_for_range(min_range, s.airtime_mod)),
        }
    }

    pub fn calculate_volume(&mut self) {
        self.require(
            Computed::RECOIL.union(Computed::RELOAD),
            "calculate_volume",
        );
        let s = &mut self.stats;
        s.total_recoil = s.gp_recoil + self.rail_draw;
        s.volume = physics::loader_volume(s.total_length)
            + physics::support_volume(s.total_recoil, self.rail_draw, s.reload_time);
        s.volume_belt = physics::BELT_LOADER_VOLUME
            + physics::support_volume(s.total_recoil, self.rail_draw, s.reload_time_belt);
        self.computed.insert(Computed::VOLUME);
    }

    pub fn calculate_velocity(&mut self) {
        self.require(
            Computed::MODIFIERS.union(Computed::RECOIL),
            "calculate_velocity",
        );
        let s = &mut self.stats;
        s.total_recoil = s.gp_recoil + self.rail_draw;
        s.velocity = physics::velocity(
            s.total_recoil,
            self.gauge,
            s.projectile_length,
            s.velocity_mod,
        );
        self.computed.insert(Computed::VELOCITY);
    }

    pub fn calculate_effective_range(&mut self) {
        self.require(Computed::VELOCITY, "calculate_effective_range");
        self.stats.effective_range =
            physics::effective_range(self.stats.velocity, self.stats.airtime_mod);
        self.computed.insert(Computed::RANGE);
    }

    pub fn calculate_armor_pierce(&mut self) {
        self.require(Computed::VELOCITY, "calculate_armor_pierce");
        self.stats.armor_pierce =
            physics::armor_pierce(self.stats.velocity, self.stats.armor_pierce_mod);
        self.computed.insert(Computed::ARMOR_PIERCE);
    }

    pub fn calculate_kinetic_damage(&mut self) {
        self.require(Computed::VELOCITY, "calculate_kinetic_damage");
        let s = &mut self.stats;
        s.kinetic_damage = physics::kinetic_damage(
            self.gauge,
            s.effective_module_count,
            s.velocity,
            s.kinetic_mod,
        );
        self.computed.insert(Computed::KINETIC_DAMAGE);
    }

    pub fn calculate_kinetic_dps(&mut self, target_ac: f64) {
        self.require(
            Computed::KINETIC_DAMAGE
                .union(Computed::ARMOR_PIERCE)
                .union(Computed::VOLUME)
                .union(Computed::RELOAD),
            "calculate_kinetic_dps",
        );
        let s = &mut self.stats;
        s.effective_kinetic_damage =
            physics::effective_kinetic_damage(s.kinetic_damage, s.armor_pierce, target_ac);
        s.kinetic_dps = physics::ratio(s.effective_kinetic_damage, s.reload_time);
        s.kinetic_dps_per_volume = physics::ratio(s.kinetic_dps, s.volume);
        s.kinetic_dps_belt = physics::ratio(s.effective_kinetic_damage, s.reload_time_belt);
        s.kinetic_dps_per_volume_belt = physics::ratio(s.kinetic_dps_belt, s.volume_belt);
        self.computed.insert(Computed::KINETIC_DPS);
    }

    pub fn calculate_chem_damage(&mut self) {
        self.require(Computed::MODIFIERS, "calculate_chem_damage");
        self.stats.chem_damage = physics::chem_damage(self.gauge, self.stats.chem_payload);
        self.computed.insert(Computed::CHEM_DAMAGE);
    }

    pub fn calculate_chem_dps(&mut self) {
        self.require(
            Computed::CHEM_DAMAGE
                .union(Computed::VOLUME)
                .union(Computed::RELOAD),
            "calculate_chem_dps",
        );
        let s = &mut self.stats;
        s.chem_dps = physics::ratio(s.chem_damage, s.reload_time);
        s.chem_dps_per_volume = physics::ratio(s.chem_dps, s.volume);
        s.chem_dps_belt = physics::ratio(s.chem_damage, s.reload_time_belt);
        s.chem_dps_per_volume_belt = physics::ratio(s.chem_dps_belt, s.volume_belt);
        self.computed.insert(Computed::CHEM_DPS);
    }

    // --- Composite steps ---

    /// Runs the damage chain for the active damage type. Volume and velocity
    /// must already be current.
    pub fn calculate_damage_chain(&mut self, damage_type: DamageType, target_ac: f64) {
        match damage_type {
            DamageType::Kinetic => {
                self.calculate_armor_pierce();
                self.calculate_kinetic_damage();
                self.calculate_kinetic_dps(target_ac);
            }
            DamageType::Chemical => {
                self.calculate_chem_damage();
                self.calculate_chem_dps();
            }
        }
    }

    /// Re-probes the shell at `draw` and returns its score. Requires the
    /// draw-independent steps (lengths, modifiers, recoil, reload).
    pub fn score_at_draw(&mut self, draw: f64, damage_type: DamageType, target_ac: f64) -> f64 {
        self.set_rail_draw(draw);
        self.calculate_volume();
        self.calculate_velocity();
        self.calculate_damage_chain(damage_type, target_ac);
        self.stats.score(damage_type)
    }
}
