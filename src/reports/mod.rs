use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use shellforge::catalog::{ModuleCatalog, ModuleKind};
use shellforge::leaderboard::Leaderboard;
use shellforge::search::{SearchOutcome, SearchParams};
use shellforge::shell::{DamageType, Shell};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align_from(table: &mut Table, first: usize, last: usize) {
    for i in first..=last {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn module_list(catalog: &ModuleCatalog, counts: &[u32]) -> String {
    let parts: Vec<String> = counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0)
        .map(|(i, c)| format!("{}× {}", c, catalog.name_of(i)))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn print_parameters(catalog: &ModuleCatalog, p: &SearchParams) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Parameter").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    let heads: Vec<&str> = p.heads.iter().map(|&h| catalog.name_of(h)).collect();
    let gauge = if p.min_gauge == p.max_gauge {
        format!("{} mm", p.min_gauge)
    } else {
        format!("{} mm to {} mm", p.min_gauge, p.max_gauge)
    };
    let draw = if p.uses_draw() {
        format!("{:.0}", p.max_draw)
    } else {
        "disabled".to_string()
    };

    let rows = vec![
        ("Gauge", gauge),
        ("Heads", heads.join(", ")),
        ("Base", p.base.map_or("-", |b| catalog.name_of(b)).to_string()),
        ("Fixed modules", module_list(catalog, &p.fixed_counts)),
        ("Fixed slots", p.fixed_total.to_string()),
        (
            "Variable modules",
            format!(
                "{}, {}",
                catalog.name_of(p.variable[0]),
                catalog.name_of(p.variable[1])
            ),
        ),
        ("Max GP casings", format!("{:.2}", p.max_gp)),
        ("Max RG casings", p.max_rg.to_string()),
        ("Max draw", draw),
        ("Max length", format!("{:.0} mm", p.max_length)),
        ("Min velocity", format!("{:.0} m/s", p.min_velocity)),
        ("Min range", format!("{:.0} m", p.min_range)),
        ("Damage type", p.damage_type.to_string()),
        ("Target AC", format!("{:.1}", p.target_ac)),
    ];

    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("\n{}", table);
}

/// Report rows for one shell. Every shell yields the same row names.
fn shell_rows(shell: &Shell<'_>, damage_type: DamageType) -> Vec<(&'static str, String)> {
    let catalog = shell.catalog();
    let s = shell.stats();

    let mut rows = vec![
        ("Gauge (mm)", format!("{:.0}", shell.gauge())),
        ("Total length (mm)", format!("{:.0}", s.total_length)),
        ("Projectile length (mm)", format!("{:.0}", s.projectile_length)),
        ("Head", catalog.name_of(shell.head()).to_string()),
        (
            "Base",
            shell.base().map_or("-", |b| catalog.name_of(b)).to_string(),
        ),
        ("Body modules", module_list(catalog, shell.body_counts())),
        ("GP casings", format!("{:.2}", shell.gp_casings())),
        ("RG casings", format!("{:.0}", shell.rg_casings())),
        ("Rail draw", format!("{:.0}", shell.rail_draw())),
        ("Max draw", format!("{:.0}", s.max_draw)),
        ("Total recoil", format!("{:.0}", s.total_recoil)),
        ("Velocity (m/s)", format!("{:.1}", s.velocity)),
        ("Effective range (m)", format!("{:.0}", s.effective_range)),
        ("Reload time (s)", format!("{:.2}", s.reload_time)),
        ("Belt reload time (s)", format!("{:.2}", s.reload_time_belt)),
        ("Volume", format!("{:.2}", s.volume)),
    ];

    match damage_type {
        DamageType::Kinetic => rows.extend([
            ("Raw KD", format!("{:.0}", s.kinetic_damage)),
            ("AP", format!("{:.2}", s.armor_pierce)),
            ("Effective KD", format!("{:.0}", s.effective_kinetic_damage)),
            ("KD/s", format!("{:.1}", s.kinetic_dps)),
            ("KD/s per volume", format!("{:.2}", s.kinetic_dps_per_volume)),
            ("Belt KD/s per volume", format!("{:.2}", s.kinetic_dps_per_volume_belt)),
        ]),
        DamageType::Chemical => rows.extend([
            ("Chem damage", format!("{:.2}", s.chem_damage)),
            ("Chem/s", format!("{:.3}", s.chem_dps)),
            ("Chem/s per volume", format!("{:.4}", s.chem_dps_per_volume)),
            ("Belt chem/s per volume", format!("{:.4}", s.chem_dps_per_volume_belt)),
        ]),
    }
    rows
}

/// Prints the best shell of every bracket. With labels, each bracket gets its
/// own titled table; without, brackets become columns of one table.
pub fn print_results(
    catalog: &ModuleCatalog,
    p: &SearchParams,
    board: &Leaderboard<Shell<'_>>,
) {
    if board.is_empty() {
        println!("\nNo shell met the constraints.");
        return;
    }

    if p.labels {
        for (bracket, entry) in board.iter() {
            let mut table = new_table();
            table.add_row(vec![
                Cell::new(bracket.to_string())
                    .fg(Color::Cyan)
                    .add_attribute(Attribute::Bold),
                Cell::new(catalog.name_of(entry.item.head())),
            ]);
            for (name, value) in shell_rows(&entry.item, p.damage_type) {
                table.add_row(vec![Cell::new(name), Cell::new(value)]);
            }
            right_align_from(&mut table, 1, 1);
            println!("\n{}", table);
        }
        return;
    }

    let entries: Vec<_> = board.iter().collect();
    let columns: Vec<Vec<(&'static str, String)>> = entries
        .iter()
        .map(|(_, e)| shell_rows(&e.item, p.damage_type))
        .collect();

    let mut table = new_table();
    let mut header = vec![Cell::new("").add_attribute(Attribute::Bold)];
    header.extend(
        entries
            .iter()
            .map(|(b, _)| Cell::new(b.to_string()).fg(Color::Cyan)),
    );
    table.add_row(header);

    for (row, (name, _)) in columns[0].iter().enumerate() {
        let mut cells = vec![Cell::new(*name)];
        cells.extend(columns.iter().map(|col| Cell::new(&col[row].1)));
        table.add_row(cells);
    }
    right_align_from(&mut table, 1, entries.len());
    println!("\n{}", table);
}

pub fn print_statistics(outcome: &SearchOutcome<'_>) {
    let s = &outcome.stats;
    println!("\n{} shells compared.", s.comparisons);
    println!("{} shells rejected due to length.", s.rejected_length);
    println!("{} shells rejected due to velocity.", s.rejected_velocity);
    println!("{} shells rejected due to range.", s.rejected_range);
    println!("{} total shells tested.", s.total());
    println!(
        "Searched {} partitions in {:.2?}.",
        outcome.partitions_completed, outcome.elapsed
    );
}

pub fn print_catalog(catalog: &ModuleCatalog, kind: Option<ModuleKind>) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Module").add_attribute(Attribute::Bold),
        Cell::new("Kind"),
        Cell::new("Max len"),
        Cell::new("Vel"),
        Cell::new("KD"),
        Cell::new("AP"),
        Cell::new("Chem"),
        Cell::new("Air"),
    ]);

    for (i, m) in catalog
        .iter()
        .filter(|(_, m)| kind.map_or(true, |k| m.kind == k))
    {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(&m.name).add_attribute(Attribute::Bold),
            Cell::new(m.kind.to_string()),
            Cell::new(format!("{:.0}", m.max_length)),
            Cell::new(format!("{:.2}", m.velocity_mod)),
            Cell::new(format!("{:.2}", m.kinetic_mod)),
            Cell::new(format!("{:.2}", m.armor_pierce_mod)),
            Cell::new(format!("{:.2}", m.chem_payload)),
            Cell::new(format!("{:.2}", m.airtime_mod)),
        ]);
    }
    right_align_from(&mut table, 3, 8);
    println!("\n{}", table);
}
