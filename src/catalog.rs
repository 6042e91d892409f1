use crate::error::{SfResult, ShellForgeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModuleKind {
    Head,
    #[default]
    Body,
    Base,
}

/// A single shell component. Lengths are in millimeters; the `*_mod` fields
/// are multipliers where 1.0 means "no effect".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Module {
    pub name: String,
    pub kind: ModuleKind,
    /// A module is as long as the shell is wide, up to this cap.
    pub max_length: f64,
    pub velocity_mod: f64,
    pub kinetic_mod: f64,
    pub armor_pierce_mod: f64,
    /// Chemical payload carried, in module-equivalents.
    pub chem_payload: f64,
    pub airtime_mod: f64,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            name: "Unnamed".to_string(),
            kind: ModuleKind::Body,
            max_length: 2000.0,
            velocity_mod: 1.0,
            kinetic_mod: 1.0,
            armor_pierce_mod: 1.0,
            chem_payload: 0.0,
            airtime_mod: 1.0,
        }
    }
}

impl Module {
    fn new(name: &str, kind: ModuleKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            ..Default::default()
        }
    }

    /// Physical length of this module in a shell of the given gauge.
    #[inline(always)]
    pub fn length_at(&self, gauge: f64) -> f64 {
        gauge.min(self.max_length).max(0.0)
    }
}

/// Ordered registry of modules. Indices are stable for the lifetime of a run
/// and are what the search uses to address modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleCatalog {
    modules: Vec<Module>,
}

impl ModuleCatalog {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Built-in catalog used when no catalog file is supplied.
    pub fn standard() -> Self {
        use ModuleKind::*;

        let modules = vec![
            Module {
                velocity_mod: 1.1,
                ..Module::new("Solid body", Body)
            },
            Module {
                velocity_mod: 1.1,
                kinetic_mod: 0.8,
                armor_pierce_mod: 1.4,
                ..Module::new("Sabot body", Body)
            },
            Module {
                kinetic_mod: 0.6,
                armor_pierce_mod: 0.6,
                chem_payload: 1.0,
                ..Module::new("Chemical body", Body)
            },
            Module {
                max_length: 100.0,
                ..Module::new("Fuse", Body)
            },
            Module {
                max_length: 300.0,
                velocity_mod: 0.95,
                airtime_mod: 1.35,
                ..Module::new("Stabilizer fin body", Body)
            },
            Module {
                max_length: 100.0,
                airtime_mod: 1.5,
                ..Module::new("Gravity compensator", Body)
            },
            Module {
                velocity_mod: 1.45,
                kinetic_mod: 1.0,
                armor_pierce_mod: 1.0,
                ..Module::new("Solid head", Head)
            },
            Module {
                velocity_mod: 1.6,
                kinetic_mod: 0.85,
                armor_pierce_mod: 1.65,
                ..Module::new("Sabot head", Head)
            },
            Module {
                velocity_mod: 1.3,
                kinetic_mod: 1.2,
                armor_pierce_mod: 0.8,
                ..Module::new("Hollow point head", Head)
            },
            Module {
                kinetic_mod: 0.6,
                armor_pierce_mod: 0.6,
                chem_payload: 1.0,
                ..Module::new("Chemical head", Head)
            },
            Module {
                max_length: 100.0,
                velocity_mod: 1.15,
                airtime_mod: 1.1,
                ..Module::new("Base bleeder", Base)
            },
            Module {
                max_length: 100.0,
                velocity_mod: 1.05,
                ..Module::new("Tracer", Base)
            },
        ];

        Self { modules }
    }

    /// Loads a catalog from JSON (an array of modules) or, for `.csv` files,
    /// from a header row naming the `Module` fields.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SfResult<Self> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        let modules: Vec<Module> = if is_csv {
            let mut rdr = csv::ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::All)
                .from_path(path)?;
            rdr.deserialize().collect::<Result<_, _>>()?
        } else {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        };

        if modules.is_empty() {
            return Err(ShellForgeError::Validation(format!(
                "Catalog '{}' contains no modules",
                path.display()
            )));
        }

        Ok(Self { modules })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    pub fn name_of(&self, index: usize) -> &str {
        self.modules
            .get(index)
            .map(|m| m.name.as_str())
            .unwrap_or("<unknown>")
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Module)> {
        self.modules.iter().enumerate()
    }

    /// Resolves a user reference: a numeric index or a case-insensitive name.
    pub fn find(&self, reference: &str) -> Option<usize> {
        let reference = reference.trim();
        if let Ok(idx) = reference.parse::<usize>() {
            return (idx < self.modules.len()).then_some(idx);
        }
        self.modules
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(reference))
    }
}

impl std::ops::Index<usize> for ModuleCatalog {
    type Output = Module;

    fn index(&self, index: usize) -> &Module {
        &self.modules[index]
    }
}
