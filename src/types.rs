// Sparse effectiveness table: attacking affinity -> defending affinity -> multiplier.
// Pairs missing from the table are neutral.
use anyhow::Context;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_ENTRIES: &[(&str, &[(&str, f64)])] = &[
    ("normal", &[("rock", 0.5), ("ghost", 0.0)]),
    (
        "fire",
        &[("fire", 0.5), ("water", 0.5), ("rock", 0.5), ("grass", 2.0), ("ice", 2.0), ("bug", 2.0)],
    ),
    (
        "water",
        &[("water", 0.5), ("grass", 0.5), ("fire", 2.0), ("ground", 2.0), ("rock", 2.0)],
    ),
    (
        "grass",
        &[
            ("fire", 0.5),
            ("grass", 0.5),
            ("poison", 0.5),
            ("flying", 0.5),
            ("water", 2.0),
            ("ground", 2.0),
            ("rock", 2.0),
        ],
    ),
    (
        "electric",
        &[("electric", 0.5), ("grass", 0.5), ("water", 2.0), ("flying", 2.0), ("ground", 0.0)],
    ),
    ("ice", &[("fire", 0.5), ("water", 0.5), ("grass", 2.0), ("flying", 2.0), ("ground", 2.0)]),
    (
        "ground",
        &[("grass", 0.5), ("fire", 2.0), ("electric", 2.0), ("rock", 2.0), ("flying", 0.0)],
    ),
    ("flying", &[("electric", 0.5), ("rock", 0.5), ("grass", 2.0), ("bug", 2.0)]),
    ("poison", &[("poison", 0.5), ("ground", 0.5), ("grass", 2.0)]),
    ("ghost", &[("ghost", 2.0), ("normal", 0.0)]),
];

static DEFAULT_CHART: Lazy<TypeChart> = Lazy::new(|| {
    let mut chart = TypeChart::empty();
    for (attacking, row) in DEFAULT_ENTRIES {
        for (defending, multiplier) in *row {
            chart.set(attacking, defending, *multiplier);
        }
    }
    chart
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeChart {
    entries: HashMap<String, HashMap<String, f64>>,
}

impl TypeChart {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in illustrative table.
    pub fn builtin() -> Self {
        DEFAULT_CHART.clone()
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let parsed: HashMap<String, HashMap<String, f64>> = serde_json::from_str(raw)
            .context("type chart must map affinity -> affinity -> multiplier")?;
        let mut chart = TypeChart::empty();
        for (attacking, row) in parsed {
            for (defending, multiplier) in row {
                if !multiplier.is_finite() || multiplier < 0.0 {
                    anyhow::bail!("invalid multiplier {multiplier} for {attacking} -> {defending}");
                }
                chart.set(&attacking, &defending, multiplier);
            }
        }
        Ok(chart)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read type chart at {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to parse type chart {}", path.display()))
    }

    pub fn set(&mut self, attacking: &str, defending: &str, multiplier: f64) {
        self.entries
            .entry(attacking.to_ascii_lowercase())
            .or_default()
            .insert(defending.to_ascii_lowercase(), multiplier);
    }

    pub fn single(&self, attacking: &str, defending: &str) -> f64 {
        self.entries
            .get(&attacking.to_ascii_lowercase())
            .and_then(|row| row.get(&defending.to_ascii_lowercase()))
            .copied()
            .unwrap_or(1.0)
    }

    /// Product of the multipliers against every defending affinity.
    pub fn effectiveness(&self, move_type: &str, target_types: &[String]) -> f64 {
        target_types
            .iter()
            .map(|t| self.single(move_type, t))
            .product()
    }
}
