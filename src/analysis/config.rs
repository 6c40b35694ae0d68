use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analysis::error::{AnalyzerError, Result};
use crate::analysis::keywords::{Keyword, WeightTable};

/// Cycles charged once per credited instruction for fetch and decode.
pub const FETCH_DECODE_CYCLES: u64 = 1;
/// Average cache miss latency charged per load or store.
pub const MEMORY_LATENCY: u64 = 10;
/// Misprediction penalty charged per call or ret.
pub const BRANCH_PENALTY: u64 = 5;

/// How a qualifying line is credited to keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Once any keyword matches on word boundaries, every keyword contained
    /// as a plain substring is credited (`reload` credits `load`).
    #[default]
    Permissive,
    /// Only keywords that match on word boundaries themselves are credited.
    Strict,
}

/// Prints the same name `--match-mode` and the config file accept.
impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostModel {
    pub weights: WeightTable,
    pub fetch_decode_cycles: u64,
    pub memory_latency: u64,
    pub branch_penalty: u64,
    pub match_mode: MatchMode,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            fetch_decode_cycles: FETCH_DECODE_CYCLES,
            memory_latency: MEMORY_LATENCY,
            branch_penalty: BRANCH_PENALTY,
            match_mode: MatchMode::default(),
        }
    }
}

/// On-disk shape of a cost model. Every field is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CostModelFile {
    fetch_decode_cycles: Option<u64>,
    memory_latency: Option<u64>,
    branch_penalty: Option<u64>,
    match_mode: Option<MatchMode>,
    weights: BTreeMap<String, u64>,
}

impl CostModel {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| AnalyzerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_toml_str(&text)?;
        log::info!("Loaded cost model from {}", path.display());
        Ok(model)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CostModelFile = toml::from_str(text)?;
        let mut model = Self::default();

        for (name, weight) in file.weights {
            let keyword =
                Keyword::from_name(&name).ok_or_else(|| AnalyzerError::UnknownKeyword(name))?;
            model.weights.set(keyword, weight);
        }
        if let Some(cycles) = file.fetch_decode_cycles {
            model.fetch_decode_cycles = cycles;
        }
        if let Some(latency) = file.memory_latency {
            model.memory_latency = latency;
        }
        if let Some(penalty) = file.branch_penalty {
            model.branch_penalty = penalty;
        }
        if let Some(mode) = file.match_mode {
            model.match_mode = mode;
        }

        Ok(model)
    }
}
