use std::path::Path;

use serde::Serialize;

use crate::analysis::config::{CostModel, MatchMode};
use crate::analysis::cost::{CycleBreakdown, keyword_cycles};
use crate::analysis::keywords::Keyword;
use crate::analysis::report::ReportVariant;

/// Occurrence counts per keyword, kept in the order each keyword was first credited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordCounts {
    entries: Vec<(Keyword, u64)>,
}

impl KeywordCounts {
    pub fn credit(&mut self, keyword: Keyword) {
        match self.entries.iter_mut().find(|(k, _)| *k == keyword) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((keyword, 1)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Keyword, u64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Everything accumulated by one pass over an input listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub counts: KeywordCounts,
    /// One per keyword credit, so a line crediting two keywords adds two.
    pub total_instructions: u64,
    pub load_store_count: u64,
    pub branch_count: u64,
    pub total_lines: usize,
    pub qualifying_lines: usize,
}

impl ScanResult {
    pub fn credit(&mut self, keyword: Keyword) {
        self.counts.credit(keyword);
        self.total_instructions += 1;
        if keyword.is_memory_access() {
            self.load_store_count += 1;
        }
        if keyword.is_branch() {
            self.branch_count += 1;
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AnalysisOutput {
    pub file: String,
    pub variant: ReportVariant,
    pub match_mode: MatchMode,
    pub total_lines: usize,
    pub qualifying_lines: usize,
    pub elapsed_secs: f64,
    pub total_instructions: u64,
    pub load_store_count: u64,
    pub branch_count: u64,
    pub cycles: CycleBreakdown,
    pub instructions: Vec<InstructionRow>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct InstructionRow {
    pub instruction: Keyword,
    pub count: u64,
    pub cycles_per_instruction: u64,
    pub cycles: u64,
}

impl AnalysisOutput {
    pub fn new(
        file: &Path,
        scan: &ScanResult,
        model: &CostModel,
        cycles: CycleBreakdown,
        variant: ReportVariant,
        elapsed_secs: f64,
    ) -> Self {
        let instructions = scan
            .counts
            .iter()
            .map(|(instruction, count)| {
                let weight = model.weights.get(instruction);
                InstructionRow {
                    instruction,
                    count,
                    cycles_per_instruction: weight,
                    cycles: keyword_cycles(count, weight),
                }
            })
            .collect();

        Self {
            file: file.display().to_string(),
            variant,
            match_mode: model.match_mode,
            total_lines: scan.total_lines,
            qualifying_lines: scan.qualifying_lines,
            elapsed_secs,
            total_instructions: scan.total_instructions,
            load_store_count: scan.load_store_count,
            branch_count: scan.branch_count,
            cycles,
            instructions,
        }
    }
}
