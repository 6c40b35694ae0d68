use serde::Serialize;

use crate::analysis::config::CostModel;
use crate::analysis::types::ScanResult;

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleBreakdown {
    /// Sum of `count * weight` over every credited keyword.
    pub weighted_cycles: u64,
    pub fetch_decode_cycles: u64,
    pub memory_overhead: u64,
    pub branch_overhead: u64,
    pub total_cycles: u64,
}

/// Saturates at `u64::MAX` rather than wrapping on extreme configured weights.
pub fn keyword_cycles(count: u64, weight: u64) -> u64 {
    count.saturating_mul(weight)
}

pub fn compute_cycles(scan: &ScanResult, model: &CostModel) -> CycleBreakdown {
    let weighted_cycles = scan
        .counts
        .iter()
        .map(|(keyword, count)| keyword_cycles(count, model.weights.get(keyword)))
        .fold(0u64, u64::saturating_add);

    let fetch_decode_cycles = scan
        .total_instructions
        .saturating_mul(model.fetch_decode_cycles);
    let memory_overhead = scan.load_store_count.saturating_mul(model.memory_latency);
    let branch_overhead = scan.branch_count.saturating_mul(model.branch_penalty);

    CycleBreakdown {
        weighted_cycles,
        fetch_decode_cycles,
        memory_overhead,
        branch_overhead,
        total_cycles: [fetch_decode_cycles, memory_overhead, branch_overhead]
            .into_iter()
            .fold(weighted_cycles, u64::saturating_add),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::Keyword;

    fn scan_of(keywords: &[Keyword]) -> ScanResult {
        let mut scan = ScanResult::default();
        for &k in keywords {
            scan.credit(k);
        }
        scan
    }

    #[test]
    fn load_and_ret_cost_21_cycles() {
        let scan = scan_of(&[Keyword::Load, Keyword::Ret]);
        let cycles = compute_cycles(&scan, &CostModel::default());

        assert_eq!(
            cycles,
            CycleBreakdown {
                weighted_cycles: 4,
                fetch_decode_cycles: 2,
                memory_overhead: 10,
                branch_overhead: 5,
                total_cycles: 21,
            }
        );
    }

    #[test]
    fn empty_scan_costs_nothing() {
        let cycles = compute_cycles(&ScanResult::default(), &CostModel::default());
        assert_eq!(cycles, CycleBreakdown::default());
    }

    #[test]
    fn total_matches_independent_recomputation() {
        let scan = scan_of(&[
            Keyword::Load,
            Keyword::Load,
            Keyword::Store,
            Keyword::Mul,
            Keyword::Div,
            Keyword::Call,
            Keyword::Call,
            Keyword::Icmp,
            Keyword::Ret,
        ]);
        let cycles = compute_cycles(&scan, &CostModel::default());

        let weighted: u64 = 2 * 3 + 3 + 2 + 4 + 2 * 5 + 1 + 1;
        let expected = weighted
            + scan.total_instructions
            + scan.load_store_count * 10
            + scan.branch_count * 5;
        assert_eq!(cycles.total_cycles, expected);
        assert_eq!(cycles.total_cycles, 27 + 9 + 30 + 15);
    }

    #[test]
    fn extreme_weights_saturate_instead_of_overflowing() {
        let model = CostModel::from_toml_str(
            "memory_latency = 9223372036854775807\n\n[weights]\nload = 9223372036854775807\n",
        )
        .unwrap();
        let scan = scan_of(&[Keyword::Load, Keyword::Load, Keyword::Load, Keyword::Ret]);
        let cycles = compute_cycles(&scan, &model);

        assert_eq!(cycles.weighted_cycles, u64::MAX);
        assert_eq!(cycles.memory_overhead, u64::MAX);
        assert_eq!(cycles.fetch_decode_cycles, 4);
        assert_eq!(cycles.total_cycles, u64::MAX);
        assert_eq!(keyword_cycles(3, u64::MAX / 2), u64::MAX);
    }

    #[test]
    fn uses_configured_overheads() {
        let scan = scan_of(&[Keyword::Store, Keyword::Call]);
        let model = CostModel {
            fetch_decode_cycles: 2,
            memory_latency: 100,
            branch_penalty: 0,
            ..CostModel::default()
        };
        let cycles = compute_cycles(&scan, &model);
        assert_eq!(cycles.fetch_decode_cycles, 4);
        assert_eq!(cycles.memory_overhead, 100);
        assert_eq!(cycles.branch_overhead, 0);
        assert_eq!(cycles.total_cycles, 3 + 5 + 4 + 100);
    }
}
