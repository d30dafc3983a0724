use crate::model::{ComparisonRow, ComparisonStats};

/// Compute aggregate counters from comparison rows in a single pass.
pub fn compute_stats(rows: &[ComparisonRow]) -> ComparisonStats {
    let mut stats = ComparisonStats {
        total_unique_awbs: rows.len(),
        ..ComparisonStats::default()
    };

    for row in rows {
        let p = &row.presence;
        match p.count() {
            3 => {
                stats.in_all_three += 1;
                if row.weights_match {
                    stats.perfect_matches += 1;
                } else {
                    stats.weight_mismatches += 1;
                }
            }
            2 => {
                if p.in_jaster && p.in_cis {
                    stats.in_jaster_and_cis += 1;
                } else if p.in_jaster && p.in_unifikasi {
                    stats.in_jaster_and_unifikasi += 1;
                } else {
                    stats.in_cis_and_unifikasi += 1;
                }
                if !row.weights_match {
                    stats.weight_mismatches += 1;
                }
            }
            1 => {
                if p.in_jaster {
                    stats.in_jaster_only += 1;
                } else if p.in_cis {
                    stats.in_cis_only += 1;
                } else {
                    stats.in_unifikasi_only += 1;
                }
            }
            // A key only reaches the union by appearing in some source.
            _ => {}
        }
    }

    stats
}

impl ComparisonStats {
    pub fn single_source_total(&self) -> usize {
        self.in_jaster_only + self.in_cis_only + self.in_unifikasi_only
    }

    pub fn two_source_total(&self) -> usize {
        self.in_jaster_and_cis + self.in_jaster_and_unifikasi + self.in_cis_and_unifikasi
    }

    /// Share of keys that are perfect three-way matches, in percent.
    pub fn perfect_match_rate(&self) -> f64 {
        self.percent_of_total(self.perfect_matches)
    }

    pub fn weight_mismatch_rate(&self) -> f64 {
        self.percent_of_total(self.weight_mismatches)
    }

    pub fn single_source_rate(&self) -> f64 {
        self.percent_of_total(self.single_source_total())
    }

    /// Empty comparisons report 0% rather than NaN.
    fn percent_of_total(&self, count: usize) -> f64 {
        if self.total_unique_awbs == 0 {
            return 0.0;
        }
        count as f64 / self.total_unique_awbs as f64 * 100.0
    }
}
