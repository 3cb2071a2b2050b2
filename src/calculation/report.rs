use crate::calculation::ranking::RankedValue;

/// The console summary of a run.
#[derive(Debug)]
pub struct JaReport {
    /// How many entries were asked for, which may be more than there are.
    pub top_n: usize,
    pub ranked: Vec<RankedValue>,
}

impl JaReport {
    pub fn new(top_n: usize, ranked: Vec<RankedValue>) -> Self {
        JaReport { top_n, ranked }
    }

    /// One header line, then a `JA3: <value>, Count: <n>` line per entry.
    pub fn render(&self) -> String {
        let header = format!(
            "Top {} JA3 values and their counts for the last 24 hours:",
            self.top_n
        );

        if self.ranked.is_empty() {
            return format!("{header}\nNo JA3 values found.");
        }

        std::iter::once(header)
            .chain(
                self.ranked
                    .iter()
                    .map(|entry| format!("JA3: {}, Count: {}", entry.value, entry.count)),
            )
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let report = JaReport::new(
            10,
            vec![
                RankedValue {
                    value: "771,4865-4866".to_owned(),
                    count: 3,
                },
                RankedValue {
                    value: "abc".to_owned(),
                    count: 1,
                },
            ],
        );

        assert_eq!(
            report.render(),
            "Top 10 JA3 values and their counts for the last 24 hours:\n\
             JA3: 771,4865-4866, Count: 3\n\
             JA3: abc, Count: 1"
        );
    }

    #[test]
    fn test_render_empty() {
        let report = JaReport::new(10, vec![]);

        assert!(report.render().ends_with("No JA3 values found."));
    }
}
