//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::queens::Solution;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Printed between consecutive boards
pub const DIVIDER: &str = "--------";

/// Format solutions for display
pub struct SolutionFormatter;

/// Summary written next to saved solutions
#[derive(Debug, Clone, Serialize)]
pub struct SolutionsSummary {
    pub board_size: usize,
    pub total: usize,
    pub solutions: Vec<String>,
}

impl SolutionFormatter {
    /// Format a board as N rows of `*` (queen) and `_` (empty)
    pub fn format_board(solution: &Solution) -> String {
        let size = solution.size();
        let mut output = String::with_capacity(size * (size + 1));
        for row in 0..size {
            for col in 0..size {
                output.push(if solution.contains(row, col) { '*' } else { '_' });
            }
            output.push('\n');
        }
        output
    }

    /// Format one solution entry of the printed stream, preceded by a divider
    /// unless it is the first
    pub fn format_entry(index: usize, solution: &Solution) -> String {
        let mut output = String::new();
        if index > 0 {
            output.push_str(DIVIDER);
            output.push('\n');
        }
        output.push_str(&Self::format_board(solution));
        output
    }

    /// Format a solution as a single JSON line
    pub fn format_json(solution: &Solution) -> Result<String> {
        Ok(serde_json::to_string(solution)?)
    }

    /// Format a solution in the requested output format
    pub fn format(index: usize, solution: &Solution, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(Self::format_entry(index, solution)),
            OutputFormat::Json => {
                let mut line = Self::format_json(solution)?;
                line.push('\n');
                Ok(line)
            }
        }
    }

    /// Save solutions to files based on output format
    pub fn save_solutions<P: AsRef<Path>>(
        solutions: &[Solution],
        output_dir: P,
        format: OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                for (i, solution) in solutions.iter().enumerate() {
                    let filename = format!("solution_{:03}.txt", i + 1);
                    std::fs::write(output_dir.join(filename), Self::format_board(solution))?;
                }
            }
            OutputFormat::Json => {
                for (i, solution) in solutions.iter().enumerate() {
                    let filename = format!("solution_{:03}.json", i + 1);
                    let json = serde_json::to_string_pretty(solution)?;
                    std::fs::write(output_dir.join(filename), json)?;
                }
            }
        }

        // Also save a summary file
        let summary = SolutionsSummary {
            board_size: solutions.first().map_or(0, |solution| solution.size()),
            total: solutions.len(),
            solutions: solutions.iter().map(|solution| solution.to_string()).collect(),
        };
        let summary_json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(output_dir.join("solutions_summary.json"), summary_json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_board_formatting() {
        let solution = Solution::from_columns(&[1, 3, 0, 2]);
        assert_eq!(
            SolutionFormatter::format_board(&solution),
            "_*__\n___*\n*___\n__*_\n"
        );
    }

    #[test]
    fn test_divider_between_entries() {
        let solution = Solution::from_columns(&[0]);
        assert_eq!(SolutionFormatter::format_entry(0, &solution), "*\n");
        assert_eq!(
            SolutionFormatter::format_entry(1, &solution),
            format!("{}\n*\n", DIVIDER)
        );
    }

    #[test]
    fn test_json_format() {
        let solution = Solution::from_columns(&[0]);
        let line = SolutionFormatter::format(0, &solution, OutputFormat::Json).unwrap();
        assert!(line.ends_with('\n'));
        let parsed: Solution = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(parsed, solution);
    }

    #[test]
    fn test_save_solutions() {
        let dir = tempdir().unwrap();
        let solutions = vec![
            Solution::from_columns(&[1, 3, 0, 2]),
            Solution::from_columns(&[2, 0, 3, 1]),
        ];

        SolutionFormatter::save_solutions(&solutions, dir.path(), OutputFormat::Text).unwrap();
        assert!(dir.path().join("solution_001.txt").exists());
        assert!(dir.path().join("solution_002.txt").exists());

        let summary = std::fs::read_to_string(dir.path().join("solutions_summary.json")).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(summary["total"], 2);
        assert_eq!(summary["board_size"], 4);
    }
}
