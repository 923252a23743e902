//! Plain-text report generation.
//!
//! This module renders an aggregate report as grouped, human-readable
//! sections. Ordering is applied here, never in the aggregator.

use crate::dataset::DATASET_FILE_NAME;
use crate::models::AggregateReport;

/// Render the complete text report.
pub fn render(report: &AggregateReport) -> String {
    let mut output = String::new();

    output.push_str(&generate_header_section(report));
    output.push('\n');
    output.push_str(&generate_rung_section(report));
    output.push('\n');
    output.push_str(&generate_query_type_section(report));
    output.push('\n');
    output.push_str(&generate_joint_section(report));

    output
}

/// Generate the title and sample totals.
fn generate_header_section(report: &AggregateReport) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "=== cladder causal ladder statistics ({}) ===\n",
        DATASET_FILE_NAME
    ));
    // Parse failures are logged per line, not repeated here
    section.push_str(&format!("Total samples: {}\n", report.total));

    section
}

/// Generate the rung distribution section.
fn generate_rung_section(report: &AggregateReport) -> String {
    let mut section = String::new();

    section.push_str("1) rung distribution (causal ladder tier)\n");

    let rungs = report.rungs_sorted();
    if rungs.is_empty() {
        section.push_str("  No rung field found.\n");
    } else {
        for (rung, count) in rungs {
            section.push_str(&format!("  rung = {}: {}\n", rung, count));
        }
    }

    if report.missing_rung > 0 {
        section.push_str(&format!(
            "  Samples missing rung: {}\n",
            report.missing_rung
        ));
    }

    section
}

/// Generate the overall query_type distribution section.
fn generate_query_type_section(report: &AggregateReport) -> String {
    let mut section = String::new();

    section.push_str("2) query_type distribution\n");

    let query_types = report.query_types_sorted();
    if query_types.is_empty() {
        section.push_str("  No query_type field found.\n");
    } else {
        for (query_type, count) in query_types {
            section.push_str(&format!("  {}: {}\n", query_type, count));
        }
    }

    if report.missing_query_type > 0 {
        section.push_str(&format!(
            "  Samples missing query_type: {}\n",
            report.missing_query_type
        ));
    }

    section
}

/// Generate the per-rung query_type breakdown.
fn generate_joint_section(report: &AggregateReport) -> String {
    let mut section = String::new();

    section.push_str("3) query_type distribution within each rung\n");

    let joint = report.joint_sorted();
    if joint.is_empty() {
        section.push_str("  No (rung, query_type) joint distribution available.\n");
        return section;
    }

    for (rung, query_types) in joint {
        section.push_str(&format!("  rung = {}:\n", rung));
        for (query_type, count) in query_types {
            section.push_str(&format!("    {}: {}\n", query_type, count));
        }
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate_lines;

    fn create_test_report() -> AggregateReport {
        aggregate_lines([
            r#"{"rung":2,"query_type":"nde"}"#,
            r#"{"rung":1,"query_type":"marginal"}"#,
            r#"{"rung":1,"query_type":"ate"}"#,
            r#"{"rung":1,"query_type":"ate"}"#,
            r#"{"rung":10,"query_type":"backadj"}"#,
        ])
    }

    #[test]
    fn test_render_sections_in_order() {
        let text = render(&create_test_report());

        let header = text.find("=== cladder").unwrap();
        let rungs = text.find("1) rung distribution").unwrap();
        let query_types = text.find("2) query_type distribution\n").unwrap();
        let joint = text.find("3) query_type distribution within each rung").unwrap();

        assert!(header < rungs && rungs < query_types && query_types < joint);
        assert!(text.contains("Total samples: 5\n"));
    }

    #[test]
    fn test_rung_section_sorted_numerically() {
        let section = generate_rung_section(&create_test_report());

        assert_eq!(
            section,
            "1) rung distribution (causal ladder tier)\n\
             \x20 rung = 1: 3\n\
             \x20 rung = 2: 1\n\
             \x20 rung = 10: 1\n"
        );
    }

    #[test]
    fn test_query_type_section_sorted_lexicographically() {
        let section = generate_query_type_section(&create_test_report());

        let lines: Vec<&str> = section.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec!["  ate: 2", "  backadj: 1", "  marginal: 1", "  nde: 1"]
        );
    }

    #[test]
    fn test_joint_section() {
        let section = generate_joint_section(&create_test_report());

        assert_eq!(
            section,
            "3) query_type distribution within each rung\n\
             \x20 rung = 1:\n\
             \x20   ate: 2\n\
             \x20   marginal: 1\n\
             \x20 rung = 2:\n\
             \x20   nde: 1\n\
             \x20 rung = 10:\n\
             \x20   backadj: 1\n"
        );
    }

    #[test]
    fn test_empty_report_prints_notices() {
        let text = render(&AggregateReport::default());

        assert!(text.contains("Total samples: 0\n"));
        assert!(text.contains("  No rung field found.\n"));
        assert!(text.contains("  No query_type field found.\n"));
        assert!(text.contains("  No (rung, query_type) joint distribution available.\n"));
        assert!(!text.contains("missing"));
    }

    #[test]
    fn test_missing_counts_are_reported() {
        let report = aggregate_lines([r#"{"query_type":"ett"}"#, r#"{"rung":3}"#, "oops"]);
        let text = render(&report);

        assert!(text.starts_with(
            "=== cladder causal ladder statistics (data_full_v1.5_default.jsonl) ===\n\
             Total samples: 3\n\n1) rung distribution"
        ));
        assert!(text.contains("  rung = 3: 1\n  Samples missing rung: 1\n"));
        assert!(text.contains("  ett: 1\n  Samples missing query_type: 1\n"));
        assert!(text.contains("  No (rung, query_type) joint distribution available.\n"));
    }
}
