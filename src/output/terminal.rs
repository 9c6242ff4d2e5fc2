//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{AutoWinnerResult, WinnerCandidate};

const BOX_WIDTH: usize = 62;

/// Format a winner candidate for human-readable terminal output.
///
/// Confirmed winners get a green checkmark; unconfirmed leaders a yellow
/// hourglass.
pub fn format_candidate(candidate: &WinnerCandidate) -> String {
    let mut output = String::new();

    let header = if candidate.meets_threshold {
        format!(
            "{} {}",
            "\u{2713}".green().bold(),
            format!("WINNER: {}", candidate.variant_name).green().bold()
        )
    } else {
        format!(
            "{} {}",
            "\u{29D6}".yellow().bold(),
            format!("LEADING: {}", candidate.variant_name).yellow().bold()
        )
    };

    output.push_str(&box_top());
    output.push_str(&box_line(&header));
    output.push_str(&box_separator());

    output.push_str(&box_line(&format!(
        "Conversion rate: {:.2}%",
        candidate.conversion_rate * 100.0
    )));
    output.push_str(&box_line(&format!(
        "{:.0}% CI: [{:.4}, {:.4}]",
        candidate.confidence_interval.level * 100.0,
        candidate.confidence_interval.lower,
        candidate.confidence_interval.upper
    )));

    let lift_pct = candidate.lift * 100.0;
    let lift_str = format!("Lift vs control: {lift_pct:+.1}%");
    let lift_colored = if candidate.lift > 0.0 {
        lift_str.green()
    } else {
        lift_str.red()
    };
    output.push_str(&box_line(&lift_colored.to_string()));

    if let Some(value) = candidate.total_value {
        output.push_str(&box_line(&format!("Total value: {value:.2}")));
    }

    output.push_str(&box_separator());
    output.push_str(&box_line(&candidate.reasoning));
    output.push_str(&box_bottom());

    output
}

/// Format an auto-winner batch summary.
pub fn format_batch_summary(result: &AutoWinnerResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Checked {} experiment(s): {} completed, {} still running\n",
        result.total_checked,
        result.winners_selected.to_string().green(),
        result.still_running.to_string().yellow()
    ));

    if !result.errors.is_empty() {
        output.push_str(&format!(
            "{} {} error(s):\n",
            "\u{26A0}".yellow().bold(),
            result.errors.len()
        ));
        for error in &result.errors {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "-".dimmed(),
                error.experiment_id.red(),
                error.error
            ));
        }
    }

    output
}

fn box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn box_line(content: &str) -> String {
    // ANSI escapes do not count toward visible width.
    let visible_len = strip_ansi_len(content);
    let padding = BOX_WIDTH.saturating_sub(visible_len + 2);
    format!("\u{2502} {content}{} \u{2502}\n", " ".repeat(padding))
}

/// Visible character count, skipping ANSI color escape sequences.
fn strip_ansi_len(s: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\u{1B}' {
            in_escape = true;
        } else {
            len += 1;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ConfidenceInterval, ExperimentError};

    fn make_candidate(meets_threshold: bool) -> WinnerCandidate {
        WinnerCandidate {
            variant_id: "b".into(),
            variant_name: "Variant B".into(),
            conversion_rate: 0.15,
            confidence_interval: ConfidenceInterval {
                lower: 0.129,
                upper: 0.173,
                level: 0.95,
            },
            lift: 0.5,
            total_value: Some(900.0),
            meets_threshold,
            reasoning: "intervals separated".into(),
        }
    }

    #[test]
    fn confirmed_winner_renders() {
        let out = format_candidate(&make_candidate(true));
        assert!(out.contains("WINNER: Variant B"));
        assert!(out.contains("15.00%"));
        assert!(out.contains("+50.0%"));
    }

    #[test]
    fn unconfirmed_leader_renders() {
        let out = format_candidate(&make_candidate(false));
        assert!(out.contains("LEADING: Variant B"));
    }

    #[test]
    fn batch_summary_lists_errors() {
        let result = AutoWinnerResult {
            total_checked: 2,
            winners_selected: 1,
            still_running: 0,
            errors: vec![ExperimentError {
                experiment_id: "exp-1".into(),
                error: "boom".into(),
            }],
        };
        let out = format_batch_summary(&result);
        assert!(out.contains("exp-1"));
        assert!(out.contains("boom"));
    }

    #[test]
    fn ansi_stripping_counts_visible_chars() {
        assert_eq!(strip_ansi_len("plain"), 5);
        assert_eq!(strip_ansi_len(&"plain".green().to_string()), 5);
    }
}
