use std::fmt;

use colored::Colorize;

use forecast_core::{SyncReport, WriteFailure};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[+]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Section => ("", ""),
    }
}

/// Formats a message without color.
pub fn plain(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => {
            let (label, icon) = build_label(kind);
            format!("{label}: {icon} {text}")
        }
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let formatted = plain(kind, message);
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        MessageKind::Error => eprintln!("{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Summary lines for a finished run, in display order.
pub fn report_lines(report: &SyncReport) -> Vec<(MessageKind, String)> {
    let mut lines = Vec::new();
    let prefix = if report.dry_run { "Planned" } else { "Applied" };

    lines.push((
        MessageKind::Info,
        format!("Horizon {} to {}", report.window.start, report.window.end),
    ));
    if report.dry_run {
        for occurrence in &report.plan.create {
            lines.push((
                MessageKind::Info,
                format!(
                    "create {} {} {}",
                    occurrence.date,
                    format_milliunits(occurrence.amount),
                    occurrence.label
                ),
            ));
        }
        for entry in &report.plan.delete {
            lines.push((
                MessageKind::Info,
                format!(
                    "delete {} {} {}",
                    entry.date,
                    format_milliunits(entry.amount),
                    entry.label
                ),
            ));
        }
        for transaction in &report.history {
            lines.push((
                MessageKind::Info,
                format!(
                    "delete history {} {}",
                    transaction.date,
                    transaction.memo.as_deref().unwrap_or("")
                ),
            ));
        }
    }

    let kind = if report.failures.is_empty() {
        MessageKind::Success
    } else {
        MessageKind::Warning
    };
    lines.push((
        kind,
        format!(
            "{prefix}: {} created, {} deleted, {} history entries deleted, {} unchanged",
            report.created, report.deleted, report.history_deleted, report.plan.unchanged
        ),
    ));

    if report.skipped_masters() > 0 {
        let skipped = report.skipped;
        lines.push((
            MessageKind::Warning,
            format!(
                "{} recurring transactions skipped \
                 ({} split, {} without memo, {} unknown frequency)",
                report.skipped_masters(),
                skipped.split,
                skipped.empty_memo,
                skipped.unknown_frequency
            ),
        ));
    }
    for failure in &report.failures {
        lines.push((MessageKind::Error, describe_failure(failure)));
    }
    lines
}

pub fn print_report(report: &SyncReport) {
    section(if report.dry_run {
        "Forecast sync (dry run)"
    } else {
        "Forecast sync"
    });
    for (kind, line) in report_lines(report) {
        print(kind, line);
    }
}

fn describe_failure(failure: &WriteFailure) -> String {
    let suffix = if failure.rate_limited {
        " (rate limited, retried next run)"
    } else {
        ""
    };
    format!(
        "{} {} {} failed: {}{suffix}",
        failure.operation, failure.date, failure.label, failure.message
    )
}

/// Renders signed milliunits as a decimal amount, e.g. `-50000` as `-50.00`.
pub fn format_milliunits(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let units = abs / 1000;
    let cents = (abs % 1000 + 5) / 10;
    let (units, cents) = if cents == 100 { (units + 1, 0) } else { (units, cents) };
    format!("{sign}{units}.{cents:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milliunits_render_with_two_decimals() {
        assert_eq!(format_milliunits(-50_000), "-50.00");
        assert_eq!(format_milliunits(1_234_560), "1234.56");
        assert_eq!(format_milliunits(999), "1.00");
        assert_eq!(format_milliunits(0), "0.00");
    }

    #[test]
    fn plain_messages_carry_labels() {
        assert_eq!(plain(MessageKind::Warning, "careful"), "WARNING: [!] careful");
        assert_eq!(plain(MessageKind::Section, " Title "), "=== Title ===");
    }
}
