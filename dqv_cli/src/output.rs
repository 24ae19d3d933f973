use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use dqv_core::{RuleDeclaration, Validated, ValidationLog};
use serde_json::json;

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_validation_log(log: &ValidationLog, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_log(log),
        OutputFormat::Text => {
            print_text_log(log);
            Ok(())
        }
    }
}

fn print_text_log(log: &ValidationLog) {
    println!("\n{}", "═".repeat(60));
    println!("{}", format!("  VALIDATION REPORT: {}", log.target_table).bold());
    println!("{}", "═".repeat(60));

    if log.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !log.outcomes.is_empty() {
        println!("\n{}", "Results:".bold());
        for (i, outcome) in log.outcomes.iter().enumerate() {
            let status = match outcome.validated {
                Validated::Passed => outcome.validated.to_string().green(),
                Validated::Failed => outcome.validated.to_string().red().bold(),
            };
            println!(
                "  {}. [{}] {} {} ({})",
                i + 1,
                status,
                outcome.rule.column_name.as_deref().unwrap_or("-"),
                outcome.rule.test_type,
                severity(&outcome.rule)
            );
            if let Some(detail) = &outcome.failure_detail {
                println!("     {}", detail.red());
            }
        }
    }

    if !log.diagnostics.is_empty() {
        println!("\n{}", "Skipped:".yellow().bold());
        for (i, diagnostic) in log.diagnostics.iter().enumerate() {
            println!(
                "  {}. {} {} [{}] {}",
                i + 1,
                diagnostic.rule.column_name.as_deref().unwrap_or("-"),
                diagnostic.rule.test_type,
                diagnostic.kind,
                diagnostic.message.yellow()
            );
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Total rules:    {}", log.len());
    println!("  Failed:         {}", log.failures().count());
    println!("  Skipped:        {}", log.diagnostics.len());
    println!("{}", "═".repeat(60));
}

fn print_json_log(log: &ValidationLog) -> Result<()> {
    let output = json!({
        "target_table": log.target_table,
        "passed": log.passed(),
        "results": log.rows(),
        "skipped": log.diagnostics.iter().map(|d| json!({
            "rule": d.rule.to_string(),
            "kind": d.kind.to_string(),
            "message": d.message,
        })).collect::<Vec<_>>(),
        "summary": {
            "total": log.len(),
            "failed": log.failures().count(),
            "skipped": log.diagnostics.len(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_rules(table: &str, rules: &[RuleDeclaration], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rules)?);
        }
        OutputFormat::Text => {
            println!("\nRules for {}:", table.bold());
            for (i, rule) in rules.iter().enumerate() {
                println!(
                    "  {}. {} {} {} ({})",
                    i + 1,
                    rule.column_name.as_deref().unwrap_or("-"),
                    rule.test_type.to_string().bold(),
                    rule.value_config,
                    severity(rule)
                );
            }
            println!("  Total: {}", rules.len());
        }
    }
    Ok(())
}

fn severity(rule: &RuleDeclaration) -> &str {
    if rule.severity.is_empty() {
        "no severity"
    } else {
        &rule.severity
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
