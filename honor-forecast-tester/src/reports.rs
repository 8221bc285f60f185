use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use crate::runner::ScenarioResult;

fn success_rate(results: &[ScenarioResult]) -> f64 {
    let total = u32::try_from(results.len()).unwrap_or(u32::MAX);
    if total == 0 {
        return 0.0;
    }
    let passed = u32::try_from(results.iter().filter(|r| r.passed).count()).unwrap_or(0);
    f64::from(passed) / f64::from(total) * 100.0
}

fn rate_label(result: &ScenarioResult) -> String {
    result
        .games_per_day
        .map_or_else(|| "-".to_string(), |rate| format!("{rate:.1}"))
}

fn goal_label(result: &ScenarioResult) -> String {
    result
        .goal_day
        .map_or_else(|| "-".to_string(), |day| day.to_string())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Forecast Scenario Results".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} {}", status, result.scenario_name.bold())?;
        writeln!(
            out,
            "   Games/day: {}  Goal day: {}  Days: {}",
            rate_label(result),
            goal_label(result),
            result.days
        )?;
        writeln!(out, "   Time: {:?}", result.duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Honor Forecast Scenario Results\n")?;
    writeln!(out, "_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(out, "| Scenario | Status | Games/day | Goal day | Days |")?;
    writeln!(out, "|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {} | {status} | {} | {} | {} |",
            result.scenario_name,
            rate_label(result),
            goal_label(result),
            result.days
        )?;
    }

    let failing: Vec<&ScenarioResult> = results.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failing {
            writeln!(out, "### {}\n", result.scenario_name)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(
        out,
        "scenario,passed,games_per_day,goal_day,days,duration_ms,failures"
    )?;
    for result in results {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_field(&result.scenario_name),
            result.passed,
            result
                .games_per_day
                .map_or_else(String::new, |rate| rate.to_string()),
            result
                .goal_day
                .map_or_else(String::new, |day| day.to_string()),
            result.days,
            result.duration.as_millis(),
            csv_field(&result.failures.join("; "))
        )?;
    }
    Ok(())
}
