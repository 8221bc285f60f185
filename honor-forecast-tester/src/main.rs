mod checks;
mod reports;
mod runner;
mod scenarios;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use runner::{ScenarioResult, ScenarioRunner};
use scenarios::{ForecastScenario, get_scenario, list_scenarios, scenario_keys};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "honor-forecast-tester", version = "0.1.0")]
#[command(about = "Automated QA for the honor forecast engine - scenario runs and invariant checks")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Extra scenario documents ({"config": ..., "entries": [...]}) to run
    #[arg(long = "config")]
    configs: Vec<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = resolve_scenarios(&args)?;
    let mut runner = ScenarioRunner::new(args.verbose);
    let results = runner.run_all(&scenarios);
    log::debug!(
        "forecast cache: {} hits, {} misses",
        runner.cache().hits(),
        runner.cache().misses()
    );

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:15} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "📈 Honor Forecast Tester".bright_cyan().bold());
    println!("{}", "========================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.contains(&"all".to_string()) {
        scenarios.retain(|s| s != "all");
        for key in scenario_keys() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

fn resolve_scenarios(args: &Args) -> Result<Vec<ForecastScenario>> {
    let mut resolved = Vec::new();
    for name in expand_scenarios(&args.scenarios) {
        if let Some(scenario) = get_scenario(&name) {
            resolved.push(scenario);
        } else {
            eprintln!("⚠️  Unknown scenario: {}", name.yellow());
        }
    }
    for path in &args.configs {
        resolved.push(ForecastScenario::from_file(path)?);
    }
    Ok(resolved)
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Honor Forecast Scenario Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        "csv" => reports::generate_csv_report(&mut output_target, results)?,
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
                let duration = start_time.elapsed();
                writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            scenarios: "default".to_string(),
            list_scenarios: false,
            configs: Vec::new(),
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn sample_result() -> ScenarioResult {
        ScenarioResult {
            scenario_name: "default".to_string(),
            passed: true,
            failures: Vec::new(),
            games_per_day: Some(4.2),
            goal_day: Some(28),
            days: 28,
            duration: Duration::from_millis(2),
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("honor-forecast-{name}"))
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let expanded = expand_scenarios("manual,all");
        assert_eq!(expanded[0], "manual");
        assert_eq!(expanded.len(), scenario_keys().len());
        assert!(expanded.contains(&"unreachable".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        let expanded = expand_scenarios("per-lane,default");
        assert_eq!(expanded, vec!["per-lane".to_string(), "default".to_string()]);
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        let args = Args {
            scenarios: "default,nope".to_string(),
            ..base_args()
        };
        let resolved = resolve_scenarios(&args).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args {
            configs: vec![temp_file("does-not-exist.json")],
            ..base_args()
        };
        assert!(resolve_scenarios(&args).is_err());
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_file("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("per-lane"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_json_for_results() {
        let temp = temp_file("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result()], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("scenario_name"));
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_file("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_console_includes_total_time() {
        let temp = temp_file("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result()], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Total time"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
