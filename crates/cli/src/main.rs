use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clinscore_core::audit::{
    AuditContext, AuditSink, JsonLinesAuditSink, NoopAuditSink, TracingAuditSink,
};
use clinscore_core::config::{
    bool_from_env_value, option_policy_from_env_value, policy_version_from_env_value,
};
use clinscore_core::input::{self, InputFormat};
use clinscore_core::{CalcResult, EngineConfig, OptionPolicy, ScoringEngine};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const AUDIT_ENABLED_VAR: &str = "CLINSCORE_AUDIT_ENABLED";
const POLICY_VERSION_VAR: &str = "CLINSCORE_POLICY_VERSION";
const STRICT_OPTIONS_VAR: &str = "CLINSCORE_STRICT_OPTIONS";
const AUDIT_LOG_VAR: &str = "CLINSCORE_AUDIT_LOG";

#[derive(Parser)]
#[command(name = "clinscore")]
#[command(about = "Clinical risk and classification scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Framingham 10-year cardiovascular risk
    Framingham(RunArgs),
    /// CHA2DS2-VASc stroke risk in atrial fibrillation
    #[command(name = "cha2ds2-vasc")]
    Cha2ds2Vasc(RunArgs),
    /// HAS-BLED bleeding risk on anticoagulation
    HasBled(RunArgs),
    /// Heart-rate corrected QT interval
    Qtc(RunArgs),
    /// Cardiac output and cardiac index
    CardiacOutput(RunArgs),
    /// Body mass index and ideal body weight
    Bmi(RunArgs),
    /// Body surface area (Mosteller)
    Bsa(RunArgs),
    /// BMI and BSA together
    BodyMetrics(RunArgs),
    /// Five-parameter vital signs assessment
    Vitals(RunArgs),
    /// List available calculators
    List,
}

#[derive(Args)]
struct RunArgs {
    /// Input document path, or `-` for stdin
    #[arg(long, default_value = "-")]
    input: String,
    /// Input format (defaults to the file extension, then JSON)
    #[arg(long, value_enum)]
    format: Option<Format>,
    /// Reject unrecognised option values instead of falling back to defaults
    #[arg(long)]
    strict: bool,
    /// Append audit records to this JSON Lines file
    #[arg(long)]
    audit_log: Option<PathBuf>,
    /// Do not write audit records
    #[arg(long)]
    no_audit: bool,
    #[arg(long)]
    hospital_id: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    patient_id: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

const CALCULATORS: [(&str, &str); 9] = [
    ("framingham", "Framingham 10-year cardiovascular risk"),
    ("cha2ds2-vasc", "CHA2DS2-VASc stroke risk in atrial fibrillation"),
    ("has-bled", "HAS-BLED bleeding risk on anticoagulation"),
    ("qtc", "Heart-rate corrected QT interval (Bazett, Fridericia)"),
    ("cardiac-output", "Cardiac output and cardiac index"),
    ("bmi", "Body mass index and ideal body weight"),
    ("bsa", "Body surface area (Mosteller)"),
    ("body-metrics", "BMI and BSA together"),
    ("vitals", "Five-parameter vital signs assessment"),
];

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolve engine configuration once, from the environment and command-line flags.
fn resolve_config(args: &RunArgs) -> anyhow::Result<EngineConfig> {
    let audit_enabled = !args.no_audit
        && bool_from_env_value(AUDIT_ENABLED_VAR, env_value(AUDIT_ENABLED_VAR), true)?;
    let policy_version = policy_version_from_env_value(env_value(POLICY_VERSION_VAR));
    let option_policy = if args.strict {
        OptionPolicy::Strict
    } else {
        option_policy_from_env_value(STRICT_OPTIONS_VAR, env_value(STRICT_OPTIONS_VAR))?
    };

    let config = EngineConfig::new(audit_enabled, policy_version, option_policy)?;
    tracing::debug!(
        audit_enabled = config.audit_enabled(),
        policy_version = config.policy_version(),
        option_policy = ?config.option_policy(),
        "resolved engine config"
    );
    Ok(config)
}

fn audit_log_path(args: &RunArgs) -> Option<PathBuf> {
    args.audit_log.clone().or_else(|| {
        env_value(AUDIT_LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
}

/// Pick the audit sink. With auditing disabled no log file is opened or created.
fn audit_sink(
    config: &EngineConfig,
    path: Option<PathBuf>,
) -> anyhow::Result<Arc<dyn AuditSink>> {
    if !config.audit_enabled() {
        return Ok(Arc::new(NoopAuditSink));
    }

    match path {
        Some(path) => {
            let sink = JsonLinesAuditSink::open(&path)
                .with_context(|| format!("failed to open audit log {}", path.display()))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(TracingAuditSink)),
    }
}

fn input_format(args: &RunArgs) -> InputFormat {
    match args.format {
        Some(Format::Json) => InputFormat::Json,
        Some(Format::Yaml) => InputFormat::Yaml,
        None => match Path::new(&args.input).extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        },
    }
}

fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read input from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read input file {path}"))
}

/// Parse the input document, run one calculation through the engine and print the result.
fn run<T, R>(
    args: &RunArgs,
    calculate: impl FnOnce(&ScoringEngine, &T, &AuditContext) -> CalcResult<R>,
) -> anyhow::Result<()>
where
    T: DeserializeOwned,
    R: Serialize,
{
    let config = resolve_config(args)?;
    let sink = audit_sink(&config, audit_log_path(args))?;
    let engine = ScoringEngine::new(config, sink);

    let text = read_input(&args.input)?;
    let mut document = input::parse_document(&text, input_format(args))?;
    let from_document = input::split_audit_context(&mut document);
    let context = AuditContext::new(
        args.hospital_id.clone().or(from_document.hospital_id),
        args.user_id.clone().or(from_document.user_id),
        args.patient_id.clone().or(from_document.patient_id),
    );
    let parsed: T = input::from_json_value(document)?;

    let result = calculate(&engine, &parsed, &context)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinscore=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Framingham(args) => run(&args, ScoringEngine::framingham),
        Commands::Cha2ds2Vasc(args) => run(&args, ScoringEngine::cha2ds2_vasc),
        Commands::HasBled(args) => run(&args, ScoringEngine::has_bled),
        Commands::Qtc(args) => run(&args, ScoringEngine::qtc),
        Commands::CardiacOutput(args) => run(&args, ScoringEngine::cardiac_output),
        Commands::Bmi(args) => run(&args, ScoringEngine::bmi),
        Commands::Bsa(args) => run(&args, ScoringEngine::bsa),
        Commands::BodyMetrics(args) => run(&args, ScoringEngine::body_metrics),
        Commands::Vitals(args) => run(&args, ScoringEngine::vital_signs),
        Commands::List => {
            for (name, description) in CALCULATORS {
                println!("{name:<16}{description}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinscore_core::audit::{AuditAction, AuditRecord};
    use serde_json::json;
    use tempfile::TempDir;

    fn config(audit_enabled: bool) -> EngineConfig {
        EngineConfig::new(audit_enabled, "1.0.0".into(), OptionPolicy::Lenient).expect("config")
    }

    fn sample() -> AuditRecord {
        AuditRecord::new(
            AuditAction::HasBled,
            &AuditContext::default(),
            json!({ "score": 1 }),
            "1.0.0",
        )
    }

    fn run_args(no_audit: bool, strict: bool) -> RunArgs {
        RunArgs {
            input: "-".into(),
            format: None,
            strict,
            audit_log: None,
            no_audit,
            hospital_id: None,
            user_id: None,
            patient_id: None,
        }
    }

    #[test]
    fn flags_override_environment_in_resolved_config() {
        let config = resolve_config(&run_args(true, true)).expect("config");
        assert!(!config.audit_enabled());
        assert_eq!(config.option_policy(), OptionPolicy::Strict);
        assert!(!config.policy_version().is_empty());
    }

    #[test]
    fn disabled_audit_does_not_create_log_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("audit.jsonl");

        let sink = audit_sink(&config(false), Some(path.clone())).expect("noop sink");
        sink.record(sample()).expect("noop record");
        assert!(!path.exists());
    }

    #[test]
    fn disabled_audit_ignores_unopenable_log_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("missing").join("audit.jsonl");
        assert!(audit_sink(&config(false), Some(path)).is_ok());
    }

    #[test]
    fn enabled_audit_writes_to_log_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("audit.jsonl");

        let sink = audit_sink(&config(true), Some(path.clone())).expect("file sink");
        sink.record(sample()).expect("record");
        let contents = std::fs::read_to_string(&path).expect("read audit log");
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn enabled_audit_reports_unopenable_log_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("missing").join("audit.jsonl");
        let err = audit_sink(&config(true), Some(path)).err().expect("open fails");
        assert!(err.to_string().contains("failed to open audit log"));
    }
}
