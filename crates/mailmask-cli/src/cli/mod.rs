pub mod input;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mailmask_core::{
    demask_detailed, CategoryClassifier, MaskedEmail, MaskingPolicy, PatternRegistry, PiiType,
    Redactor, ResolvedEntity, TfidfLinearClassifier,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use input::InputArgs;

/// Mask, restore and classify PII in support emails
#[derive(Debug, Parser)]
#[command(name = "mailmask")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace PII with [tag] placeholders
    Mask(MaskArgs),

    /// Restore text from the JSON produced by `mask`
    Demask(DemaskArgs),

    /// Mask, classify and restore an email with a trained model
    Classify(ClassifyArgs),

    /// List the built-in PII patterns
    Patterns {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Which PII types to scan for
#[derive(Debug, Default, clap::Args)]
pub struct PolicyArgs {
    /// Only scan for these tags (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_pii_type)]
    pub only: Vec<PiiType>,

    /// Skip these tags (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_pii_type)]
    pub skip: Vec<PiiType>,
}

impl PolicyArgs {
    pub fn policy(&self) -> MaskingPolicy {
        let mut builder = if self.only.is_empty() {
            MaskingPolicy::builder()
        } else {
            mailmask_core::PolicyBuilder::only(self.only.iter().copied())
        };
        for pii_type in &self.skip {
            builder = builder.disable(*pii_type);
        }
        builder.build()
    }
}

fn parse_pii_type(tag: &str) -> Result<PiiType, String> {
    PiiType::from_tag(tag).ok_or_else(|| {
        let known: Vec<_> = PiiType::ALL.iter().map(|t| t.tag()).collect();
        format!("unknown tag '{tag}', expected one of: {}", known.join(", "))
    })
}

#[derive(Debug, clap::Args)]
pub struct MaskArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Print only the masked text instead of JSON
    #[arg(long)]
    pub plain: bool,
}

#[derive(Debug, clap::Args)]
pub struct DemaskArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fail if any entity could not be placed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, clap::Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path to the classifier artifact
    #[arg(long, env = "MAILMASK_MODEL_PATH", default_value = "model.json")]
    pub model: std::path::PathBuf,
}

/// Same shape as the HTTP service response
#[derive(Debug, Serialize)]
pub struct ClassifyOutput {
    pub input_email_body: String,
    pub list_of_masked_entities: Vec<ResolvedEntity>,
    pub masked_email: String,
    pub category_of_the_email: String,
}

#[derive(Debug, Serialize)]
struct PatternInfo<'a> {
    classification: &'static str,
    placeholder: &'static str,
    pattern: &'a str,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mask(args) => run_mask(args),
        Commands::Demask(args) => run_demask(args),
        Commands::Classify(args) => run_classify(args),
        Commands::Patterns { json } => run_patterns(json),
    }
}

fn run_mask(args: MaskArgs) -> Result<()> {
    let text = args.input.read()?;
    let redactor = Redactor::with_policy(args.policy.policy());
    let masked = redactor.mask(&text);
    tracing::debug!(entities = masked.entities.len(), "masked input");

    if args.plain {
        println!("{}", masked.masked_text);
    } else {
        println!("{}", serde_json::to_string_pretty(&masked)?);
    }
    Ok(())
}

fn run_demask(args: DemaskArgs) -> Result<()> {
    let raw = args.input.read()?;
    let restored = demask_json(&raw, args.strict)?;
    print!("{restored}");
    Ok(())
}

/// Restore text from `mask` JSON output
pub fn demask_json(raw: &str, strict: bool) -> Result<String> {
    let masked: MaskedEmail =
        serde_json::from_str(raw).context("input is not the JSON produced by `mask`")?;
    let restored = demask_detailed(&masked.masked_text, &masked.entities);
    if strict && restored.unresolved > 0 {
        anyhow::bail!(
            "{} of {} entities had no matching placeholder",
            restored.unresolved,
            masked.entities.len()
        );
    }
    Ok(restored.text)
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let classifier = TfidfLinearClassifier::load(&args.model)
        .with_context(|| format!("failed to load model {}", args.model.display()))?;
    let text = args.input.read()?;
    let output = classify(&Redactor::default(), &classifier, &text);
    tracing::debug!(category = %output.category_of_the_email, "classified input");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Mask, classify the masked text, then restore it
pub fn classify(
    redactor: &Redactor,
    classifier: &dyn CategoryClassifier,
    text: &str,
) -> ClassifyOutput {
    let masked = redactor.mask(text);
    let category = classifier.predict(&masked.masked_text);
    let restored = redactor.demask(&masked.masked_text, &masked.entities);
    ClassifyOutput {
        input_email_body: restored,
        list_of_masked_entities: masked.entities,
        masked_email: masked.masked_text,
        category_of_the_email: category,
    }
}

fn pattern_infos(registry: &PatternRegistry) -> Vec<PatternInfo<'_>> {
    registry
        .rules()
        .iter()
        .map(|rule| PatternInfo {
            classification: rule.pii_type.tag(),
            placeholder: rule.placeholder(),
            pattern: rule.pattern(),
        })
        .collect()
}

fn run_patterns(json: bool) -> Result<()> {
    let patterns = pattern_infos(PatternRegistry::shared());

    if json {
        println!("{}", serde_json::to_string_pretty(&patterns)?);
    } else {
        for p in &patterns {
            println!("{:<26} {:<28} {}", p.classification, p.placeholder, p.pattern);
        }
    }
    Ok(())
}
