//! Command-line interface.
//!
//! Every conversion flag can also be set through a `PROTOGQL_*` environment
//! variable.

use anyhow::{Context as _, Result};
use clap::Parser;
use protogql_codegen::{ConvertOptions, DEFAULT_INPUT_SUFFIX};
use protogql_schema::DeclarationTree;
use regex::RegexSet;
use std::io::Write;
use std::path::PathBuf;

/// Convert protobuf declarations into a GraphQL SDL schema.
#[derive(Parser, Debug, Clone)]
#[command(name = "protogql", version, about)]
pub struct Cli {
    /// Input .proto file (repeatable)
    #[arg(
        short,
        long = "input",
        value_name = "FILE",
        required_unless_present = "descriptor_set"
    )]
    pub inputs: Vec<PathBuf>,

    /// Serialized FileDescriptorSet to read instead of .proto files
    #[arg(long, value_name = "FILE", conflicts_with = "inputs")]
    pub descriptor_set: Option<PathBuf>,

    /// Output .graphql file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Include directory searched for imports (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub includes: Vec<PathBuf>,

    /// Emit an input type for every output type
    #[arg(long, env = "PROTOGQL_INPUT_TYPES")]
    pub input_types: bool,

    /// Suffix appended to input type names
    #[arg(long, env = "PROTOGQL_INPUT_SUFFIX", default_value = DEFAULT_INPUT_SUFFIX)]
    pub input_suffix: String,

    /// Omit output types whose qualified name matches (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub skip_type: Vec<String>,

    /// Omit input types whose qualified name matches (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub skip_input: Vec<String>,

    /// Prefix removed from displayed type names, e.g. `acme_shop_`
    #[arg(long, env = "PROTOGQL_STRIP_PREFIX", value_name = "PREFIX")]
    pub strip_prefix: Option<String>,
}

impl Cli {
    /// Builds conversion options from the parsed flags.
    ///
    /// # Errors
    /// Returns an error if a skip pattern is not a valid regex.
    pub fn options(&self) -> Result<ConvertOptions> {
        let mut options = ConvertOptions::new()
            .generate_input_types(self.input_types)
            .input_type_name_suffix(self.input_suffix.clone());

        if !self.skip_type.is_empty() {
            let set = RegexSet::new(&self.skip_type).context("invalid --skip-type pattern")?;
            options = options.skip_type(move |key| set.is_match(key));
        }
        if !self.skip_input.is_empty() {
            let set = RegexSet::new(&self.skip_input).context("invalid --skip-input pattern")?;
            options = options.skip_input(move |key| set.is_match(key));
        }
        if let Some(prefix) = self.strip_prefix.clone() {
            options = options
                .transform_type_name(move |key| key.strip_prefix(&prefix).unwrap_or(key).to_string());
        }
        Ok(options)
    }

    /// Loads the declaration tree from the descriptor set or the input files.
    ///
    /// # Errors
    /// Returns an error if reading or compiling the inputs fails.
    pub fn load(&self) -> Result<DeclarationTree> {
        if let Some(path) = &self.descriptor_set {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return protogql_schema::load_descriptor_set(&bytes)
                .with_context(|| format!("failed to decode {}", path.display()));
        }
        protogql_schema::load_files(&self.inputs, &self.includes)
            .context("failed to load protobuf declarations")
    }
}

/// Runs one conversion and writes the schema to the output file or stdout.
///
/// # Errors
/// Returns an error if loading, conversion, or writing fails.
pub fn run(cli: &Cli) -> Result<()> {
    let options = cli.options()?;
    let tree = cli.load()?;
    tracing::debug!("Loaded {} declarations", tree.len() - 1);

    let sdl = protogql_codegen::convert_to_sdl(&tree, &options).context("conversion failed")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &sdl)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote schema to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(sdl.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
