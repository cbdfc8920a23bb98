use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use swaggered_core::config::{self, CONFIG_FILE_NAME, Filter, GenerateOptions, SwaggeredConfig};
use swaggered_core::ir::IrSpec;
use swaggered_core::{CodeGenerator, parse, transform};
use swaggered_typescript::{PrintOptions, TypeScriptGenerator, render_output};

#[derive(Parser)]
#[command(
    name = "swaggered",
    about = "Generate TypeScript request functions and types from Swagger 2.0 / OpenAPI 3.x",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(flatten)]
    generate: GenerateArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the operations extracted from a document
    Inspect {
        /// Path or http(s) URL of the document
        #[arg(short, long)]
        input: String,

        /// Regex matched against path keys
        #[arg(short, long)]
        api: Option<String>,

        /// HTTP method name or regex
        #[arg(short, long)]
        method: Option<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a default .swaggered.yaml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

/// Generation flags. Each boolean has a `--no-` twin; the last one given
/// wins, and an absent pair falls back to the config file.
#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Path or http(s) URL of the document
    #[arg(short, long)]
    input: Option<String>,

    /// Regex matched against path keys, `*` for all
    #[arg(short, long)]
    api: Option<String>,

    /// HTTP method name or regex such as `put|post`, `*` for all
    #[arg(short, long)]
    method: Option<String>,

    /// Debug logging
    #[arg(short, long, visible_alias = "verbose", overrides_with = "no_debug")]
    debug: bool,
    #[arg(long, overrides_with = "debug")]
    no_debug: bool,

    /// Print only the type declarations
    #[arg(short, long, overrides_with = "no_types_only")]
    types_only: bool,
    #[arg(long, overrides_with = "types_only")]
    no_types_only: bool,

    /// Print only the functions
    #[arg(short, long, overrides_with = "no_functions_only")]
    functions_only: bool,
    #[arg(long, overrides_with = "functions_only")]
    no_functions_only: bool,

    /// Cluster functions into `<name>Service` objects
    #[arg(short, long, overrides_with = "no_grouped")]
    grouped: bool,
    #[arg(long, overrides_with = "grouped")]
    no_grouped: bool,

    /// Declare object types with `interface`
    #[arg(long, overrides_with = "no_use_interface")]
    use_interface: bool,
    #[arg(long, overrides_with = "use_interface")]
    no_use_interface: bool,

    /// Annotate functions with `: Promise<...>`
    #[arg(short, long, overrides_with = "no_return_type")]
    return_type: bool,
    #[arg(long, overrides_with = "return_type")]
    no_return_type: bool,

    /// Print the `request` helper first
    #[arg(long, overrides_with = "no_request")]
    request: bool,
    #[arg(long, overrides_with = "request")]
    no_request: bool,

    /// Keep `export` on functions and types
    #[arg(long, overrides_with = "no_export")]
    export: bool,
    #[arg(long, overrides_with = "export")]
    no_export: bool,

    /// Prefix of declared type names
    #[arg(short, long)]
    prefix: Option<String>,

    /// Text printed before the generated code
    #[arg(short = 'H', long)]
    header: Option<String>,
}

/// Everything a generation run needs, flags merged over config.
#[derive(Debug)]
struct Settings {
    input: String,
    generate: GenerateOptions,
    print: PrintOptions,
}

/// `Some(true)` for `--x`, `Some(false)` for `--no-x`, `None` when neither
/// was given.
fn resolve_flag(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl GenerateArgs {
    fn debug_enabled(&self) -> bool {
        resolve_flag(self.debug, self.no_debug).unwrap_or(false)
    }

    fn resolve(&self, cfg: SwaggeredConfig) -> Result<Settings> {
        let out = &cfg.output;
        let input = self.input.clone().or_else(|| cfg.input.clone()).with_context(|| {
            format!("no input document: pass -i <path|url> or set `input` in {CONFIG_FILE_NAME}")
        })?;

        let types_only = resolve_flag(self.types_only, self.no_types_only).unwrap_or(out.types_only);
        let return_type =
            resolve_flag(self.return_type, self.no_return_type).unwrap_or(out.return_type);

        let generate = GenerateOptions {
            filter: Filter {
                api: self.api.clone().or_else(|| cfg.api.clone()),
                method: self.method.clone().or_else(|| cfg.method.clone()),
            },
            interface_prefix: self
                .prefix
                .clone()
                .unwrap_or_else(|| cfg.interface_prefix.clone()),
            export: resolve_flag(self.export, self.no_export).unwrap_or(out.export),
            types_only,
            use_interface: resolve_flag(self.use_interface, self.no_use_interface)
                .unwrap_or(out.use_interface),
            return_type,
        };
        let print = PrintOptions {
            header: self.header.clone().or_else(|| out.header.clone()),
            request: resolve_flag(self.request, self.no_request).unwrap_or(out.request),
            grouped: resolve_flag(self.grouped, self.no_grouped).unwrap_or(out.grouped),
            return_type,
            types_only,
            functions_only: resolve_flag(self.functions_only, self.no_functions_only)
                .unwrap_or(out.functions_only),
        };

        Ok(Settings {
            input,
            generate,
            print,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.generate.debug_enabled());

    match cli.command {
        None => cmd_generate(&cli.generate).await,

        Some(Commands::Inspect {
            input,
            api,
            method,
            format,
        }) => cmd_inspect(&input, Filter { api, method }, format).await,

        Some(Commands::Init { force }) => cmd_init(force),

        Some(Commands::Completions { shell }) => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swaggered", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise `debug` with `--debug`, `warn` without.
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SwaggeredConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read a document from a file or URL into a JSON tree.
///
/// Files ending in `.yaml`/`.yml` are YAML, other files JSON. Fetched
/// documents are tried as JSON, then YAML.
async fn load_document(input: &str) -> Result<serde_json::Value> {
    if is_url(input) {
        log::debug!("fetching {input}");
        let body = reqwest::get(input)
            .await
            .with_context(|| format!("failed to fetch {input}"))?
            .error_for_status()
            .with_context(|| format!("{input} returned an error status"))?
            .text()
            .await
            .with_context(|| format!("failed to read the body of {input}"))?;
        return Ok(parse::from_str(&body)?);
    }

    let path = Path::new(input);
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let parsed = match ext {
        "yaml" | "yml" => parse::from_yaml(&content)?,
        _ => parse::from_json(&content)?,
    };
    Ok(parsed)
}

async fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let settings = args.resolve(cfg)?;
    log::debug!("settings: {settings:?}");

    let raw = load_document(&settings.input).await?;
    let ir = transform::transform(&raw, &settings.generate.filter)?;
    let result = TypeScriptGenerator.generate(&ir, &settings.generate)?;

    print!("{}", render_output(&result, &settings.print)?);
    eprintln!("{} / {} API generated.", result.list.len(), result.total);
    Ok(())
}

async fn cmd_inspect(input: &str, filter: Filter, format: InspectFormat) -> Result<()> {
    let raw = load_document(input).await?;
    let ir = transform::transform(&raw, &filter)?;
    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "name": op.name,
                "method": op.method.as_str(),
                "path": op.path,
                "group": op.group,
                "description": op.description,
                "parameters": op.parameters.len(),
                "has_body": op.request_body.is_some() || op.body_parameter().is_some(),
                "deprecated": op.deprecated,
            })
        })
        .collect();

    serde_json::json!({
        "base_path": ir.base_path,
        "total": ir.total,
        "operations": operations,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
