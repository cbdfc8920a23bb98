use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Filter value that matches every path or method.
pub const MATCH_ALL: &str = "*";

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swaggered.yaml";

/// Path and method filter applied before operations are extracted.
///
/// `None` and `"*"` both match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Filter {
    pub api: Option<String>,
    pub method: Option<String>,
}

impl Filter {
    pub fn new(api: Option<&str>, method: Option<&str>) -> Self {
        Self {
            api: api.map(String::from),
            method: method.map(String::from),
        }
    }

    /// The api pattern, unless it is absent or the wildcard.
    pub fn api_pattern(&self) -> Option<&str> {
        active_pattern(self.api.as_deref())
    }

    /// The method pattern, unless it is absent or the wildcard.
    pub fn method_pattern(&self) -> Option<&str> {
        active_pattern(self.method.as_deref())
    }

    pub fn matches_all(&self) -> bool {
        self.api_pattern().is_none() && self.method_pattern().is_none()
    }
}

fn active_pattern(value: Option<&str>) -> Option<&str> {
    value.filter(|v| *v != MATCH_ALL)
}

/// Options threaded through one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub filter: Filter,
    /// Prefix prepended to every declared type name.
    pub interface_prefix: String,
    /// Keep `export` on emitted functions and type declarations.
    pub export: bool,
    /// Skip rendering function bodies.
    pub types_only: bool,
    /// Emit `interface` declarations instead of `type` aliases.
    pub use_interface: bool,
    /// Annotate functions with an explicit `Promise<...>` return type.
    pub return_type: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            interface_prefix: "I".to_string(),
            export: false,
            types_only: false,
            use_interface: false,
            return_type: true,
        }
    }
}

/// Top-level project configuration loaded from `.swaggered.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwaggeredConfig {
    /// Path or URL of the document.
    pub input: Option<String>,
    pub api: Option<String>,
    pub method: Option<String>,
    pub interface_prefix: String,
    pub output: OutputConfig,
}

impl Default for SwaggeredConfig {
    fn default() -> Self {
        Self {
            input: None,
            api: None,
            method: None,
            interface_prefix: "I".to_string(),
            output: OutputConfig::default(),
        }
    }
}

impl SwaggeredConfig {
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            filter: Filter {
                api: self.api.clone(),
                method: self.method.clone(),
            },
            interface_prefix: self.interface_prefix.clone(),
            export: self.output.export,
            types_only: self.output.types_only,
            use_interface: self.output.use_interface,
            return_type: self.output.return_type,
        }
    }
}

/// How the generated source is shaped and printed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub grouped: bool,
    pub use_interface: bool,
    pub return_type: bool,
    /// Print the `request` helper before the functions.
    pub request: bool,
    pub types_only: bool,
    pub functions_only: bool,
    pub export: bool,
    /// Text printed verbatim before everything else.
    pub header: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            grouped: true,
            use_interface: false,
            return_type: true,
            request: false,
            types_only: false,
            functions_only: false,
            export: false,
            header: None,
        }
    }
}

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwaggeredConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SwaggeredConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swaggered configuration
# input: path/to/openapi.json   # file path or http(s) URL
api: "*"                        # regex matched against path keys
method: "*"                     # http method name or regex, e.g. "put|post"
interface_prefix: I

output:
  grouped: true                 # cluster functions into `<name>Service` objects by tag
  use_interface: false          # `interface X {}` instead of `type X = {}`
  return_type: true             # add `: Promise<...>` to every function
  request: false                # print the `request` helper first
  types_only: false
  functions_only: false
  export: false                 # keep `export` on functions and types
  # header: "import request from './request';"
"#
}
