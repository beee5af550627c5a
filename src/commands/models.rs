use crate::parser::RailType;
use std::collections::HashMap;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Trace file to analyse (Chrome trace-event JSON)
    pub trace_path: PathBuf,

    /// Output path for the JSON report (stdout when absent)
    pub output_json: Option<PathBuf>,

    /// Fail when extensions ran during capture
    pub strict: bool,

    /// Explicit title -> RAIL type bindings
    pub types: HashMap<String, RailType>,

    /// Print a text summary
    pub print_summary: bool,
}

/// Parse a `title=Type` binding from the command line
///
/// The title may itself contain `=`; the last one separates the type.
pub fn parse_type_binding(binding: &str) -> Result<(String, RailType), String> {
    let (title, rail_type) = binding
        .rsplit_once('=')
        .ok_or_else(|| format!("Expected TITLE=TYPE, got '{}'", binding))?;

    let title = title.trim();
    if title.is_empty() {
        return Err(format!("Missing range title in '{}'", binding));
    }

    Ok((title.to_string(), rail_type.parse()?))
}
