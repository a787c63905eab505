//! Shows the completion state of a preset.

use clap::Args;
use std::path::Path;

use crate::cli::common::{load_workspace, print_json, print_warnings, CliError, CliResult};
use crate::cli::form::FormInputArgs;
use crate::models::{Level, Typology};
use crate::services::{Completion, FormFilter, FormView};

/// Show completion and form sections of a preset
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(flatten)]
    input: FormInputArgs,

    /// Only list sections of this level (basic, advanced)
    #[arg(long, value_name = "LEVEL")]
    level: Option<String>,

    /// Only list sections of this typology (e.g. supply)
    #[arg(long, value_name = "TYPOLOGY")]
    typology: Option<String>,

    /// Include the per-key resolution trace
    #[arg(long)]
    debug: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl CompletionArgs {
    /// Execute completion command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let filter = self.filter()?;
        let workspace = load_workspace(data_root)?;

        let mut warnings = Vec::new();
        let (catalog, mut session) = self.input.build_session(&workspace, &mut warnings)?;

        let form = workspace
            .form(&catalog, &mut session, &self.input.preset, filter, self.debug)
            .map_err(|e| CliError::validation(format!("{e:#}")))?
            .collect_into(&mut warnings);
        print_warnings(&warnings);

        if self.json {
            print_json(&form)
        } else {
            print_form(&form);
            Ok(())
        }
    }

    fn filter(&self) -> CliResult<FormFilter> {
        let level = self
            .level
            .as_deref()
            .map(|cell| {
                Level::parse(cell).ok_or_else(|| {
                    CliError::validation(format!(
                        "Unknown level '{cell}'. Must be 'basic' or 'advanced'"
                    ))
                })
            })
            .transpose()?;
        let typology = self
            .typology
            .as_deref()
            .map(|cell| {
                Typology::parse(cell).ok_or_else(|| {
                    let names: Vec<_> = Typology::ALL.iter().map(|t| t.display_name()).collect();
                    CliError::validation(format!(
                        "Unknown typology '{cell}'. Must be one of: {}",
                        names.join(", ")
                    ))
                })
            })
            .transpose()?;
        Ok(FormFilter { level, typology })
    }
}

fn format_completion(label: &str, completion: Completion) -> String {
    format!(
        "{label:<10} {:>3}% ({}/{})",
        completion.percent, completion.completed, completion.total
    )
}

fn print_form(form: &FormView) {
    println!("Preset: {}", form.preset);
    println!("{}", format_completion("Overall", form.overall));
    println!("{}", format_completion("Basic", form.basic));
    println!("{}", format_completion("Advanced", form.advanced));

    for section in &form.sections {
        let heading = match section.level {
            Some(level) => format!("{level} / {}", section.title),
            None => section.title.clone(),
        };
        let done = section.fields.iter().filter(|f| f.completed).count();
        println!();
        println!("{heading} ({done}/{})", section.fields.len());
        for field in &section.fields {
            let mark = if field.completed { "✓" } else { " " };
            println!(
                "  [{mark}] {} ({}) = {}",
                field.translation, field.key, field.value
            );
        }
    }

    if !form.filtered_out.is_empty() {
        println!();
        println!("{} keys hidden by filter", form.filtered_out.len());
    }
    if !form.keys_not_in_preset.is_empty() {
        println!();
        println!("Keys not in preset: {}", form.keys_not_in_preset.join(", "));
    }

    if !form.trace.is_empty() {
        println!();
        println!("Trace:");
        for entry in &form.trace {
            let visible = entry
                .visible_index
                .map_or_else(|| "-".to_string(), |i| i.to_string());
            let level = entry.level.map_or("-", |l| l.display_name());
            let typology = entry.typology.map_or("-", |t| t.display_name());
            println!(
                "  {:>4} {:>4} {:<30} {level:<8} {typology:<10} shown={} value={:?}",
                entry.index, visible, entry.key, entry.shown, entry.value
            );
        }
    }
}
