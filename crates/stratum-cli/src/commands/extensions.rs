//! `stratum extensions`: the curated catalogue.

use console::measure_text_width;
use stratum_adapters::{curated_catalog, manifest_json};
use stratum_core::domain::ExtensionCatalog;

use crate::{
    cli::{ExtensionsCommands, ListFormat},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(cmd: ExtensionsCommands, output: OutputManager) -> CliResult<()> {
    let catalog = curated_catalog();
    match cmd {
        ExtensionsCommands::List { format } => match format {
            ListFormat::Json => output.json(catalog.entries())?,
            ListFormat::Table if output.is_json() => output.json(catalog.entries())?,
            ListFormat::Table => print_table(&catalog, &output)?,
        },
        ExtensionsCommands::Export { output: destination } => {
            let manifest = render_manifest(&catalog)?;
            match destination {
                Some(path) => {
                    std::fs::write(&path, &manifest).with_cli_context(|| {
                        format!("Failed to write manifest to '{}'", path.display())
                    })?;
                    output.success(&format!(
                        "Wrote {} extensions to {}",
                        catalog.len(),
                        path.display()
                    ))?;
                }
                None => println!("{manifest}"),
            }
        }
    }
    Ok(())
}

fn render_manifest(catalog: &ExtensionCatalog) -> CliResult<String> {
    manifest_json(catalog).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise the extension manifest: {e}"),
        source: Some(Box::new(e)),
    })
}

fn print_table(catalog: &ExtensionCatalog, output: &OutputManager) -> CliResult<()> {
    output.header("Curated Extensions:")?;
    let width = catalog
        .entries()
        .iter()
        .map(|e| measure_text_width(&e.extension_flag_value))
        .max()
        .unwrap_or(0);
    for entry in catalog.entries() {
        output.print(&format!(
            "  {:<width$}  {}",
            entry.extension_flag_value, entry.description
        ))?;
    }
    output.print("")?;
    output.print("Use with: stratum new <NAME> -e <EXTENSION>")?;
    Ok(())
}
