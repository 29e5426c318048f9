use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use sink_configurator::config::schema::SINK_CONFIG_KEY;
use sink_configurator::reload::pipeline::{decode, validate, ReloadError};
use sink_configurator::sink::{SinkConfigMap, SinkTypeRegistry};

#[derive(Parser)]
#[command(name = "sinkctl")]
#[command(about = "Inspect and publish sink configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a sink configuration document ("-" reads stdin)
    Validate { file: PathBuf },
    /// List the sink types this build can decode
    Types,
    /// Validate a document and store it in a properties file
    Set {
        /// Properties file watched by the configurator
        #[arg(short, long)]
        properties: PathBuf,

        /// Property key to write
        #[arg(short, long, default_value = SINK_CONFIG_KEY)]
        key: String,

        /// Sink configuration document ("-" reads stdin)
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let registry = SinkTypeRegistry::with_builtin_types();

    match cli.command {
        Commands::Validate { file } => {
            let raw = read_document(&file)?;
            let sinks = check(&registry, &raw)?;
            println!("{}", serde_json::to_string_pretty(&summary(&sinks))?);
        }
        Commands::Types => {
            for name in registry.type_names() {
                println!("{}", name);
            }
        }
        Commands::Set { properties, key, file } => {
            let raw = read_document(&file)?;
            let sinks = check(&registry, &raw)?;
            write_property(&properties, &key, &raw)?;
            println!(
                "Wrote {} sinks to {} ({})",
                sinks.len(),
                properties.display(),
                key
            );
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        fs::read_to_string(path)
    }
}

/// Decode and validate a sink configuration document.
fn check(registry: &SinkTypeRegistry, raw: &str) -> Result<SinkConfigMap, ReloadError> {
    let sinks = decode(registry, raw)?;
    validate(&sinks)?;
    Ok(sinks)
}

fn summary(sinks: &SinkConfigMap) -> BTreeMap<&str, &str> {
    sinks
        .iter()
        .map(|(name, config)| (name.as_str(), config.sink_type()))
        .collect()
}

/// Replace one key in a TOML properties file, keeping the others.
fn write_property(path: &Path, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = match fs::read_to_string(path) {
        Ok(content) => content.parse::<toml::Table>()?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
        Err(e) => return Err(e.into()),
    };
    table.insert(key.to_string(), toml::Value::String(value.to_string()));

    // Rename into place so the watcher never reads a half-written file
    let staging = path.with_extension("toml.tmp");
    fs::write(&staging, toml::to_string(&table)?)?;
    fs::rename(&staging, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_error_kind() {
        let registry = SinkTypeRegistry::with_builtin_types();

        assert_eq!(check(&registry, "not json").unwrap_err().kind(), "parse");
        assert_eq!(
            check(&registry, r#"{"other": {"type": "local"}}"#).unwrap_err().kind(),
            "validation"
        );

        let sinks = check(&registry, r#"{"default": {"type": "local"}, "k": {"type": "kafka"}}"#).unwrap();
        let summary = summary(&sinks);
        assert_eq!(summary["default"], "local");
        assert_eq!(summary["k"], "kafka");
    }

    #[test]
    fn test_write_property_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sinks.toml");
        fs::write(&path, "other = \"x\"\n").unwrap();

        write_property(&path, SINK_CONFIG_KEY, r#"{"default": {"type": "local"}}"#).unwrap();

        let table: toml::Table = fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(table["other"].as_str(), Some("x"));
        assert_eq!(table[SINK_CONFIG_KEY].as_str(), Some(r#"{"default": {"type": "local"}}"#));
        assert!(!path.with_extension("toml.tmp").exists());
    }
}
