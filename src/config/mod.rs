pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, InputFormat, OutputFormat};

#[cfg(feature = "cli")]
mod cli {
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_path, Validate};
    use clap::{Parser, ValueEnum};
    use std::path::Path;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum InputFormat {
        Json,
        Csv,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
    pub enum OutputFormat {
        #[default]
        Text,
        Json,
    }

    #[derive(Debug, Clone, Parser)]
    #[command(name = "statement-view")]
    #[command(about = "Render invoice rows as a grouped, per-contact statement")]
    pub struct CliConfig {
        /// Data feed file (JSON updates or CSV rows)
        #[arg(short, long)]
        pub input: String,

        /// Input format; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        pub format: Option<InputFormat>,

        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        pub output: OutputFormat,

        /// CSV dimension columns in binding order, overriding the config
        #[arg(long, value_delimiter = ',')]
        pub dimensions: Vec<String>,

        /// CSV metric columns, overriding the config
        #[arg(long, value_delimiter = ',')]
        pub metrics: Vec<String>,

        /// Enable verbose output
        #[arg(short, long)]
        pub verbose: bool,

        /// Emit logs as JSON
        #[arg(long)]
        pub log_json: bool,
    }

    impl CliConfig {
        pub fn input_format(&self) -> InputFormat {
            self.format.unwrap_or_else(|| {
                let is_csv = Path::new(&self.input)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
                if is_csv {
                    InputFormat::Csv
                } else {
                    InputFormat::Json
                }
            })
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input", &self.input)?;
            if let Some(config) = &self.config {
                validate_path("config", config)?;
            }
            Ok(())
        }
    }

}
