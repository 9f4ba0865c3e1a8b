use crate::core::binding::FieldBinding;
use crate::core::format::DisplayConfig;
use crate::utils::error::{Result, StatementError};
use crate::utils::validation::{validate_non_blank, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    pub binding: Option<BindingConfig>,
}

/// Column roles for tabular input that carries no field descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            dimensions: vec![
                "contact_name".to_string(),
                "due_date".to_string(),
                "link".to_string(),
            ],
            metrics: vec!["amount_due".to_string()],
        }
    }
}

/// Explicit role map; overrides positional binding when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    pub contact: String,
    pub due_date: String,
    pub link: String,
    pub amount: String,
    pub bank_name: Option<String>,
    pub bank_number: Option<String>,
}

impl BindingConfig {
    pub fn to_binding(&self) -> Result<FieldBinding> {
        let mut builder = FieldBinding::builder()
            .contact(&self.contact)
            .due_date(&self.due_date)
            .link(&self.link)
            .amount(&self.amount);
        if let Some(bank_name) = &self.bank_name {
            builder = builder.bank_name(bank_name);
        }
        if let Some(bank_number) = &self.bank_number {
            builder = builder.bank_number(bank_number);
        }
        builder.build()
    }
}

impl StatementConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StatementError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StatementError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CURRENCY})
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        self.display.validate()?;

        if self.feed.dimensions.is_empty() {
            return Err(StatementError::ConfigValidationError {
                field: "feed.dimensions".to_string(),
                message: "At least one dimension column is required".to_string(),
            });
        }
        for column in self.feed.dimensions.iter().chain(&self.feed.metrics) {
            validate_non_blank("feed", column)?;
        }

        if let Some(binding) = &self.binding {
            binding
                .to_binding()
                .map_err(|e| StatementError::ConfigValidationError {
                    field: "binding".to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }

    pub fn field_binding(&self) -> Result<Option<FieldBinding>> {
        self.binding.as_ref().map(BindingConfig::to_binding).transpose()
    }
}

impl Validate for StatementConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
