use std::path::PathBuf;

use serde::Deserialize;

/// Policy instruction sent as the system message when none is configured
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = include_str!("system_instruction.txt");

/// Completion relay configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Mount `POST /api/chat`; requires a valid `[provider]` section
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Cap on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Nucleus sampling probability
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Inline system instruction
    #[serde(default)]
    pub system_instruction: Option<String>,
    /// File holding the system instruction, read once at load time
    #[serde(default)]
    pub system_instruction_file: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            system_instruction: None,
            system_instruction_file: None,
        }
    }
}

impl RelayConfig {
    /// System instruction to prepend to every prompt
    pub fn system_instruction(&self) -> &str {
        self.system_instruction
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_INSTRUCTION)
            .trim()
    }

    /// Replace `system_instruction_file` with the file's contents
    ///
    /// # Errors
    ///
    /// Returns an error if both an inline instruction and a file are set,
    /// or if the file cannot be read
    pub fn resolve_instruction_file(&mut self) -> anyhow::Result<()> {
        let Some(path) = self.system_instruction_file.take() else {
            return Ok(());
        };

        if self.system_instruction.is_some() {
            anyhow::bail!("relay.system_instruction and relay.system_instruction_file are mutually exclusive");
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read system instruction file {}: {e}", path.display()))?;
        self.system_instruction = Some(contents);

        Ok(())
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_tokens() -> u32 {
    120
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f64 {
    0.6
}

#[allow(clippy::missing_const_for_fn)]
fn default_top_p() -> f64 {
    0.9
}
