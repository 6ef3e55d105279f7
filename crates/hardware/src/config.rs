//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline machine constants (reset PC, register counts, ROB and memory sizes).
//! 2. **Structures:** Hierarchical config for general, pipeline, and memory settings.
//! 3. **Validation:** Rejection of machines that could never make forward progress.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or use `Config::default()`.

use serde::Deserialize;

use crate::common::constants;
use crate::common::error::{SimError, SimResult};

/// Default configuration constants for the simulator.
mod defaults {
    use crate::common::constants;

    /// Program counter of the first instruction.
    pub const START_PC: u32 = constants::CODE_BASE;

    /// Architectural registers visible to programs (R0-R15).
    pub const ARCH_REGS: usize = constants::ARCH_REGS;

    /// Physical registers available to rename.
    ///
    /// Must exceed `ARCH_REGS`: every architectural register can pin one
    /// physical register as its latest mapping.
    pub const PRF_SIZE: usize = constants::PHYS_REGS;

    /// Reorder buffer capacity.
    pub const ROB_SIZE: usize = constants::ROB_ENTRIES;

    /// Data memory size in 32-bit words.
    pub const DATA_WORDS: usize = constants::DATA_WORDS;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use ooosim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true },
///     "pipeline": { "prf_size": 32, "rob_size": 12 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.pipeline.prf_size, 32);
/// assert_eq!(config.pipeline.arch_regs, 16);
/// assert_eq!(config.memory.data_words, 4096);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Rename and reorder resources.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Data memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Deserializes a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ConfigFormat` for malformed JSON and
    /// `SimError::InvalidConfig` when validation fails.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured machine can always make forward progress.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> SimResult<()> {
        let p = &self.pipeline;
        if p.arch_regs == 0 {
            return Err(SimError::InvalidConfig(
                "arch_regs must be at least 1".to_string(),
            ));
        }
        if p.prf_size <= p.arch_regs {
            return Err(SimError::InvalidConfig(format!(
                "prf_size ({}) must exceed arch_regs ({})",
                p.prf_size, p.arch_regs
            )));
        }
        if p.rob_size == 0 {
            return Err(SimError::InvalidConfig(
                "rob_size must be at least 1".to_string(),
            ));
        }
        if self.memory.data_words == 0 || self.memory.data_words > i32::MAX as usize {
            return Err(SimError::InvalidConfig(format!(
                "data_words ({}) must be in 1..={}",
                self.memory.data_words,
                i32::MAX
            )));
        }
        if self.general.start_pc % constants::INSTRUCTION_SIZE != 0 {
            return Err(SimError::InvalidConfig(format!(
                "start_pc ({}) must be a multiple of {}",
                self.general.start_pc,
                constants::INSTRUCTION_SIZE
            )));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Emit per-stage trace events (`tracing` at debug level).
    #[serde(default)]
    pub trace_instructions: bool,

    /// Program counter of the first instruction.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u32,
}

impl GeneralConfig {
    fn default_start_pc() -> u32 {
        defaults::START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            start_pc: Self::default_start_pc(),
        }
    }
}

/// Rename and reorder resource sizes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of architectural registers.
    #[serde(default = "PipelineConfig::default_arch_regs")]
    pub arch_regs: usize,

    /// Number of physical registers.
    #[serde(default = "PipelineConfig::default_prf_size")]
    pub prf_size: usize,

    /// Reorder buffer capacity.
    #[serde(default = "PipelineConfig::default_rob_size")]
    pub rob_size: usize,
}

impl PipelineConfig {
    fn default_arch_regs() -> usize {
        defaults::ARCH_REGS
    }

    fn default_prf_size() -> usize {
        defaults::PRF_SIZE
    }

    fn default_rob_size() -> usize {
        defaults::ROB_SIZE
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            arch_regs: Self::default_arch_regs(),
            prf_size: Self::default_prf_size(),
            rob_size: Self::default_rob_size(),
        }
    }
}

/// Data memory configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Number of addressable 32-bit words.
    #[serde(default = "MemoryConfig::default_data_words")]
    pub data_words: usize,
}

impl MemoryConfig {
    fn default_data_words() -> usize {
        defaults::DATA_WORDS
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_words: Self::default_data_words(),
        }
    }
}
