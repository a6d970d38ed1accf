// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Error types for ferro-varmap
//!
//! Problems with an individual input line never surface as a [`VarmapError`];
//! they are recorded as [`Message`](crate::input::Message)s on the
//! [`VariantInput`](crate::input::VariantInput) instead. This type covers
//! failures of the crate's surroundings: configuration loading and the
//! external lookup collaborators.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (E1xxx)
    /// Configuration value out of range
    InvalidConfig = 1001,

    // Lookup errors (E2xxx)
    /// A batched lookup against an external source failed
    LookupFailed = 2001,

    // Model errors (E3xxx)
    /// Invalid nucleotide base
    InvalidBase = 3001,
    /// Invalid codon
    InvalidCodon = 3002,
    /// Invalid amino acid token
    InvalidAminoAcid = 3003,
    /// Invalid chromosome token
    InvalidChromosome = 3004,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// TOML parsing error
    TomlError = 9002,
    /// JSON serialization error
    JsonError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "invalid configuration value",
            ErrorCode::LookupFailed => "external lookup failed",
            ErrorCode::InvalidBase => "invalid nucleotide base",
            ErrorCode::InvalidCodon => "invalid codon",
            ErrorCode::InvalidAminoAcid => "invalid amino acid",
            ErrorCode::InvalidChromosome => "invalid chromosome",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::TomlError => "TOML parsing error",
            ErrorCode::JsonError => "JSON serialization error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-varmap
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VarmapError {
    /// Configuration is syntactically valid but semantically wrong
    #[error("Invalid configuration: {msg}")]
    InvalidConfig { msg: String },

    /// A batched lookup against an external source failed
    #[error("{source_name} lookup failed: {msg}")]
    LookupFailed { source_name: String, msg: String },

    /// Invalid nucleotide base
    #[error("Invalid base: '{found}'")]
    InvalidBase { found: String },

    /// Invalid codon
    #[error("Invalid codon: '{found}'")]
    InvalidCodon { found: String },

    /// Invalid amino acid token
    #[error("Invalid amino acid: '{found}'")]
    InvalidAminoAcid { found: String },

    /// Invalid chromosome token
    #[error("Invalid chromosome: '{found}'")]
    InvalidChromosome { found: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// TOML parsing error
    #[error("TOML error: {msg}")]
    Toml { msg: String },

    /// JSON serialization error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl VarmapError {
    /// Create a lookup failure for the named source
    pub fn lookup(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        VarmapError::LookupFailed {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            VarmapError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            VarmapError::LookupFailed { .. } => ErrorCode::LookupFailed,
            VarmapError::InvalidBase { .. } => ErrorCode::InvalidBase,
            VarmapError::InvalidCodon { .. } => ErrorCode::InvalidCodon,
            VarmapError::InvalidAminoAcid { .. } => ErrorCode::InvalidAminoAcid,
            VarmapError::InvalidChromosome { .. } => ErrorCode::InvalidChromosome,
            VarmapError::Io { .. } => ErrorCode::IoError,
            VarmapError::Toml { .. } => ErrorCode::TomlError,
            VarmapError::Json { .. } => ErrorCode::JsonError,
        }
    }
}

impl From<std::io::Error> for VarmapError {
    fn from(err: std::io::Error) -> Self {
        VarmapError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VarmapError {
    fn from(err: toml::de::Error) -> Self {
        VarmapError::Toml {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VarmapError {
    fn from(err: serde_json::Error) -> Self {
        VarmapError::Json {
            msg: err.to_string(),
        }
    }
}
