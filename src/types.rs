//! Common types used throughout Solidafy Pager
//!
//! This module contains shared type definitions and type aliases used
//! across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// 1-based page number identifying one page within a paginator
pub type PageKey = u32;

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and JSON values
pub type ValueMap = HashMap<String, JsonValue>;

/// First page of every paginator
pub const FIRST_PAGE: PageKey = 1;

// ============================================================================
// Navigation
// ============================================================================

/// A single navigation step, as used by scripted browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationStep {
    /// Go to the first page
    First,
    /// Go to the previous page
    Prev,
    /// Go to the next page
    Next,
    /// Go to the last known page
    Last,
    /// Go to an explicit page
    Goto(PageKey),
    /// Invalidate every cached page
    Clear,
    /// Invalidate and re-request the current page
    Refresh,
}

impl NavigationStep {
    /// Parse a single step such as `next` or `goto:4`
    pub fn parse(step: &str) -> Option<Self> {
        let step = step.trim().to_ascii_lowercase();
        match step.as_str() {
            "first" => Some(Self::First),
            "prev" | "previous" => Some(Self::Prev),
            "next" => Some(Self::Next),
            "last" => Some(Self::Last),
            "clear" => Some(Self::Clear),
            "refresh" => Some(Self::Refresh),
            other => other
                .strip_prefix("goto:")
                .and_then(|n| n.trim().parse::<PageKey>().ok())
                .map(Self::Goto),
        }
    }

    /// Parse a comma-separated script of steps
    ///
    /// Returns the first token that could not be parsed on failure.
    pub fn parse_script(script: &str) -> std::result::Result<Vec<Self>, String> {
        script
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| Self::parse(s).ok_or_else(|| s.trim().to_string()))
            .collect()
    }
}
