//! Smoke-check suite

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tether_core::{BridgeConfig, CallRequest, Scalar};
use tether_script::Bridge;

/// Which side the checked function lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Script,
    Host,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub direction: Direction,
    pub function: String,
    #[serde(default)]
    pub arguments: Vec<Scalar>,
    pub expected: Scalar,
}

impl Check {
    fn new(direction: Direction, function: &str, expected: Scalar) -> Self {
        Self {
            direction,
            function: function.to_string(),
            arguments: Vec::new(),
            expected,
        }
    }
}

/// Harness file: bridge settings plus the checks to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub bridge: BridgeConfig,
    pub checks: Vec<Check>,
}

impl Default for Suite {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig {
                search_paths: vec![bundled_scripts()],
                ..BridgeConfig::default()
            },
            checks: vec![
                Check::new(Direction::Script, "test_call", Scalar::Int(10)),
                Check::new(Direction::Host, "test_call", Scalar::Int(10)),
                Check::new(Direction::Script, "test_custom_exception", Scalar::Int(1)),
                Check::new(Direction::Script, "test_exception", Scalar::Int(1)),
            ],
        }
    }
}

impl Suite {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read suite {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse suite {}", path.display()))
    }
}

/// Directory holding the demo script module shipped with the harness.
pub fn bundled_scripts() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scripts")
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub passed: usize,
    pub failed: usize,
}

pub fn run(bridge: &Bridge, checks: &[Check]) -> Report {
    let mut report = Report::default();

    for check in checks {
        let request = CallRequest::new(check.function.clone(), check.arguments.clone());
        let outcome = match check.direction {
            Direction::Script => bridge.call_script(&request),
            Direction::Host => bridge.call_host(&request),
        };

        match outcome {
            Ok(value) if value == check.expected => {
                tracing::info!(direction = ?check.direction, function = %check.function, "OK");
                report.passed += 1;
            }
            Ok(value) => {
                tracing::error!(
                    direction = ?check.direction,
                    function = %check.function,
                    expected = %check.expected,
                    actual = %value,
                    "FAIL"
                );
                report.failed += 1;
            }
            Err(err) => {
                tracing::error!(
                    direction = ?check.direction,
                    function = %check.function,
                    kind = ?err.kind(),
                    error = %err,
                    "FAIL"
                );
                report.failed += 1;
            }
        }
    }

    report
}
