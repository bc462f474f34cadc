use crate::layout::LayoutKind;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".flowmap.toml";

/// d3 `schemeCategory10`.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub canvas: Canvas,
    pub node: NodeSize,
    pub force: ForceParams,
    pub tree: TreeParams,
    pub colors: Colors,
    pub default_layout: LayoutKind,
}

#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    pub link_distance: f64,
    pub charge: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
}

#[derive(Debug, Clone)]
pub struct Colors {
    pub success: String,
    pub failure: String,
    pub palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    canvas: Option<RawCanvas>,
    node: Option<RawNodeSize>,
    force: Option<RawForce>,
    tree: Option<RawTree>,
    colors: Option<RawColors>,
    layout: Option<RawLayout>,
}

#[derive(Debug, Deserialize)]
struct RawCanvas {
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawNodeSize {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawForce {
    link_distance: Option<f64>,
    charge: Option<f64>,
    iterations: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    horizontal_gap: Option<f64>,
    vertical_gap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawColors {
    success: Option<String>,
    failure: Option<String>,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    default: Option<LayoutKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            node: NodeSize::default(),
            force: ForceParams::default(),
            tree: TreeParams::default(),
            colors: Colors::default(),
            default_layout: LayoutKind::Force,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 40.0,
        }
    }
}

impl Default for NodeSize {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 40.0,
        }
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            link_distance: 120.0,
            charge: -400.0,
            iterations: 300,
        }
    }
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            horizontal_gap: 140.0,
            vertical_gap: 100.0,
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            success: "green".to_string(),
            failure: "red".to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Canvas {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Config {
    /// Load `.flowmap.toml` from `dir`, or defaults when it does not exist.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let canvas = match raw.canvas {
            Some(c) => Canvas {
                width: c.width.unwrap_or(defaults.canvas.width),
                height: c.height.unwrap_or(defaults.canvas.height),
                padding: c.padding.unwrap_or(defaults.canvas.padding),
            },
            None => defaults.canvas,
        };

        let node = match raw.node {
            Some(n) => NodeSize {
                width: n.width.unwrap_or(defaults.node.width),
                height: n.height.unwrap_or(defaults.node.height),
            },
            None => defaults.node,
        };

        let force = match raw.force {
            Some(f) => ForceParams {
                link_distance: f.link_distance.unwrap_or(defaults.force.link_distance),
                charge: f.charge.unwrap_or(defaults.force.charge),
                iterations: f.iterations.unwrap_or(defaults.force.iterations),
            },
            None => defaults.force,
        };

        let tree = match raw.tree {
            Some(t) => TreeParams {
                horizontal_gap: t.horizontal_gap.unwrap_or(defaults.tree.horizontal_gap),
                vertical_gap: t.vertical_gap.unwrap_or(defaults.tree.vertical_gap),
            },
            None => defaults.tree,
        };

        let colors = match raw.colors {
            Some(c) => Colors {
                success: c.success.unwrap_or(defaults.colors.success),
                failure: c.failure.unwrap_or(defaults.colors.failure),
                palette: c
                    .palette
                    .filter(|p| !p.is_empty())
                    .unwrap_or(defaults.colors.palette),
            },
            None => defaults.colors,
        };

        let default_layout = raw
            .layout
            .and_then(|l| l.default)
            .unwrap_or(defaults.default_layout);

        let config = Self {
            canvas,
            node,
            force,
            tree,
            colors,
            default_layout,
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("node.width", self.node.width),
            ("node.height", self.node.height),
            ("tree.horizontal_gap", self.tree.horizontal_gap),
            ("tree.vertical_gap", self.tree.vertical_gap),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.canvas.padding < 0.0 {
            return Err(ConfigError::Invalid("canvas.padding must not be negative".into()));
        }
        Ok(())
    }
}

/// Commented starter configuration written by `flowmap init`.
pub fn generate_config_template() -> String {
    let defaults = Config::default();
    let palette: Vec<String> = defaults
        .colors
        .palette
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect();

    format!(
        r#"# flowmap configuration
# Every key is optional; missing keys fall back to the values shown here.

[layout]
# "force" or "tree"
default = "force"

[canvas]
width = {width}
height = {height}
# Space kept around the drawing when exporting
padding = {padding}

[node]
width = {node_width}
height = {node_height}

[force]
link_distance = {link_distance}
# Negative values repel
charge = {charge}
iterations = {iterations}

[tree]
horizontal_gap = {hgap}
vertical_gap = {vgap}

[colors]
success = "{success}"
failure = "{failure}"
# Assigned to task types in order of first appearance
palette = [{palette}]
"#,
        width = defaults.canvas.width,
        height = defaults.canvas.height,
        padding = defaults.canvas.padding,
        node_width = defaults.node.width,
        node_height = defaults.node.height,
        link_distance = defaults.force.link_distance,
        charge = defaults.force.charge,
        iterations = defaults.force.iterations,
        hgap = defaults.tree.horizontal_gap,
        vgap = defaults.tree.vertical_gap,
        success = defaults.colors.success,
        failure = defaults.colors.failure,
        palette = palette.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_merges_with_defaults() {
        let config = Config::from_toml(
            r##"
            [canvas]
            width = 1024.0

            [colors]
            failure = "#ff0000"

            [layout]
            default = "tree"
            "##,
        )
        .unwrap();

        assert_eq!(config.canvas.width, 1024.0);
        assert_eq!(config.canvas.height, 600.0);
        assert_eq!(config.colors.failure, "#ff0000");
        assert_eq!(config.colors.success, "green");
        assert_eq!(config.default_layout, LayoutKind::Tree);
        assert_eq!(config.force.iterations, 300);
    }

    #[test]
    fn test_template_round_trips() {
        let config = Config::from_toml(&generate_config_template()).unwrap();
        assert_eq!(config.node.width, 100.0);
        assert_eq!(config.force.charge, -400.0);
        assert_eq!(config.colors.palette.len(), 10);
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let err = Config::from_toml("[node]\nwidth = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("node.width"));
    }

    #[test]
    fn test_rejects_unknown_sections() {
        assert!(Config::from_toml("[theme]\ndark = true\n").is_err());
    }
}
