//! In-memory registry of dashboard tool panels.

use serde::{Deserialize, Serialize};

/// Per-panel settings a dashboard hands to its tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSettings {
    /// How often the panel refreshes its data, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u64>,
    /// Tool-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    /// Name of the UI component that renders this tool.
    pub component: String,
    pub active: bool,
    pub detached: bool,
    #[serde(default)]
    pub settings: ToolSettings,
}

impl Tool {
    /// The AQI panel every dashboard starts with.
    pub fn air_quality() -> Self {
        Tool {
            id: "aqi".to_string(),
            name: "Air Quality Index".to_string(),
            component: "AqiTool".to_string(),
            active: true,
            detached: false,
            settings: ToolSettings::default(),
        }
    }
}

/// The set of tools in the current dashboard session.
///
/// Lives only in memory; the only mutation is
/// [`toggle_detached`](ToolRegistry::toggle_detached).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// A registry seeded with the [`Tool::air_quality`] panel.
    pub fn new() -> Self {
        Self {
            tools: vec![Tool::air_quality()],
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    /// Flips the `detached` flag of the tool with this id. Unknown ids are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use airquality::ToolRegistry;
    ///
    /// let mut registry = ToolRegistry::new();
    /// registry.toggle_detached("aqi");
    /// assert!(registry.get("aqi").unwrap().detached);
    /// registry.toggle_detached("does-not-exist");
    /// ```
    pub fn toggle_detached(&mut self, id: &str) {
        if let Some(tool) = self.tools.iter_mut().find(|tool| tool.id == id) {
            tool.detached = !tool.detached;
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
