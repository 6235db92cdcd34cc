//! Colored property labels shown on cards, and the legend above the board.

use fmk_core::{contrast_color, AttributeStore, ContrastColor, RecordHandle};
use futures::future::join_all;
use serde::Serialize;

use crate::board_config::{AdditionalProperty, BoardConfig};

/// Accent color used when neither the board nor the property sets one.
pub const FALLBACK_ACCENT_COLOR: &str = "#7F6DF2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLabel {
    pub text: String,
    /// Background color.
    pub color: String,
    pub text_color: ContrastColor,
}

impl PropertyLabel {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        let color = color.into();
        Self {
            text: text.into(),
            text_color: contrast_color(&color),
            color,
        }
    }
}

fn property_color(property: &AdditionalProperty, accent: &str) -> String {
    property
        .color
        .clone()
        .unwrap_or_else(|| accent.to_string())
}

/// Card border color: the board's `defaultColor`, else the accent.
pub fn card_color(config: &BoardConfig, accent: &str) -> String {
    config
        .default_color
        .clone()
        .unwrap_or_else(|| accent.to_string())
}

/// One label per configured property, showing the property name.
pub fn legend(config: &BoardConfig, accent: &str) -> Vec<PropertyLabel> {
    config
        .additional_properties
        .iter()
        .flatten()
        .map(|p| PropertyLabel::new(p.property.clone(), property_color(p, accent)))
        .collect()
}

/// Labels for one record, in configured order. Properties the record lacks
/// (or that cannot be read) produce no label.
pub async fn task_labels(
    config: &BoardConfig,
    store: &dyn AttributeStore,
    record: &RecordHandle,
    accent: &str,
) -> Vec<PropertyLabel> {
    let Some(properties) = config.additional_properties.as_deref() else {
        return Vec::new();
    };

    let reads = properties.iter().map(|p| async move {
        match store.read(record, &p.property).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Could not read '{}' of {}: {}", p.property, record.path, e);
                String::new()
            }
        }
    });
    let values = join_all(reads).await;

    properties
        .iter()
        .zip(values)
        .filter(|(_, text)| !text.is_empty())
        .map(|(p, text)| PropertyLabel::new(text, property_color(p, accent)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_config::validate;
    use chrono::Utc;
    use fmk_persistence::MemoryVault;

    fn config() -> BoardConfig {
        validate(
            r##"{
                "frontmatterAttribute": "status",
                "columns": ["todo"],
                "cardOrigin": "tasks",
                "additionalProperties": [
                    {"property": "priority", "color": "#FFFF00"},
                    {"property": "owner"},
                    {"property": "due", "color": "#000"}
                ]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_legend_uses_property_names() {
        let legend = legend(&config(), FALLBACK_ACCENT_COLOR);
        assert_eq!(
            legend,
            vec![
                PropertyLabel::new("priority", "#FFFF00"),
                PropertyLabel::new("owner", FALLBACK_ACCENT_COLOR),
                PropertyLabel::new("due", "#000"),
            ]
        );
        assert_eq!(legend[0].text_color, ContrastColor::Black);
        assert_eq!(legend[2].text_color, ContrastColor::White);
    }

    #[test]
    fn test_legend_empty_without_properties() {
        let config = validate(
            r#"{"frontmatterAttribute": "status", "columns": ["todo"], "cardOrigin": "tasks"}"#,
        )
        .unwrap();
        assert!(legend(&config, FALLBACK_ACCENT_COLOR).is_empty());
    }

    #[tokio::test]
    async fn test_task_labels_skip_missing_values() {
        let vault = MemoryVault::new();
        let record = vault.add_record(
            "tasks",
            "a",
            Utc::now(),
            &[("priority", "high"), ("due", "friday")],
        );

        let labels = task_labels(&config(), &vault, &record, "#123456").await;
        assert_eq!(
            labels,
            vec![
                PropertyLabel::new("high", "#FFFF00"),
                PropertyLabel::new("friday", "#000"),
            ]
        );
    }

    #[test]
    fn test_card_color_falls_back_to_accent() {
        assert_eq!(card_color(&config(), "#123456"), "#123456");
        let mut config = config();
        config.default_color = Some("#abcdef".to_string());
        assert_eq!(card_color(&config, "#123456"), "#abcdef");
    }
}
