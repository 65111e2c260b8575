//! Partitions symbol nodes into the asset sets the traversal passes work on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::graph::GraphService;
use crate::shared::text_rules::{contains_letter_and_digit, is_symbol_text_invalid};

/// The three symbol sets consumed by propagation and connectivity.
///
/// Valve assets are always a subset of the asset symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClassification {
    pub asset_symbol_ids: BTreeSet<String>,
    pub asset_valve_symbol_ids: BTreeSet<String>,
    pub flow_direction_asset_ids: BTreeSet<String>,
}

/// Classifies symbols by label prefix and tag-text validity. Arrows and
/// symbols without associated text are never assets.
pub fn classify_asset_symbols(graph: &GraphService, config: &Config) -> AssetClassification {
    let flow_direction_prefixes: Vec<String> = config
        .flow_direction_asset_prefixes
        .iter()
        .map(|prefix| prefix.to_lowercase())
        .collect();
    let text_prefixes: Vec<String> = config
        .symbol_label_prefixes_with_text
        .iter()
        .map(|prefix| prefix.to_lowercase())
        .collect();
    let valve_prefix = config.valve_symbol_prefix.to_lowercase();

    let mut classification = AssetClassification::default();

    for (node_id, node) in graph.symbol_nodes() {
        let Some(symbol) = node.symbol_data() else {
            continue;
        };
        if symbol.label == config.arrow_symbol_label {
            continue;
        }
        let Some(symbol_text) = symbol.text_associated.as_deref() else {
            continue;
        };

        let label_lowered = symbol.label.to_lowercase();

        // Definitional sources and sinks of flow: equipment, page connectors.
        if flow_direction_prefixes.iter().any(|prefix| label_lowered.starts_with(prefix)) {
            classification.flow_direction_asset_ids.insert(node_id.clone());
        }

        // Assets proper additionally need a plausible alphanumeric tag.
        if contains_letter_and_digit(symbol_text)
            && !is_symbol_text_invalid(symbol_text)
            && text_prefixes.iter().any(|prefix| label_lowered.starts_with(prefix))
        {
            classification.asset_symbol_ids.insert(node_id.clone());

            if label_lowered.starts_with(&valve_prefix) {
                classification.asset_valve_symbol_ids.insert(node_id.clone());
            }
        }
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::init_graph::initialize_graph;
    use crate::shared::models::{BoundingBox, SymbolAndTextAssociated};

    fn symbol(id: u32, label: &str, text: Option<&str>) -> SymbolAndTextAssociated {
        SymbolAndTextAssociated {
            id,
            label: label.to_string(),
            score: None,
            bounds: BoundingBox::new(0.0, 0.0, 0.1, 0.1),
            text_associated: text.map(|t| t.to_string()),
        }
    }

    fn classify(symbols: Vec<SymbolAndTextAssociated>) -> AssetClassification {
        let graph = initialize_graph(&symbols, &[]);
        classify_asset_symbols(&graph, &Config::default())
    }

    #[test]
    fn test_equipment_with_tag_is_both_asset_and_flow_direction() {
        let classification = classify(vec![symbol(1, "Equipment/Vessels/Drum", Some("V-101"))]);
        assert!(classification.asset_symbol_ids.contains("s-1"));
        assert!(classification.flow_direction_asset_ids.contains("s-1"));
        assert!(classification.asset_valve_symbol_ids.is_empty());
    }

    #[test]
    fn test_valve_is_asset_subset() {
        let classification = classify(vec![symbol(2, "Instrument/Valve/Gate valve", Some("GV-7"))]);
        assert!(classification.asset_valve_symbol_ids.contains("s-2"));
        assert!(classification
            .asset_valve_symbol_ids
            .is_subset(&classification.asset_symbol_ids));
        assert!(classification.flow_direction_asset_ids.is_empty());
    }

    #[test]
    fn test_arrows_are_skipped() {
        let classification = classify(vec![symbol(
            3,
            "Piping/Fittings/Mid arrow flow direction",
            Some("X-1"),
        )]);
        assert_eq!(classification, AssetClassification::default());
    }

    #[test]
    fn test_symbol_without_text_is_skipped() {
        let classification = classify(vec![symbol(4, "Equipment/Vessels/Drum", None)]);
        assert_eq!(classification, AssetClassification::default());
    }

    #[test]
    fn test_dimension_text_is_not_an_asset_but_keeps_flow_direction() {
        // The flow-direction set requires only a label match, not a tag.
        let classification = classify(vec![symbol(5, "Equipment/Vessels/Drum", Some("3/4\"x1/2\""))]);
        assert!(classification.asset_symbol_ids.is_empty());
        assert!(classification.flow_direction_asset_ids.contains("s-5"));
    }

    #[test]
    fn test_numeric_only_text_is_not_an_asset() {
        let classification = classify(vec![symbol(6, "Instrument/Indicators/Level", Some("1234"))]);
        assert!(classification.asset_symbol_ids.is_empty());
    }

    #[test]
    fn test_label_prefix_matching_is_case_insensitive() {
        let classification = classify(vec![symbol(7, "equipment/vessels/drum", Some("V-9"))]);
        assert!(classification.asset_symbol_ids.contains("s-7"));
    }

    #[test]
    fn test_unlisted_prefix_is_not_an_asset() {
        let classification = classify(vec![symbol(8, "Piping/Junction/Tee", Some("J-1"))]);
        assert!(classification.asset_symbol_ids.is_empty());
    }
}
