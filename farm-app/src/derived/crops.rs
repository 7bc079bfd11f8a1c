//! Crop selector grouping.
//!
//! A crop's group comes from its own `category` field, then from an explicit
//! id table, and is `Other` otherwise. Names are never inspected.

use farm_client::{Crop, CropCategory, Id};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct CropCatalog {
    by_id: HashMap<Id, CropCategory>,
}

impl CropCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with an explicit id → category table
    pub fn with_mapping(mapping: impl IntoIterator<Item = (Id, CropCategory)>) -> Self {
        Self {
            by_id: mapping.into_iter().collect(),
        }
    }

    pub fn category_of(&self, crop: &Crop) -> CropCategory {
        crop.category
            .or_else(|| self.by_id.get(&crop.id).copied())
            .unwrap_or(CropCategory::Other)
    }

    /// Group crops for a selector, keeping input order within each group
    pub fn group(&self, crops: &[Crop]) -> BTreeMap<CropCategory, Vec<Crop>> {
        let mut groups: BTreeMap<CropCategory, Vec<Crop>> = BTreeMap::new();
        for crop in crops {
            groups
                .entry(self.category_of(crop))
                .or_default()
                .push(crop.clone());
        }
        groups
    }
}

/// Selector label, with the Urdu name when known
pub fn crop_label(crop: &Crop) -> String {
    match crop.name_urdu.as_deref().filter(|n| !n.is_empty()) {
        Some(urdu) => format!("{} ({})", crop.name, urdu),
        None => crop.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_category_field_wins() {
        let groups = CropCatalog::new().group(&fixtures::sample_crops());
        let majors: Vec<&str> = groups[&CropCategory::MajorCrops]
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(majors, vec!["Wheat", "Corn"]);
        assert_eq!(groups[&CropCategory::Other][0].name, "Rice");
    }

    #[test]
    fn test_id_mapping_fills_gaps() {
        let catalog = CropCatalog::with_mapping([(4, CropCategory::MajorCrops), (1, CropCategory::Other)]);
        let crops = fixtures::sample_crops();

        assert_eq!(catalog.category_of(&crops[3]), CropCategory::MajorCrops);
        // The record's own category is not overridden
        assert_eq!(catalog.category_of(&crops[0]), CropCategory::MajorCrops);
        assert!(!catalog.group(&crops).contains_key(&CropCategory::Other));
    }

    #[test]
    fn test_names_are_not_inspected() {
        let crop = Crop {
            id: 77,
            name: "Wheat".into(),
            name_urdu: None,
            variety: None,
            category: None,
        };
        assert_eq!(CropCatalog::new().category_of(&crop), CropCategory::Other);
        assert_eq!(crop_label(&crop), "Wheat");
    }

    #[test]
    fn test_label_with_urdu() {
        assert_eq!(crop_label(&fixtures::sample_crops()[0]), "Wheat (گندم)");
    }
}
