//! Physical unit conversion for product and variant quantities.
//!
//! Two disjoint registries map unit aliases to a base-unit multiplier
//! (weight to kilograms, volume to liters). Conversion across categories or
//! through unknown units falls back to 1:1 rather than erroring; variant
//! pricing depends on that leniency.

use std::collections::HashMap;
use std::sync::LazyLock;

static WEIGHT_TO_KG: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("kg", 1.0),
        ("kilogram", 1.0),
        ("kilograms", 1.0),
        ("g", 0.001),
        ("gram", 0.001),
        ("grams", 0.001),
        ("gms", 0.001),
        ("mg", 0.000_001),
        ("milligram", 0.000_001),
    ])
});

static VOLUME_TO_L: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("l", 1.0),
        ("liter", 1.0),
        ("litre", 1.0),
        ("liters", 1.0),
        ("ml", 0.001),
        ("milliliter", 0.001),
        ("millilitre", 0.001),
        ("milliliters", 0.001),
        ("pl", 0.000_01),
        ("mm3", 0.000_001),
    ])
});

/// Unit category a registered unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCategory {
    Weight,
    Volume,
}

impl UnitCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Volume => "volume",
        }
    }
}

/// Registered unit aliases grouped by category, aliases sorted for stable
/// output.
pub fn supported_units() -> Vec<(UnitCategory, Vec<&'static str>)> {
    let mut weight: Vec<&'static str> = WEIGHT_TO_KG.keys().copied().collect();
    let mut volume: Vec<&'static str> = VOLUME_TO_L.keys().copied().collect();
    weight.sort_unstable();
    volume.sort_unstable();
    vec![(UnitCategory::Weight, weight), (UnitCategory::Volume, volume)]
}

/// Trim and lowercase a unit string.
pub fn normalize_unit(unit: &str) -> String {
    unit.trim().to_lowercase()
}

pub fn is_valid_unit(unit: &str) -> bool {
    let normalized = normalize_unit(unit);
    WEIGHT_TO_KG.contains_key(normalized.as_str()) || VOLUME_TO_L.contains_key(normalized.as_str())
}

pub fn unit_category(unit: &str) -> Option<UnitCategory> {
    let normalized = normalize_unit(unit);
    if WEIGHT_TO_KG.contains_key(normalized.as_str()) {
        Some(UnitCategory::Weight)
    } else if VOLUME_TO_L.contains_key(normalized.as_str()) {
        Some(UnitCategory::Volume)
    } else {
        None
    }
}

/// Both units registered and in the same category.
pub fn are_units_compatible(unit1: &str, unit2: &str) -> bool {
    match (unit_category(unit1), unit_category(unit2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Multiplicative factor from one unit to another, `None` when the pair is
/// incompatible or either unit is unknown.
pub fn conversion_factor(from_unit: &str, to_unit: &str) -> Option<f64> {
    let from = normalize_unit(from_unit);
    let to = normalize_unit(to_unit);

    if let (Some(f), Some(t)) = (
        WEIGHT_TO_KG.get(from.as_str()),
        WEIGHT_TO_KG.get(to.as_str()),
    ) {
        return Some(f / t);
    }
    if let (Some(f), Some(t)) = (VOLUME_TO_L.get(from.as_str()), VOLUME_TO_L.get(to.as_str())) {
        return Some(f / t);
    }
    None
}

/// Convert a quantity between units.
///
/// Non-positive quantities yield 0. A same-unit pair is an identity
/// pass-through even for unregistered units. Cross-category or unknown pairs
/// return the quantity unchanged.
pub fn convert(quantity: f64, from_unit: &str, to_unit: &str) -> f64 {
    if !quantity.is_finite() || quantity <= 0.0 {
        return 0.0;
    }

    let from = normalize_unit(from_unit);
    let to = normalize_unit(to_unit);

    if from == to {
        return quantity;
    }

    if let (Some(f), Some(t)) = (
        WEIGHT_TO_KG.get(from.as_str()),
        WEIGHT_TO_KG.get(to.as_str()),
    ) {
        return quantity * f / t;
    }

    if let (Some(f), Some(t)) = (VOLUME_TO_L.get(from.as_str()), VOLUME_TO_L.get(to.as_str())) {
        return quantity * f / t;
    }

    tracing::warn!(from = %from, to = %to, "unknown unit pair, using 1:1 conversion");
    quantity
}

/// Human-readable unit label; unknown units come back verbatim.
pub fn unit_display_name(unit: &str) -> String {
    match normalize_unit(unit).as_str() {
        "kg" | "kilogram" => "Kilogram".to_string(),
        "g" | "gram" | "gms" => "Gram".to_string(),
        "l" | "liter" | "litre" => "Liter".to_string(),
        "ml" | "milliliter" => "Milliliter".to_string(),
        _ => unit.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_conversions() {
        assert_eq!(convert(2.0, "kg", "g"), 2000.0);
        assert_eq!(convert(500.0, "g", "kg"), 0.5);
        assert_eq!(convert(1.0, "kilograms", "gms"), 1000.0);
    }

    #[test]
    fn volume_conversions() {
        assert_eq!(convert(1.5, "l", "ml"), 1500.0);
        assert_eq!(convert(250.0, "ml", "litre"), 0.25);
    }

    #[test]
    fn conversion_is_invertible() {
        let there = convert(3.7, "kg", "g");
        let back = convert(there, "g", "kg");
        assert!((back - 3.7).abs() < 1e-9);
    }

    #[test]
    fn same_unit_is_identity_even_when_unregistered() {
        assert_eq!(convert(5.0, "bunch", "bunch"), 5.0);
        assert_eq!(convert(5.0, " KG ", "kg"), 5.0);
    }

    #[test]
    fn incompatible_pairs_fall_back_to_one_to_one() {
        assert_eq!(convert(4.0, "kg", "l"), 4.0);
        assert_eq!(convert(4.0, "dozen", "kg"), 4.0);
    }

    #[test]
    fn non_positive_quantities_yield_zero() {
        assert_eq!(convert(0.0, "kg", "g"), 0.0);
        assert_eq!(convert(-2.0, "kg", "g"), 0.0);
        assert_eq!(convert(f64::NAN, "kg", "g"), 0.0);
    }

    #[test]
    fn unit_validity_and_category() {
        assert!(is_valid_unit("Kg"));
        assert!(is_valid_unit(" ml "));
        assert!(!is_valid_unit("dozen"));
        assert_eq!(unit_category("grams"), Some(UnitCategory::Weight));
        assert_eq!(unit_category("pl"), Some(UnitCategory::Volume));
        assert_eq!(unit_category("bunch"), None);
    }

    #[test]
    fn compatibility_requires_shared_category() {
        assert!(are_units_compatible("kg", "mg"));
        assert!(are_units_compatible("l", "mm3"));
        assert!(!are_units_compatible("kg", "l"));
        assert!(!are_units_compatible("bunch", "bunch"));
    }

    #[test]
    fn factors_match_convert() {
        assert_eq!(conversion_factor("kg", "g"), Some(1000.0));
        assert_eq!(conversion_factor("ml", "l"), Some(0.001));
        assert_eq!(conversion_factor("kg", "l"), None);
        assert_eq!(conversion_factor("bunch", "kg"), None);
    }

    #[test]
    fn supported_units_expose_both_registries() {
        let supported = supported_units();
        assert_eq!(supported.len(), 2);

        let (weight_cat, weight) = &supported[0];
        let (volume_cat, volume) = &supported[1];
        assert_eq!(weight_cat.name(), "weight");
        assert_eq!(volume_cat.name(), "volume");
        assert!(weight.contains(&"kg"));
        assert!(weight.contains(&"gms"));
        assert!(volume.contains(&"ml"));
        assert!(volume.contains(&"mm3"));

        for (_, aliases) in &supported {
            assert!(aliases.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(unit_display_name("KG"), "Kilogram");
        assert_eq!(unit_display_name("litre"), "Liter");
        assert_eq!(unit_display_name("bunch"), "bunch");
    }
}
