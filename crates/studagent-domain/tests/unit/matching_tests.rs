//! Unit tests for matching value objects

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use studagent_domain::value_objects::matching::normalize_token;
    use studagent_domain::{FeatureCategory, FeatureSet, FeatureVector, MatchWeights};

    #[test]
    fn test_normalize_token() {
        assert_eq!(
            normalize_token("  Machine   Learning ").as_deref(),
            Some("machine learning")
        );
        assert_eq!(normalize_token("   "), None);
    }

    #[test]
    fn test_feature_set_dedupes_after_normalization() {
        let set = FeatureSet::from_tokens(["Chess", "chess ", "", "ML"]);
        assert_eq!(set.tokens.len(), 2);
        assert!(set.tokens.contains("chess"));
    }

    #[test]
    fn test_feature_vector_accepts_list_shorthand() {
        let v: FeatureVector = serde_json::from_value(serde_json::json!({
            "entity_id": "u1",
            "features": {
                "interest": ["ML", "Chess"],
                "academic-level": { "tokens": ["Year 2"], "weight": 0.5 }
            }
        }))
        .unwrap();
        let interests = v.tokens(FeatureCategory::Interest).unwrap();
        assert!(interests.contains("ml"));
        assert_eq!(
            v.features[&FeatureCategory::AcademicLevel].weight,
            Some(0.5)
        );
        assert!(v.tokens(FeatureCategory::Skill).is_none());
    }

    #[test]
    fn test_empty_category_reads_as_absent() {
        let v = FeatureVector::new("u1").with(FeatureCategory::Skill, ["  "]);
        assert!(v.tokens(FeatureCategory::Skill).is_none());
    }

    #[test]
    fn test_default_weights() {
        let w = MatchWeights::default();
        assert!((w.get(FeatureCategory::Interest) - 0.4).abs() < 1e-12);
        assert!((w.get(FeatureCategory::Skill) - 0.4).abs() < 1e-12);
        assert!((w.get(FeatureCategory::Availability) - 0.2).abs() < 1e-12);
        assert_eq!(w.get(FeatureCategory::AcademicLevel), 0.0);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let bad = BTreeMap::from([
            (FeatureCategory::Interest, 0.5),
            (FeatureCategory::Skill, 0.6),
        ]);
        assert!(MatchWeights::new(bad).is_err());

        let negative = BTreeMap::from([
            (FeatureCategory::Interest, 1.5),
            (FeatureCategory::Skill, -0.5),
        ]);
        assert!(MatchWeights::new(negative).is_err());
    }

    #[test]
    fn test_normalized_rescales() {
        let w = MatchWeights::normalized(BTreeMap::from([
            (FeatureCategory::Interest, 2.0),
            (FeatureCategory::Skill, 2.0),
        ]))
        .unwrap();
        assert!((w.get(FeatureCategory::Interest) - 0.5).abs() < 1e-12);
        assert!(MatchWeights::normalized(BTreeMap::new()).is_err());
    }

    #[test]
    fn test_weights_deserialize_validated() {
        let ok: MatchWeights =
            serde_json::from_str(r#"{"interest": 0.5, "skill": 0.5}"#).unwrap();
        assert_eq!(ok.active().count(), 2);
        assert!(serde_json::from_str::<MatchWeights>(r#"{"interest": 0.5}"#).is_err());
    }

    #[test]
    fn test_category_from_str_accepts_wire_and_plural_names() {
        assert_eq!(
            "interests".parse::<FeatureCategory>().unwrap(),
            FeatureCategory::Interest
        );
        assert_eq!(
            "academic_level".parse::<FeatureCategory>().unwrap(),
            FeatureCategory::AcademicLevel
        );
        assert!("hobbies".parse::<FeatureCategory>().is_err());
    }
}
