//! Property tests over random edit scripts and documents.

use std::collections::HashSet;

use g2config::ConfigDocument;
use g2config_testkit::generators::{data_source_spec, document, edit_script};
use g2config_testkit::TestFixture;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn engine_chosen_ids_strictly_increase(script in edit_script(40)) {
        let fixture = TestFixture::new();
        let handle = fixture.create();
        let ids = fixture.apply(handle, &script);
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ids.iter().all(|id| id.0 >= 1001));
    }

    #[test]
    fn codes_and_ids_stay_unique(script in edit_script(40), extra in prop::collection::vec(data_source_spec(), 0..8)) {
        let fixture = TestFixture::new();
        let handle = fixture.create();
        fixture.apply(handle, &script);
        for spec in &extra {
            // Collisions are expected; they must be rejected, not stored.
            let _ = fixture.engine.add_data_source(handle, spec);
        }

        let listed = fixture.engine.list_data_sources(handle).unwrap();
        let codes: HashSet<_> = listed.codes().collect();
        let ids: HashSet<_> = listed.data_sources.iter().map(|d| d.id).collect();
        prop_assert_eq!(codes.len(), listed.len());
        prop_assert_eq!(ids.len(), listed.len());
    }

    #[test]
    fn save_load_save_is_stable(doc in document()) {
        let fixture = TestFixture::new();
        let handle = fixture.create();
        fixture.engine.load(handle, &doc.to_json().unwrap()).unwrap();

        let saved = fixture.engine.save(handle).unwrap();
        let other = fixture.create();
        fixture.engine.load(other, &saved).unwrap();
        prop_assert_eq!(fixture.engine.save(other).unwrap(), saved.clone());
        prop_assert_eq!(ConfigDocument::from_json(&saved).unwrap(), doc);
    }
}
