use devassist_paths::{
    infer_paths, InferenceError, MetadataKind, PathInferenceEngine, RecordContext, SourceRoots,
    UserProfile,
};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9_]{0,20}"
}

fn optional_identifier() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(identifier())
}

proptest! {
    #[test]
    fn prop_count_matches_inputs(
        object in identifier(),
        record_type in optional_identifier(),
        profile in optional_identifier(),
    ) {
        let paths = infer_paths(&object, record_type.as_deref(), profile.as_deref()).unwrap();

        let per_root = 1
            + usize::from(record_type.is_some())
            + 2 * usize::from(profile.is_some());
        prop_assert_eq!(paths.len(), per_root * 3);
    }

    #[test]
    fn prop_every_root_starts_with_fields_directory(
        object in identifier(),
        record_type in optional_identifier(),
        profile in optional_identifier(),
    ) {
        let paths = infer_paths(&object, record_type.as_deref(), profile.as_deref()).unwrap();
        let per_root = paths.len() / 3;

        for chunk in paths.chunks(per_root) {
            prop_assert_eq!(chunk[0].kind(), MetadataKind::ObjectFields);
            prop_assert!(chunk[0].is_directory());
            // Remaining entries in the chunk share the first entry's root
            let root = chunk[0].as_str().split("/objects/").next().unwrap();
            for path in chunk {
                prop_assert!(path.as_str().starts_with(root));
            }
        }
    }

    #[test]
    fn prop_no_collisions_within_a_root(
        object in identifier(),
        record_type in identifier(),
        profile in identifier(),
    ) {
        let engine = PathInferenceEngine::new(SourceRoots::single("force-app/main/default"));
        let ctx = RecordContext::new(object).with_record_type(record_type);
        let profile = UserProfile::new(profile);
        let paths = engine.infer(&ctx, Some(&profile)).unwrap();

        let mut seen: Vec<&str> = paths.iter().map(|p| p.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), paths.len());
    }

    #[test]
    fn prop_inference_is_deterministic(
        object in identifier(),
        record_type in optional_identifier(),
        profile in optional_identifier(),
    ) {
        let first = infer_paths(&object, record_type.as_deref(), profile.as_deref()).unwrap();
        let second = infer_paths(&object, record_type.as_deref(), profile.as_deref()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_blank_object_always_rejected(
        blank in "[ \t]{0,4}",
        record_type in optional_identifier(),
        profile in optional_identifier(),
    ) {
        let result = infer_paths(&blank, record_type.as_deref(), profile.as_deref());
        prop_assert!(matches!(result, Err(InferenceError::InvalidContext(_))));
    }
}

#[test]
fn test_file_paths_carry_kind_extension() {
    let paths = infer_paths("Contact", Some("Support"), Some("Agent")).unwrap();
    for path in paths.iter().filter(|p| !p.is_directory()) {
        let extension = path.kind().extension().unwrap();
        assert!(
            path.as_str().ends_with(extension),
            "{path} should end with {extension}"
        );
    }
}
