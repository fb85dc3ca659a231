//! Property-based tests for path manipulation and packaged paths.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::component::{ComponentArena, ComponentProperties, FileFormat};
    use crate::defaults::DEFAULT_PACKAGE_ROOT;
    use crate::path::{base_name, parse_metadata_xml, trim_until};
    use crate::registry::MetadataType;
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_]{1,8}"
    }

    fn segments(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(segment(), 0..max)
    }

    fn join(parts: &[String]) -> PathBuf {
        parts.iter().collect()
    }

    // ============================================================================
    // trim_until property tests
    // ============================================================================

    proptest! {
        /// Property: the result starts with the matched segment and keeps the rest
        #[test]
        fn trim_until_keeps_suffix(
            prefix in segments(4),
            rest in segments(4),
        ) {
            let marker = "reports".to_string();
            prop_assume!(!prefix.contains(&marker));

            let mut parts = prefix.clone();
            parts.push(marker.clone());
            parts.extend(rest.iter().cloned());

            let trimmed = trim_until(&join(&parts), &marker);
            let mut expected = vec![marker];
            expected.extend(rest);
            prop_assert_eq!(trimmed, join(&expected));
        }

        /// Property: trimming a trimmed path changes nothing
        #[test]
        fn trim_until_is_idempotent(parts in segments(6), pick in any::<prop::sample::Index>()) {
            prop_assume!(!parts.is_empty());
            let part = &parts[pick.index(parts.len())];
            let once = trim_until(&join(&parts), part);
            let twice = trim_until(&once, part);
            prop_assert_eq!(once, twice);
        }

        /// Property: paths without the segment are returned unchanged
        #[test]
        fn trim_until_without_match_is_identity(parts in segments(6)) {
            // Generated segments never contain '-'
            let path = join(&parts);
            prop_assert_eq!(trim_until(&path, "no-such-dir"), path);
        }
    }

    // ============================================================================
    // descriptor name property tests
    // ============================================================================

    proptest! {
        /// Property: `<name>.<suffix>-meta.xml` always parses back to its parts
        #[test]
        fn parse_metadata_xml_recovers_parts(
            dir in segments(3),
            name in segment(),
            suffix in "[a-z]{1,8}",
        ) {
            let mut path = join(&dir);
            path.push(format!("{}.{}-meta.xml", name, suffix));
            let parsed = parse_metadata_xml(&path);
            prop_assert!(parsed.is_some());
            let parsed = parsed.unwrap();
            prop_assert_eq!(&parsed.full_name, &name);
            prop_assert_eq!(&parsed.suffix, &suffix);
            prop_assert_eq!(base_name(&path), name);
        }
    }

    // ============================================================================
    // package_relative_path property tests
    // ============================================================================

    proptest! {
        /// Property: the source layout is the metadata layout under the package root
        #[test]
        fn source_format_prefixes_metadata_format(
            prefix in segments(3),
            name in segment(),
        ) {
            let apex_class = MetadataType::new("apexclass", "ApexClass", "classes", Some("cls"));
            let mut arena = ComponentArena::new();
            let id = arena.add_virtual(ComponentProperties::new(name.clone(), apex_class), Vec::new(), None);

            let mut path = join(&prefix);
            path.push("classes");
            path.push(format!("{}.cls", name));

            let metadata = arena.package_relative_path(id, &path, FileFormat::Metadata);
            let source = arena.package_relative_path(id, &path, FileFormat::Source);
            prop_assert_eq!(&metadata, &Path::new("classes").join(format!("{}.cls", name)));
            prop_assert_eq!(source, Path::new(DEFAULT_PACKAGE_ROOT).join(metadata));
        }

        /// Property: in-folder types keep every segment below their directory
        #[test]
        fn in_folder_paths_keep_folders(
            prefix in segments(3),
            folders in segments(3),
            name in segment(),
        ) {
            prop_assume!(!prefix.iter().any(|part| part == "reports"));
            let mut report = MetadataType::new("report", "Report", "reports", Some("report"));
            report.in_folder = true;
            let mut arena = ComponentArena::new();
            let id = arena.add_virtual(ComponentProperties::new(name.clone(), report), Vec::new(), None);

            let mut below = vec!["reports".to_string()];
            below.extend(folders);
            below.push(format!("{}.report-meta.xml", name));
            let mut parts = prefix;
            parts.extend(below.iter().cloned());

            prop_assert_eq!(
                arena.package_relative_path(id, &join(&parts), FileFormat::Metadata),
                join(&below)
            );
        }
    }
}
