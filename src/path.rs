//! Path manipulation utilities for component resolution

use crate::defaults::DESCRIPTOR_FILE_SUFFIX;
use regex::Regex;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// `<fullName>.<suffix>-meta.xml`, matched against a file name.
static METADATA_XML: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"^(.+)\.(.+){}$", regex::escape(DESCRIPTOR_FILE_SUFFIX));
    Regex::new(&pattern).expect("valid descriptor regex")
});

/// A descriptor file name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataXml {
    /// Everything before the type suffix, e.g. `Account` in `Account.object-meta.xml`
    pub full_name: String,
    /// The type suffix, e.g. `object`
    pub suffix: String,
    /// The path the name was parsed from
    pub path: PathBuf,
}

/// Classify a path as a descriptor file.
///
/// Returns `None` for anything that is not named `<name>.<suffix>-meta.xml`.
pub fn parse_metadata_xml(path: &Path) -> Option<MetadataXml> {
    let file_name = path.file_name().and_then(OsStr::to_str)?;
    let captures = METADATA_XML.captures(file_name)?;
    Some(MetadataXml {
        full_name: captures[1].to_string(),
        suffix: captures[2].to_string(),
        path: path.to_path_buf(),
    })
}

/// The file name up to its first `.`.
///
/// `Account.object-meta.xml` and `Account.object` both give `Account`.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

/// Drop every leading segment of `path` before the first segment equal to `part`.
///
/// The matching segment and everything after it are kept. When no segment
/// matches, `path` is returned unchanged.
pub fn trim_until(path: &Path, part: &str) -> PathBuf {
    let mut components = path.components();
    while let Some(component) = components.next() {
        if let Component::Normal(segment) = component {
            if segment == part {
                let mut trimmed = PathBuf::from(segment);
                let rest = components.as_path();
                if !rest.as_os_str().is_empty() {
                    trimmed.push(rest);
                }
                return trimmed;
            }
        }
    }
    path.to_path_buf()
}

/// Resolve `.` and `..` segments without touching the filesystem.
///
/// A `..` that cannot be resolved is kept on relative paths and dropped
/// at the root of absolute ones.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_xml() {
        let parsed = parse_metadata_xml(Path::new("objects/Account/Account.object-meta.xml"))
            .expect("descriptor");
        assert_eq!(parsed.full_name, "Account");
        assert_eq!(parsed.suffix, "object");
        assert_eq!(
            parsed.path,
            PathBuf::from("objects/Account/Account.object-meta.xml")
        );

        // Dotted names keep everything before the last suffix
        let parsed = parse_metadata_xml(Path::new("layouts/Account.Main.layout-meta.xml"))
            .expect("descriptor");
        assert_eq!(parsed.full_name, "Account.Main");
        assert_eq!(parsed.suffix, "layout");
    }

    #[test]
    fn test_parse_metadata_xml_rejects_content_files() {
        assert!(parse_metadata_xml(Path::new("classes/Foo.cls")).is_none());
        assert!(parse_metadata_xml(Path::new("static/logo.png")).is_none());
        assert!(parse_metadata_xml(Path::new("-meta.xml")).is_none());
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("fields/Name__c.field-meta.xml")), "Name__c");
        assert_eq!(base_name(Path::new("classes/Foo.cls")), "Foo");
        assert_eq!(base_name(Path::new("bundles/app")), "app");
    }

    #[test]
    fn test_trim_until() {
        assert_eq!(
            trim_until(Path::new("/home/user/project/reports/Sales/Q1.report-meta.xml"), "reports"),
            PathBuf::from("reports/Sales/Q1.report-meta.xml")
        );
        // Only the first matching segment counts
        assert_eq!(
            trim_until(Path::new("a/reports/b/reports/c.xml"), "reports"),
            PathBuf::from("reports/b/reports/c.xml")
        );
        // No match leaves the path untouched
        assert_eq!(
            trim_until(Path::new("a/b/c.xml"), "reports"),
            PathBuf::from("a/b/c.xml")
        );
    }

    #[test]
    fn test_trim_until_last_segment() {
        assert_eq!(
            trim_until(Path::new("project/static"), "static"),
            PathBuf::from("static")
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("./pkg/a.js")), PathBuf::from("pkg/a.js"));
        assert_eq!(
            normalize(Path::new("work/../other/objects")),
            PathBuf::from("other/objects")
        );
        assert_eq!(
            normalize(Path::new("../other/./pkg")),
            PathBuf::from("../other/pkg")
        );
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new(".")), PathBuf::new());
    }
}
