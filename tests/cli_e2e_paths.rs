//! End-to-end tests for the `paths` command.
//!
//! These tests invoke the actual CLI binary and validate the packaged paths
//! printed for each file of a component.

mod common;

use common::prelude::*;

/// Test that the source layout prefixes the package root
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_paths_source_format() {
    let fixture = ProjectFixture::new()
        .with_file("force-app/classes/Foo.cls", "public class Foo {}")
        .with_file("force-app/classes/Foo.cls-meta.xml", descriptors::APEX_CLASS);

    fixture
        .command()
        .args(["paths", "--type", "ApexClass"])
        .arg("--xml")
        .arg(fixture.child_path("force-app/classes/Foo.cls-meta.xml"))
        .arg("--content")
        .arg(fixture.child_path("force-app/classes/Foo.cls"))
        .assert()
        .success()
        .stdout(predicate::str::contains("main/default/classes/Foo.cls-meta.xml"))
        .stdout(predicate::str::contains("main/default/classes/Foo.cls\n"));
}

/// Test that the metadata layout is flat
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_paths_metadata_format() {
    let fixture = ProjectFixture::new()
        .with_file("force-app/classes/Foo.cls", "public class Foo {}")
        .with_file("force-app/classes/Foo.cls-meta.xml", descriptors::APEX_CLASS);

    fixture
        .command()
        .args(["paths", "--type", "ApexClass", "--format", "metadata"])
        .arg("--xml")
        .arg(fixture.child_path("force-app/classes/Foo.cls-meta.xml"))
        .arg("--content")
        .arg(fixture.child_path("force-app/classes/Foo.cls"))
        .assert()
        .success()
        .stdout(predicate::str::contains("-> classes/Foo.cls-meta.xml"))
        .stdout(predicate::str::contains("main/default").not());
}

/// Test that in-folder reports keep their folder
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_paths_in_folder_report() {
    let fixture = ProjectFixture::new().with_file(
        "force-app/reports/Sales/Q1.report-meta.xml",
        "<Report/>",
    );

    fixture
        .command()
        .args(["paths", "--type", "Report", "--name", "Sales/Q1"])
        .arg("--xml")
        .arg(fixture.child_path("force-app/reports/Sales/Q1.report-meta.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "-> main/default/reports/Sales/Q1.report-meta.xml",
        ));
}

/// Test that decomposed children are listed with their own directory
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_paths_decomposed_children() {
    let fixture = ProjectFixture::new()
        .with_file(
            "objects/Account/Account.object-meta.xml",
            descriptors::ACCOUNT_OBJECT,
        )
        .with_file(
            "objects/Account/fields/Name__c.field-meta.xml",
            descriptors::NAME_FIELD,
        );

    fixture
        .command()
        .args(["paths", "-t", "CustomObject", "-f", "metadata"])
        .arg("--xml")
        .arg(fixture.child_path("objects/Account/Account.object-meta.xml"))
        .arg("--content")
        .arg(fixture.child_path("objects/Account"))
        .assert()
        .success()
        .stdout(predicate::str::contains("-> objects/Account.object-meta.xml"))
        .stdout(predicate::str::contains("-> fields/Name__c.field-meta.xml"));
}

/// Test that an invalid format value is rejected by argument parsing
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_paths_invalid_format() {
    let fixture = ProjectFixture::new();

    fixture
        .command()
        .args(["paths", "--type", "ApexClass", "--format", "zip"])
        .args(["--content", "classes/Foo.cls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zip"));
}
