//! Resource graph behavior seen through whole-project analysis

mod common;

use common::{layout, of_issue, Fixture, ANDROID_NS};
use reslint::report::TextReporter;
use reslint::{AnalysisConfig, AnalysisScope, Config, Issue, Project, Severity};

#[test]
fn test_non_translatable_translated_in_nb() {
    let fixture = Fixture::new()
        .with(
            "res/values/strings.xml",
            "<resources>\n    <string name=\"app_key\" translatable=\"false\">k</string>\n    <string name=\"title\">Title</string>\n</resources>\n",
        )
        .with(
            "res/values-nb/strings.xml",
            "<resources>\n    <string name=\"app_key\">n</string>\n    <string name=\"title\">Tittel</string>\n</resources>\n",
        );
    let findings = fixture.analyze();

    let extra = of_issue(&findings, Issue::ExtraTranslation);
    assert_eq!(extra.len(), 1);
    assert_eq!(extra[0].location.file, "res/values-nb/strings.xml");
    assert_eq!(extra[0].location.line(), 2);
    assert_eq!(
        extra[0].message,
        "The resource string \"app_key\" has been marked as translatable=\"false\""
    );
    assert!(of_issue(&findings, Issue::MissingTranslation).is_empty());
}

#[test]
fn test_missing_translation_is_reported_once_per_string() {
    let fixture = Fixture::new()
        .with(
            "res/values/strings.xml",
            "<resources>\n    <string name=\"hello\">Hello</string>\n    <string-array name=\"days\"><item>Mon</item></string-array>\n</resources>\n",
        )
        .with("res/values-de/strings.xml", "<resources>\n    <string name=\"hello\">Hallo</string>\n</resources>\n")
        .with("res/values-de-rAT/strings.xml", "<resources>\n    <string name=\"hello\">Servus</string>\n</resources>\n");
    let findings = fixture.analyze();
    let missing = of_issue(&findings, Issue::MissingTranslation);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].message, "\"days\" is not translated in \"de\", \"de-rAT\"");
}

#[test]
fn test_single_file_downgrades_unknown_id() {
    let main = layout(
        "    <TextView android:id=\"@+id/label\" android:layout_width=\"wrap_content\" android:layout_height=\"wrap_content\" />\n    <Button android:layout_below=\"@id/header\" android:layout_width=\"wrap_content\" android:layout_height=\"wrap_content\" />",
    );
    let fixture = Fixture::new()
        .with("res/layout/main.xml", &main)
        .with(
            "res/layout/other.xml",
            &layout("    <View android:id=\"@+id/unrelated\" android:layout_width=\"1dp\" android:layout_height=\"1dp\" />"),
        );

    let project = fixture.analyze();
    let unknown = of_issue(&project, Issue::UnknownId);
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].severity, Severity::Error);

    let single = fixture.analyze_file("res/layout/main.xml");
    assert!(of_issue(&single, Issue::UnknownId).is_empty());
    let downgraded = of_issue(&single, Issue::UnknownIdInLayout);
    assert_eq!(downgraded.len(), 1);
    assert_eq!(downgraded[0].severity, Severity::Warning);
    assert_eq!(
        downgraded[0].message,
        "The id \"header\" is not referring to any views in this layout"
    );
}

#[test]
fn test_include_root_override() {
    let fixture = Fixture::new()
        .with(
            "res/layout/row.xml",
            &format!("<TextView {} android:text=\"row\" />\n", ANDROID_NS),
        )
        .with(
            "res/layout/main.xml",
            &layout("    <include layout=\"@layout/row\" android:layout_width=\"match_parent\" android:layout_height=\"wrap_content\" />"),
        );
    let findings = fixture.analyze();
    assert!(of_issue(&findings, Issue::RequiredSize).is_empty());
}

#[test]
fn test_parse_failure_is_isolated() {
    let fixture = Fixture::new()
        .with("res/layout/broken.xml", "<LinearLayout>\n    <TextView>\n</LinearLayout>\n")
        .with("res/values/strings.xml", "<resources>\n    <string name=\"a\">Loading...</string>\n</resources>\n");
    let findings = fixture.analyze();

    let parse = of_issue(&findings, Issue::ParseError);
    assert_eq!(parse.len(), 1);
    assert_eq!(parse[0].location.file, "res/layout/broken.xml");
    assert_eq!(of_issue(&findings, Issue::TypographyEllipsis).len(), 1);

    let mut config = Config::default();
    config.abort_on_parse_error = true;
    assert!(Project::load(fixture.path(), &config, AnalysisScope::Project).is_err());
}

#[test]
fn test_tools_ignore_suppresses_nested_findings() {
    let body = "    <FrameLayout xmlns:tools=\"http://schemas.android.com/tools\" tools:ignore=\"RequiredSize\" android:layout_width=\"1dp\">\n        <TextView />\n    </FrameLayout>\n    <TextView android:layout_width=\"1dp\" />";
    let fixture = Fixture::new().with("res/layout/main.xml", &layout(body));
    let findings = fixture.analyze();
    let required = of_issue(&findings, Issue::RequiredSize);
    assert_eq!(required.len(), 1);
    assert_eq!(required[0].location.line(), 7);
}

#[test]
fn test_configuration_filters_and_overrides() {
    let fixture = Fixture::new().with(
        "res/values/ids.xml",
        "<resources>\n    <item type=\"id\" name=\"spare\" />\n    <string name=\"s\">Wait...</string>\n</resources>\n",
    );
    let mut config = AnalysisConfig::new(AnalysisScope::Project);
    config.disabled.push("TypographyEllipsis".into());
    config
        .severity_overrides
        .insert("UnassignedId".into(), Severity::Error);
    let (_, findings) = fixture.analyze_with(config);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].issue, Issue::UnassignedId);
    assert_eq!(findings[0].severity, Severity::Error);
}

#[test]
fn test_output_is_deterministic() {
    let fixture = Fixture::new()
        .with("res/values/strings.xml", "<resources>\n    <string name=\"a\">A...</string>\n    <string name=\"b\">B</string>\n</resources>\n")
        .with("res/values-fr/strings.xml", "<resources>\n    <string name=\"a\">A</string>\n</resources>\n")
        .with("res/layout/main.xml", &layout("    <TextView />\n    <Button android:layout_below=\"@id/nowhere\" />"));

    let render = || {
        let (project, findings) = fixture.analyze_with(AnalysisConfig::new(AnalysisScope::Project));
        TextReporter::new().with_fixes(true, 1).render(&findings, &project)
    };
    let first = render();
    assert_eq!(first, render());
    assert!(first.contains("Fix for res/values/strings.xml line 2: Replace with …:\n@@ -2 +2\n <resources>\n-    <string name=\"a\">A...</string>\n+    <string name=\"a\">A…</string>\n     <string name=\"b\">B</string>\n"));
    assert!(first.contains("4 errors, 1 warnings\n"));
}
