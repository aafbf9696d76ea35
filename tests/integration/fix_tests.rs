//! Fix rendering, round-trips against the original text, and writing fixes back

mod common;

use common::{layout, of_issue, Fixture};
use reslint::fix::{apply_fix, apply_hunks, FileEditor};
use reslint::{AnalysisConfig, AnalysisScope, FixComposer, Issue};

fn project_fixture() -> Fixture {
    Fixture::new()
        .with(
            "res/values/strings.xml",
            "<resources>\n    <string name=\"key\" translatable=\"false\">k</string>\n    <string name=\"loading\">Loading...</string>\n    <string\n        name=\"title\">Title</string>\n</resources>\n",
        )
        .with(
            "res/values-nb/strings.xml",
            "<resources>\n    <string name=\"key\">n</string>\n    <string name=\"loading\">Laster…</string>\n</resources>\n",
        )
        .with(
            "res/layout/main.xml",
            &layout("    <TextView\n        android:text=\"@string/title\" />\n    <Button android:layout_width=\"wrap_content\" android:layout_below=\"@id/titel\" />\n    <View android:id=\"@+id/title\" android:layout_width=\"1dp\" android:layout_height=\"1dp\" />"),
        )
}

#[test]
fn test_every_fix_round_trips() {
    let fixture = project_fixture();
    let (project, findings) = fixture.analyze_with(AnalysisConfig::new(AnalysisScope::Project));
    assert!(findings.iter().any(|f| !f.fixes.is_empty()));

    for context_lines in [0, 2] {
        let composer = FixComposer::new().with_context_lines(context_lines);
        for finding in &findings {
            for fix in &finding.fixes {
                let doc = &project.documents[fix.document].xml;
                let rendered = composer.compose(fix, doc, &finding.location).unwrap();
                assert!(rendered.starts_with(&format!(
                    "Fix for {} line {}: ",
                    finding.location.file,
                    finding.location.line()
                )));
                assert_eq!(
                    apply_hunks(doc.text(), &rendered).unwrap(),
                    apply_fix(doc, fix).unwrap(),
                    "{}",
                    rendered
                );
            }
        }
    }
}

#[test]
fn test_remove_translatable_diff() {
    let fixture = project_fixture();
    let (project, findings) = fixture.analyze_with(AnalysisConfig::new(AnalysisScope::Project));
    let extra = of_issue(&findings, Issue::ExtraTranslation);
    assert_eq!(extra.len(), 1);
    let fix = &extra[0].fixes[0];
    let rendered = FixComposer::new()
        .compose(fix, &project.documents[fix.document].xml, &extra[0].location)
        .unwrap();
    assert_eq!(
        rendered,
        "Fix for res/values-nb/strings.xml line 2: Remove translatable=\"false\":\n@@ -2 +2 res/values/strings.xml\n-    <string name=\"key\" translatable=\"false\">k</string>\n+    <string name=\"key\">k</string>\n"
    );
}

#[test]
fn test_header_line_is_the_finding_line() {
    let fixture = Fixture::new().with(
        "res/layout/main.xml",
        &layout("    <TextView\n        android:layout_width=\"wrap_content\"\n        android:text=\"@string/title\" />"),
    );
    let (project, findings) = fixture.analyze_with(AnalysisConfig::new(AnalysisScope::Project));
    let required = of_issue(&findings, Issue::RequiredSize);
    assert_eq!(required.len(), 1);
    assert_eq!(required[0].location.line(), 4);

    let rendered = reslint::report::render_fixes(&findings, &project, 0);
    assert!(rendered.starts_with(
        "Fix for res/layout/main.xml line 4: Set layout_height to wrap_content:\n@@ -6 +6\n+        android:layout_height=\"wrap_content\"\n"
    ), "{}", rendered);
}

#[test]
fn test_multiline_insert_keeps_indentation() {
    let fixture = project_fixture();
    let (project, findings) = fixture.analyze_with(AnalysisConfig::new(AnalysisScope::Project));
    let required = of_issue(&findings, Issue::RequiredSize);
    let text_view = required
        .iter()
        .find(|f| f.message.contains("layout_width and layout_height"))
        .unwrap();
    let fix = &text_view.fixes[1];
    assert_eq!(fix.description, "Set layout_width and layout_height to match_parent");
    let fixed = apply_fix(&project.documents[fix.document].xml, fix).unwrap();
    assert!(fixed.contains(
        "    <TextView\n        android:layout_width=\"match_parent\"\n        android:layout_height=\"match_parent\"\n        android:text=\"@string/title\" />"
    ));
}

#[test]
fn test_applying_fixes_is_idempotent() {
    let fixture = project_fixture();
    let (project, findings) = fixture.analyze_with(AnalysisConfig::new(AnalysisScope::Project));

    let editor = FileEditor::new();
    for (index, document) in project.documents.iter().enumerate() {
        let fixes: Vec<_> = findings
            .iter()
            .filter_map(|f| f.fixes.first())
            .filter(|fix| fix.document == index)
            .collect();
        editor.apply_fixes(&document.xml, &fixes).unwrap();
    }

    let after = fixture.analyze();
    assert!(of_issue(&after, Issue::RequiredSize).is_empty(), "{:?}", after);
    assert!(of_issue(&after, Issue::TypographyEllipsis).is_empty());
    assert!(of_issue(&after, Issue::ExtraTranslation).is_empty());
    assert!(fixture.read("res/values/strings.xml").contains("Loading…"));

    let snapshot = fixture.read("res/layout/main.xml");
    let (project, findings) = fixture.analyze_with(AnalysisConfig::new(AnalysisScope::Project));
    let applied: usize = project
        .documents
        .iter()
        .enumerate()
        .map(|(index, document)| {
            let fixes: Vec<_> = findings
                .iter()
                .filter_map(|f| f.fixes.first())
                .filter(|fix| fix.document == index)
                .collect();
            editor.apply_fixes(&document.xml, &fixes).unwrap()
        })
        .sum();
    // The UnknownId fix declared the id, so nothing is left to apply
    assert_eq!(applied, 0);
    assert_eq!(fixture.read("res/layout/main.xml"), snapshot);
}
