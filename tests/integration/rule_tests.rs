//! Rules over fixture projects

mod common;

use common::{layout, of_issue, Fixture, ANDROID_NS};
use reslint::Issue;

#[test]
fn test_required_size_exemptions() {
    let body = "    <GridLayout android:layout_width=\"match_parent\" android:layout_height=\"wrap_content\">\n        <TextView />\n    </GridLayout>\n    <merge />\n    <requestFocus />";
    let fixture = Fixture::new().with("res/layout/main.xml", &layout(body));
    assert!(fixture.analyze().is_empty());
}

#[test]
fn test_required_size_under_data_binding_wrapper() {
    let text = format!(
        "<layout {}>\n    <data>\n        <variable name=\"user\" type=\"User\" />\n    </data>\n    <LinearLayout android:layout_width=\"match_parent\">\n        <TextView android:layout_width=\"wrap_content\" android:layout_height=\"wrap_content\" />\n    </LinearLayout>\n</layout>\n",
        ANDROID_NS
    );
    let fixture = Fixture::new().with("res/layout/bound.xml", &text);
    let findings = fixture.analyze();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "The required layout_height attribute is missing");
    assert_eq!(findings[0].location.line(), 5);
    let fixes: Vec<&str> = findings[0].fixes.iter().map(|f| f.description.as_str()).collect();
    assert_eq!(
        fixes,
        vec!["Set layout_height to wrap_content", "Set layout_height to match_parent"]
    );
}

#[test]
fn test_required_size_with_library_and_theme_styles() {
    let body = "    <TextView style=\"?attr/textAppearanceBody\" />\n    <TextView style=\"@style/FromLibrary\" />\n    <TextView style=\"@android:style/TextAppearance\" />";
    let fixture = Fixture::new().with("res/layout/main.xml", &layout(body));
    assert!(of_issue(&fixture.analyze(), Issue::RequiredSize).is_empty());
}

#[test]
fn test_unknown_id_suggestions() {
    let body = "    <TextView android:id=\"@+id/title_text\" android:layout_width=\"1dp\" android:layout_height=\"1dp\" />\n    <TextView android:layout_below=\"@id/title_txt\" android:layout_width=\"1dp\" android:layout_height=\"1dp\" />";
    let fixture = Fixture::new().with("res/layout/main.xml", &layout(body));
    let findings = fixture.analyze();
    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].message,
        "The id \"title_txt\" is not defined anywhere. Did you mean one of {title_text} ?"
    );
    assert_eq!(findings[0].location.line(), 5);
    assert_eq!(findings[0].location.underline().trim_start(), "~~~~~~~~~~~~~");
}

#[test]
fn test_unassigned_and_assigned_value_ids() {
    let fixture = Fixture::new()
        .with(
            "res/values/ids.xml",
            "<resources>\n    <item type=\"id\" name=\"content\" />\n    <item type=\"id\" name=\"ghost\" />\n</resources>\n",
        )
        .with(
            "res/layout/main.xml",
            &layout("    <FrameLayout android:id=\"@id/content\" android:layout_width=\"1dp\" android:layout_height=\"1dp\" />"),
        );
    let findings = fixture.analyze();
    let unassigned = of_issue(&findings, Issue::UnassignedId);
    assert_eq!(unassigned.len(), 1);
    assert_eq!(
        unassigned[0].message,
        "The id \"ghost\" is declared but never assigned to a view"
    );
    assert!(of_issue(&findings, Issue::UnknownId).is_empty());
}

const JAVA: &str = r#"package com.example;

import android.annotation.SuppressLint;
import androidx.annotation.Size;

public class Colors {
    public static void setRgb(@Size(3) float[] rgb) {}

    public static void setSteps(@Size(min = 2, max = 8, multiple = 2) int[] steps) {}

    public void apply() {
        setRgb(new float[] {1f, 0f});
        setSteps(new int[3]);
        setSteps(new int[] {1, 2, 3, 4});
    }

    public void forward(@Size(min = 2, max = 4, multiple = 2) int[] narrow, @Size(min = 1) int[] open) {
        setSteps(narrow);
        setSteps(open);
    }

    @SuppressLint("Range")
    public void ignored() {
        setRgb(new float[1]);
    }
}
"#;

#[test]
fn test_size_annotations() {
    let fixture = Fixture::new().with("src/main/java/com/example/Colors.java", JAVA);
    let findings = fixture.analyze();
    let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Expected Size to be exactly 3 (was 2)",
            "Expected Size to be a multiple of 2 (was 3 and should be either 2 or 4)",
            "Expected Size at least 2 and at most 8 and a multiple of 2 but the argument allows at least 1",
        ]
    );
    assert!(findings.iter().all(|f| f.issue == Issue::Range));
    assert_eq!(findings[0].location.file, "src/main/java/com/example/Colors.java");
    assert_eq!(findings[0].location.line(), 12);
    assert_eq!(findings[0].secondary[0].location.line(), 7);
}

#[test]
fn test_java_syntax_error_is_a_parse_error() {
    let fixture = Fixture::new().with("src/Broken.java", "public class Broken { void f( }");
    let findings = fixture.analyze();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].issue, Issue::ParseError);
}
