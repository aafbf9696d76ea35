//! Style inheritance: explicit and implicit parents, configurations, cycles

mod common;

use common::{layout, of_issue, Fixture};
use reslint::resources::FolderConfiguration;
use reslint::styles::{ParentKind, Resolution};
use reslint::{AnalysisScope, Issue, ResourceGraph, StyleResolver, StyleTable};

const STYLES: &str = r#"<resources>
    <style name="MyStyle">
        <item name="android:layout_width">match_parent</item>
        <item name="android:layout_height">wrap_content</item>
    </style>
    <style name="MyStyle.Big">
        <item name="android:textSize">20sp</item>
    </style>
    <style name="MyStyle.Big.Bold" />
    <style name="Detached.Thing" />
    <style name="Unparented" parent="">
        <item name="android:textSize">12sp</item>
    </style>
    <style name="AppTheme" parent="@android:style/Theme.Material" />
</resources>
"#;

fn table(fixture: &Fixture) -> StyleTable {
    let project = fixture.load(AnalysisScope::Project);
    StyleTable::build(&ResourceGraph::build(&project))
}

#[test]
fn test_dot_inherited_sizes_satisfy_required_size() {
    let fixture = Fixture::new()
        .with("res/values/styles.xml", STYLES)
        .with(
            "res/layout/main.xml",
            &layout("    <TextView style=\"@style/MyStyle.Big\" />\n    <TextView style=\"@style/MyStyle.Big.Bold\" />"),
        );
    let findings = fixture.analyze();
    assert!(of_issue(&findings, Issue::RequiredSize).is_empty(), "{:?}", findings);
}

#[test]
fn test_dot_child_reaches_sizes_through_an_explicit_parent() {
    let fixture = Fixture::new()
        .with(
            "res/values/styles.xml",
            r#"<resources>
    <style name="WidthAndHeight">
        <item name="android:layout_width">match_parent</item>
        <item name="android:layout_height">match_parent</item>
    </style>
    <style name="MyStyle" parent="@style/WidthAndHeight" />
    <style name="MyStyle.Big">
        <item name="android:textSize">20sp</item>
    </style>
</resources>
"#,
        )
        .with(
            "res/layout/main.xml",
            &layout("    <TextView style=\"@style/MyStyle.Big\" />"),
        );
    let findings = fixture.analyze();
    assert!(of_issue(&findings, Issue::RequiredSize).is_empty(), "{:?}", findings);

    let table = table(&fixture);
    let resolver = StyleResolver::new(&table);
    match resolver.resolve(
        "MyStyle.Big",
        "android:layout_height",
        &FolderConfiguration::default_config(),
    ) {
        Resolution::Found(found) => assert_eq!(found.style.name, "WidthAndHeight"),
        other => panic!("expected the height from WidthAndHeight, got {:?}", other),
    }
}

#[test]
fn test_undefined_prefix_does_not_inherit() {
    let fixture = Fixture::new()
        .with("res/values/styles.xml", STYLES)
        .with(
            "res/layout/main.xml",
            &layout("    <TextView style=\"@style/Detached.Thing\" />"),
        );
    let findings = fixture.analyze();
    let required = of_issue(&findings, Issue::RequiredSize);
    assert_eq!(required.len(), 1);
    assert_eq!(
        required[0].message,
        "The required layout_width and layout_height attributes are missing"
    );
}

#[test]
fn test_project_dot_style_over_library_prefix_is_checked() {
    let fixture = Fixture::new()
        .with(
            "res/values/styles.xml",
            "<resources>\n    <style name=\"Widget.AppCompat.Button.Mine\" />\n</resources>\n",
        )
        .with(
            "res/layout/main.xml",
            &layout("    <Button style=\"@style/Widget.AppCompat.Button\" />\n    <Button style=\"@style/Widget.AppCompat.Button.Mine\" />"),
        );
    let findings = fixture.analyze();
    let required = of_issue(&findings, Issue::RequiredSize);
    assert_eq!(required.len(), 1);
    assert_eq!(required[0].location.line(), 5);
    assert_eq!(
        table(&fixture).definitions("Widget.AppCompat.Button.Mine")[0].parent,
        ParentKind::None
    );
}

#[test]
fn test_parent_kinds() {
    let fixture = Fixture::new().with("res/values/styles.xml", STYLES);
    let table = table(&fixture);
    let parent = |name: &str| table.definitions(name)[0].parent.clone();

    assert_eq!(parent("MyStyle.Big"), ParentKind::Implicit("MyStyle".into()));
    assert_eq!(parent("MyStyle.Big.Bold"), ParentKind::Implicit("MyStyle.Big".into()));
    assert_eq!(parent("Detached.Thing"), ParentKind::None);
    assert_eq!(parent("Unparented"), ParentKind::None);
    assert_eq!(parent("AppTheme"), ParentKind::Framework("Theme.Material".into()));
}

#[test]
fn test_resolution_walks_the_chain() {
    let fixture = Fixture::new().with("res/values/styles.xml", STYLES);
    let table = table(&fixture);
    let resolver = StyleResolver::new(&table);
    let base = FolderConfiguration::default_config();

    match resolver.resolve("MyStyle.Big.Bold", "android:layout_width", &base) {
        Resolution::Found(found) => {
            assert_eq!(found.style.name, "MyStyle");
            assert_eq!(found.item.value, "match_parent");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(resolver
        .resolve("AppTheme", "android:layout_width", &base)
        .is_satisfied());
    assert!(resolver
        .resolves_attribute("Unparented", "android:layout_width", &base)
        .is_none());
}

#[test]
fn test_most_specific_configuration_wins() {
    let fixture = Fixture::new()
        .with(
            "res/values/styles.xml",
            r#"<resources><style name="Title"><item name="android:textSize">12sp</item></style></resources>"#,
        )
        .with(
            "res/values-de/styles.xml",
            r#"<resources><style name="Title"><item name="android:textSize">10sp</item></style></resources>"#,
        );
    let table = table(&fixture);
    let resolver = StyleResolver::new(&table);

    let de = FolderConfiguration::from_folder_name("values-de");
    let fr = FolderConfiguration::from_folder_name("values-fr");
    let size = |config| {
        resolver
            .resolves_attribute("Title", "android:textSize", config)
            .map(|item| item.value.clone())
    };
    assert_eq!(size(&de).as_deref(), Some("10sp"));
    assert_eq!(size(&fr).as_deref(), Some("12sp"));
}

#[test]
fn test_size_from_any_configuration_variant() {
    let fixture = Fixture::new()
        .with(
            "res/values/styles.xml",
            r#"<resources><style name="Row"><item name="android:layout_height">wrap_content</item></style></resources>"#,
        )
        .with(
            "res/values-land/styles.xml",
            r#"<resources><style name="Row"><item name="android:layout_width">match_parent</item><item name="android:layout_height">wrap_content</item></style></resources>"#,
        )
        .with(
            "res/layout/main.xml",
            &layout("    <TextView style=\"@style/Row\" />"),
        );
    let findings = fixture.analyze();
    assert!(of_issue(&findings, Issue::RequiredSize).is_empty());
}

#[test]
fn test_cycles_fail_closed_and_are_reported() {
    let fixture = Fixture::new()
        .with(
            "res/values/styles.xml",
            "<resources>\n    <style name=\"A\" parent=\"@style/B\" />\n    <style name=\"B\" parent=\"@style/A\" />\n</resources>\n",
        )
        .with("res/layout/main.xml", &layout("    <TextView style=\"@style/A\" />"));

    let table = table(&fixture);
    let resolver = StyleResolver::new(&table);
    let resolution = resolver.resolve("A", "android:layout_width", &FolderConfiguration::default_config());
    assert!(matches!(resolution, Resolution::Cycle(_)));
    assert!(!resolution.is_satisfied());

    let findings = fixture.analyze();
    let cycles = of_issue(&findings, Issue::StyleCycle);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].message, "Style cycle: A -> B -> A");
    assert_eq!(of_issue(&findings, Issue::RequiredSize).len(), 1);
}
