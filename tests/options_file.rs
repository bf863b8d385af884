// Loading editor options from TOML files

use std::fs;

use wee_rich_text::{
    EditorOptions, FormatCommand, Height, MemoryEnvironment, MemorySurface, SelectionDispatcher,
    WeeRichText,
};

#[test]
fn options_file_configures_mounted_editor() {
    let path = std::env::temp_dir().join(format!(
        "wee-rich-text-options-{}.toml",
        std::process::id()
    ));
    fs::write(
        &path,
        r#"
initialContent = "<p>notes</p>"
placeholder = "Write something"
tools = ["italic", "bold"]
height = 120
"#,
    )
    .unwrap();

    let options = EditorOptions::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(options.height, Height::Pixels(120));

    let env = MemoryEnvironment::new();
    let dispatcher = SelectionDispatcher::new();
    let editor = WeeRichText::mount(MemorySurface::new(&env), options, &dispatcher);

    assert_eq!(editor.content(), "<p>notes</p>");
    assert_eq!(
        editor.with_surface(|s| s.placeholder().to_string()),
        "Write something"
    );
    let names: Vec<_> = editor.toolbar().iter().map(|b| b.tool.name).collect();
    assert_eq!(names, vec![FormatCommand::Bold, FormatCommand::Italic]);
    insta::assert_snapshot!(editor.options().height.css_value(), @"120px");
}
