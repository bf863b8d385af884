// Behaviour of a mounted editor driven the way a host would drive it

use std::cell::RefCell;
use std::rc::Rc;

use wee_rich_text::{
    ClipboardData, EditorOptions, FormatCommand, MemoryEnvironment, MemorySurface,
    NativeSupport, PasteOutcome, SelectionDispatcher, Surface, WeeRichText,
};

struct Fixture {
    _env: Rc<MemoryEnvironment>,
    dispatcher: SelectionDispatcher,
    editor: WeeRichText<MemorySurface>,
}

fn mount_with(options: EditorOptions, native: NativeSupport) -> Fixture {
    let env = MemoryEnvironment::new();
    let dispatcher = SelectionDispatcher::new();
    let surface = MemorySurface::new(&env).with_native_support(native);
    let editor = WeeRichText::mount(surface, options, &dispatcher);
    Fixture {
        _env: env,
        dispatcher,
        editor,
    }
}

fn mount(html: &str, native: NativeSupport) -> Fixture {
    let options = EditorOptions {
        initial_content: html.to_string(),
        ..EditorOptions::default()
    };
    mount_with(options, native)
}

fn record_changes(editor: &WeeRichText<MemorySurface>) -> Rc<RefCell<Vec<String>>> {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    editor.on_change(move |html| sink.borrow_mut().push(html.to_string()));
    changes
}

#[test]
fn set_content_round_trips_through_handle() {
    let fx = mount("<p>start</p>", NativeSupport::FULL);
    let handle = fx.editor.handle();
    let changes = record_changes(&fx.editor);

    for html in ["", "plain", "<p>a <b>b</b></p><br>", "<B>Shout</B>"] {
        handle.set_content(html);
        assert_eq!(handle.get_content(), html);
    }
    // The surface holds its own serialization; content stays verbatim
    assert_eq!(
        fx.editor.with_surface(|s| s.inner_html()),
        "<b>Shout</b>"
    );
    assert!(changes.borrow().is_empty());
}

#[test]
fn fallback_wraps_selected_text() {
    let fx = mount("say hello world", NativeSupport::NO_FORMATTING);
    fx.editor.with_surface(|s| s.select_text("hello"));

    assert!(fx.editor.click_tool(FormatCommand::Bold));
    insta::assert_snapshot!(fx.editor.content(), @"say <strong>hello</strong> world");
    assert_eq!(
        fx.editor.with_surface(|s| s.text_content()),
        "say hello world"
    );

    assert_eq!(fx.editor.tick(), 1);
    assert!(fx.editor.active_formats().contains(FormatCommand::Bold));
}

#[test]
fn fallback_on_collapsed_selection_changes_nothing() {
    let fx = mount("text", NativeSupport::NO_FORMATTING);
    let changes = record_changes(&fx.editor);
    fx.editor.with_surface(|s| s.place_caret(2));

    fx.editor.apply_format(FormatCommand::Italic);
    assert_eq!(fx.editor.content(), "text");
    assert!(changes.borrow().is_empty());
}

#[test]
fn native_formatting_reports_change_and_state() {
    let fx = mount("one two", NativeSupport::FULL);
    let changes = record_changes(&fx.editor);
    fx.editor.with_surface(|s| s.select_text("two"));

    fx.editor.apply_format(FormatCommand::StrikeThrough);
    insta::assert_snapshot!(fx.editor.content(), @"one <strike>two</strike>");
    assert_eq!(changes.borrow().len(), 1);

    // Toolbar state only follows once deferred detection ran
    assert!(!fx.editor.toolbar()[3].active);
    fx.editor.tick();
    assert!(fx.editor.toolbar()[3].active);
}

#[test]
fn failing_native_command_is_swallowed() {
    let native = NativeSupport {
        failing_commands: true,
        ..NativeSupport::FULL
    };
    let fx = mount("keep", native);
    let changes = record_changes(&fx.editor);
    fx.editor.with_surface(|s| s.select_all());

    fx.editor.apply_format(FormatCommand::Bold);
    assert_eq!(fx.editor.content(), "keep");
    assert_eq!(fx.editor.tick(), 0);
    assert!(changes.borrow().is_empty());
    assert!(fx.editor.with_surface(|s| s.has_focus()));
}

#[test]
fn disabled_editor_is_inert() {
    let options = EditorOptions {
        initial_content: "<b>x</b>y".to_string(),
        disabled: true,
        ..EditorOptions::default()
    };
    let fx = mount_with(options, NativeSupport::FULL);
    fx.editor.with_surface(|s| s.select_all());
    let before = fx.editor.active_formats();

    fx.editor.apply_format(FormatCommand::Bold);
    fx.editor.key_up();
    assert_eq!(fx.editor.content(), "<b>x</b>y");
    assert_eq!(fx.editor.active_formats(), before);
    assert!(fx.editor.toolbar().iter().all(|b| b.disabled));
    assert!(!fx.editor.with_surface(|s| s.is_editable()));
}

#[test]
fn paste_inserts_plain_text_only() {
    let fx = mount("ab", NativeSupport::FULL);
    let changes = record_changes(&fx.editor);
    fx.editor.with_surface(|s| s.place_caret(1));

    let outcome = fx
        .editor
        .paste(&ClipboardData::rich("plain text", "<b>plain</b> <i>text</i>"));
    assert_eq!(outcome, PasteOutcome::Inserted);
    assert!(outcome.prevents_default());
    insta::assert_snapshot!(fx.editor.content(), @"aplain textb");
    assert_eq!(*changes.borrow(), vec!["aplain textb".to_string()]);
}

#[test]
fn paste_replaces_selection() {
    let fx = mount("<i>old</i> tail", NativeSupport::FULL);
    fx.editor.with_surface(|s| s.select_text("old"));
    fx.editor.paste(&ClipboardData::plain("new"));
    assert_eq!(fx.editor.content(), "<i>new</i> tail");
}

#[test]
fn paste_over_whole_paragraph_stays_in_it() {
    let fx = mount("<p>ab</p><p>cd</p>", NativeSupport::FULL);
    fx.editor.with_surface(|s| s.select_text("cd"));
    fx.editor.paste(&ClipboardData::plain("x"));
    assert_eq!(fx.editor.content(), "<p>ab</p><p>x</p>");
}

#[test]
fn paste_across_paragraphs() {
    let fx = mount("<p>ab</p><p>cd</p>", NativeSupport::FULL);
    fx.editor.with_surface(|s| s.select(1, 3));
    fx.editor.paste(&ClipboardData::plain("x"));
    assert_eq!(fx.editor.content(), "<p>a</p>x<p>d</p>");

    fx.editor.with_surface(|s| s.select_all());
    fx.editor.paste(&ClipboardData::plain("y"));
    assert_eq!(fx.editor.content(), "y");
}

#[test]
fn fallback_from_inside_wrapper_lands_after_it() {
    let fx = mount("<b>hello</b> world", NativeSupport::NO_FORMATTING);
    fx.editor.with_surface(|s| s.select_text("lo wo"));
    fx.editor.apply_format(FormatCommand::Italic);
    insta::assert_snapshot!(fx.editor.content(), @"<b>hel</b><em>lo wo</em>rld");

    fx.editor.tick();
    let active = fx.editor.active_formats();
    assert!(active.contains(FormatCommand::Italic));
    assert!(!active.contains(FormatCommand::Bold));
}

#[test]
fn change_callback_can_use_the_handle() {
    let fx = mount("ab", NativeSupport::FULL);
    let handle = fx.editor.handle();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    fx.editor.on_change(move |html| {
        sink.borrow_mut()
            .push((html.to_string(), handle.get_content()));
        handle.focus();
    });
    fx.editor.with_surface(|s| s.place_caret(1));

    fx.editor.paste(&ClipboardData::plain("X"));
    assert_eq!(
        *seen.borrow(),
        vec![("aXb".to_string(), "aXb".to_string())]
    );
    assert!(fx.editor.with_surface(|s| s.has_focus()));
}

#[test]
fn paste_while_disabled_is_ignored() {
    let options = EditorOptions {
        disabled: true,
        ..EditorOptions::default()
    };
    let fx = mount_with(options, NativeSupport::FULL);
    let outcome = fx.editor.paste(&ClipboardData::plain("x"));
    assert_eq!(outcome, PasteOutcome::Ignored);
    assert!(!outcome.prevents_default());
    assert_eq!(fx.editor.content(), "");
}

#[test]
fn detection_is_idempotent() {
    let fx = mount("<u>under <em>both</em></u>", NativeSupport::FULL);
    fx.editor.with_surface(|s| s.place_caret(8));
    let first = fx.editor.refresh_formats();
    let second = fx.editor.refresh_formats();
    assert_eq!(first, second);
    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        vec![FormatCommand::Italic, FormatCommand::Underline]
    );
}

#[test]
fn structural_detection_maps_tags() {
    let cases = [
        ("<strong>ab</strong>", vec![FormatCommand::Bold]),
        ("<b>ab</b>", vec![FormatCommand::Bold]),
        ("<em>ab</em>", vec![FormatCommand::Italic]),
        ("<i>ab</i>", vec![FormatCommand::Italic]),
        ("<u>ab</u>", vec![FormatCommand::Underline]),
        ("<s>ab</s>", vec![FormatCommand::StrikeThrough]),
        ("<strike>ab</strike>", vec![FormatCommand::StrikeThrough]),
        ("<del>ab</del>", vec![FormatCommand::StrikeThrough]),
        (
            "<b><i>ab</i></b>",
            vec![FormatCommand::Bold, FormatCommand::Italic],
        ),
        ("<span>ab</span>", vec![]),
    ];

    for (html, expected) in cases {
        let fx = mount(html, NativeSupport::NO_FORMATTING);
        fx.editor.with_surface(|s| s.place_caret(1));
        let active = fx.editor.refresh_formats();
        assert_eq!(active.iter().collect::<Vec<_>>(), expected, "{html}");
    }
}

#[test]
fn structural_detection_reads_inline_style() {
    let fx = mount(
        r#"<span style="font-weight: 700; text-decoration: line-through">ab</span>"#,
        NativeSupport::NO_FORMATTING,
    );
    fx.editor.with_surface(|s| s.place_caret(1));
    let active = fx.editor.refresh_formats();
    assert_eq!(
        active.iter().collect::<Vec<_>>(),
        vec![FormatCommand::Bold, FormatCommand::StrikeThrough]
    );
}

#[test]
fn shortcut_then_typing_carries_format() {
    let options = EditorOptions {
        initial_content: "hello".to_string(),
        toolbar: false,
        ..EditorOptions::default()
    };
    let fx = mount_with(options, NativeSupport::FULL);
    assert!(fx.editor.toolbar().is_empty());
    fx.editor.with_surface(|s| s.place_caret(5));

    assert!(fx.editor.shortcut('b'));
    fx.editor.tick();
    assert!(fx.editor.active_formats().contains(FormatCommand::Bold));

    fx.editor.with_surface(|s| s.type_text(" world"));
    fx.editor.input();
    insta::assert_snapshot!(fx.editor.content(), @"hello<b> world</b>");
    fx.editor.tick();
    assert!(fx.editor.active_formats().contains(FormatCommand::Bold));
}

#[test]
fn hidden_tools_cannot_be_clicked() {
    let options = EditorOptions {
        initial_content: "abc".to_string(),
        tools: vec![FormatCommand::Bold],
        ..EditorOptions::default()
    };
    let fx = mount_with(options, NativeSupport::FULL);
    fx.editor.with_surface(|s| s.select_all());

    assert_eq!(fx.editor.toolbar().len(), 1);
    assert!(!fx.editor.click_tool(FormatCommand::Italic));
    assert_eq!(fx.editor.content(), "abc");
}

#[test]
fn selection_changes_only_touch_the_owning_editor() {
    let env = MemoryEnvironment::new();
    let dispatcher = SelectionDispatcher::new();
    let options = |html: &str| EditorOptions {
        initial_content: html.to_string(),
        ..EditorOptions::default()
    };
    let first = WeeRichText::mount(MemorySurface::new(&env), options("<b>bold</b>"), &dispatcher);
    let second = WeeRichText::mount(
        MemorySurface::new(&env),
        options("<i>italic</i>"),
        &dispatcher,
    );

    first.with_surface(|s| s.place_caret(2));
    assert_eq!(dispatcher.dispatch(), 2);
    assert!(first.active_formats().contains(FormatCommand::Bold));
    assert!(second.active_formats().is_empty());

    second.with_surface(|s| s.place_caret(2));
    dispatcher.dispatch();
    assert!(first.active_formats().contains(FormatCommand::Bold));
    assert!(second.active_formats().contains(FormatCommand::Italic));
}

#[test]
fn unmount_deregisters_and_disarms_handle() {
    let fx = mount("<b>x</b>", NativeSupport::FULL);
    let handle = fx.editor.handle();
    assert_eq!(fx.dispatcher.listener_count(), 1);
    assert!(fx.editor.is_subscribed());

    fx.editor.unmount();
    assert_eq!(fx.dispatcher.listener_count(), 0);
    assert_eq!(fx.dispatcher.dispatch(), 0);
    assert!(!handle.is_alive());
    assert_eq!(handle.get_content(), "");
    handle.set_content("ignored");
    handle.focus();
}

#[test]
fn detached_surface_degrades_quietly() {
    let fx = mount("<b>x</b>", NativeSupport::FULL);
    fx.editor.with_surface(|s| s.place_caret(1));
    fx.editor.refresh_formats();
    let before = fx.editor.active_formats();

    fx.editor.with_surface(|s| s.detach());
    fx.editor.apply_format(FormatCommand::Italic);
    fx.editor.mouse_up();
    assert_eq!(fx.editor.active_formats(), before);
    assert_eq!(fx.editor.content(), "<b>x</b>");
}

#[test]
fn handle_focus_and_blur_reach_surface() {
    let fx = mount("x", NativeSupport::FULL);
    let handle = fx.editor.handle();
    handle.focus();
    assert!(fx.editor.with_surface(|s| s.has_focus()));
    handle.blur();
    assert!(!fx.editor.with_surface(|s| s.has_focus()));
}
