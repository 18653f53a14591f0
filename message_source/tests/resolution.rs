//! End-to-end resolution over `.properties` files on disk.

use std::sync::Arc;

use anyhow::Result;
use message_source::{
    CompositeMessageSource, DirResourceStore, FixedLocale, I18nSettings, MessageArgs,
    ResourceStore, langid, properties,
};
use rstest::{fixture, rstest};
use test_helpers::resources::ResourceTree;

const SETTINGS: &str = r#"
default_locale = "en"
missing_message = "code"

[[providers]]
source = "app"
priority = 10
resources = { en = "app/messages_en.properties" }

[[providers]]
source = "common"
priority = 0
resources = { en = "common/messages_en.properties", zh-CN = "common/messages_zh_CN.properties" }
"#;

#[fixture]
fn tree() -> ResourceTree {
    ResourceTree::new()
        .and_then(|tree| tree.with_file("i18n.toml", SETTINGS))
        .and_then(|tree| {
            tree.with_file(
                "common/messages_en.properties",
                "# shared messages\na.greeting = Hi, {}\nfarewell: Bye\n",
            )
        })
        .and_then(|tree| {
            tree.with_file(
                "common/messages_zh_CN.properties",
                "a.greeting = \\u4f60\\u597d, {}\n",
            )
        })
        .and_then(|tree| {
            tree.with_file(
                "app/messages_en.properties",
                "a.greeting = Hello\nb.only = Only \\\n    in app\n",
            )
        })
        .expect("resource tree is written")
}

fn build(tree: &ResourceTree) -> Result<CompositeMessageSource> {
    let path = tree.root().join("i18n.toml");
    let settings = I18nSettings::load(Some(path.as_path()))?;
    let store: Arc<dyn ResourceStore> = Arc::new(DirResourceStore::open(tree.root())?);
    Ok(settings.build_composite(&store, Arc::new(FixedLocale::new(langid!("zh-CN"))))?)
}

#[rstest]
fn files_resolve_in_priority_order(tree: ResourceTree) -> Result<()> {
    let messages = build(&tree)?;
    let args = MessageArgs::new().with("Ada");

    assert_eq!(messages.message("a.greeting", None, &args), "你好, Ada");
    assert_eq!(messages.message("a.greeting", Some(&langid!("en-AU")), &args), "Hi, Ada");
    assert_eq!(messages.message("farewell", Some(&langid!("zh-CN")), &args), "Bye");
    assert_eq!(messages.message("b.only", None, &args), "Only in app");
    assert_eq!(messages.message("nope", None, &args), "nope");
    Ok(())
}

#[rstest]
fn edited_files_are_picked_up_by_reload(tree: ResourceTree) -> Result<()> {
    let messages = build(&tree)?;
    let args = MessageArgs::new().with("Ada");
    assert_eq!(messages.message("a.greeting", None, &args), "你好, Ada");

    tree.write("common/messages_zh_CN.properties", "a.greeting = 您好, {}\n")?;
    let report = messages.reload(["common/messages_zh_CN.properties"]);

    assert!(report.is_success(), "{report:?}");
    assert_eq!(messages.message("a.greeting", None, &args), "您好, Ada");
    Ok(())
}

#[rstest]
fn broken_files_keep_the_previous_messages(tree: ResourceTree) -> Result<()> {
    let messages = build(&tree)?;
    tree.write("common/messages_en.properties", "orphaned-key\n")?;

    let report = messages.reload(["common/messages_en.properties"]);

    let [failure] = report.failures() else {
        panic!("expected one failure: {report:?}");
    };
    assert_eq!(failure.provider, "common");
    assert_eq!(
        messages.message("farewell", Some(&langid!("en")), &MessageArgs::new()),
        "Bye"
    );
    Ok(())
}

#[rstest]
fn missing_files_fail_the_build(tree: ResourceTree) -> Result<()> {
    tree.remove("app/messages_en.properties")?;

    let err = build(&tree).expect_err("app resource is missing");
    let chain = format!("{err:#}");
    assert!(chain.contains("app/messages_en.properties"), "{chain}");
    Ok(())
}

#[rstest]
fn put_message_persists_the_whole_resource(tree: ResourceTree) -> Result<()> {
    let messages = build(&tree)?;

    messages.put_message("common", &langid!("zh-CN"), "farewell", "再见")?;

    assert_eq!(messages.message("farewell", None, &MessageArgs::new()), "再见");
    let written = properties::parse("zh_CN", &tree.read("common/messages_zh_CN.properties")?)?;
    assert_eq!(written.get("farewell").map(String::as_str), Some("再见"));
    assert_eq!(written.get("a.greeting").map(String::as_str), Some("你好, {}"));
    Ok(())
}

#[rstest]
fn identifiers_cannot_escape_the_root(tree: ResourceTree) -> Result<()> {
    let store = DirResourceStore::open(tree.root())?;
    let err = store
        .load("../outside.properties")
        .expect_err("path escapes the root");
    assert!(err.to_string().contains("../outside.properties"), "{err}");
    Ok(())
}
