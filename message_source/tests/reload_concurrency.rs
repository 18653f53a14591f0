//! Readers racing repeated reloads never observe a torn mapping.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use message_source::{
    CompositeMessageSource, MemoryResourceStore, MessageArgs, ResourceMessageProvider, langid,
};

const READERS: usize = 100;
const RELOADS: usize = 200;
const CODES: [&str; 3] = ["a.one", "a.two", "a.three"];

fn version(store: &MemoryResourceStore, generation: usize) {
    let value = format!("v{generation}");
    store.insert(
        "common_zh_CN",
        CODES.map(|code| (code.to_owned(), value.clone())),
    );
}

#[test]
fn concurrent_readers_see_whole_generations() {
    let store = Arc::new(MemoryResourceStore::new().with_resource("common_en", [("a.one", "en")]));
    version(&store, 0);
    let shared: Arc<MemoryResourceStore> = Arc::clone(&store);
    let common = ResourceMessageProvider::builder("common", shared)
        .default_locale(langid!("en"))
        .resource(langid!("en"), "common_en")
        .resource(langid!("zh-CN"), "common_zh_CN")
        .build()
        .expect("valid declaration");
    let messages = CompositeMessageSource::builder()
        .with_provider(common)
        .try_build()
        .expect("composite builds");
    let done = AtomicBool::new(false);
    let zh = langid!("zh-CN");

    thread::scope(|scope| {
        for reader in 0..READERS {
            let (messages_ref, done_ref, locale) = (&messages, &done, &zh);
            scope.spawn(move || {
                let args = MessageArgs::new();
                while !done_ref.load(Ordering::Acquire) {
                    let snapshot = messages_ref
                        .messages_for("common", locale)
                        .expect("provider is resource backed")
                        .expect("zh-CN is loaded");
                    let first = snapshot.get("a.one").expect("a.one is present");
                    assert!(
                        CODES.iter().all(|code| snapshot.get(*code) == Some(first)),
                        "reader {reader} saw a torn mapping: {snapshot:?}"
                    );
                    let resolved = messages_ref.message("a.two", Some(locale), &args);
                    assert!(resolved.starts_with('v'), "unexpected message {resolved:?}");
                }
            });
        }

        let failed: Vec<_> = (1..=RELOADS)
            .map(|generation| {
                version(&store, generation);
                messages.reload(["common_zh_CN"])
            })
            .filter(|report| !report.is_success())
            .collect();
        done.store(true, Ordering::Release);
        assert!(failed.is_empty(), "reloads failed: {failed:?}");
    });

    let expected = format!("v{RELOADS}");
    for code in CODES {
        assert_eq!(
            messages.message(code, Some(&zh), &MessageArgs::new()),
            expected,
            "{code} is stale after the last reload"
        );
    }
    assert_eq!(messages.stats().reloads, u64::try_from(RELOADS).expect("fits"));
}
