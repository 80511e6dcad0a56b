use menubot_dialog::{FsResources, MESSAGE_KEYS, Registry, Templates, quiz};
use std::path::Path;

fn shipped() -> FsResources {
    FsResources::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources"))
}

#[test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn every_referenced_template_ships() {
    let registry = Registry::default();
    let templates = Templates::load(&shipped(), &registry).expect("resources should load");

    for key in MESSAGE_KEYS {
        assert!(!templates.message(key).expect("message").trim().is_empty());
    }
    for persona in registry.personas() {
        assert!(templates.prompt(&persona.prompt_key).is_ok());
    }
}

#[test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn quiz_prompt_asks_for_the_exact_sentinel() {
    let templates =
        Templates::load(&shipped(), &Registry::default()).expect("resources should load");

    let prompt = templates.prompt("quiz").expect("quiz prompt");
    assert!(prompt.contains(&format!("\"{}\"", quiz::CORRECT_ANSWER)));
    for topic in Registry::default().topics() {
        assert!(prompt.contains(&topic.id), "quiz prompt misses {}", topic.id);
    }
}
