// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use richpad_engine::{Document, Editor, EditorSettings, MemoryStore};

/// Lines cycling through every shortcut prefix and a plain line
#[allow(dead_code)]
pub fn generate_lines(count: usize) -> Vec<String> {
    let prefixes = ["# ", "* ", "** ", "*** ", ""];
    (0..count)
        .map(|i| format!("{}line number {} with some text", prefixes[i % prefixes.len()], i))
        .collect()
}

/// Document built by typing each line and pressing return
#[allow(dead_code)]
pub fn generate_styled_document(lines: usize) -> Document {
    let mut editor = Editor::open(MemoryStore::new(), EditorSettings::default())
        .expect("empty store always opens");
    for line in generate_lines(lines) {
        editor.insert_text(&line);
        editor.handle_return();
    }
    editor.document().clone()
}
