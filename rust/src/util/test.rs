use serde_json::{to_string_pretty, Value};
use similar::{ChangeTag, TextDiff};
use std::fs::{read, read_dir, File};
use std::path::Path;

/// Runs `tester` on every `<category>/<name>.js` fixture under `dir_in_src` and compares the
/// result against the JSON in `<category>/<name>.json`.
pub fn evaluate_test_input_files<T: Fn(Vec<u8>) -> Value>(dir_in_src: &str, tester: T) {
    let base_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join(dir_in_src);
    let mut evaluated = 0;
    for category in read_dir(&base_dir).unwrap() {
        let category = category.unwrap();
        if !category.file_type().unwrap().is_dir() {
            continue;
        };
        let mut inputs: Vec<_> = read_dir(category.path())
            .unwrap()
            .map(|f| f.unwrap().path())
            .filter(|p| p.extension().map_or(false, |e| e == "js"))
            .collect();
        inputs.sort();
        for input in inputs {
            let name = input.strip_prefix(&base_dir).unwrap().display().to_string();
            println!("Testing {}...", name);
            let actual = tester(read(&input).unwrap());
            let expected: Value =
                serde_json::from_reader(File::open(input.with_extension("json")).unwrap())
                    .unwrap();
            evaluated += 1;
            if actual == expected {
                continue;
            };
            let expected_fmt = to_string_pretty(&expected).unwrap();
            let actual_fmt = to_string_pretty(&actual).unwrap();
            let mut msg = format!("Failed {}, got:\n", name);
            for change in TextDiff::from_lines(&expected_fmt, &actual_fmt).iter_all_changes() {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                msg.push_str(sign);
                msg.push_str(change.as_str().unwrap());
            }
            panic!("{}", msg);
        }
    }
    assert!(evaluated > 0, "no fixtures found in {}", base_dir.display());
}
