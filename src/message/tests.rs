use super::*;

fn classify_default(status: &str, diff: &str) -> Classification {
    classify(status, diff, &Keywords::default(), usize::MAX)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn test_function_added_is_named() {
    let diff = "diff --git a/app.py b/app.py\n+++ b/app.py\n+def validate(x):\n+    return x";
    let result = classify_default("M  app.py", diff);

    assert_eq!(result.message, "Добавил функцию validate");
    assert!(result.decisive);
}

#[test]
fn test_new_python_files_beat_docs() {
    let result = classify_default("A  script.py\nA  notes.md", "");

    assert_eq!(result.message, "Добавил Python-скрипты (2 файла)");
    assert!(!result.decisive);
}

#[test]
fn test_bug_fix_beats_function() {
    let diff = "+fix bug in parser\n+def helper():";
    let result = classify_default("M  parser.py", diff);

    assert_eq!(result.message, "Исправил ошибку");
}

#[test]
fn test_bug_fix_counts_use_plural_forms() {
    let mut analysis = DiffAnalysis {
        bug_fixes: names(&["fix a", "fix b", "fix c"]),
        functions_added: names(&["helper"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Исправил 3 ошибки");

    analysis.bug_fixes = names(&["x"; 5]);
    assert_eq!(synthesize(&analysis).unwrap(), "Исправил 5 ошибок");
}

#[test]
fn test_function_name_length_limit() {
    let analysis = DiffAnalysis {
        functions_added: names(&["a_really_long_function_name"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Добавил функцию");

    let analysis = DiffAnalysis {
        functions_added: names(&["one", "two"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Добавил 2 функции");
}

#[test]
fn test_classes_and_removed_functions() {
    let analysis = DiffAnalysis {
        classes_added: names(&["Parser"]),
        functions_removed: names(&["old"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Добавил класс Parser");

    let analysis = DiffAnalysis {
        classes_added: names(&["A", "B", "C", "D", "E"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Добавил 5 классов");

    let analysis = DiffAnalysis {
        functions_removed: names(&["old"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Удалил функцию old");

    let analysis = DiffAnalysis {
        functions_removed: names(&["a", "b"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Удалил 2 функции");
}

#[test]
fn test_import_messages() {
    let added = DiffAnalysis {
        imports_added: names(&["import os"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&added).unwrap(), "Добавил импорты");

    let removed = DiffAnalysis {
        imports_removed: names(&["import os"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&removed).unwrap(), "Удалил импорты");

    let both = DiffAnalysis {
        imports_added: names(&["import sys"]),
        imports_removed: names(&["import os"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&both).unwrap(), "Обновил импорты");
}

#[test]
fn test_category_priority() {
    let analysis = DiffAnalysis {
        features: names(&["new feature"]),
        style_changes: names(&["color"]),
        config_changes: names(&["config"]),
        test_changes: names(&["assert"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Обновил тесты");

    let analysis = DiffAnalysis {
        features: names(&["new feature"]),
        style_changes: names(&["color"]),
        config_changes: names(&["config"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Обновил конфигурацию");

    let analysis = DiffAnalysis {
        features: names(&["new feature"]),
        style_changes: names(&["color"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Обновил стили");

    let analysis = DiffAnalysis {
        features: names(&["new feature"]),
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&analysis).unwrap(), "Добавил новый функционал");
}

#[test]
fn test_line_balance() {
    let grew = DiffAnalysis {
        lines_added: 10,
        lines_removed: 3,
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&grew).unwrap(), "Добавил 10 строк кода");

    let shrank = DiffAnalysis {
        lines_added: 1,
        lines_removed: 21,
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&shrank).unwrap(), "Удалил 21 строку кода");

    let balanced = DiffAnalysis {
        lines_added: 4,
        lines_removed: 4,
        ..DiffAnalysis::default()
    };
    assert_eq!(synthesize(&balanced), None);
    assert_eq!(synthesize(&DiffAnalysis::default()), None);
}

#[test]
fn test_plural() {
    let forms = |n| plural(n, "файл", "файла", "файлов");
    assert_eq!(forms(1), "файл");
    assert_eq!(forms(3), "файла");
    assert_eq!(forms(5), "файлов");
    assert_eq!(forms(11), "файлов");
    assert_eq!(forms(12), "файлов");
    assert_eq!(forms(21), "файл");
    assert_eq!(forms(24), "файла");
    assert_eq!(forms(111), "файлов");
}

#[test]
fn test_file_kind_sniffing() {
    assert_eq!(FileKind::of("tests/test_api.py"), FileKind::Test);
    assert_eq!(FileKind::of("tool.py"), FileKind::Python);
    assert_eq!(FileKind::of("src/main.rs"), FileKind::Source);
    assert_eq!(FileKind::of("index.html"), FileKind::Markup);
    assert_eq!(FileKind::of("site.scss"), FileKind::Stylesheet);
    assert_eq!(FileKind::of("README.md"), FileKind::Docs);
    assert_eq!(FileKind::of("settings.yaml"), FileKind::Config);
    assert_eq!(FileKind::of(".gitignore"), FileKind::Config);
    assert_eq!(FileKind::of("logo.png"), FileKind::Other);
}

fn fallback_for(status: &str, diff: &str) -> String {
    fallback(&status::bucket(status), diff, &Keywords::default())
}

#[test]
fn test_fallback_new_files() {
    assert_eq!(fallback_for("?? docs/guide.md", ""), "Добавил документацию guide.md");
    assert_eq!(
        fallback_for("?? a.css\nA  b.css", ""),
        "Добавил стили (2 файла)"
    );
    assert_eq!(
        fallback_for("A  test_api.py\nA  api.py", ""),
        "Добавил тесты (2 файла)"
    );
    assert_eq!(fallback_for("A  logo.png", ""), "Добавил файл logo.png");
}

#[test]
fn test_fallback_new_files_win_over_modified() {
    assert_eq!(
        fallback_for("M  main.rs\n?? config.toml", ""),
        "Добавил конфигурацию config.toml"
    );
}

#[test]
fn test_fallback_modified_uses_diff_hints() {
    let diff = "diff --git a/app.py b/app.py\n+++ b/app.py\n def run(self):\n-    x = 1\n+    x = 2";
    assert_eq!(fallback_for("M  app.py", diff), "Обновил функции в app.py");

    let diff = "+++ b/a.py\n-    style = old\n+    style = new";
    assert_eq!(
        fallback_for("M  a.py\nM  b.py\nM  c.py", diff),
        "Обновил стили в 3 файлах"
    );
}

#[test]
fn test_fallback_modified_without_hints_uses_file_kind() {
    assert_eq!(fallback_for("M  src/page.html", "+<p>hi</p>"), "Обновил шаблон page.html");
    assert_eq!(fallback_for(" M a.bin\n M b.bin", ""), "Обновил 2 файла");
}

#[test]
fn test_fallback_deleted_and_renamed() {
    assert_eq!(fallback_for("D  old.py", ""), "Удалил old.py");
    assert_eq!(fallback_for("D  a.py\nD  b.py", ""), "Удалил 2 файла");
    assert_eq!(
        fallback_for("R  src/old.rs -> src/new.rs", ""),
        "Переименовал new.rs"
    );
}

#[test]
fn test_fallback_catch_all() {
    assert_eq!(fallback_for("", ""), CATCH_ALL_MESSAGE);
    assert_eq!(fallback_for("UU conflict.rs", ""), CATCH_ALL_MESSAGE);
}

#[test]
fn test_messages_start_with_a_commit_verb() {
    let cases = [
        ("M  app.py", "+def validate(x):"),
        ("A  script.py\nA  notes.md", ""),
        ("D  a.py", ""),
        ("R  a.py -> b.py", ""),
        ("", ""),
    ];
    for (status, diff) in cases {
        let result = classify_default(status, diff);
        assert!(
            sanitize::starts_with_verb(&result.message),
            "{:?} does not start with a commit verb",
            result.message
        );
    }
}

#[test]
fn test_long_names_are_fitted() {
    let name = "a".repeat(60);
    let result = classify_default(&format!("D  {name}.py"), "");
    assert!(result.message.chars().count() <= crate::constants::MAX_MESSAGE_CHARS);
}
