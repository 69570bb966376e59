
use fixtures::{generate_random_whitespace, generate_random_whitespace_at_least_one, get_engine};
use temple::{
    BuildConfig, Context, Engine, EvalError, InheritanceError, ParseErrorKind, TempleError,
    Template, Value, build, evaluate,
};
use tracing_test::traced_test;

#[test]
#[ntest::timeout(100)]
fn test_basic_substitution() {
    let engine = get_engine(&[("Template A", "Hello {{ name }}!")]);
    let context = Context::new().insert("name", "World").to_owned();

    let rendered = engine.compile("Template A", Some(&context)).unwrap();

    assert_eq!(
        rendered.root(),
        "Hello World!",
        "Rendered string should match the template."
    );
}

#[test]
#[ntest::timeout(100)]
fn test_marker_whitespace_is_insignificant() {
    let template = format!(
        "{{{{{}name{}}}}}|{{%{}if{}flag{}%}}yes{{%{}else{}%}}no{{%{}endblock{}%}}",
        generate_random_whitespace(),
        generate_random_whitespace(),
        generate_random_whitespace(),
        generate_random_whitespace_at_least_one(),
        generate_random_whitespace(),
        generate_random_whitespace(),
        generate_random_whitespace(),
        generate_random_whitespace(),
        generate_random_whitespace(),
    );
    dbg!(&template);

    let engine = get_engine(&[("t", template.as_str())]);
    let context = Context::new()
        .insert("name", "Ada")
        .insert("flag", false)
        .to_owned();

    assert_eq!(engine.compile("t", Some(&context)).unwrap().root(), "Ada|no");
}

#[test]
#[ntest::timeout(100)]
fn test_plain_html_is_unchanged() {
    let source = "<!doctype html>\n<html>\n  <style>p { color: red; }</style>\n</html>\n";
    let engine = get_engine(&[("page", source)]);
    assert_eq!(engine.compile("page", None).unwrap().root(), source);
}

#[test]
#[ntest::timeout(100)]
fn test_conditional_by_age() {
    let engine = get_engine(&[(
        "age",
        "{% if age >= 18 %}adult{% else %}minor{% endblock %}",
    )]);

    for (age, expected) in [(16, "minor"), (18, "adult"), (21, "adult")] {
        let context = Context::new().insert("age", age).to_owned();
        assert_eq!(
            engine.compile("age", Some(&context)).unwrap().root(),
            expected,
            "age {age}"
        );
    }
}

#[test]
#[ntest::timeout(100)]
fn test_chained_comparison() {
    for (x, expected) in [(11, false), (7, true), (4, true), (10, false), (3, false)] {
        let context = Context::new().insert("x", x).to_owned();
        assert_eq!(
            evaluate("4 <= x < 10", Some(&context)).unwrap(),
            Value::Bool(expected),
            "x = {x}"
        );
    }
}

#[test]
#[ntest::timeout(100)]
fn test_expression_rendering() {
    let engine = get_engine(&[(
        "math",
        "{{ 7 / 2 }} {{ 2 ** 10 }} {{ -7 % 3 }} {{ 'ab' * 2 }} {{ 1 < 2 }}",
    )]);
    assert_eq!(engine.compile("math", None).unwrap().root(), "3.5 1024 2 abab true");
}

#[test]
#[ntest::timeout(100)]
fn test_string_equality_and_rejected_calls() {
    assert_eq!(evaluate("'a' == 'a'", None).unwrap(), Value::Bool(true));
    assert!(matches!(
        evaluate("__import__('os')", None),
        Err(EvalError::Unsupported { .. })
    ));

    let engine = get_engine(&[("evil", "{{ open('/etc/passwd') }}")]);
    assert!(matches!(
        engine.compile("evil", None),
        Err(TempleError::Eval(EvalError::Unsupported { .. }))
    ));
}

#[test]
#[ntest::timeout(100)]
fn test_block_inheritance() {
    let engine = get_engine(&[
        ("base.html", "<p>{% insert \"greeting\" %}{% endblock %}</p>"),
        (
            "child.html",
            "{% extends \"base.html\" %}{% block \"greeting\" %}Hi{% endblock %}",
        ),
    ]);

    let output = engine.compile("child.html", None).unwrap();
    assert_eq!(output.root(), "<p>Hi</p>");
}

#[test]
#[ntest::timeout(100)]
fn test_inheritance_with_several_regions() {
    let engine = get_engine(&[
        (
            "layout",
            "<title>{% insert title %}Default{% endblock %}</title>\n<main>{% insert body %}{% endblock %}</main>",
        ),
        (
            "page",
            "{% extends layout %}{% insert body %}{% if user %}Hello {{ user }}{% else %}Hello stranger{% endblock %}{% endblock %}",
        ),
    ]);

    let context = Context::new().insert("user", "Ada").to_owned();
    assert_eq!(
        engine.compile("page", Some(&context)).unwrap().root(),
        "<title></title>\n<main>Hello Ada</main>"
    );
    assert_eq!(
        engine.compile("page", None).unwrap().root(),
        "<title></title>\n<main>Hello stranger</main>"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_multi_level_inheritance() {
    let engine = get_engine(&[
        ("root", "[{% insert content %}{% endblock %}]"),
        (
            "middle",
            "{% extends root %}{% insert content %}<{% insert inner %}{% endblock %}>{% endblock %}",
        ),
        ("leaf", "{% extends middle %}{% insert inner %}leaf{% endblock %}"),
    ]);
    assert_eq!(engine.compile("leaf", None).unwrap().root(), "[<leaf>]");
}

#[test]
#[ntest::timeout(100)]
fn test_inheritance_cycle_detected() {
    let engine = get_engine(&[
        ("a.html", "{% extends b.html %}"),
        ("b.html", "{% extends a.html %}"),
    ]);

    match engine.compile("a.html", None) {
        Err(TempleError::Inheritance(InheritanceError::Cycle { chain })) => {
            assert_eq!(chain, vec!["a.html", "b.html", "a.html"]);
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
#[ntest::timeout(100)]
fn test_parse_errors() {
    let cases = [
        ("{% if x %}open", "unterminated if"),
        ("{% endblock %}", "stray endblock"),
        ("{% else %}", "stray else"),
        ("{% for x in y %}{% endblock %}", "unknown keyword"),
        ("{% %}", "empty marker"),
        ("{% insert %}{% endblock %}", "missing name"),
    ];

    for (source, description) in cases {
        assert!(
            matches!(Template::new(source), Err(TempleError::Parse(_))),
            "{description} should fail to parse"
        );
    }

    match Template::new("line one\n{% frobnicate %}") {
        Err(TempleError::Parse(error)) => {
            assert_eq!(error.line, 2);
            assert!(matches!(error.kind, ParseErrorKind::UnknownKeyword { .. }));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
#[ntest::timeout(100)]
fn test_unterminated_marker_is_literal() {
    let engine = get_engine(&[("t", "a {{ b")]);
    assert_eq!(engine.compile("t", None).unwrap().root(), "a {{ b");
}

#[test]
#[ntest::timeout(100)]
fn test_missing_entry_template() {
    let engine = get_engine(&[]);
    assert!(matches!(
        engine.compile("nothing", None),
        Err(TempleError::MissingTemplate { .. })
    ));
}

#[test]
#[ntest::timeout(2000)]
fn test_file_engine() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("layouts")).unwrap();
    std::fs::write(
        dir.path().join("layouts/base.html"),
        "<body>{% insert main %}{% endblock %}</body>",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "{% extends layouts/base.html %}{% insert main %}{{ n * 3 }}{% endblock %}",
    )
    .unwrap();

    let engine = Engine::from_files();
    let context = Context::new().insert("n", 14).to_owned();
    let output = engine
        .compile(&dir.path().join("index.html").display().to_string(), Some(&context))
        .unwrap();
    assert_eq!(output.root(), "<body>42</body>");
}

#[test]
#[traced_test]
#[ntest::timeout(2000)]
fn test_build_logs_outcomes() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(src.path().join("good.html"), "ok").unwrap();
    std::fs::write(src.path().join("bad.html"), "{{ x. }}").unwrap();

    let report = build(&BuildConfig {
        source_root: src.path().to_path_buf(),
        pattern: "*.html".to_string(),
        output_dir: out.path().to_path_buf(),
        variables: Context::new(),
    })
    .unwrap();

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(logs_contain("wrote template"));
    assert!(logs_contain("failed to build template"));
}
