mod common;

use cash::{CompileOptions, Compiler, Head, declared_route, declared_routes, escape_html};
use common::{TestResult, init_logger, render, render_html};
use serde_json::{Value, json};

#[test]
fn test_interpolated_scalars_are_escaped_text() {
    assert_eq!(render_html("{$s}", json!({ "s": "a < b & c" })), "a &lt; b &amp; c");
    assert_eq!(render_html("{$n}", json!({ "n": 2.5 })), "2.5");
    assert_eq!(render_html("{$b}", json!({ "b": false })), "false");
    assert_eq!(escape_html(&json!("plain text")), "plain text");
}

#[test]
fn test_malformed_expressions_degrade() {
    let source = r#"<p $if="$a +">gone</p><i $for="$x in $a +">{$x}</i>[{$a +}]"#;
    assert_eq!(render_html(source, json!({ "a": 1 })), "[]");
}

#[test]
fn test_false_condition_removes_element_and_content() {
    let source = r#"<section $if="false"><h1>Title</h1><p>{$body}</p></section><footer>f</footer>"#;
    assert_eq!(
        render_html(source, json!({ "body": "x" })),
        "<footer>f</footer>"
    );
}

#[test]
fn test_loop_repeats_with_variable_visible_to_nested_directives() {
    let source = r#"<ul><li $for="$x in items"><b $if="$x.hot">!</b>{$x.name}</li></ul>"#;
    let data = json!({ "items": [
        { "name": "a", "hot": true },
        { "name": "b", "hot": false },
        { "name": "c", "hot": false },
    ]});
    assert_eq!(
        render_html(source, data),
        "<ul><li><b>!</b>a</li><li>b</li><li>c</li></ul>"
    );
}

#[test]
fn test_route_declarations_never_render() -> TestResult {
    let source = "$route \"/about\"\n<h1>About</h1>";
    let result = render(source, json!({}));
    assert!(!result.html.contains("$route"));
    assert!(!result.html.contains("/about"));
    assert_eq!(result.html, "<h1>About</h1>");
    assert_eq!(declared_route(source).ok_or("route missing")?, "/about");
    assert_eq!(declared_routes("<p>x</p>"), Vec::<String>::new());
    Ok(())
}

#[test]
fn test_action_forms_keep_other_attributes_in_order() {
    let source = r#"<form id="signup" $action="signup" class='wide' novalidate><button>Go</button></form>"#;
    assert_eq!(
        render_html(source, json!({})),
        r#"<form id="signup" class='wide' novalidate action="/__action/signup" method="post"><button>Go</button></form>"#
    );
}

#[test]
fn test_conditional_with_escaped_interpolation() {
    assert_eq!(
        render_html(
            r#"<p $if="$show">{$name}</p>"#,
            json!({ "show": true, "name": "<b>Al</b>" })
        ),
        "<p>&lt;b&gt;Al&lt;/b&gt;</p>"
    );
}

#[test]
fn test_simple_loop() {
    assert_eq!(
        render_html(r#"<li $for="$x in items">{$x}</li>"#, json!({ "items": ["a", "b"] })),
        "<li>a</li><li>b</li>"
    );
}

#[test]
fn test_head_block_is_extracted() {
    let result = render("$head { title: \"Hi\" }<p>body</p>", json!({}));
    assert_eq!(
        result.head,
        Head {
            title: Some("Hi".to_string()),
            meta: None,
        }
    );
    assert!(!result.html.contains("$head"));
    assert!(!result.html.contains("Hi"));
    assert_eq!(result.html, "<p>body</p>");
}

#[test]
fn test_nested_same_name_elements_under_conditionals() {
    let source = r#"<div $if="$open"><div class="inner"><div>deep</div></div></div><div>after</div>"#;
    assert_eq!(
        render_html(source, json!({ "open": false })),
        "<div>after</div>"
    );
    assert_eq!(
        render_html(source, json!({ "open": true })),
        r#"<div><div class="inner"><div>deep</div></div></div><div>after</div>"#
    );
}

#[test]
fn test_nested_loops_expand_fully() {
    let source = r#"<table><tr $for="$row, $r in rows"><td $for="$cell, $c in $row">{$r}.{$c}={$cell}</td></tr></table>"#;
    let data = json!({ "rows": [["a", "b"], ["c"]] });
    assert_eq!(
        render_html(source, data),
        "<table><tr><td>0.0=a</td><td>0.1=b</td></tr><tr><td>1.0=c</td></tr></table>"
    );
}

#[test]
fn test_loop_output_is_not_interpolated_twice() {
    let source = r#"<p $for="$m in messages">{$m}</p>"#;
    let data = json!({ "messages": ["{$secret}"], "secret": "leaked" });
    assert_eq!(render_html(source, data), "<p>{$secret}</p>");
}

#[test]
fn test_context_is_not_mutated() {
    init_logger();
    let data = json!({ "x": "outer", "items": [1, 2] });
    let before = data.clone();
    let result = cash::compile(r#"<i $for="$x in items">{$x}</i>{$x}"#, &data);
    assert_eq!(result.html, "<i>1</i><i>2</i>outer");
    assert_eq!(data, before);
}

#[test]
fn test_unclosed_directive_elements_are_left_as_written() {
    let source = r#"<div><p $if="false">text</div>"#;
    assert_eq!(render_html(source, json!({})), source);
}

#[test]
fn test_full_page_document() -> TestResult {
    let source = r#"$route "/blog"
$head {
  title: "Blog & News",
  meta: [{ name: "description", content: "Posts" }],
}
<main>
  <article $for="$post in posts" $if="$post.published">
    <h2><a href="/blog/{$post.slug}">{$post.title}</a></h2>
  </article>
  <p $if="posts.length == 0">Nothing yet.</p>
</main>"#;
    let data: Value = serde_json::from_str(
        r#"{ "posts": [
            { "slug": "one", "title": "First", "published": true },
            { "slug": "two", "title": "Draft", "published": false }
        ] }"#,
    )?;

    let result = render(source, data);
    assert_eq!(
        result.html,
        "<main>\n  <article>\n    <h2><a href=\"/blog/one\">First</a></h2>\n  </article>\n  \n</main>"
    );
    assert_eq!(
        result.to_document(),
        format!(
            "<!doctype html><html><head><title>Blog &amp; News</title>\n<meta name=\"description\" content=\"Posts\"></head><body>{}</body></html>",
            result.html
        )
    );
    Ok(())
}

#[test]
fn test_compiler_options_from_json() -> TestResult {
    init_logger();
    let options: CompileOptions = serde_json::from_value(json!({
        "actionPrefix": "/rpc/",
        "actionMethod": "post",
    }))?;
    let compiler = Compiler::new(options);
    let result = compiler.compile(r#"<form $action="ping"></form>"#, &json!({}));
    assert_eq!(result.html, r#"<form action="/rpc/ping" method="post"></form>"#);
    Ok(())
}

#[test]
fn test_deeply_nested_expressions_fall_back() {
    let parens = |depth: usize| format!("{}true{}", "(".repeat(depth), ")".repeat(depth));
    let shallow = format!(r#"<p $if="{}">y</p>"#, parens(20));
    assert_eq!(render_html(&shallow, json!({})), "<p>y</p>");

    for depth in [80, 10_000] {
        let source = format!(r#"<p $if="{}">y</p>[{{${}}}]"#, parens(depth), parens(depth));
        assert_eq!(render_html(&source, json!({})), "[]");
    }
    let negations = format!("<i $for=\"$x in {}items\">{{$x}}</i>|", "!".repeat(10_000));
    assert_eq!(render_html(&negations, json!({ "items": [1] })), "|");
}

#[test]
fn test_deeply_nested_markup_renders() {
    let depth = 2_000;
    let opening = "<div>".repeat(depth);
    let closing = "</div>".repeat(depth);
    let source = format!(
        r#"{}<b $if="$show">{{$word}}</b>{}<p $if="false">gone</p>"#,
        opening, closing
    );
    // Tags past the nesting limit are emitted as written, directives
    // included; placeholders in their text are still substituted.
    assert_eq!(
        render_html(&source, json!({ "show": true, "word": "hi" })),
        format!(r#"{}<b $if="$show">hi</b>{}"#, opening, closing)
    );
}

#[test]
fn test_attributes_without_separating_whitespace() {
    assert_eq!(
        render_html(r#"<a href="x"class="y" $if="false">z</a>|"#, json!({})),
        "|"
    );
    assert_eq!(
        render_html(r#"<a href="/u/{$id}"class="y"$if="true">z</a>"#, json!({ "id": 3 })),
        r#"<a href="/u/3"class="y">z</a>"#
    );
}

#[test]
fn test_head_scalars_are_kept_as_text() {
    let result = render(
        r#"$head { title: "Hi", meta: [{ name: "viewport", content: 1 }] }"#,
        json!({}),
    );
    assert_eq!(result.head.title.as_deref(), Some("Hi"));
    assert_eq!(
        result.head.to_html(),
        "<title>Hi</title>\n<meta name=\"viewport\" content=\"1\">"
    );
}

#[test]
fn test_form_without_action_name_is_untouched() {
    let source = r#"<form $action="" class="c"></form>"#;
    assert_eq!(render_html(source, json!({})), source);
}

#[test]
fn test_compiler_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compiler>();

    init_logger();
    let compiler = Compiler::default();
    let source = r#"<li $for="$x in items">{$x}</li>"#;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let compiler = &compiler;
                scope.spawn(move || compiler.compile(source, &json!({ "items": [n, n + 1] })).html)
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let html = handle.join().expect("compile thread panicked");
            assert_eq!(html, format!("<li>{}</li><li>{}</li>", n, n + 1));
        }
    });
}
