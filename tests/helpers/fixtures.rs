//! Document sources used across tests.

/// `vocabulary <{namespace}> as {prefix} { {body} }`, one member per line.
pub fn vocabulary(namespace: &str, prefix: &str, body: &[&str]) -> String {
    document("vocabulary", namespace, prefix, body)
}

/// `description <{namespace}> as {prefix} { {body} }`, one member per line.
pub fn description(namespace: &str, prefix: &str, body: &[&str]) -> String {
    document("description", namespace, prefix, body)
}

fn document(keyword: &str, namespace: &str, prefix: &str, body: &[&str]) -> String {
    let mut text = format!("{keyword} <{namespace}> as {prefix} {{\n");
    for line in body {
        text.push('\t');
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("}\n");
    text
}

/// A declares `Foo`; B imports A as `a` and declares `Bar`.
pub fn a_and_b() -> [(&'static str, String); 2] {
    [
        ("A.oml", vocabulary("ns:a", "a", &["concept Foo"])),
        (
            "B.oml",
            vocabulary("ns:b", "b", &["extends <ns:a> as a", "concept Bar < a:Foo"]),
        ),
    ]
}
