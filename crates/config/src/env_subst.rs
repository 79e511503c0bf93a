/// Replace `${ENV_VAR}` placeholders in config string values.
///
/// Unresolvable variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace `${ENV_VAR}` placeholders using a custom lookup function.
///
/// This is the implementation used by [`substitute_env`]; the separate
/// signature makes it testable without mutating the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if name.is_empty() {
                    // Malformed, emit literal.
                    out.push_str("${}");
                } else {
                    match lookup(name) {
                        Some(val) => out.push_str(&val),
                        None => {
                            // Leave unresolved placeholder as-is.
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        },
                    }
                }
                rest = &after[end + 1..];
            },
            None => {
                // No closing brace, emit the remainder literally.
                out.push_str(&rest[start..]);
                return out;
            },
        }
    }

    out.push_str(rest);
    out
}
