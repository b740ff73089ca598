use std::sync::LazyLock;

use regex::Regex;

use crate::validate::validator::Validator;

// Variables are exposed as template bindings, so names must be plain identifiers.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

pub(crate) fn validate_name(v: &mut Validator, name: &str) {
    if name.is_empty() {
        v.push("$.name", "must not be empty");
    } else if !NAME_RE.is_match(name) {
        v.push(
            "$.name",
            format!("`{name}` is not a valid identifier (letters, digits and `_`, not starting with a digit)"),
        );
    }
}
