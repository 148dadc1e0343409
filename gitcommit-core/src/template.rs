//! Branch-name template expansion
//!
//! Supports `${NAME}` and `$NAME` placeholders and `$$` as an escaped dollar
//! sign. Any other `$` is rejected.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SubstitutionError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))",
    )
    .expect("placeholder pattern is valid")
});

/// Expand `template` against `vars`.
///
/// # Errors
/// Returns [`SubstitutionError::UndefinedVariable`] when a placeholder names a
/// variable missing from `vars`, and [`SubstitutionError::InvalidPlaceholder`]
/// for a `$` that is not followed by `$`, an identifier, or `{identifier}`.
pub fn resolve_branch_name(
    template: &str,
    vars: &HashMap<String, String>,
) -> Result<String, SubstitutionError> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        result.push_str(&template[last..whole.start()]);
        last = whole.end();

        if caps.name("escaped").is_some() {
            result.push('$');
            continue;
        }

        let name = caps
            .name("named")
            .or_else(|| caps.name("braced"))
            .map(|m| m.as_str())
            .ok_or(SubstitutionError::InvalidPlaceholder(whole.start()))?;

        let value = vars
            .get(name)
            .ok_or_else(|| SubstitutionError::UndefinedVariable(name.to_string()))?;
        result.push_str(value);
    }

    result.push_str(&template[last..]);
    Ok(result)
}
