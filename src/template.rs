use serde_json::Value;

use crate::error::FormatError;

/// Render a printf-style message template against positional arguments.
///
/// Supported directives are `%s`, `%d` and the literal `%%`. An arity
/// mismatch or an unsupported directive is a caller bug and returns
/// [`FormatError::Template`] instead of being papered over.
pub fn render_message(template: &str, args: &[Value]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut next = 0usize;
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('s') | Some('d') => {
                let arg = args.get(next).ok_or_else(|| {
                    FormatError::Template(format!("not enough arguments for {template:?}"))
                })?;
                out.push_str(&display_value(arg));
                next += 1;
            }
            Some(other) => {
                return Err(FormatError::Template(format!(
                    "unsupported directive %{other} in {template:?}"
                )));
            }
            None => {
                return Err(FormatError::Template(format!(
                    "dangling % at end of {template:?}"
                )));
            }
        }
    }

    if next != args.len() {
        return Err(FormatError::Template(format!(
            "not all arguments converted for {template:?}"
        )));
    }
    Ok(out)
}

/// Strings render bare, everything else in its JSON form.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_positional_args() {
        let out = render_message("hello %s", &[json!("world")]).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn numbers_via_percent_d() {
        let out = render_message("retry %d of %d", &[json!(2), json!(5)]).unwrap();
        assert_eq!(out, "retry 2 of 5");
    }

    #[test]
    fn literal_percent() {
        assert_eq!(render_message("100%% done", &[]).unwrap(), "100% done");
    }

    #[test]
    fn too_few_arguments_is_an_error() {
        assert!(render_message("hello %s", &[]).is_err());
    }

    #[test]
    fn leftover_arguments_is_an_error() {
        assert!(render_message("hello", &[json!(1)]).is_err());
    }

    #[test]
    fn unknown_directive_is_an_error() {
        assert!(render_message("%q", &[json!(1)]).is_err());
    }
}
