/// Prefix every non-empty line of `text` with `spaces` spaces.
///
/// Blank lines stay blank and a trailing newline is preserved, so the
/// helper can be applied uniformly to plain text and to YAML output
/// that already contains embedded newlines.
pub fn indentation(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let mut out = String::with_capacity(text.len() + spaces * 8);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_every_line() {
        assert_eq!(indentation("a\nb\nc", 2), "  a\n  b\n  c");
    }

    #[test]
    fn four_spaces() {
        assert_eq!(indentation("File \"x\", line 1, in f", 4), "    File \"x\", line 1, in f");
    }

    #[test]
    fn preserves_trailing_newline() {
        assert_eq!(indentation("stack_trace:\n", 2), "  stack_trace:\n");
    }

    #[test]
    fn blank_lines_stay_blank() {
        assert_eq!(indentation("a\n\nb", 2), "  a\n\n  b");
    }
}
