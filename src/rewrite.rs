//! Field-path attribute rewriter.
//!
//! Component source files carry a `data-nlv-field-path={...}` attribute that
//! binds markup to a CMS document field. The visual editor stopped accepting
//! the bare attribute; each occurrence must become a spread of
//! `getVisualEditorAttributes(...)` over the same expression:
//!
//! ```text
//! data-nlv-field-path={fieldPath}
//!     becomes
//! {...getVisualEditorAttributes(fieldPath)}
//! ```
//!
//! The expression between the braces is arbitrary JSX-side JavaScript, so the
//! scanner cannot just count braces: `'}'` inside a string literal and the
//! braces of a `${...}` template interpolation must be opaque to the depth
//! count. A small stack of lexical states handles this; no full JS parser is
//! needed because the grammar only has to be tracked well enough to find one
//! balancing close brace.
//!
//! Rewritten text no longer contains the marker, so running the transform on
//! its own output is a no-op. That is the intended idempotence property —
//! there is no inverse transform.
//!
//! The transform is pure; [`rewrite_file`] is the only function here that
//! touches disk, and it writes only when the text actually changed.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// The attribute prefix the scanner searches for, opening brace included.
pub const MARKER: &str = "data-nlv-field-path={";

/// Call the extracted expression is wrapped in.
const WRAPPER: &str = "getVisualEditorAttributes";

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unterminated field-path expression at byte {0}")]
    Unterminated(usize),
}

/// Result of transforming one text buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    /// Transformed text (identical to the input when `changed` is false).
    pub text: String,
    /// Whether any marker occurrence was rewritten.
    pub changed: bool,
}

/// Lexical state while scanning an expression. The scanner only models as
/// much of JavaScript as brace counting requires.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LexState {
    /// Plain expression text: quotes and braces are meaningful.
    Default,
    /// Inside `'...'`: everything except `\` and the closing quote is opaque.
    SingleQuote,
    /// Inside `"..."`.
    DoubleQuote,
    /// Inside a template literal body: braces are opaque until `${`.
    Template,
    /// Inside `${...}` of a template literal. `return_depth` is the brace
    /// depth at the `${`, so the interpolation's own braces are balanced
    /// independently of the outer expression.
    TemplateExpr { return_depth: usize },
}

/// Rewrite every marker occurrence in `text`.
///
/// Unmatched spans pass through byte-for-byte. Fails if any occurrence has
/// no balancing close brace before end of input — the file is malformed or
/// truncated and cannot be rewritten safely.
pub fn rewrite(text: &str) -> Result<Rewritten, RewriteError> {
    let mut out = String::with_capacity(text.len());
    let mut index = 0;
    let mut changed = false;

    while let Some(found) = text[index..].find(MARKER) {
        let found = index + found;
        out.push_str(&text[index..found]);

        let start = found + MARKER.len();
        let (expression, end) = extract_expression(text, start)?;
        out.push_str("{...");
        out.push_str(WRAPPER);
        out.push('(');
        out.push_str(&expression);
        out.push_str(")}");

        index = end;
        changed = true;
    }
    out.push_str(&text[index..]);

    Ok(Rewritten { text: out, changed })
}

/// Rewrite a single file in place. Returns whether it was modified.
///
/// The file is only written when the transform changed something, so
/// repeated runs never touch mtimes needlessly.
pub fn rewrite_file(path: &Path) -> Result<bool, RewriteError> {
    let text = fs::read_to_string(path)?;
    let result = rewrite(&text)?;
    if result.changed {
        fs::write(path, result.text)?;
    }
    Ok(result.changed)
}

/// Extract the expression starting just after the marker's opening brace.
///
/// Returns the expression (terminating brace excluded) and the byte index
/// one past that brace. Depth starts at 1 for the marker's own brace and
/// extraction ends exactly when it returns to 0 — which can only happen in
/// `Default` state or while popping a `TemplateExpr`, since quote and
/// template-body states treat braces as text.
fn extract_expression(text: &str, start: usize) -> Result<(String, usize), RewriteError> {
    let mut states = vec![LexState::Default];
    let mut depth: usize = 1;
    let mut escape = false;
    let mut expression = String::new();
    let mut iter = text[start..].char_indices().peekable();

    while let Some((offset, ch)) = iter.next() {
        let pos = start + offset;

        if escape {
            expression.push(ch);
            escape = false;
            continue;
        }

        // The stack is never empty: Default is pushed once and never popped.
        let state = *states.last().unwrap_or(&LexState::Default);

        match state {
            LexState::SingleQuote => {
                expression.push(ch);
                match ch {
                    '\\' => escape = true,
                    '\'' => {
                        states.pop();
                    }
                    _ => {}
                }
            }
            LexState::DoubleQuote => {
                expression.push(ch);
                match ch {
                    '\\' => escape = true,
                    '"' => {
                        states.pop();
                    }
                    _ => {}
                }
            }
            LexState::Template => match ch {
                '\\' => {
                    expression.push(ch);
                    escape = true;
                }
                '`' => {
                    expression.push(ch);
                    states.pop();
                }
                '$' if matches!(iter.peek(), Some((_, '{'))) => {
                    iter.next();
                    expression.push_str("${");
                    states.push(LexState::TemplateExpr {
                        return_depth: depth,
                    });
                    depth += 1;
                }
                _ => expression.push(ch),
            },
            LexState::Default | LexState::TemplateExpr { .. } => match ch {
                '\\' => {
                    expression.push(ch);
                    escape = true;
                }
                '\'' => {
                    expression.push(ch);
                    states.push(LexState::SingleQuote);
                }
                '"' => {
                    expression.push(ch);
                    states.push(LexState::DoubleQuote);
                }
                '`' => {
                    expression.push(ch);
                    states.push(LexState::Template);
                }
                '{' => {
                    expression.push(ch);
                    depth += 1;
                }
                '}' => {
                    depth -= 1;
                    if let LexState::TemplateExpr { return_depth } = state {
                        if depth == return_depth {
                            expression.push(ch);
                            states.pop();
                            continue;
                        }
                    }
                    if depth == 0 {
                        return Ok((expression, pos + ch.len_utf8()));
                    }
                    expression.push(ch);
                }
                _ => expression.push(ch),
            },
        }
    }

    Err(RewriteError::Unterminated(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewritten(input: &str) -> String {
        rewrite(input).unwrap().text
    }

    #[test]
    fn simple_field_path() {
        assert_eq!(
            rewritten("data-nlv-field-path={foo.bar}"),
            "{...getVisualEditorAttributes(foo.bar)}"
        );
    }

    #[test]
    fn surrounding_text_passes_through() {
        let input = "<div data-nlv-field-path={page.title} className=\"hero\">";
        assert_eq!(
            rewritten(input),
            "<div {...getVisualEditorAttributes(page.title)} className=\"hero\">"
        );
    }

    #[test]
    fn multiple_occurrences_in_one_buffer() {
        let input = "a data-nlv-field-path={x} b data-nlv-field-path={y} c";
        assert_eq!(
            rewritten(input),
            "a {...getVisualEditorAttributes(x)} b {...getVisualEditorAttributes(y)} c"
        );
    }

    #[test]
    fn nested_braces_balance() {
        assert_eq!(
            rewritten("data-nlv-field-path={fn({a: 1})}"),
            "{...getVisualEditorAttributes(fn({a: 1}))}"
        );
    }

    #[test]
    fn quoted_close_brace_is_opaque() {
        assert_eq!(
            rewritten("data-nlv-field-path={'}' + x}"),
            "{...getVisualEditorAttributes('}' + x)}"
        );
    }

    #[test]
    fn double_quoted_brace_is_opaque() {
        assert_eq!(
            rewritten("data-nlv-field-path={\"}{\" + x}"),
            "{...getVisualEditorAttributes(\"}{\" + x)}"
        );
    }

    #[test]
    fn escaped_quote_inside_string() {
        assert_eq!(
            rewritten(r"data-nlv-field-path={'a\'}' + x}"),
            r"{...getVisualEditorAttributes('a\'}' + x)}"
        );
    }

    #[test]
    fn template_literal_wrapped_whole() {
        assert_eq!(
            rewritten("data-nlv-field-path={`a${b}c`}"),
            "{...getVisualEditorAttributes(`a${b}c`)}"
        );
    }

    #[test]
    fn template_body_braces_are_opaque() {
        assert_eq!(
            rewritten("data-nlv-field-path={`}{`}"),
            "{...getVisualEditorAttributes(`}{`)}"
        );
    }

    #[test]
    fn interpolation_braces_balance_independently() {
        // object literal inside the interpolation must not end extraction
        assert_eq!(
            rewritten("data-nlv-field-path={`x${fmt({n: 1})}y`}"),
            "{...getVisualEditorAttributes(`x${fmt({n: 1})}y`)}"
        );
    }

    #[test]
    fn nested_template_inside_interpolation() {
        assert_eq!(
            rewritten("data-nlv-field-path={`a${`b${c}`}d`}"),
            "{...getVisualEditorAttributes(`a${`b${c}`}d`)}"
        );
    }

    #[test]
    fn string_inside_interpolation() {
        assert_eq!(
            rewritten("data-nlv-field-path={`a${x ? '}' : \"{\"}b`}"),
            "{...getVisualEditorAttributes(`a${x ? '}' : \"{\"}b`)}"
        );
    }

    #[test]
    fn unterminated_expression_errors() {
        assert!(matches!(
            rewrite("data-nlv-field-path={foo.bar"),
            Err(RewriteError::Unterminated(_))
        ));
    }

    #[test]
    fn unterminated_string_errors() {
        assert!(matches!(
            rewrite("data-nlv-field-path={'never closed}"),
            Err(RewriteError::Unterminated(_))
        ));
    }

    #[test]
    fn unterminated_interpolation_errors() {
        assert!(matches!(
            rewrite("data-nlv-field-path={`a${b`}"),
            Err(RewriteError::Unterminated(_))
        ));
    }

    #[test]
    fn no_marker_is_unchanged() {
        let input = "const x = {a: 1};\n";
        let result = rewrite(input).unwrap();
        assert!(!result.changed);
        assert_eq!(result.text, input);
    }

    #[test]
    fn transform_of_output_is_noop() {
        let first = rewrite("x data-nlv-field-path={`a${b}c`} y").unwrap();
        assert!(first.changed);
        let second = rewrite(&first.text).unwrap();
        assert!(!second.changed);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn non_ascii_text_around_and_inside() {
        assert_eq!(
            rewritten("héllo data-nlv-field-path={t('ação')} wörld"),
            "héllo {...getVisualEditorAttributes(t('ação'))} wörld"
        );
    }

    #[test]
    fn rewrite_file_writes_only_on_change() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("Component.tsx");
        std::fs::write(&path, "<p data-nlv-field-path={f}>x</p>").unwrap();

        assert!(rewrite_file(&path).unwrap());
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "<p {...getVisualEditorAttributes(f)}>x</p>");

        // second run: no marker left, file untouched
        assert!(!rewrite_file(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }
}
