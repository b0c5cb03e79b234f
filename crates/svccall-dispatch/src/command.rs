use std::borrow::Cow;

/// Quote one word for a POSIX shell.
///
/// Words made only of characters the shell never interprets pass through;
/// everything else is single-quoted, with embedded quotes spliced in as
/// `'"'"'`.
pub fn quote(word: &str) -> Cow<'_, str> {
    if word.is_empty() {
        return Cow::Borrowed("''");
    }
    if word.chars().all(is_shell_safe) {
        return Cow::Borrowed(word);
    }
    Cow::Owned(format!("'{}'", word.replace('\'', r#"'"'"'"#)))
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}

/// Render the command line for one call, newline-terminated.
///
/// ```text
/// <invoke...> <service> <code> [<type-tag> <literal>]*
/// ```
pub fn build_command(invoke: &[String], service: &str, code: u32, tokens: &[String]) -> String {
    let code = code.to_string();
    let words = invoke
        .iter()
        .map(String::as_str)
        .chain([service, code.as_str()])
        .chain(tokens.iter().map(String::as_str));

    let mut line = String::new();
    for word in words {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&quote(word));
    }
    line.push('\n');
    line
}
