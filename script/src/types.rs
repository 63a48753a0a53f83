//! Operations on type texts.

/// Calls `f` with every char of `text` and whether it is inside a quoted region.
fn for_each_unquoted(text: &str, mut f: impl FnMut(usize, char, bool)) {
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                f(i, c, true);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' || c == '`' {
                    quote = Some(c);
                    f(i, c, true);
                } else {
                    f(i, c, false);
                }
            }
        }
    }
}

/// Splits the type arguments of a generic type instance like `Wrapper<A, B<C>>`.
///
/// Returns an empty list if `text` is not a single generic instance.
pub fn type_arguments(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut argument_start = None;
    let mut end = None;
    let mut previous = ' ';
    for_each_unquoted(text, |i, c, quoted| {
        let last = previous;
        previous = c;
        if quoted || end.is_some() {
            return;
        }
        match c {
            '<' => {
                depth += 1;
                if depth == 1 && argument_start.is_none() {
                    argument_start = Some(i + 1);
                }
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '>' if last == '=' => (),
            '>' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = argument_start {
                        arguments.push(text[start..i].trim().to_owned());
                    }
                    end = Some(i + 1);
                }
            }
            ',' if depth == 1 => {
                if let Some(start) = argument_start {
                    arguments.push(text[start..i].trim().to_owned());
                    argument_start = Some(i + 1);
                }
            }
            _ => (),
        }
    });
    match end {
        Some(end) if text[end..].trim().is_empty() => arguments,
        _ => Vec::new(),
    }
}

/// Replaces whole identifiers of `text` found in `bindings`, leaving quoted regions untouched.
pub fn substitute(text: &str, bindings: &[(String, String)]) -> String {
    if bindings.is_empty() {
        return text.to_owned();
    }
    let mut result = String::with_capacity(text.len());
    let mut word = String::new();
    let flush = |word: &mut String, result: &mut String| {
        match bindings.iter().find(|(name, _)| name == word) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(word),
        }
        word.clear();
    };
    for_each_unquoted(text, |_, c, quoted| {
        if !quoted && (c == '_' || c == '$' || c.is_alphanumeric()) {
            word.push(c);
        } else {
            flush(&mut word, &mut result);
            result.push(c);
        }
    });
    flush(&mut word, &mut result);
    result
}
