//! Sanitization of stored text before it reaches the terminal.
//!
//! Key names and values are arbitrary user input (and `import` pulls them from
//! files nobody reviewed). Drawn raw, an embedded escape sequence could clear
//! the screen, move the cursor or recolor the interface, and an embedded
//! newline would break the one-row-per-key layout.

/// Strips ANSI escape codes and control characters from a string
///
/// Removes ANSI CSI (Control Sequence Introducer) sequences (`ESC [ ... letter`)
/// and every other control character except tab, newline and carriage return.
///
/// # Examples
///
/// ```
/// use keys::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                // Skip until the final byte of the sequence
                while let Some(&next_ch) = chars.peek() {
                    chars.next();
                    if next_ch.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Make `text` safe to draw on a single row: escape sequences are removed and
/// line breaks and tabs become spaces.
pub fn sanitize_for_display(text: &str) -> String {
    strip_ansi_codes(text)
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .collect()
}
