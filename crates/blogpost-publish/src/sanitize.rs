//! HTML line-wrap sanitization for the posting protocol.
//!
//! WordPress historically rewrites embedded newlines in a post body into
//! visible line breaks. Collapsing everything outside `<pre>` blocks onto a
//! single line prevents spurious breaks in rendered output while keeping
//! code and verbatim blocks faithful.

/// Line-collapse state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Normal,
    InPre,
}

/// Join HTML lines, preserving `<pre>` blocks verbatim.
///
/// Outside `<pre>` spans, lines are trimmed, blank lines dropped, and the
/// survivors joined by exactly one space; no space is inserted where the
/// output already ends with `>` or the next line starts with `<`. A span
/// runs from a line beginning with `<pre` through the line containing the
/// matching `</pre>`, and is kept byte-for-byte with its internal line
/// breaks intact.
#[must_use]
pub fn collapse_lines(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut state = State::Normal;

    for line in html.lines() {
        match state {
            State::Normal if line.starts_with("<pre") => {
                out.push_str(line);
                if !line.contains("</pre>") {
                    state = State::InPre;
                }
            }
            State::Normal => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if needs_space(&out, trimmed) {
                    out.push(' ');
                }
                out.push_str(trimmed);
            }
            State::InPre => {
                out.push('\n');
                out.push_str(line);
                if line.contains("</pre>") {
                    state = State::Normal;
                }
            }
        }
    }

    out
}

/// A space separates two joined lines unless a tag boundary absorbs it.
fn needs_space(out: &str, next: &str) -> bool {
    !out.is_empty() && !out.ends_with('>') && !next.starts_with('<')
}
