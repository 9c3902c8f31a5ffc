//! Rewrites name patterns into the dialect understood by `glob::Pattern`.
//!
//! Name patterns accept `{a,b}` alternation (nestable) and `\` escapes on top
//! of `*`, `?` and `[...]`. `glob::Pattern` has neither, and it reserves `**`
//! for path recursion, so each pattern is expanded into one or more plain
//! branches before compilation.

use glob::{Pattern, PatternError};

/// Expands `pattern` into branches that `glob::Pattern` compiles with the same
/// meaning. A name matches the pattern when it matches any branch.
pub(super) fn expand(pattern: &str) -> Result<Vec<String>, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut pos = 0;
    let branches = expand_sequence(&chars, &mut pos, false)?;
    Ok(branches.iter().map(|branch| collapse_stars(branch)).collect())
}

fn expand_sequence(
    chars: &[char],
    pos: &mut usize,
    nested: bool,
) -> Result<Vec<String>, PatternError> {
    let mut branches = vec![String::new()];

    while let Some(&c) = chars.get(*pos) {
        match c {
            ',' | '}' if nested => break,
            '{' => {
                let open = *pos;
                *pos += 1;
                let mut options = Vec::new();
                loop {
                    options.extend(expand_sequence(chars, pos, true)?);
                    match chars.get(*pos) {
                        Some(',') => *pos += 1,
                        Some('}') => {
                            *pos += 1;
                            break;
                        }
                        _ => {
                            return Err(PatternError {
                                pos: open,
                                msg: "unclosed alternation",
                            });
                        }
                    }
                }
                branches = branches
                    .iter()
                    .flat_map(|prefix| options.iter().map(move |option| format!("{prefix}{option}")))
                    .collect();
            }
            '\\' => {
                let Some(&escaped) = chars.get(*pos + 1) else {
                    return Err(PatternError {
                        pos: *pos,
                        msg: "dangling escape",
                    });
                };
                *pos += 2;
                append(&mut branches, &Pattern::escape(escaped.encode_utf8(&mut [0; 4])));
            }
            '[' => {
                let end = class_end(chars, *pos);
                let class: String = chars[*pos..end].iter().collect();
                *pos = end;
                append(&mut branches, &class);
            }
            _ => {
                *pos += 1;
                append(&mut branches, c.encode_utf8(&mut [0; 4]));
            }
        }
    }

    Ok(branches)
}

/// Index just past the `]` closing the class opened at `start`, or the end of
/// input when the class is unterminated (left for `glob` to reject).
fn class_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    if chars.get(i) == Some(&'!') {
        i += 1;
    }
    // A leading ']' is a member, not the terminator.
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() {
        if chars[i] == ']' {
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}

fn append(branches: &mut [String], text: &str) {
    for branch in branches.iter_mut() {
        branch.push_str(text);
    }
}

// Metric names have no separators, so `**` means the same as `*`.
fn collapse_stars(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len());
    for c in branch.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pattern_is_one_branch() {
        assert_eq!(expand("net*").unwrap(), vec!["net*"]);
    }

    #[test]
    fn test_collapses_star_runs() {
        assert_eq!(expand("net**").unwrap(), vec!["net*"]);
        assert_eq!(expand("***").unwrap(), vec!["*"]);
    }

    #[test]
    fn test_expands_alternation() {
        assert_eq!(
            expand("cpu_{user,system}*").unwrap(),
            vec!["cpu_user*", "cpu_system*"]
        );
    }

    #[test]
    fn test_expands_nested_and_empty_options() {
        assert_eq!(
            expand("a{b{c,d},}e").unwrap(),
            vec!["abce", "abde", "ae"]
        );
    }

    #[test]
    fn test_escapes_become_literals() {
        assert_eq!(expand(r"net\*").unwrap(), vec!["net[*]"]);
        assert_eq!(expand(r"a\{b\}").unwrap(), vec!["a{b}"]);
        assert_eq!(expand(r"{a\,b,c}").unwrap(), vec!["a,b", "c"]);
    }

    #[test]
    fn test_class_contents_are_left_alone() {
        assert_eq!(expand("m[{,}]*").unwrap(), vec!["m[{,}]*"]);
        assert_eq!(expand("m[]a]").unwrap(), vec!["m[]a]"]);
    }

    #[test]
    fn test_rejects_unclosed_alternation() {
        let error = expand("cpu{a,b").unwrap_err();
        assert_eq!(error.pos, 3);
    }

    #[test]
    fn test_rejects_dangling_escape() {
        assert!(expand("cpu\\").is_err());
    }
}
