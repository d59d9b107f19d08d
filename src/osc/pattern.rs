//! OSC 1.0 address-pattern matching.
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `?` | any single character except `/` |
//! | `*` | any run of characters within one path segment |
//! | `[abc]`, `[a-z]` | one character from the set or range |
//! | `[!a-z]` | one character not in the set |
//! | `{foo,bar}` | any of the comma-separated strings |
//!
//! Anything else matches itself. A malformed `[` or `{` never matches.

/// True if `address` contains any pattern syntax.
#[inline]
pub fn is_pattern(address: &str) -> bool {
    address.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

/// Match an incoming address `pattern` against a concrete `address`.
///
/// Runs in `O(pattern.len() * address.len())` regardless of how many
/// wildcards the pattern carries.
pub fn matches(pattern: &str, address: &str) -> bool {
    if !is_pattern(pattern) {
        return pattern == address;
    }
    match_table(pattern.as_bytes(), address.as_bytes())
}

/// Bottom-up match table. Cell `(p, a)` is true when `pattern[p..]`
/// matches `address[a..]`; rows are filled from the end of the pattern.
fn match_table(pattern: &[u8], address: &[u8]) -> bool {
    let width = address.len() + 1;
    let cell = |p: usize, a: usize| p * width + a;

    let mut table = vec![false; (pattern.len() + 1) * width];
    table[cell(pattern.len(), address.len())] = true;

    for p in (0..pattern.len()).rev() {
        for a in (0..width).rev() {
            let next = address.get(a).copied();
            let hit = match pattern[p] {
                // Either `*` ends here, or it eats one more non-separator.
                b'*' => {
                    table[cell(p + 1, a)]
                        || matches!(next, Some(c) if c != b'/') && table[cell(p, a + 1)]
                }
                b'?' => matches!(next, Some(c) if c != b'/') && table[cell(p + 1, a + 1)],
                b'[' => match pattern[p + 1..].iter().position(|&b| b == b']') {
                    Some(close) => {
                        let class = &pattern[p + 1..p + 1 + close];
                        matches!(next, Some(c) if c != b'/' && class_contains(class, c))
                            && table[cell(p + close + 2, a + 1)]
                    }
                    None => false,
                },
                b'{' => match pattern[p + 1..].iter().position(|&b| b == b'}') {
                    Some(close) => {
                        let after = p + close + 2;
                        pattern[p + 1..p + 1 + close]
                            .split(|&b| b == b',')
                            .any(|alt| {
                                address[a..].starts_with(alt) && table[cell(after, a + alt.len())]
                            })
                    }
                    None => false,
                },
                c => next == Some(c) && table[cell(p + 1, a + 1)],
            };
            table[cell(p, a)] = hit;
        }
    }

    table[cell(0, 0)]
}

/// Character-class membership. `class` is the text between `[` and `]`.
fn class_contains(class: &[u8], c: u8) -> bool {
    let (negated, items) = match class.split_first() {
        Some((b'!', items)) => (true, items),
        _ => (false, class),
    };

    let mut found = false;
    let mut i = 0;
    while i < items.len() {
        let lo = items[i];
        if i + 2 < items.len() && items[i + 1] == b'-' {
            let hi = items[i + 2];
            if (lo.min(hi)..=lo.max(hi)).contains(&c) {
                found = true;
            }
            i += 3;
        } else {
            if lo == c {
                found = true;
            }
            i += 1;
        }
    }

    found != negated
}
