/// Line diff between the current file and its replacement, in a unified-like
/// layout without hunk headers. Empty when the texts are equal.
pub fn line_diff(label: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_lines[prefix..old_lines.len() - suffix];
    let new_mid = &new_lines[prefix..new_lines.len() - suffix];

    let mut out = format!("--- {}\n+++ {} (new)\n", label, label);
    for line in &old_lines[..prefix] {
        push_line(&mut out, ' ', line);
    }
    for (tag, line) in middle_ops(old_mid, new_mid) {
        push_line(&mut out, tag, line);
    }
    for line in &old_lines[old_lines.len() - suffix..] {
        push_line(&mut out, ' ', line);
    }
    out
}

fn push_line(out: &mut String, tag: char, line: &str) {
    out.push(tag);
    out.push_str(line);
    out.push('\n');
}

/// Longest-common-subsequence walk over the differing middle section.
fn middle_ops<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<(char, &'a str)> {
    let (n, m) = (old.len(), new.len());
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push((' ', old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(('-', old[i]));
            i += 1;
        } else {
            ops.push(('+', new[j]));
            j += 1;
        }
    }
    ops.extend(old[i..].iter().map(|line| ('-', *line)));
    ops.extend(new[j..].iter().map(|line| ('+', *line)));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_texts_have_no_diff() {
        assert_eq!(line_diff("a.sql", "x\ny\n", "x\ny\n"), "");
    }

    #[test]
    fn changed_line_is_removed_and_added() {
        let diff = line_diff("a.sql", "one\ntwo\nthree\n", "one\nTWO\nthree\nfour\n");

        assert_eq!(
            diff,
            "--- a.sql\n+++ a.sql (new)\n one\n-two\n+TWO\n three\n+four\n"
        );
    }
}
