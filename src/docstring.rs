//! Docstring cleanup.
//!
//! Normalizes the indentation of a raw Python docstring so the markup
//! renderer sees column-zero text.

const TAB_WIDTH: usize = 8;

/// Clean a raw docstring: strip the first line, remove the common
/// indentation of the remaining lines, drop one leading and one trailing
/// blank line, and trim trailing whitespace.
pub fn clean(raw: &str) -> String {
    let raw_lines: Vec<&str> = raw.split('\n').collect();
    let mixed = mixed_indentation(&raw_lines[1..]);
    let lines: Vec<String> = raw_lines.iter().map(|l| expand_tabs(l)).collect();

    let margin = if mixed {
        0
    } else {
        lines[1..]
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| indent_width(l))
            .min()
            .unwrap_or(0)
    };

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line = if i == 0 {
            line.trim_start()
        } else if line.trim().is_empty() {
            ""
        } else {
            &line[margin..]
        };
        out.push(line.trim_end().to_string());
    }

    if out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    if out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// True when the non-blank lines indent with both tabs and spaces.
fn mixed_indentation(lines: &[&str]) -> bool {
    let mut tabs = false;
    let mut spaces = false;
    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        for c in line.chars().take_while(|c| *c == ' ' || *c == '\t') {
            match c {
                '\t' => tabs = true,
                _ => spaces = true,
            }
        }
    }
    tabs && spaces
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut col = 0;
    for c in line.chars() {
        if c == '\t' {
            let next = (col / TAB_WIDTH + 1) * TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(next - col));
            col = next;
        } else {
            out.push(c);
            col += 1;
        }
    }
    out
}

/// Leading-space count; a byte offset since tabs are already expanded.
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}
