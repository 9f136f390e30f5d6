//! Association of doc comments with the declarations they precede.
//!
//! The index is built from raw source text alone. A Javadoc block (`/** ... */`) or a
//! run of consecutive `//` lines is keyed to the first following line that carries
//! code: blank lines, other comments and annotations (including annotation argument
//! lists spread over several lines) are skipped. The front end reports the same line
//! for fields and methods, so a lookup is a plain map access.

use std::collections::HashMap;

/// Line number (1-based) -> cleaned doc text
#[derive(Debug, Clone, Default)]
pub struct DocIndex {
    docs: HashMap<usize, String>,
}

impl DocIndex {
    /// Build the index for one source file
    pub fn build(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut docs = HashMap::new();

        let mut i = 0;
        while i < lines.len() {
            let stripped = lines[i].trim();

            let block_end = if stripped.starts_with("/**") {
                let mut j = i;
                while j < lines.len() && !lines[j].contains("*/") {
                    j += 1;
                }
                Some(j.min(lines.len() - 1))
            } else if stripped.starts_with("//") {
                let mut j = i;
                while j + 1 < lines.len() && lines[j + 1].trim().starts_with("//") {
                    j += 1;
                }
                Some(j)
            } else {
                None
            };

            let Some(end) = block_end else {
                i += 1;
                continue;
            };

            let doc = clean_doc(&lines[i..=end]);
            if !doc.is_empty() {
                if let Some(target) = target_line(&lines, end + 1) {
                    // later (nearer) blocks overwrite earlier ones
                    docs.insert(target + 1, doc);
                }
            }
            i = end + 1;
        }

        Self { docs }
    }

    /// Doc text for the declaration on `line`, if any
    pub fn get(&self, line: usize) -> Option<&str> {
        self.docs.get(&line).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Strip comment markers and Javadoc block tags, join remaining lines with spaces
fn clean_doc(lines: &[&str]) -> String {
    let mut cleaned = Vec::new();

    for line in lines {
        let mut line = line.trim();
        if let Some(rest) = line.strip_prefix("//") {
            line = rest.trim_start_matches('/');
        }
        line = line.trim_start_matches("/**").trim_start_matches("/*");
        if let Some(pos) = line.find("*/") {
            line = &line[..pos];
        }
        let line = line.trim().trim_start_matches('*').trim();

        if line.starts_with('@') {
            break;
        }
        if !line.is_empty() {
            cleaned.push(line);
        }
    }

    cleaned.join(" ")
}

/// Index (0-based) of the first line at or after `start` that holds code
fn target_line(lines: &[&str], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut k = start;

    while k < lines.len() {
        let line = lines[k].trim();

        if depth > 0 {
            // inside an annotation argument list that began on an earlier line
            let (rest, new_depth) = skip_parens(line, depth);
            depth = new_depth;
            if depth == 0 && has_code(rest) {
                return Some(k);
            }
            k += 1;
            continue;
        }

        if line.is_empty() || line.starts_with("//") || line.starts_with("/*") || line.starts_with('*') {
            k += 1;
            continue;
        }

        if line.starts_with('@') {
            let (rest, new_depth) = skip_annotations(line);
            depth = new_depth;
            if depth == 0 && has_code(rest) {
                return Some(k);
            }
            k += 1;
            continue;
        }

        return Some(k);
    }

    None
}

fn has_code(rest: &str) -> bool {
    let rest = rest.trim();
    !rest.is_empty() && !rest.starts_with("//")
}

/// Consume leading annotations on a line. Returns the remainder and the open paren depth.
fn skip_annotations(mut line: &str) -> (&str, usize) {
    loop {
        line = line.trim_start();
        let Some(after_at) = line.strip_prefix('@') else {
            return (line, 0);
        };
        let name_len = after_at
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(after_at.len());
        let after_name = after_at[name_len..].trim_start();

        match after_name.strip_prefix('(') {
            Some(args) => {
                let (rest, depth) = skip_parens(args, 1);
                if depth > 0 {
                    return ("", depth);
                }
                line = rest;
            }
            None => line = after_name,
        }
    }
}

/// Advance past the closing paren matching `depth` open ones, honoring string literals
fn skip_parens(text: &str, mut depth: usize) -> (&str, usize) {
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return (&text[idx + 1..], 0);
                }
            }
            _ => {}
        }
    }

    ("", depth)
}
