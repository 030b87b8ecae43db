//! Cleanup for MediaWiki plain-text extracts.
//!
//! Extracts keep section headings as `== Title ==` lines. Trailing reference
//! sections carry no answer content, so they are dropped along with their
//! subsections. Whitespace is collapsed within lines and runs of blank lines are
//! reduced to one.

const DROPPED_SECTIONS: &[&str] = &[
    "references",
    "notes",
    "citations",
    "sources",
    "bibliography",
    "see also",
    "further reading",
    "external links",
];

/// Parse a `== Heading ==` line into its level and name.
fn heading(line: &str) -> Option<(usize, &str)> {
    let t = line.trim();
    let level = t.bytes().take_while(|&b| b == b'=').count();
    let trailing = t.bytes().rev().take_while(|&b| b == b'=').count();
    if level < 2 || level != trailing || t.len() <= level * 2 {
        return None;
    }
    Some((level, t[level..t.len() - level].trim()))
}

pub fn clean_extract(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    // Level of the dropped section we are inside, if any.
    let mut skipping: Option<usize> = None;
    let mut blank_run = 0usize;

    for line in text.lines() {
        if let Some((level, name)) = heading(line) {
            match skipping {
                Some(skip_level) if level > skip_level => continue,
                _ => skipping = None,
            }
            if DROPPED_SECTIONS.contains(&name.to_lowercase().as_str()) {
                skipping = Some(level);
                continue;
            }
        } else if skipping.is_some() {
            continue;
        }

        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push(collapsed);
    }

    out.join("\n").trim().to_string()
}
