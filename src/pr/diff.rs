use super::types::Hunk;
use super::PrError;

/// Parse the `patch` field of a changed file into hunks.
///
/// GitHub returns per-file patches without the `diff --git` / `---` / `+++`
/// headers, so the text starts directly at the first hunk header:
///   @@ -{old_start},{old_count} +{new_start},{new_count} @@ optional context
///
/// Lines are prefixed with '+' (added), '-' (removed) or ' ' (context).
/// "\ No newline at end of file" markers are dropped.
pub fn parse_patch(patch: &str) -> Result<Vec<Hunk>, PrError> {
    let mut hunks = Vec::new();
    let mut current: Option<Hunk> = None;

    for line in patch.lines() {
        if line.starts_with("@@") {
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
            let (old_start, old_count, new_start, new_count) = parse_hunk_header(line)?;
            current = Some(Hunk {
                old_start,
                old_count,
                new_start,
                new_count,
                lines: Vec::new(),
            });
            continue;
        }

        if let Some(hunk) = current.as_mut() {
            if line.starts_with('+') || line.starts_with('-') || line.starts_with(' ') {
                hunk.lines.push(line.to_string());
            }
        }
    }

    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }
    Ok(hunks)
}

/// Reduce a patch to its changed lines, keeping hunk positions, so that the
/// prompt spends its budget on what actually changed. Stops after
/// `max_lines` changed lines and notes how many were left out.
pub fn condense_patch(patch: &str, max_lines: usize) -> Result<String, PrError> {
    let hunks = parse_patch(patch)?;
    let mut out = String::new();
    let mut kept = 0usize;
    let mut skipped = 0usize;

    for hunk in &hunks {
        let changed: Vec<&String> = hunk
            .lines
            .iter()
            .filter(|l| l.starts_with('+') || l.starts_with('-'))
            .collect();
        if changed.is_empty() {
            continue;
        }
        if kept >= max_lines {
            skipped += changed.len();
            continue;
        }
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
        ));
        for line in changed {
            if kept < max_lines {
                out.push_str(line);
                out.push('\n');
                kept += 1;
            } else {
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        out.push_str(&format!("... {} more changed lines\n", skipped));
    }
    Ok(out)
}

fn parse_hunk_header(line: &str) -> Result<(usize, usize, usize, usize), PrError> {
    let header = line
        .trim()
        .strip_prefix("@@")
        .ok_or_else(|| PrError::DiffParse("Invalid hunk header".to_string()))?;
    // Anything after the closing @@ is function context, not ranges.
    let header = header.split("@@").next().unwrap_or_default().trim();
    let mut parts = header.split_whitespace();
    let old_part = parts
        .next()
        .ok_or_else(|| PrError::DiffParse("Missing old range".to_string()))?;
    let new_part = parts
        .next()
        .ok_or_else(|| PrError::DiffParse("Missing new range".to_string()))?;

    let (old_start, old_count) = parse_range(old_part, '-')?;
    let (new_start, new_count) = parse_range(new_part, '+')?;

    Ok((old_start, old_count, new_start, new_count))
}

fn parse_range(part: &str, prefix: char) -> Result<(usize, usize), PrError> {
    let range = part
        .strip_prefix(prefix)
        .ok_or_else(|| PrError::DiffParse("Invalid range prefix".to_string()))?;
    let (start_str, count_str) = match range.split_once(',') {
        Some((start, count)) => (start, count),
        None => (range, "1"),
    };
    let start = start_str
        .parse::<usize>()
        .map_err(|_| PrError::DiffParse(format!("Invalid range start in {}", part)))?;
    let count = count_str
        .parse::<usize>()
        .map_err(|_| PrError::DiffParse(format!("Invalid range count in {}", part)))?;
    Ok((start, count))
}
