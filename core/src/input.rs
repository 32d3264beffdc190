use anyhow::{anyhow, Result};

use crate::model::months::{MonthSelection, MONTH_NAMES};

/// Parses a month list such as `1,3,5-7` or `sty,lut` (name prefixes).
pub fn parse_months(input: &str) -> Result<MonthSelection> {
    let mut months = Vec::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some((start, end)) = token.split_once('-') {
            let start = parse_month_token(start.trim())?;
            let end = parse_month_token(end.trim())?;
            if start > end {
                return Err(anyhow!("Invalid month range: '{}'", token));
            }
            months.extend(start..=end);
        } else {
            months.push(parse_month_token(token)?);
        }
    }

    if months.is_empty() {
        return Err(anyhow!("No months given"));
    }
    Ok(MonthSelection::from_months(months)?)
}

fn parse_month_token(token: &str) -> Result<u32> {
    if let Ok(n) = token.parse::<u32>() {
        if (1..=12).contains(&n) {
            return Ok(n);
        }
        return Err(anyhow!("Month out of range: {}", n));
    }

    let name = expand_key(&token.to_lowercase(), &MONTH_NAMES)?;
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| anyhow!("Unknown month: '{}'", token))
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}
