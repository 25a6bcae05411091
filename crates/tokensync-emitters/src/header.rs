use tokensync_common::OutputFormat;

const GENERATED_AT: &str = "Generated at:";

/// Comment block opening every generated file. The timestamp line is only written when a
/// caller supplies one, so output stays byte-identical across runs otherwise.
pub fn file_header(format: OutputFormat, description: &str, generated_at: Option<&str>) -> String {
    let mut lines = vec![
        "Generated by tokensync. Do not edit by hand.".to_string(),
        description.to_string(),
    ];
    if let Some(timestamp) = generated_at {
        lines.push(format!("{} {}", GENERATED_AT, timestamp));
    }

    let mut out = String::new();
    for line in lines {
        match format {
            OutputFormat::Css => out.push_str(&format!("/* {} */\n", line)),
            _ => out.push_str(&format!("// {}\n", line)),
        }
    }
    out
}

/// Removes the `Generated at:` line so two runs can be compared.
pub fn strip_timestamp(content: &str) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| !line.contains(GENERATED_AT))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_comment_syntax() {
        let scss = file_header(OutputFormat::Scss, "Primitive colors", None);
        assert!(scss.starts_with("// Generated by tokensync."));
        assert!(!scss.contains(GENERATED_AT));

        let css = file_header(OutputFormat::Css, "Primitive colors", Some("2026-01-01T00:00:00Z"));
        assert!(css.contains("/* Generated at: 2026-01-01T00:00:00Z */"));
    }

    #[test]
    fn test_strip_timestamp_matches_untimed_header() {
        let timed = file_header(OutputFormat::Swift, "Colors", Some("now"));
        let plain = file_header(OutputFormat::Swift, "Colors", None);
        assert_eq!(strip_timestamp(&timed), plain);
    }
}
