use colored::Colorize;

/// Colour the lines of a rendered check report for terminal output.
pub fn colorize_check_text(raw: &str) -> String {
    raw.lines()
        .map(|line| {
            if line.starts_with("- [error]") {
                line.red().to_string()
            } else if line.starts_with("- [warning]") {
                line.yellow().to_string()
            } else if line.starts_with("result ") {
                line.cyan().to_string()
            } else if line.starts_with("- ") && line.contains("sequence_start =") {
                line.green().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Colour the header line of a sequence listing.
pub fn colorize_listing_text(raw: &str) -> String {
    raw.lines()
        .map(|line| {
            if line.starts_with("groups=") {
                line.cyan().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::colorize_check_text;

    #[test]
    fn keeps_line_text_intact() {
        colored::control::set_override(false);
        let raw = "result errors=1 warnings=0\nissues\n- [error] x (a): y";
        assert_eq!(colorize_check_text(raw), raw);
    }
}
