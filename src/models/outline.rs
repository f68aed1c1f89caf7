/// A single bullet line from the outline, stored trimmed with its marker intact
/// (e.g. `- Josh met DJ`).
pub type OutlinePoint = String;

/// Markers that make a trimmed outline line an outline point.
const BULLET_MARKERS: [char; 2] = ['-', '*'];

/// Extract outline points from a markdown outline, in document order.
///
/// Headings, prose and blank lines are ignored. Duplicates are kept; the
/// interview phase deduplicates against existing records.
pub fn parse_outline_points(outline: &str) -> Vec<OutlinePoint> {
    outline
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(&BULLET_MARKERS[..]))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_only_bullet_lines() {
        let outline = "# My Life\n\n## Early years\n- Born in Ohio\nSome prose.\n* Moved west\n";
        assert_eq!(
            parse_outline_points(outline),
            vec!["- Born in Ohio".to_string(), "* Moved west".to_string()]
        );
    }

    #[test]
    fn test_trims_indentation_and_preserves_order() {
        let outline = "   - second level\n\t* tabbed\n- top\r\n";
        assert_eq!(
            parse_outline_points(outline),
            vec!["- second level", "* tabbed", "- top"]
        );
    }

    #[test]
    fn test_empty_outline() {
        assert!(parse_outline_points("").is_empty());
        assert!(parse_outline_points("## Only headings\n\nand prose").is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let points = parse_outline_points("- same\n- same\n");
        assert_eq!(points.len(), 2);
    }
}
