/// Extract the segment after the last `/` of a station URL.
///
/// Mirrors how the feed encodes the city slug: `https://aqicn.org/city/london`
/// yields `london`. A URL ending in `/` has no trailing segment and yields
/// `None`.
pub fn trailing_segment(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_last_segment() {
        assert_eq!(trailing_segment("https://aqicn.org/city/london"), Some("london"));
        assert_eq!(trailing_segment("city/usa/chicago"), Some("chicago"));
    }

    #[test]
    fn test_no_slash_returns_whole_string() {
        assert_eq!(trailing_segment("boston"), Some("boston"));
    }

    #[test]
    fn test_trailing_slash_yields_none() {
        assert_eq!(trailing_segment("https://aqicn.org/city/london/"), None);
        assert_eq!(trailing_segment(""), None);
    }
}
