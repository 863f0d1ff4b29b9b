//! Path string normalisation.

/// Rewrite `path` with forward slashes only and without a trailing slash.
///
/// `C:\Users\john\Documents\` becomes `C:/Users/john/Documents`. Only one
/// trailing separator is removed.
pub fn to_slash(path: &str) -> String {
    let mut normalised = path.replace('\\', "/");
    if normalised.ends_with('/') {
        normalised.pop();
    }
    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslashes_become_slashes() {
        assert_eq!(
            to_slash(r"C:\Users\john\Documents\"),
            "C:/Users/john/Documents"
        );
    }

    #[test]
    fn mixed_delimiters_without_trailing() {
        assert_eq!(to_slash(r"C:/Users\john/Documents"), "C:/Users/john/Documents");
    }

    #[test]
    fn only_one_trailing_separator_is_dropped() {
        assert_eq!(to_slash("./inputs//"), "./inputs/");
        assert_eq!(to_slash(""), "");
    }
}
