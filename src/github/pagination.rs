// file: src/github/pagination.rs
// description: Link header parsing for paginated listing responses
// reference: https://docs.github.com/en/rest/using-the-rest-api/using-pagination-in-the-rest-api

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NEXT_LINK: Regex = Regex::new(
        r#"<([^>]+)>\s*;\s*rel="next""#
    ).expect("NEXT_LINK regex is valid");
}

/// Returns the URL tagged `rel="next"`, if any.
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .find_map(|part| NEXT_LINK.captures(part.trim()))
        .map(|caps| caps[1].to_string())
}
