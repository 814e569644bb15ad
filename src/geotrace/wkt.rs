//! Geotrace-to-WKT conversion.
//!
//! A geotrace, as recorded by ODK-style data-collection forms, is a
//! semicolon-separated list of nodes; each node holds whitespace-separated
//! tokens, the first two being latitude and longitude (a node may carry
//! extra tokens for elevation and accuracy). WKT wants the opposite axis
//! order, longitude first.

/// Converts raw geotrace text into a WKT geometry string.
///
/// Nodes with fewer than two tokens are dropped without error; this is the
/// documented data-loss policy for malformed input, a row never aborts on
/// a bad node. The geometry kind follows the count of surviving nodes:
/// one node is a `POINT`, two or more are a `LINESTRING`, zero yield
/// `None`.
///
/// Coordinate tokens are emitted as literal text. No numeric parsing or
/// reformatting happens here, the units and precision of the source are
/// preserved exactly.
///
/// # Examples
///
/// ```
/// use geotrace2wkt::geotrace::wkt::wkt_from_trace;
///
/// assert_eq!(wkt_from_trace("1.5 2.5"), Some("POINT(2.5 1.5)".to_string()));
/// assert_eq!(
///     wkt_from_trace("1.0 2.0;3.0 4.0"),
///     Some("LINESTRING(2.0 1.0, 4.0 3.0)".to_string()),
/// );
/// assert_eq!(wkt_from_trace(""), None);
/// ```
pub fn wkt_from_trace(trace: &str) -> Option<String> {
    let mut coord_pairs: Vec<String> = Vec::new();

    for node in trace.split(';') {
        let mut tokens = node.split_whitespace();
        // Source order is lat lon; WKT wants x y, so lon comes first.
        // Tokens beyond the second (elevation, accuracy) are ignored.
        let (Some(lat), Some(lon)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        coord_pairs.push(format!("{lon} {lat}"));
    }

    match coord_pairs.len() {
        0 => None,
        1 => Some(format!("POINT({})", coord_pairs[0])),
        _ => Some(format!("LINESTRING({})", coord_pairs.join(", "))),
    }
}

#[cfg(test)]
mod tests {
    use super::wkt_from_trace;

    #[test]
    fn single_node_becomes_point_with_axes_swapped() {
        assert_eq!(
            wkt_from_trace("1.5 2.5"),
            Some("POINT(2.5 1.5)".to_string())
        );
    }

    #[test]
    fn multiple_nodes_become_linestring_in_source_order() {
        assert_eq!(
            wkt_from_trace("1.0 2.0;3.0 4.0;5.0 6.0"),
            Some("LINESTRING(2.0 1.0, 4.0 3.0, 6.0 5.0)".to_string())
        );
    }

    #[test]
    fn extra_tokens_per_node_are_ignored() {
        assert_eq!(
            wkt_from_trace("1.0 2.0 99.0 0.5"),
            Some("POINT(2.0 1.0)".to_string())
        );
    }

    #[test]
    fn realistic_odk_trace() {
        let trace = "38.888 -77.037 0.0 4.9;38.889 -77.035 0.0 4.9";
        assert_eq!(
            wkt_from_trace(trace),
            Some("LINESTRING(-77.037 38.888, -77.035 38.889)".to_string())
        );
    }

    #[test]
    fn surrounding_whitespace_per_node_is_tolerated() {
        assert_eq!(
            wkt_from_trace(" 1.0  2.0 ; 3.0\t4.0 "),
            Some("LINESTRING(2.0 1.0, 4.0 3.0)".to_string())
        );
    }

    #[test]
    fn short_nodes_are_dropped_not_fatal() {
        assert_eq!(
            wkt_from_trace("1.0 2.0;garbage;3.0 4.0"),
            Some("LINESTRING(2.0 1.0, 4.0 3.0)".to_string())
        );
    }

    #[test]
    fn kind_follows_count_of_valid_nodes_not_raw_segments() {
        // Two raw segments but only one usable node: a POINT, never a
        // one-vertex LINESTRING.
        assert_eq!(
            wkt_from_trace("1.0 2.0;garbage"),
            Some("POINT(2.0 1.0)".to_string())
        );
    }

    #[test]
    fn malformed_only_trace_yields_no_geometry() {
        assert_eq!(wkt_from_trace("12;34"), None);
        assert_eq!(wkt_from_trace(";;;"), None);
    }

    #[test]
    fn empty_trace_yields_no_geometry() {
        assert_eq!(wkt_from_trace(""), None);
        assert_eq!(wkt_from_trace("   "), None);
    }

    #[test]
    fn coordinate_text_is_not_reformatted() {
        assert_eq!(
            wkt_from_trace("01.50 -002.500e1"),
            Some("POINT(-002.500e1 01.50)".to_string())
        );
    }
}
