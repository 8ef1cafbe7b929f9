//! Ticker symbol normalisation between ticker lists, tables and Yahoo Finance

/// Strip decorations (`$`, `TSX:` prefixes, `.TO`/`.NE` suffixes) and map
/// unit trusts to Yahoo's `.UN` form, appending `.TO` for TSX listings
pub fn yahoo_symbol(symbol: &str, is_tsx: bool) -> String {
    let bare = symbol.trim().replace('$', "");
    let bare = bare.rsplit(':').next().unwrap_or_default();
    let clean = bare.replace("-UN", ".UN").replace(".TO", "").replace(".NE", "");

    if is_tsx { format!("{clean}.TO") } else { clean }
}

/// Candidate keys for looking a symbol up in a table keyed by ticker-list symbols
///
/// The exact symbol comes first; TSX symbols are also tried without and with
/// the `.TO` suffix.
pub fn lookup_variants(symbol: &str, is_tsx: bool) -> Vec<String> {
    let symbol = symbol.trim();
    let mut variants = vec![symbol.to_string()];

    if is_tsx {
        let alternate = match symbol.strip_suffix(".TO") {
            Some(stripped) => stripped.to_string(),
            None => format!("{symbol}.TO"),
        };
        variants.push(alternate);
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yahoo_symbol() {
        assert_eq!(yahoo_symbol("JEPI", false), "JEPI");
        assert_eq!(yahoo_symbol("HYLD.TO", true), "HYLD.TO");
        assert_eq!(yahoo_symbol("HYLD", true), "HYLD.TO");
        assert_eq!(yahoo_symbol("TSX:ZWC", true), "ZWC.TO");
        assert_eq!(yahoo_symbol("$HMAX", true), "HMAX.TO");
        assert_eq!(yahoo_symbol("EMCL.NE", true), "EMCL.TO");
        assert_eq!(yahoo_symbol("REI-UN", true), "REI.UN.TO");
    }

    #[test]
    fn test_lookup_variants() {
        assert_eq!(lookup_variants("JEPI", false), vec!["JEPI"]);
        assert_eq!(lookup_variants("HYLD.TO", true), vec!["HYLD.TO", "HYLD"]);
        assert_eq!(lookup_variants("HYLD", true), vec!["HYLD", "HYLD.TO"]);
    }
}
