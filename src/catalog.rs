//! Named last-layer algorithms offered for practice.
//!
//! Picking one sets the cube up with the algorithm's inverse, so the user can
//! then solve it by performing the algorithm itself.

/// A named move sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Algorithm {
    pub group: &'static str,
    pub name: &'static str,
    /// Image shown next to the entry in a menu.
    pub icon: &'static str,
    pub moves: &'static str,
}

const fn entry(
    group: &'static str,
    name: &'static str,
    icon: &'static str,
    moves: &'static str,
) -> Algorithm {
    Algorithm {
        group,
        name,
        icon,
        moves,
    }
}

/// Every catalog entry, grouped: orientation (OLL) first, then
/// permutation (PLL).
pub const CATALOG: &[Algorithm] = &[
    entry("OLL", "Dot", "/images/oll/dot.png", "F R U R' U' F' f R U R' U' f'"),
    entry("OLL", "Horizontal", "/images/oll/horizontal.png", "F R U R' U' F'"),
    entry("OLL", "L-shape", "/images/oll/l-shape.png", "f R U R' U' f'"),
    entry("OLL", "Antisune", "/images/oll/antisune.png", "R U2 R' U' R U' R'"),
    entry(
        "OLL",
        "Cross-opposite",
        "/images/oll/cross-opposite.png",
        "R U R' U R U' R' U R U2 R'",
    ),
    entry("OLL", "L-corners", "/images/oll/l-corners.png", "F R' F' r U R U' r'"),
    entry(
        "OLL",
        "Cross-adjacent",
        "/images/oll/cross-adjacent.png",
        "R U2 R2 U' R2 U' R2 U2 R",
    ),
    entry("OLL", "Sune", "/images/oll/sune.png", "R U R' U R U2 R'"),
    entry("OLL", "T-side", "/images/oll/t-side.png", "r U R' U' r' F R F'"),
    entry("OLL", "T-front", "/images/oll/t-front.png", "R2 D R' U2 R D' R' U2 R'"),
    entry(
        "PLL",
        "Diagonal",
        "/images/pll/diagonal.png",
        "F R U' R' U' R U R' F' R U R' U' R' F R F'",
    ),
    entry(
        "PLL",
        "Headlights",
        "/images/pll/headlights.png",
        "R U R' U' R' F R2 U' R' U' R U R' F'",
    ),
    entry("PLL", "PLL-H", "/images/pll/pll-h.png", "M2 U M2 U2 M2 U M2"),
    entry("PLL", "PLL-Ua", "/images/pll/pll-ua.png", "R U' R U R U R U' R' U' R2"),
    entry("PLL", "PLL-Ub", "/images/pll/pll-ub.png", "R2 U R U R' U' R' U' R' U R'"),
    entry("PLL", "PLL-Z", "/images/pll/pll-z.png", "M' U M2 U M2 U M' U2 M2"),
];

/// Looks up an entry by name, ignoring ASCII case.
pub fn find(name: &str) -> Option<&'static Algorithm> {
    CATALOG
        .iter()
        .find(|algorithm| algorithm.name.eq_ignore_ascii_case(name))
}

/// Formats the catalog as a grouped, indented listing.
pub fn format_catalog() -> String {
    let mut output = String::new();
    let mut current_group = None;
    for algorithm in CATALOG {
        if current_group != Some(algorithm.group) {
            output.push_str(algorithm.group);
            output.push('\n');
            current_group = Some(algorithm.group);
        }
        output.push_str(&format!("  {}: {}\n", algorithm.name, algorithm.moves));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{tokens, Move};

    #[test]
    fn test_every_catalog_move_parses() {
        for algorithm in CATALOG {
            for token in tokens(algorithm.moves) {
                assert!(
                    token.parse::<Move>().is_ok(),
                    "{} has bad token {token:?}",
                    algorithm.name
                );
            }
        }
    }

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(find("sune").map(|a| a.moves), Some("R U R' U R U2 R'"));
        assert_eq!(find("pll-z").map(|a| a.group), Some("PLL"));
        assert!(find("Niklas").is_none());
    }

    #[test]
    fn test_groups_are_contiguous() {
        let listing = format_catalog();
        assert_eq!(listing.lines().filter(|l| !l.starts_with(' ')).count(), 2);
        assert_eq!(listing.lines().count(), CATALOG.len() + 2);
    }
}
