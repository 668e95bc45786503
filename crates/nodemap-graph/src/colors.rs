//! Cluster color assignment.

use std::collections::BTreeMap;

/// Maps each role group to a palette color, in order, wrapping around when
/// the palette runs out.
///
/// An empty palette gives an empty map, which leaves every node unclustered.
pub fn assign_colors<S: AsRef<str>>(groups: &[String], palette: &[S]) -> BTreeMap<String, String> {
    groups
        .iter()
        .zip(palette.iter().cycle())
        .map(|(group, color)| (group.clone(), color.as_ref().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_assigns_in_order() {
        let colors = assign_colors(&groups(&["app", "db", "web"]), &["red", "green", "blue"]);

        assert_eq!(colors["app"], "red");
        assert_eq!(colors["db"], "green");
        assert_eq!(colors["web"], "blue");
    }

    #[test]
    fn test_wraps_around_palette() {
        let names = groups(&["a", "b", "c", "d", "e"]);
        let palette = ["red", "green"];
        let colors = assign_colors(&names, &palette);

        assert_eq!(colors.len(), 5);
        assert_eq!(colors["c"], colors["a"]);
        assert_eq!(colors["d"], colors["b"]);
        assert_eq!(colors["e"], "red");
    }

    #[test]
    fn test_empty_palette() {
        let palette: [&str; 0] = [];
        assert!(assign_colors(&groups(&["db"]), &palette).is_empty());
    }
}
