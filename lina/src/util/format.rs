use std::fmt::Display;
use itertools::Itertools;

// Renders a real number the way every structure prints its entries.
pub fn real_str<R>(r: &R) -> String
where R: Display {
    format!("{r:.6}")
}

// Right-justifies every cell to the widest cell of the whole grid. 
// One row per line, cells separated by a single space.
pub fn grid<S>(rows: &[Vec<S>]) -> String
where S: AsRef<str> {
    let width = rows.iter()
        .flat_map(|row| row.iter().map(|s| s.as_ref().chars().count()))
        .max()
        .unwrap_or(0);

    rows.iter().map(|row| 
        row.iter().map(|s| format!("{:>width$}", s.as_ref())).join(" ")
    ).join("\n")
}

pub fn line<S>(cells: &[S]) -> String
where S: AsRef<str> {
    let width = cells.iter().map(|s| s.as_ref().chars().count()).max().unwrap_or(0);
    cells.iter().map(|s| format!("{:>width$}", s.as_ref())).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_str() { 
        assert_eq!(real_str(&1.0), "1.000000");
        assert_eq!(real_str(&-0.5), "-0.500000");
        assert_eq!(real_str(&12.25f32), "12.250000");
    }

    #[test]
    fn test_grid() { 
        let rows = vec![
            vec!["1", "-22"],
            vec!["333", "4"],
        ];
        assert_eq!(grid(&rows), "  1 -22\n333   4");
    }

    #[test]
    fn test_grid_empty() { 
        let rows: Vec<Vec<String>> = vec![];
        assert_eq!(grid(&rows), "");
    }

    #[test]
    fn test_line() { 
        assert_eq!(line(&["1", "22", "333"]), "  1  22 333");
    }
}
