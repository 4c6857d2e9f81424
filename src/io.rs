//! Load-file parsing and route report formatting.
//!
//! Input: a header line, then one load per non-blank line:
//!
//! ```text
//! loadNumber pickup dropoff
//! 1 (-9.100071078494038,-48.89301103772511) (-116.78442279683607,76.80147820713637)
//! ```
//!
//! Output: one line per route listing its load ids, e.g. `[4,2]`.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Load, Point, Route, Solution};

/// Parses a load list. The first line is a header and is skipped, as are
/// blank lines.
///
/// # Errors
///
/// [`Error::Parse`] with the 1-based line number of the first bad line.
///
/// # Examples
///
/// ```
/// use u_pickup::io::parse_loads;
///
/// let text = "loadNumber pickup dropoff\n1 (1.5,-2) (3,4)\n\n2  (0,1)   (-1,0)\n";
/// let loads = parse_loads(text).unwrap();
/// assert_eq!(loads.len(), 2);
/// assert_eq!(loads[0].start().x(), 1.5);
/// assert_eq!(loads[1].id(), 2);
/// ```
pub fn parse_loads(text: &str) -> Result<Vec<Load>> {
    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line).map_err(|reason| Error::Parse {
                line: idx + 1,
                reason,
            })
        })
        .collect()
}

/// Reads and parses a load file.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, otherwise as [`parse_loads`].
pub fn read_loads(path: impl AsRef<Path>) -> Result<Vec<Load>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_loads(&text)
}

fn parse_line(line: &str) -> std::result::Result<Load, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    }
    let id = fields[0]
        .parse::<usize>()
        .map_err(|e| format!("bad load id {:?}: {e}", fields[0]))?;
    let start = parse_point(fields[1])?;
    let end = parse_point(fields[2])?;
    Ok(Load::new(id, start, end))
}

fn parse_point(field: &str) -> std::result::Result<Point, String> {
    let inner = field
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| format!("point {field:?} is not parenthesized"))?;
    let (x, y) = inner
        .split_once(',')
        .ok_or_else(|| format!("point {field:?} has no comma"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate {s:?} in {field:?}: {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

/// Formats one route as `[id,id,...]`: load ids in visiting order, each
/// once, depot omitted, no spaces.
///
/// # Examples
///
/// ```
/// use u_pickup::io::format_route;
/// use u_pickup::models::Route;
///
/// let route = Route::new(vec![0, 7, 8, 3, 4, 0], 100.0);
/// assert_eq!(format_route(&route), "[4,2]");
/// ```
pub fn format_route(route: &Route) -> String {
    let ids: Vec<String> = route.load_ids().iter().map(|id| id.to_string()).collect();
    format!("[{}]", ids.join(","))
}

/// Formats every route of a solution, one per line.
pub fn format_solution(solution: &Solution) -> String {
    solution
        .routes()
        .iter()
        .map(format_route)
        .collect::<Vec<_>>()
        .join("\n")
}
