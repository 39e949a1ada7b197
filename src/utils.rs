use crate::error::{PhaseError, Result};
use std::io;
use std::path::Path;
use std::process::Command;

/// Split a line on whitespace and parse exactly two floats.
/// Return None for empty or whitespace-only lines, which are skipped by the loader.
/// `line_number` is 1-based and only used for the error report.
pub fn parse_pair(l: &str, line_number: usize) -> Result<Option<(f64, f64)>> {
    let tokens: Vec<&str> = l.split_whitespace().collect();
    match tokens[..] {
        [] => Ok(None),
        [a, b] => {
            let y1 = parse_token(a, l, line_number)?;
            let y2 = parse_token(b, l, line_number)?;
            Ok(Some((y1, y2)))
        }
        _ => Err(PhaseError::parse(
            line_number,
            l,
            format!("expected 2 values, found {}", tokens.len()),
        )),
    }
}

fn parse_token(token: &str, l: &str, line_number: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|e| PhaseError::parse(line_number, l, format!("{}: {:?}", e, token)))
}

/// Whether a graphical session is there to show a plot.
/// Only checked on unix-like hosts other than macOS.
pub fn has_display() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|v| std::env::var_os(v).map_or(false, |s| !s.is_empty()))
}

/// Hand a file to the default application of the host.
pub fn open_in_viewer(path: &Path) -> io::Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    let status = cmd.arg(path).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("viewer exited with {}", status),
        ))
    }
}

/// y + a * x, element-wise.
pub fn axpy(a: f64, x: &[f64], y: &[f64]) -> Vec<f64> {
    assert_eq!(x.len(), y.len(), "vectors must have the same length");
    y.iter().zip(x).map(|(yi, xi)| yi + a * xi).collect()
}

/// Euclidean norm of the difference a - b.
pub fn norm_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have the same length");
    a.iter()
        .zip(b)
        .map(|(ai, bi)| (ai - bi) * (ai - bi))
        .sum::<f64>()
        .sqrt()
}

/// Largest absolute element-wise difference.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have the same length");
    a.iter()
        .zip(b)
        .map(|(ai, bi)| (ai - bi).abs())
        .fold(0f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_two_tokens() {
        assert_eq!(parse_pair("1.0 2.0", 1).unwrap(), Some((1.0, 2.0)));
        assert_eq!(parse_pair("  -3.5\t4e-2  ", 1).unwrap(), Some((-3.5, 0.04)));
    }

    #[test]
    fn parse_pair_blank_is_skipped() {
        assert_eq!(parse_pair("", 1).unwrap(), None);
        assert_eq!(parse_pair(" \t ", 1).unwrap(), None);
    }

    #[test]
    fn parse_pair_wrong_token_count() {
        match parse_pair("1.0 2.0 3.0", 7) {
            Err(PhaseError::Parse { line, content, .. }) => {
                assert_eq!(line, 7);
                assert_eq!(content, "1.0 2.0 3.0");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(
            parse_pair("1.0", 1),
            Err(PhaseError::Parse { .. })
        ));
    }

    #[test]
    fn parse_pair_non_numeric() {
        match parse_pair("abc 2.0", 2) {
            Err(PhaseError::Parse { line, content, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "abc 2.0");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn vector_helpers() {
        assert_eq!(axpy(2.0, &[1.0, 2.0], &[0.5, 0.5]), vec![2.5, 4.5]);
        assert_eq!(norm_diff(&[3.0, 4.0], &[0.0, 0.0]), 5.0);
        assert_eq!(max_abs_diff(&[1.0, -4.0], &[0.0, 0.0]), 4.0);
    }
}
