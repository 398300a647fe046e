//! Pure numeric helpers for column-width and breakpoint arithmetic.
//!
//! The gap-to-percentage scale in [`column_width`] treats each gap pixel as
//! contributing `gap / 10` percentage points, the legacy ratio calibrated
//! against a 1200px reference container. Changing it changes every emitted
//! column width.

use crate::{Error, Result};

fn check_domain(columns: u32, gap: f64) -> Result<()> {
    if columns < 1 {
        return Err(Error::InvalidParameter("columns must be at least 1".into()));
    }
    if gap < 0.0 {
        return Err(Error::InvalidParameter("gap must be non-negative".into()));
    }
    Ok(())
}

/// Width expression for one column of an N-column grid.
///
/// A single column is always the full container. For more columns the share
/// is a hybrid expression: a percentage (container width minus the gap
/// total, scaled) minus an even pixel share of the gap total.
pub fn column_width(columns: u32, gap: f64) -> Result<String> {
    check_domain(columns, gap)?;

    if columns == 1 {
        return Ok("100%".to_string());
    }

    let total_gap = gap * f64::from(columns - 1);
    let remaining = 100.0 - total_gap / 10.0;
    let percentage = remaining / f64::from(columns);
    let pixel_share = total_gap / f64::from(columns);

    Ok(format!("calc({}% - {}px)", percentage, pixel_share))
}

/// Viewport width in pixels at which `columns` cards of `min_width` plus the
/// gaps between them first fit.
pub fn breakpoint_width(columns: u32, gap: f64, min_width: f64) -> Result<f64> {
    check_domain(columns, gap)?;
    Ok(f64::from(columns) * min_width + gap * f64::from(columns - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_column_is_full_width_regardless_of_gap() {
        assert_eq!(column_width(1, 0.0).unwrap(), "100%");
        assert_eq!(column_width(1, 24.0).unwrap(), "100%");
        assert_eq!(column_width(1, 999.0).unwrap(), "100%");
    }

    #[test]
    fn column_width_formats_hybrid_expression() {
        // 4 columns, 24px gap: (100 - 72/10) / 4 = 23.2%, 72/4 = 18px
        assert_eq!(column_width(4, 24.0).unwrap(), "calc(23.2% - 18px)");
        // 2 columns, no gap: clean halves, no gap correction
        assert_eq!(column_width(2, 0.0).unwrap(), "calc(50% - 0px)");
    }

    #[test]
    fn percentage_is_below_even_share_when_gap_is_positive() {
        for columns in 2..8u32 {
            let expr = column_width(columns, 16.0).unwrap();
            let pct: f64 = expr
                .strip_prefix("calc(")
                .and_then(|s| s.split('%').next())
                .unwrap()
                .parse()
                .unwrap();
            assert!(pct < 100.0 / f64::from(columns), "{} columns: {}", columns, expr);
        }
    }

    #[test]
    fn out_of_domain_parameters_fail() {
        assert!(matches!(column_width(0, 10.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(column_width(3, -1.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(breakpoint_width(0, 10.0, 300.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(breakpoint_width(3, -0.5, 300.0), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn breakpoint_is_strictly_increasing_in_columns() {
        let mut previous = 0.0;
        for columns in 1..10u32 {
            let bp = breakpoint_width(columns, 24.0, 280.0).unwrap();
            assert!(bp > previous);
            previous = bp;
        }
    }

    #[test]
    fn breakpoint_matches_formula() {
        assert_eq!(breakpoint_width(4, 24.0, 280.0).unwrap(), 1192.0);
        assert_eq!(breakpoint_width(1, 24.0, 280.0).unwrap(), 280.0);
    }
}
