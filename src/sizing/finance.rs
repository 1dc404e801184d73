//! Multi-year savings projection.

use std::fmt;

use serde::Serialize;

/// Savings for one year of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProjection {
    /// 1-based year index.
    pub year: u32,
    pub savings: f64,
    pub cumulative: f64,
}

/// Year-by-year savings with tariffs growing at `inflation_rate`.
///
/// Year 1 saves `annual_savings`; each following year grows by the
/// inflation rate.
pub fn project(annual_savings: f64, inflation_rate: f64, years: u32) -> Vec<YearProjection> {
    let growth = 1.0 + inflation_rate;
    let mut cumulative = 0.0;
    (0..years)
        .map(|k| {
            let savings = annual_savings * growth.powi(k as i32);
            cumulative += savings;
            YearProjection {
                year: k + 1,
                savings,
                cumulative,
            }
        })
        .collect()
}

/// Total savings over `years`, as the closed-form geometric series.
///
/// ```
/// use pv_quote::sizing::finance::cumulative_savings;
///
/// assert_eq!(cumulative_savings(1000.0, 0.0, 20), 20_000.0);
/// assert!(cumulative_savings(1000.0, 0.015, 20) > 20_000.0);
/// ```
pub fn cumulative_savings(annual_savings: f64, inflation_rate: f64, years: u32) -> f64 {
    let n = f64::from(years);
    if inflation_rate.abs() < 1e-12 {
        return annual_savings * n;
    }
    annual_savings * ((1.0 + inflation_rate).powf(n) - 1.0) / inflation_rate
}

/// Renders a projection as an aligned text table.
pub struct ProjectionTable<'a>(pub &'a [YearProjection]);

impl fmt::Display for ProjectionTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year      savings ₪    cumulative ₪")?;
        for row in self.0 {
            write!(
                f,
                "\n{:>4} {:>14.2} {:>15.2}",
                row.year, row.savings, row.cumulative
            )?;
        }
        Ok(())
    }
}
