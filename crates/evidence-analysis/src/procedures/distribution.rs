//! Distribution tails and critical values via `statrs`.
//!
//! Constructor failures (non-positive degrees of freedom, NaN parameters)
//! surface as `DEGENERATE_INPUT` rather than panics.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use evidence_core::types::Tail;
use evidence_core::AnalysisError;

fn students_t(df: f64) -> Result<StudentsT, AnalysisError> {
    if !(df.is_finite() && df > 0.0) {
        return Err(AnalysisError::degenerate(format!(
            "invalid degrees of freedom {df}"
        )));
    }
    StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AnalysisError::degenerate(format!("t distribution: {e}")))
}

/// P-value of a t statistic under the requested alternative.
pub fn t_p_value(t: f64, df: f64, tail: Tail) -> Result<f64, AnalysisError> {
    if !t.is_finite() {
        return Err(AnalysisError::degenerate("t statistic is not finite"));
    }
    let dist = students_t(df)?;
    let p = match tail {
        Tail::TwoSided => 2.0 * dist.sf(t.abs()),
        Tail::Greater => dist.sf(t),
        Tail::Less => dist.cdf(t),
    };
    Ok(p.clamp(0.0, 1.0))
}

/// Two-sided critical value: the t quantile at `1 - (1 - level) / 2`.
pub fn t_critical(df: f64, level: f64) -> Result<f64, AnalysisError> {
    let dist = students_t(df)?;
    Ok(dist.inverse_cdf(1.0 - (1.0 - level) / 2.0))
}

/// Upper-tail probability of an F statistic.
pub fn f_sf(f: f64, numerator: f64, denominator: f64) -> Result<f64, AnalysisError> {
    if !f.is_finite() {
        return Err(AnalysisError::degenerate("F statistic is not finite"));
    }
    let dist = FisherSnedecor::new(numerator, denominator)
        .map_err(|e| AnalysisError::degenerate(format!("F distribution: {e}")))?;
    Ok(dist.sf(f.max(0.0)).clamp(0.0, 1.0))
}

/// Upper-tail probability of a chi-square statistic.
pub fn chi_square_sf(x: f64, df: f64) -> Result<f64, AnalysisError> {
    if !x.is_finite() {
        return Err(AnalysisError::degenerate("chi-square statistic is not finite"));
    }
    let dist = ChiSquared::new(df)
        .map_err(|e| AnalysisError::degenerate(format!("chi-square distribution: {e}")))?;
    Ok(dist.sf(x.max(0.0)).clamp(0.0, 1.0))
}

/// Two-sided standard-normal critical value for a confidence level.
pub fn z_critical(level: f64) -> Result<f64, AnalysisError> {
    let dist = Normal::new(0.0, 1.0)
        .map_err(|e| AnalysisError::degenerate(format!("normal distribution: {e}")))?;
    Ok(dist.inverse_cdf(1.0 - (1.0 - level) / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_two_sided_is_double_one_sided() {
        let two = t_p_value(2.0, 10.0, Tail::TwoSided).unwrap();
        let greater = t_p_value(2.0, 10.0, Tail::Greater).unwrap();
        let less = t_p_value(2.0, 10.0, Tail::Less).unwrap();
        assert!((two - 2.0 * greater).abs() < 1e-12);
        assert!((greater + less - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_t_critical_known_value() {
        // t(0.975, 10) = 2.228
        assert!((t_critical(10.0, 0.95).unwrap() - 2.228).abs() < 1e-3);
    }

    #[test]
    fn test_z_critical_known_value() {
        assert!((z_critical(0.95).unwrap() - 1.95996).abs() < 1e-4);
    }

    #[test]
    fn test_chi_square_known_value() {
        // P(χ²(1) > 3.841) = 0.05
        assert!((chi_square_sf(3.841, 1.0).unwrap() - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_f_equals_t_squared_tail() {
        let p_t = t_p_value(2.5, 12.0, Tail::TwoSided).unwrap();
        let p_f = f_sf(6.25, 1.0, 12.0).unwrap();
        assert!((p_t - p_f).abs() < 1e-9);
    }

    #[test]
    fn test_zero_df_is_degenerate() {
        assert!(matches!(
            t_p_value(1.0, 0.0, Tail::TwoSided),
            Err(AnalysisError::DegenerateInput { .. })
        ));
    }
}
