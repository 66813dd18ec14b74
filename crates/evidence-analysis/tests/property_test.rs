//! Property tests over randomly generated samples.

use evidence_analysis::EvidenceEngine;
use evidence_core::types::*;
use proptest::prelude::*;

fn sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 2..15)
}

fn has_spread(values: &[f64]) -> bool {
    values.iter().any(|v| (v - values[0]).abs() > 1e-6)
}

fn groups(a: &[f64], b: &[f64], first: &str, second: &str) -> AnalysisRequest {
    AnalysisRequest::with_groups(
        ObservationSet::new()
            .with(first, a.iter().copied())
            .with(second, b.iter().copied()),
    )
}

proptest! {
    /// Swapping the two groups flips the statistic and keeps the p-value.
    #[test]
    fn prop_two_sample_swap_invariant(a in sample(), b in sample()) {
        prop_assume!(has_spread(&a) && has_spread(&b));
        let engine = EvidenceEngine::with_defaults();
        let ab = engine.evaluate(&groups(&a, &b, "g1", "g2")).unwrap();
        let ba = engine.evaluate(&groups(&b, &a, "g1", "g2")).unwrap();

        prop_assert_eq!(ab.method, MethodKind::TwoSampleComparison);
        let (p1, p2) = (ab.p_value.unwrap(), ba.p_value.unwrap());
        prop_assert!((p1 - p2).abs() < 1e-9, "p {} vs {}", p1, p2);
        let (t1, t2) = (ab.statistic.unwrap().value, ba.statistic.unwrap().value);
        prop_assert!((t1 + t2).abs() < 1e-9 * (1.0 + t1.abs()));
        prop_assert_eq!(ab.significant, ba.significant);
    }

    /// A two-group multi-group comparison reaches the two-sample decision.
    #[test]
    fn prop_two_group_anova_matches_t(a in sample(), b in sample(), alpha in 0.01f64..0.2) {
        prop_assume!(has_spread(&a) && has_spread(&b));
        let engine = EvidenceEngine::with_defaults();
        let t = engine.evaluate(&groups(&a, &b, "g1", "g2").alpha(alpha)).unwrap();
        let f = engine
            .evaluate(
                &groups(&a, &b, "g1", "g2")
                    .alpha(alpha)
                    .analysis_type(MethodKind::MultiGroupComparison),
            )
            .unwrap();
        prop_assert_eq!(f.method, MethodKind::MultiGroupComparison);
        let (pt, pf) = (t.p_value.unwrap(), f.p_value.unwrap());
        prop_assert!((pt - pf).abs() < 1e-6, "t p {} vs F p {}", pt, pf);
        if (pt - alpha).abs() > 1e-6 {
            prop_assert_eq!(t.significant, f.significant);
        }
    }

    /// Significance always equals p < alpha.
    #[test]
    fn prop_significance_is_p_below_alpha(a in sample(), b in sample(), alpha in 0.001f64..0.5) {
        prop_assume!(has_spread(&a) && has_spread(&b));
        let engine = EvidenceEngine::with_defaults();
        let e = engine.evaluate(&groups(&a, &b, "x", "y").alpha(alpha)).unwrap();
        prop_assert_eq!(e.significant, e.p_value.unwrap() < alpha);
    }

    /// Batch outcomes line up with inputs whatever the mix of failures.
    #[test]
    fn prop_batch_positions(pattern in prop::collection::vec(any::<bool>(), 0..12)) {
        let engine = EvidenceEngine::with_defaults();
        let requests: Vec<AnalysisRequest> = pattern
            .iter()
            .map(|ok| {
                if *ok {
                    AnalysisRequest::with_data(ObservationSet::new().with("v", [1.0, 2.0, 4.0]))
                } else {
                    AnalysisRequest::with_data(ObservationSet::new().with("v", Vec::<f64>::new()))
                }
            })
            .collect();
        let outcomes = engine.batch_analyze("p", requests);
        prop_assert_eq!(outcomes.len(), pattern.len());
        for (i, (outcome, ok)) in outcomes.iter().zip(&pattern).enumerate() {
            prop_assert_eq!(outcome.index, i);
            prop_assert_eq!(outcome.is_ok(), *ok);
        }
        prop_assert_eq!(engine.history("p").len(), pattern.iter().filter(|ok| **ok).count());
    }
}
