//! End-to-end: a two-mass population prior assembled from JSON and from code.

use approx::assert_relative_eq;
use pp_core::Support;
use pp_priors::{
    BoundedPdf, ConditionalPdf2d, Distribution, JointPdf2d, PowerLawGaussianPdf, PowerLawPdf,
    Prior, PriorSpecV0, Samples, SmoothedPdf, TruncatedGaussianPdf, read_prior_spec,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const MASS_SPEC: &str = r#"{
  "schema_version": "popprior_spec_v0",
  "name": "plp-smoothed-pairing",
  "distribution": {
    "type": "conditional",
    "outer": {
      "type": "smoothed",
      "width": 4.8,
      "origin": {
        "type": "power_law_gaussian",
        "power_law": {"min": 4.6, "max": 86.0, "alpha": -3.4},
        "gaussian": {"mean": 34.0, "sigma": 3.6, "min": 4.6, "max": 100.0},
        "lambda_peak": 0.04
      }
    },
    "inner": {
      "type": "smoothed",
      "width": 4.8,
      "origin": {"type": "power_law", "min": 4.6, "max": 100.0, "alpha": 1.1}
    }
  }
}"#;

fn primary() -> SmoothedPdf {
    let pl = PowerLawPdf::new(4.6, 86.0, -3.4).unwrap();
    let g = TruncatedGaussianPdf::new(34.0, 3.6, 4.6, 100.0).unwrap();
    SmoothedPdf::new(PowerLawGaussianPdf::new(pl, g, 0.04).unwrap(), 4.8).unwrap()
}

fn secondary() -> SmoothedPdf {
    SmoothedPdf::new(PowerLawPdf::new(4.6, 100.0, 1.1).unwrap(), 4.8).unwrap()
}

#[test]
fn json_and_code_build_the_same_joint_density() {
    let spec = PriorSpecV0::from_json_str(MASS_SPEC).unwrap();
    let Distribution::TwoD(from_json) = spec.compile().unwrap() else {
        panic!("expected a 2D prior");
    };
    let from_code = ConditionalPdf2d::new(Prior::from(primary()), Prior::from(secondary()));
    for (m1, m2) in [(30.0, 20.0), (9.0, 6.0), (80.0, 79.0), (35.0, 5.0)] {
        assert_relative_eq!(from_json.log_pdf(m1, m2), from_code.log_pdf(m1, m2), epsilon = 1e-12);
    }
    assert_eq!(from_json.log_pdf(20.0, 30.0), f64::NEG_INFINITY);
}

#[test]
fn joint_samples_respect_ordering_and_support() {
    let spec = PriorSpecV0::from_json_str(MASS_SPEC).unwrap();
    let dist = spec.compile().unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let Samples::TwoD(draws) = dist.sample(25_000, &mut rng).unwrap() else {
        panic!("expected paired samples");
    };
    let support = Support::new(4.6, 100.0).unwrap();
    assert_eq!(draws.len(), 25_000);
    for (m1, m2) in draws.iter() {
        assert!(m2 <= m1);
        assert!(support.contains(m1) && support.contains(m2));
    }
}

#[test]
fn primary_marginal_of_samples_matches_cdf() {
    let joint = ConditionalPdf2d::new(primary(), secondary());
    let mut rng = StdRng::seed_from_u64(7);
    let draws = joint.sample(40_000, &mut rng).unwrap();
    let p = primary();
    for q in [15.0, 30.0, 40.0] {
        let expected = p.cdf(q);
        let observed = draws.x1.iter().filter(|&&m| m <= q).count() as f64 / draws.len() as f64;
        assert!((observed - expected).abs() < 0.015, "P(m1 <= {q}): {observed} vs {expected}");
    }
}

#[test]
fn spec_file_roundtrip_through_disk() {
    let dir = std::env::temp_dir().join(format!("pp-priors-spec-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("mass.json");
    std::fs::write(&path, MASS_SPEC).unwrap();

    let spec = read_prior_spec(&path).unwrap();
    assert_eq!(spec.name.as_deref(), Some("plp-smoothed-pairing"));
    assert_eq!(spec.distribution.dimension(), 2);

    let missing = read_prior_spec(&dir.join("nope.json"));
    assert!(matches!(missing, Err(pp_core::Error::Io(_))));
    std::fs::remove_dir_all(&dir).ok();
}
