//! Parameter set for the whole scan.
//!
//! Defaults are the canonical values: 4 % polygon tolerance, anchors larger
//! than 400 px² with aspect in `[0.9, 1.1]`, a 595×842 page, 5 options and a
//! 0.4 fill threshold. The question count normally comes from the exam being
//! graded; `default_num_questions` only applies when a request omits it.

use crate::anchors::AnchorParams;
use crate::error::OmrError;
use crate::rectify::RectifyParams;
use crate::scoring::{ScoringParams, MAX_OPTIONS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OmrParams {
    pub anchors: AnchorParams,
    pub rectify: RectifyParams,
    pub scoring: ScoringParams,
    pub default_num_questions: usize,
}

impl Default for OmrParams {
    fn default() -> Self {
        Self {
            anchors: AnchorParams::default(),
            rectify: RectifyParams::default(),
            scoring: ScoringParams::default(),
            default_num_questions: 20,
        }
    }
}

impl OmrParams {
    pub fn validate(&self) -> Result<(), OmrError> {
        let a = &self.anchors;
        if !(a.min_area.is_finite() && a.min_area >= 0.0) {
            return Err(invalid("anchors.minArea must be a non-negative number"));
        }
        if !(a.epsilon_fraction > 0.0 && a.epsilon_fraction < 1.0) {
            return Err(invalid("anchors.epsilonFraction must lie in (0, 1)"));
        }
        if !(a.min_aspect > 0.0 && a.min_aspect <= a.max_aspect) {
            return Err(invalid("anchors aspect band must satisfy 0 < min <= max"));
        }
        let r = &self.rectify;
        if r.width == 0 || r.height == 0 {
            return Err(invalid("rectify page size must be non-zero"));
        }
        if !(r.min_quad_area.is_finite() && r.min_quad_area >= 0.0) {
            return Err(invalid("rectify.minQuadArea must be a non-negative number"));
        }
        let s = &self.scoring;
        if s.num_options == 0 || s.num_options > MAX_OPTIONS {
            return Err(invalid(format!(
                "scoring.numOptions must lie in 1..={MAX_OPTIONS}"
            )));
        }
        if !(0.0..=1.0).contains(&s.fill_threshold) {
            return Err(invalid("scoring.fillThreshold must lie in [0, 1]"));
        }
        if self.default_num_questions == 0 {
            return Err(invalid("defaultNumQuestions must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> OmrError {
    OmrError::InvalidParams(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(OmrParams::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let mut p = OmrParams::default();
        p.scoring.num_options = 0;
        assert!(matches!(p.validate(), Err(OmrError::InvalidParams(_))));

        let mut p = OmrParams::default();
        p.anchors.min_aspect = 1.2;
        assert!(matches!(p.validate(), Err(OmrError::InvalidParams(_))));

        let mut p = OmrParams::default();
        p.scoring.fill_threshold = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p: OmrParams =
            serde_json::from_str(r#"{"defaultNumQuestions":50,"anchors":{"minArea":1000.0}}"#)
                .unwrap();
        assert_eq!(p.default_num_questions, 50);
        assert_eq!(p.anchors.min_area, 1000.0);
        assert_eq!(p.anchors.epsilon_fraction, 0.04);
        assert_eq!(p.scoring, ScoringParams::default());
    }
}
