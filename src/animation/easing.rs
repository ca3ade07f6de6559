use std::f32::consts::PI;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseDirection {
    In,
    Out,
    InOut,
}

/// Easing curves, named after the GSAP eases the page choreography was
/// authored with. `Power(n, ..)` is GSAP's `powerN`, i.e. a polynomial of
/// degree `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    None,
    Power(u8, EaseDirection),
    Sine(EaseDirection),
    /// The smooth scroller's default curve, `min(1, 1.001 - 2^(-10t))`.
    ExpoScroll,
}

impl Default for Ease {
    /// GSAP's default ease for standalone tweens.
    fn default() -> Self {
        Ease::Power(1, EaseDirection::Out)
    }
}

impl Ease {
    pub const POWER1_IN_OUT: Ease = Ease::Power(1, EaseDirection::InOut);
    pub const POWER2_IN_OUT: Ease = Ease::Power(2, EaseDirection::InOut);
    pub const POWER3_IN_OUT: Ease = Ease::Power(3, EaseDirection::InOut);
    pub const POWER3_OUT: Ease = Ease::Power(3, EaseDirection::Out);
    pub const SINE_IN_OUT: Ease = Ease::Sine(EaseDirection::InOut);

    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Ease::None => t,
            Ease::Power(power, direction) => {
                let exponent = power as i32 + 1;
                match direction {
                    EaseDirection::In => t.powi(exponent),
                    EaseDirection::Out => 1.0 - (1.0 - t).powi(exponent),
                    EaseDirection::InOut => {
                        if t < 0.5 {
                            (t * 2.0).powi(exponent) / 2.0
                        } else {
                            1.0 - ((1.0 - t) * 2.0).powi(exponent) / 2.0
                        }
                    }
                }
            }
            Ease::Sine(direction) => match direction {
                EaseDirection::In => 1.0 - (t * PI / 2.0).cos(),
                EaseDirection::Out => (t * PI / 2.0).sin(),
                EaseDirection::InOut => -((PI * t).cos() - 1.0) / 2.0,
            },
            Ease::ExpoScroll => (1.001 - 2f32.powf(-10.0 * t)).min(1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ease: {0:?}")]
pub struct UnknownEase(pub String);

impl FromStr for Ease {
    type Err = UnknownEase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, direction) = match s.split_once('.') {
            Some((name, direction)) => (name, Some(direction)),
            None => (s, None),
        };

        let direction = match direction {
            None | Some("out") => EaseDirection::Out,
            Some("in") => EaseDirection::In,
            Some("inOut") => EaseDirection::InOut,
            Some(_) => return Err(UnknownEase(s.to_string())),
        };

        match name {
            "none" | "linear" => Ok(Ease::None),
            "sine" => Ok(Ease::Sine(direction)),
            "power0" => Ok(Ease::None),
            "power1" | "quad" => Ok(Ease::Power(1, direction)),
            "power2" | "cubic" => Ok(Ease::Power(2, direction)),
            "power3" | "quart" => Ok(Ease::Power(3, direction)),
            "power4" | "quint" | "strong" => Ok(Ease::Power(4, direction)),
            _ => Err(UnknownEase(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 8] = [
        Ease::None,
        Ease::Power(1, EaseDirection::In),
        Ease::Power(2, EaseDirection::Out),
        Ease::POWER2_IN_OUT,
        Ease::POWER3_IN_OUT,
        Ease::Sine(EaseDirection::In),
        Ease::SINE_IN_OUT,
        Ease::ExpoScroll,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 2e-3, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
        }
    }

    #[test]
    fn in_out_curves_are_symmetric() {
        for ease in [Ease::POWER1_IN_OUT, Ease::POWER2_IN_OUT, Ease::SINE_IN_OUT] {
            assert!((ease.apply(0.5) - 0.5).abs() < 1e-6);
            let a = ease.apply(0.2);
            let b = ease.apply(0.8);
            assert!((a + b - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn power2_in_out_matches_cubic() {
        let ease = Ease::POWER2_IN_OUT;
        assert!((ease.apply(0.25) - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::None.apply(-1.0), 0.0);
        assert_eq!(Ease::None.apply(3.0), 1.0);
    }

    #[test]
    fn parses_gsap_names() {
        assert_eq!("power2.inOut".parse::<Ease>().unwrap(), Ease::POWER2_IN_OUT);
        assert_eq!("power3".parse::<Ease>().unwrap(), Ease::POWER3_OUT);
        assert_eq!("sine.inOut".parse::<Ease>().unwrap(), Ease::SINE_IN_OUT);
        assert_eq!("none".parse::<Ease>().unwrap(), Ease::None);
        assert!("bounce.out".parse::<Ease>().is_err());
        assert!("power2.sideways".parse::<Ease>().is_err());
    }
}
